// Network interface addresses

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interface name to its addresses; serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkInfo {
    pub interfaces: BTreeMap<String, Vec<String>>,
}

impl NetworkInfo {
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// (interface, address) pairs in interface-name order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.interfaces
            .iter()
            .flat_map(|(name, addrs)| addrs.iter().map(move |a| (name.as_str(), a.as_str())))
    }
}
