// Process table entry

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    /// Lowercase state, e.g. "running", "sleeping".
    pub status: String,
}
