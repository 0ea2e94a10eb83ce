// Disk usage model

use serde::{Deserialize, Serialize};

/// Usage of the filesystem mounted at `/` (or the largest disk when `/` is absent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskStats {
    pub mount: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percentage: f64,
}
