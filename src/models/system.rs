// CPU, memory and the per-tick snapshot aggregate

use serde::{Deserialize, Serialize};

use super::{DiskStats, NetworkInfo, ProcessInfo};

/// Cumulative CPU time in seconds since boot, summed over all cores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuTimes {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub model: String,
    /// Logical cores.
    pub cpu_count: u32,
    pub usage_percent: f64,
    pub cpu_times: CpuTimes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percentage: f64,
}

/// One tick's metrics. Missing sections or fields deserialize to zero/empty so a
/// partially written or hand-edited document still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub cpu: CpuStats,
    pub memory: MemoryStats,
    pub disk: DiskStats,
    pub network: NetworkInfo,
    pub processes: Vec<ProcessInfo>,
}
