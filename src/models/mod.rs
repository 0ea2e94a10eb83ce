// Snapshot models: one tick's collected host metrics

mod network;
mod process;
mod storage;
mod system;

pub use network::NetworkInfo;
pub use process::ProcessInfo;
pub use storage::DiskStats;
pub use system::{CpuStats, CpuTimes, MemoryStats, Snapshot};

/// Bytes per gibibyte; every `*_gb` figure in the display and CSV uses this.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Bytes to GB rounded to 2 decimals.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
