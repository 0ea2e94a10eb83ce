// Shared test helpers
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use sysprobe::config::AppConfig;
use sysprobe::models::*;
use sysprobe::sysinfo_repo::MetricsSource;

pub const GB: u64 = 1024 * 1024 * 1024;

pub fn snapshot_with(cpu: f64, memory: f64, disk: f64) -> Snapshot {
    let mut interfaces = BTreeMap::new();
    interfaces.insert(
        "eth0".to_string(),
        vec!["192.168.1.10".to_string(), "fe80::1".to_string()],
    );
    interfaces.insert("lo".to_string(), vec!["127.0.0.1".to_string()]);
    Snapshot {
        cpu: CpuStats {
            model: "Test CPU".into(),
            cpu_count: 4,
            usage_percent: cpu,
            cpu_times: CpuTimes {
                user: 120.5,
                system: 30.25,
                idle: 900.0,
            },
        },
        memory: MemoryStats {
            total: 16 * GB,
            available: 8 * GB,
            used: 8 * GB,
            percentage: memory,
        },
        disk: DiskStats {
            mount: "/".into(),
            total: 100 * GB,
            used: 40 * GB,
            free: 60 * GB,
            percentage: disk,
        },
        network: NetworkInfo { interfaces },
        processes: vec![
            ProcessInfo {
                pid: 1,
                name: "init".into(),
                status: "sleeping".into(),
            },
            ProcessInfo {
                pid: 42,
                name: "sysprobe".into(),
                status: "running".into(),
            },
        ],
    }
}

pub fn quiet_snapshot() -> Snapshot {
    snapshot_with(10.0, 20.0, 30.0)
}

/// Config rooted in `dir` with the given format and a short interval.
pub fn config_in(dir: &std::path::Path, format: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.monitor.interval = 1;
    config.storage.storage_format = format.into();
    config.storage.data_dir = dir.join("data");
    config.storage.log_dir = dir.join("logs");
    config
}

/// Replays queued snapshots, then repeats the last one.
pub struct StaticSource {
    queue: VecDeque<Snapshot>,
    last: Snapshot,
    pub calls: usize,
}

impl StaticSource {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        let last = snapshots.last().cloned().unwrap_or_default();
        Self {
            queue: snapshots.into(),
            last,
            calls: 0,
        }
    }

    pub fn repeating(snapshot: Snapshot) -> Self {
        Self::new(vec![snapshot])
    }
}

impl MetricsSource for StaticSource {
    fn collect(&mut self) -> anyhow::Result<Snapshot> {
        self.calls += 1;
        Ok(self.queue.pop_front().unwrap_or_else(|| self.last.clone()))
    }
}

pub struct FailingSource;

impl MetricsSource for FailingSource {
    fn collect(&mut self) -> anyhow::Result<Snapshot> {
        anyhow::bail!("sensor unavailable")
    }
}
