// Host metrics via sysinfo

mod linux;

use crate::models::*;
use std::path::Path;
use std::time::Duration;
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};
use tracing::instrument;

/// Window over which CPU usage is measured; `collect` blocks for this long.
pub const DEFAULT_CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Anything that can produce one tick's snapshot. The monitor loop is generic over this
/// so tests can feed synthetic snapshots.
pub trait MetricsSource {
    fn collect(&mut self) -> anyhow::Result<Snapshot>;
}

pub struct SysinfoRepo {
    sys: System,
    disks: Disks,
    networks: Networks,
    cpu_sample_window: Duration,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            cpu_sample_window: DEFAULT_CPU_SAMPLE_WINDOW,
        }
    }

    /// Shorter windows trade accuracy for latency; sysinfo needs at least
    /// `MINIMUM_CPU_UPDATE_INTERVAL` between refreshes.
    pub fn with_cpu_sample_window(mut self, window: Duration) -> Self {
        self.cpu_sample_window = window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self
    }

    pub fn get_cpu_stats(&mut self) -> CpuStats {
        self.sys.refresh_cpu_all();
        std::thread::sleep(self.cpu_sample_window);
        self.sys.refresh_cpu_all();

        let usage = self.sys.global_cpu_usage() as f64;
        let model = linux::read_cpu_model_linux()
            .or_else(|| {
                self.sys
                    .cpus()
                    .first()
                    .map(|c| c.brand().trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "Unknown".into());

        CpuStats {
            model,
            cpu_count: self.sys.cpus().len() as u32,
            usage_percent: usage.clamp(0.0, 100.0),
            cpu_times: linux::read_cpu_times_linux().unwrap_or_default(),
        }
    }

    pub fn get_memory_stats(&mut self) -> MemoryStats {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let available = self.sys.available_memory();
        let used = total.saturating_sub(available);
        MemoryStats {
            total,
            available,
            used,
            percentage: percent_of(used, total),
        }
    }

    pub fn get_disk_stats(&mut self) -> DiskStats {
        self.disks.refresh(true);
        let list = self.disks.list();
        let disk = list
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| list.iter().max_by_key(|d| d.total_space()));

        let Some(d) = disk else {
            return DiskStats::default();
        };
        let total = d.total_space();
        let free = d.available_space();
        let used = total.saturating_sub(free);
        DiskStats {
            mount: d.mount_point().to_string_lossy().into_owned(),
            total,
            used,
            free,
            percentage: percent_of(used, total),
        }
    }

    pub fn get_network_info(&mut self) -> NetworkInfo {
        self.networks.refresh(true);
        let interfaces = self
            .networks
            .list()
            .iter()
            .map(|(name, data)| {
                let mut addrs: Vec<String> = data
                    .ip_networks()
                    .iter()
                    .map(|n| n.addr.to_string())
                    .collect();
                let mac = data.mac_address();
                if !mac.is_unspecified() {
                    addrs.push(mac.to_string());
                }
                (name.clone(), addrs)
            })
            .collect();
        NetworkInfo { interfaces }
    }

    pub fn get_processes(&mut self) -> Vec<ProcessInfo> {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let mut processes: Vec<ProcessInfo> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, p)| ProcessInfo {
                pid: pid.as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                status: p.status().to_string().to_lowercase(),
            })
            .collect();
        processes.sort_by_key(|p| p.pid);
        processes
    }
}

impl MetricsSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "collect"))]
    fn collect(&mut self) -> anyhow::Result<Snapshot> {
        Ok(Snapshot {
            cpu: self.get_cpu_stats(),
            memory: self.get_memory_stats(),
            disk: self.get_disk_stats(),
            network: self.get_network_info(),
            processes: self.get_processes(),
        })
    }
}

fn percent_of(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
