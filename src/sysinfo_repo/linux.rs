// Linux-specific helpers: /proc/cpuinfo model name, /proc/stat CPU times.

use crate::models::CpuTimes;

/// Kernel clock ticks per second for /proc/stat (USER_HZ is 100 on all mainstream arches).
const USER_HZ: f64 = 100.0;

/// Read first "model name" from /proc/cpuinfo (Linux). Prefer over sysinfo when it returns "cpu0" etc.
pub(super) fn read_cpu_model_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in content.lines() {
            if line.starts_with("model name") {
                let name = line
                    .find(": ")
                    .map(|i| line[i + 2..].trim())
                    .filter(|s| !s.is_empty() && *s != "cpu0")?;
                return Some(name.to_string());
            }
        }
    }
    None
}

/// Aggregate user/system/idle seconds from /proc/stat (Linux).
pub(super) fn read_cpu_times_linux() -> Option<CpuTimes> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/stat").ok()?;
        parse_proc_stat(&content)
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Parse the aggregate `cpu` line: `cpu  user nice system idle ...` in clock ticks.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_stat(content: &str) -> Option<CpuTimes> {
    let line = content.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<f64> = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if fields.len() < 4 {
        return None;
    }
    Some(CpuTimes {
        user: fields[0] / USER_HZ,
        system: fields[2] / USER_HZ,
        idle: fields[3] / USER_HZ,
    })
}
