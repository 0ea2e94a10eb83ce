// Threshold alerts: compares each snapshot against configured percentage bounds.

use crate::models::Snapshot;
use std::io::Write;

/// Percentage bounds; a metric alerts only when strictly above its bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: 80.0,
            memory: 85.0,
            disk: 90.0,
        }
    }
}

/// Owns the thresholds and the in-memory alert history for one process lifetime.
#[derive(Debug, Default)]
pub struct AlertEvaluator {
    thresholds: Thresholds,
    history: Vec<String>,
}

impl AlertEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            history: Vec::new(),
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Evaluate, print each alert to stdout as `[ALERT] ...`, and record it in history.
    pub fn check(&mut self, snapshot: &Snapshot) -> Vec<String> {
        let stdout = std::io::stdout();
        self.check_with(snapshot, &mut stdout.lock())
    }

    /// Same as [`check`](Self::check) with notifications written to `out`.
    pub fn check_with<W: Write>(&mut self, snapshot: &Snapshot, out: &mut W) -> Vec<String> {
        let alerts = self.evaluate(snapshot);
        for alert in &alerts {
            // Console notification is best-effort; a closed stdout must not lose history.
            let _ = writeln!(out, "[ALERT] {}", alert);
        }
        self.history.extend(alerts.iter().cloned());
        alerts
    }

    /// Triggered messages in metric order (CPU, memory, disk), without side effects.
    /// NaN never compares above a bound, so malformed readings never alert.
    pub fn evaluate(&self, snapshot: &Snapshot) -> Vec<String> {
        [
            ("CPU", snapshot.cpu.usage_percent, self.thresholds.cpu),
            ("Memory", snapshot.memory.percentage, self.thresholds.memory),
            ("Disk", snapshot.disk.percentage, self.thresholds.disk),
        ]
        .into_iter()
        .filter(|(_, value, threshold)| value > threshold)
        .map(|(metric, value, threshold)| format_alert(metric, value, threshold))
        .collect()
    }

    /// Every alert recorded since start (or the last [`clear`](Self::clear)), oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

fn format_alert(metric: &str, value: f64, threshold: f64) -> String {
    format!(
        "WARNING: {} usage {:.2}% exceeds threshold {}%",
        metric, value, threshold
    )
}
