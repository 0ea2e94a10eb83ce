// Tick loop: collect -> display -> alert -> persist -> (periodic) prune -> sleep.
// Runs on a single thread; the only blocking points are the CPU sampling window inside
// `collect` and the inter-tick sleep, which races the shutdown signal.

use crate::alerts::AlertEvaluator;
use crate::config::AppConfig;
use crate::display::Presenter;
use crate::logging::ALERT_TARGET;
use crate::persistence::{self, PruneOutcome, StorageFormat};
use crate::sysinfo_repo::MetricsSource;
use anyhow::Context;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

/// CSV retention pruning runs on every Nth tick.
pub const PRUNE_EVERY_TICKS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Interrupt or terminate signal.
    Shutdown,
    /// The requested number of ticks completed.
    IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u64,
    /// Alert history length at stop.
    pub alerts: usize,
    pub reason: StopReason,
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub iteration: u64,
    pub alerts: Vec<String>,
    /// `None` when the write failed (the failure was reported and the tick went on).
    pub saved_to: Option<PathBuf>,
    /// `Some` only on ticks where pruning ran and succeeded.
    pub pruned: Option<PruneOutcome>,
}

pub struct Monitor<S, W> {
    source: S,
    evaluator: AlertEvaluator,
    presenter: Presenter,
    config: AppConfig,
    out: W,
    iteration: u64,
    state: MonitorState,
}

impl<S: MetricsSource, W: Write> Monitor<S, W> {
    /// One-time setup: thresholds from config, data directory created. `out` receives the
    /// dashboard, alert notifications, and status lines.
    pub fn new(source: S, config: AppConfig, presenter: Presenter, out: W) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.storage.data_dir).with_context(|| {
            format!(
                "create data directory {}",
                config.storage.data_dir.display()
            )
        })?;
        Ok(Self {
            source,
            evaluator: AlertEvaluator::new(config.thresholds()),
            presenter,
            config,
            out,
            iteration: 0,
            state: MonitorState::Stopped,
        })
    }

    pub fn evaluator(&self) -> &AlertEvaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// One pass of the pipeline. Persistence and pruning failures are absorbed; a failed
    /// collection or console write is returned as fatal.
    pub fn tick(&mut self) -> anyhow::Result<TickReport> {
        self.iteration += 1;
        let iteration = self.iteration;
        writeln!(
            self.out,
            "\n[Iteration {}] Collecting system data...",
            iteration
        )?;

        let snapshot = self.source.collect().context("collect metrics")?;
        self.presenter.display(&snapshot, &mut self.out)?;

        let features = &self.config.features;
        let alerts = if features.enable_alert {
            let alerts = self.evaluator.check_with(&snapshot, &mut self.out);
            if features.enable_logging {
                for alert in &alerts {
                    warn!(target: ALERT_TARGET, "{}", alert);
                }
            }
            alerts
        } else {
            Vec::new()
        };

        let saved_to = match persistence::write_by_format(&snapshot, &self.config) {
            Ok(path) => {
                writeln!(self.out, "Data saved to {}", path.display())?;
                info!(
                    path = %path.display(),
                    format = self.config.storage_format().as_str(),
                    "Snapshot saved"
                );
                Some(path)
            }
            Err(e) => {
                error!(error = %e, operation = "write_by_format", "Failed to save snapshot");
                writeln!(self.out, "[ERROR] Failed to save data: {}", e)?;
                None
            }
        };

        let pruned = if iteration % PRUNE_EVERY_TICKS == 0
            && self.config.storage_format() == StorageFormat::Csv
        {
            // Pruning never aborts the loop; its errors are dropped here on purpose.
            persistence::prune_csv(&self.config.csv_path(), self.config.monitor.retention_hours)
                .inspect(|outcome| {
                    info!(
                        kept = outcome.kept,
                        removed = outcome.removed,
                        "Pruned CSV history"
                    )
                })
                .inspect_err(|e| debug!(error = %e, operation = "prune_csv", "Prune failed"))
                .ok()
        } else {
            None
        };

        writeln!(
            self.out,
            "Next update in {} seconds... (Press Ctrl+C to exit)",
            self.config.monitor.interval
        )?;
        self.out.flush()?;

        Ok(TickReport {
            iteration,
            alerts,
            saved_to,
            pruned,
        })
    }

    /// Tick, then sleep for the configured interval, until `shutdown` resolves (observed
    /// during the sleep) or `max_iterations` ticks have run. A fatal tick error stops the
    /// loop and is returned.
    pub async fn run<F>(&mut self, shutdown: F, max_iterations: Option<u64>) -> anyhow::Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let interval = Duration::from_secs(self.config.monitor.interval);
        self.state = MonitorState::Running;

        let outcome = loop {
            if let Err(e) = self.tick() {
                break Err(e);
            }
            if max_iterations.is_some_and(|max| self.iteration >= max) {
                break Ok(StopReason::IterationLimit);
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break Ok(StopReason::Shutdown);
                }
            }
        };

        self.state = MonitorState::Stopped;
        let reason = outcome?;
        Ok(self.summary(reason))
    }

    fn summary(&self, reason: StopReason) -> RunSummary {
        RunSummary {
            iterations: self.iteration,
            alerts: self.evaluator.history().len(),
            reason,
        }
    }
}
