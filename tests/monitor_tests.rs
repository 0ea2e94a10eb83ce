// Monitor tick/run tests with a synthetic metrics source

mod common;

use common::{FailingSource, StaticSource, config_in, quiet_snapshot, snapshot_with};
use std::fs;
use sysprobe::display::Presenter;
use sysprobe::monitor::{Monitor, MonitorState, PRUNE_EVERY_TICKS, StopReason};
use sysprobe::persistence::{CSV_HEADER, load_csv, load_json};
use tempfile::TempDir;

fn output_of<S>(monitor: &Monitor<S, Vec<u8>>) -> String
where
    S: sysprobe::sysinfo_repo::MetricsSource,
{
    String::from_utf8_lossy(monitor.output()).into_owned()
}

#[test]
fn tick_alerts_prints_and_persists_json() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path(), "json");
    config.alerts.cpu_threshold = 50.0;
    let snapshot = snapshot_with(75.0, 10.0, 10.0);

    let mut monitor = Monitor::new(
        StaticSource::repeating(snapshot.clone()),
        config.clone(),
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    let report = monitor.tick().unwrap();

    let out = output_of(&monitor);
    assert!(out.contains("[Iteration 1] Collecting system data..."));
    assert!(out.contains("System Monitor Dashboard - "));
    assert!(out.contains("[ALERT] WARNING: CPU usage 75.00% exceeds threshold 50%"));
    assert!(out.contains("Next update in 1 seconds"));
    assert_eq!(report.iteration, 1);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(monitor.evaluator().history().len(), 1);

    assert_eq!(report.saved_to.as_deref(), Some(config.json_path().as_path()));
    let stored = load_json(&config.json_path()).unwrap().unwrap();
    assert_eq!(stored, snapshot);
    assert_eq!(stored.cpu.usage_percent, 75.0);
}

#[test]
fn tick_with_alerts_disabled_records_nothing() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path(), "json");
    config.features.enable_alert = false;

    let mut monitor = Monitor::new(
        StaticSource::repeating(snapshot_with(99.0, 99.0, 99.0)),
        config,
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    let report = monitor.tick().unwrap();
    assert!(report.alerts.is_empty());
    assert!(monitor.evaluator().history().is_empty());
    assert!(!output_of(&monitor).contains("[ALERT]"));
}

#[test]
fn persistence_failure_is_reported_and_loop_continues() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), "json");
    let mut monitor = Monitor::new(
        StaticSource::repeating(quiet_snapshot()),
        config.clone(),
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    // A directory where the JSON file should go makes the write fail.
    fs::create_dir_all(config.json_path()).unwrap();

    let first = monitor.tick().unwrap();
    let second = monitor.tick().unwrap();
    assert!(first.saved_to.is_none());
    assert!(second.saved_to.is_none());
    assert_eq!(monitor.iteration(), 2);
    assert!(output_of(&monitor).contains("[ERROR] Failed to save data"));
}

#[test]
fn csv_ticks_append_rows_and_prune_on_tenth_tick() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path(), "Csv");
    config.monitor.retention_hours = 24;
    let csv_path = config.csv_path();

    // One stale row that the first prune must drop.
    fs::create_dir_all(&config.storage.data_dir).unwrap();
    fs::write(
        &csv_path,
        format!(
            "{}\n2000-01-01T00:00:00+00:00,1,1,1,1,1,1,1,1\n",
            CSV_HEADER.join(",")
        ),
    )
    .unwrap();

    let mut monitor = Monitor::new(
        StaticSource::repeating(quiet_snapshot()),
        config,
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    for i in 1..PRUNE_EVERY_TICKS {
        let report = monitor.tick().unwrap();
        assert!(report.pruned.is_none(), "no prune on tick {}", i);
    }
    assert_eq!(load_csv(&csv_path).unwrap().unwrap().len(), 10);

    let report = monitor.tick().unwrap();
    let pruned = report.pruned.expect("prune runs on tick 10");
    assert_eq!(pruned.removed, 1);
    assert_eq!(pruned.kept, 10);
    assert_eq!(load_csv(&csv_path).unwrap().unwrap().len(), 10);
}

#[test]
fn json_format_never_prunes() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), "json");
    let mut monitor = Monitor::new(
        StaticSource::repeating(quiet_snapshot()),
        config,
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    for _ in 0..PRUNE_EVERY_TICKS {
        assert!(monitor.tick().unwrap().pruned.is_none());
    }
}

#[test]
fn collection_failure_is_fatal_for_tick() {
    let dir = TempDir::new().unwrap();
    let mut monitor = Monitor::new(
        FailingSource,
        config_in(dir.path(), "json"),
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    let err = monitor.tick().unwrap_err();
    assert!(format!("{:#}", err).contains("sensor unavailable"));
}

#[tokio::test]
async fn run_stops_on_shutdown_with_alert_summary() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path(), "json");
    config.alerts.cpu_threshold = 50.0;
    let mut monitor = Monitor::new(
        StaticSource::repeating(snapshot_with(75.0, 90.0, 10.0)),
        config,
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();

    // Shutdown already requested: observed during the first sleep.
    let summary = monitor.run(std::future::ready(()), None).await.unwrap();
    assert_eq!(summary.reason, StopReason::Shutdown);
    assert_eq!(summary.iterations, 1);
    assert_eq!(summary.alerts, 2);
    assert_eq!(summary.alerts, monitor.evaluator().history().len());
    assert_eq!(monitor.state(), MonitorState::Stopped);
}

#[tokio::test]
async fn run_honors_iteration_limit() {
    let dir = TempDir::new().unwrap();
    let mut monitor = Monitor::new(
        StaticSource::repeating(quiet_snapshot()),
        config_in(dir.path(), "json"),
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    let summary = monitor
        .run(std::future::pending::<()>(), Some(1))
        .await
        .unwrap();
    assert_eq!(summary.reason, StopReason::IterationLimit);
    assert_eq!(summary.iterations, 1);
    assert_eq!(summary.alerts, 0);
}

#[tokio::test]
async fn run_returns_fatal_error_and_stops() {
    let dir = TempDir::new().unwrap();
    let mut monitor = Monitor::new(
        FailingSource,
        config_in(dir.path(), "json"),
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    assert!(monitor.run(std::future::pending::<()>(), None).await.is_err());
    assert_eq!(monitor.state(), MonitorState::Stopped);
}

#[test]
fn new_creates_data_directory() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), "json");
    assert!(!config.storage.data_dir.exists());
    let _monitor = Monitor::new(
        StaticSource::repeating(quiet_snapshot()),
        config.clone(),
        Presenter::new(false),
        Vec::new(),
    )
    .unwrap();
    assert!(config.storage.data_dir.is_dir());
}
