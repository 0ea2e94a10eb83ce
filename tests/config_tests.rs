// Config loading, validation and all-or-nothing fallback tests

use std::path::{Path, PathBuf};
use sysprobe::config::{AppConfig, ConfigSource};
use sysprobe::persistence::StorageFormat;

const VALID_CONFIG: &str = r#"
monitor:
  interval: 10
  retention_hours: 48
alerts:
  cpu_threshold: 70
  memory_threshold: 75.5
  disk_threshold: 95
storage:
  storage_format: CSV
  data_dir: /var/lib/sysprobe
  json_file: snap.json
  csv_file: history.csv
  log_dir: /var/log/sysprobe
features:
  enable_alert: false
  enable_logging: true
  enable_visualization: true
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.monitor.interval, 10);
    assert_eq!(config.monitor.retention_hours, 48);
    let t = config.thresholds();
    assert_eq!((t.cpu, t.memory, t.disk), (70.0, 75.5, 95.0));
    assert_eq!(config.storage_format(), StorageFormat::Csv);
    assert_eq!(config.csv_path(), PathBuf::from("/var/lib/sysprobe/history.csv"));
    assert_eq!(config.json_path(), PathBuf::from("/var/lib/sysprobe/snap.json"));
    assert_eq!(config.data_path(), config.csv_path());
    assert_eq!(config.log_path(), PathBuf::from("/var/log/sysprobe/monitor.log"));
    assert!(!config.features.enable_alert);
    assert!(config.features.enable_logging);
    assert!(config.features.enable_visualization);
}

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.monitor.interval, 5);
    assert_eq!(config.monitor.retention_hours, 24);
    let t = config.thresholds();
    assert_eq!((t.cpu, t.memory, t.disk), (80.0, 85.0, 90.0));
    assert_eq!(config.storage_format(), StorageFormat::Json);
    assert_eq!(config.json_path(), Path::new("./data").join("monitor.json"));
    assert!(config.features.enable_alert);
    assert!(!config.features.enable_logging);
    assert!(!config.features.enable_visualization);
}

#[test]
fn test_config_missing_keys_take_defaults() {
    let config = AppConfig::load_from_str("monitor:\n  interval: 1\nalerts:\n  cpu_threshold: 50\n")
        .expect("partial document");
    assert_eq!(config.monitor.interval, 1);
    assert_eq!(config.monitor.retention_hours, 24);
    assert_eq!(config.thresholds().cpu, 50.0);
    assert_eq!(config.thresholds().memory, 85.0);
    assert_eq!(config.storage, AppConfig::default().storage);
}

#[test]
fn test_config_empty_document_is_default() {
    assert_eq!(AppConfig::load_from_str("").unwrap(), AppConfig::default());
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("interval: 10", "interval: 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("monitor.interval"));
}

#[test]
fn test_config_validation_rejects_threshold_over_100() {
    let bad = VALID_CONFIG.replace("disk_threshold: 95", "disk_threshold: 150");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("alerts.disk_threshold"));
}

#[test]
fn test_config_validation_rejects_empty_data_dir() {
    let bad = VALID_CONFIG.replace("data_dir: /var/lib/sysprobe", "data_dir: \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("storage.data_dir"));
}

#[test]
fn test_config_rejects_invalid_yaml() {
    assert!(AppConfig::load_from_str("monitor: [unclosed").is_err());
    assert!(AppConfig::load_from_str("monitor:\n  interval: soon\n").is_err());
}

#[test]
fn test_config_loads_toml_by_extension() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[monitor]\ninterval = 2\n\n[storage]\nstorage_format = \"csv\"\n",
    )
    .unwrap();
    let config = AppConfig::load(&path).expect("toml config");
    assert_eq!(config.monitor.interval, 2);
    assert_eq!(config.storage_format(), StorageFormat::Csv);
}

#[test]
fn test_config_load_or_default_uses_file_when_valid() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    let (config, source) = AppConfig::load_or_default(&path);
    assert_eq!(source, ConfigSource::File(path));
    assert_eq!(config.monitor.interval, 10);
}

#[test]
fn test_config_load_or_default_missing_file_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let (config, source) = AppConfig::load_or_default(&dir.path().join("absent.yaml"));
    assert_eq!(config, AppConfig::default());
    assert!(matches!(source, ConfigSource::Defaults { .. }));
}

#[test]
fn test_config_load_or_default_invalid_file_replaces_whole_document() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    // Valid interval, invalid threshold: nothing from the file survives.
    std::fs::write(
        &path,
        "monitor:\n  interval: 1\nalerts:\n  cpu_threshold: 500\n",
    )
    .unwrap();
    let (config, source) = AppConfig::load_or_default(&path);
    assert_eq!(config, AppConfig::default());
    match source {
        ConfigSource::Defaults { reason } => assert!(reason.contains("cpu_threshold")),
        other => panic!("expected defaults, got {:?}", other),
    }
}
