use crate::alerts::Thresholds;
use crate::persistence::StorageFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Log file name inside `storage.log_dir`.
pub const LOG_FILE_NAME: &str = "monitor.log";

/// Whole configuration document. Keys missing from an otherwise valid document take
/// their defaults; a document that fails to read, parse, or validate is replaced
/// wholesale by [`AppConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub alerts: AlertsConfig,
    pub storage: StorageConfig,
    pub features: FeaturesConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between ticks.
    pub interval: u64,
    /// Maximum age of CSV rows kept by pruning.
    pub retention_hours: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: 5,
            retention_hours: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub cpu_threshold: f64,
    pub memory_threshold: f64,
    pub disk_threshold: f64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        let t = Thresholds::default();
        Self {
            cpu_threshold: t.cpu,
            memory_threshold: t.memory,
            disk_threshold: t.disk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `json` or `csv` (case-insensitive); anything else means JSON.
    pub storage_format: String,
    pub data_dir: PathBuf,
    pub json_file: PathBuf,
    pub csv_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_format: "json".into(),
            data_dir: "./data".into(),
            json_file: "monitor.json".into(),
            csv_file: "monitor.csv".into(),
            log_dir: "./logs".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub enable_alert: bool,
    pub enable_logging: bool,
    /// Accepted for compatibility; no behavior attached.
    pub enable_visualization: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            enable_alert: true,
            enable_logging: false,
            enable_visualization: false,
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults { reason: String },
}

impl AppConfig {
    /// Read, parse, and validate the file at `path`. `.toml` files parse as TOML, everything
    /// else as YAML.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml")) {
            Self::load_from_toml_str(&s)
        } else {
            Self::load_from_str(&s)
        }
    }

    /// Like [`load`](Self::load), but never fails: any error yields the full default document.
    pub fn load_or_default(path: &Path) -> (Self, ConfigSource) {
        match Self::load(path) {
            Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
            Err(e) => (
                Self::default(),
                ConfigSource::Defaults {
                    reason: format!("{}: {:#}", path.display(), e),
                },
            ),
        }
    }

    /// Parse and validate a YAML document (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        // An empty YAML document is `null`, not an empty mapping.
        let config: AppConfig = if s.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(s)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            cpu: self.alerts.cpu_threshold,
            memory: self.alerts.memory_threshold,
            disk: self.alerts.disk_threshold,
        }
    }

    pub fn storage_format(&self) -> StorageFormat {
        StorageFormat::from_config(&self.storage.storage_format)
    }

    pub fn json_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.json_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.csv_file)
    }

    /// Target file for the configured storage format.
    pub fn data_path(&self) -> PathBuf {
        match self.storage_format() {
            StorageFormat::Json => self.json_path(),
            StorageFormat::Csv => self.csv_path(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.storage.log_dir.join(LOG_FILE_NAME)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitor.interval > 0,
            "monitor.interval must be > 0, got {}",
            self.monitor.interval
        );
        for (key, value) in [
            ("alerts.cpu_threshold", self.alerts.cpu_threshold),
            ("alerts.memory_threshold", self.alerts.memory_threshold),
            ("alerts.disk_threshold", self.alerts.disk_threshold),
        ] {
            anyhow::ensure!(
                (0.0..=100.0).contains(&value),
                "{} must be between 0 and 100, got {}",
                key,
                value
            );
        }
        anyhow::ensure!(
            !self.storage.data_dir.as_os_str().is_empty(),
            "storage.data_dir must be non-empty"
        );
        anyhow::ensure!(
            !self.storage.json_file.as_os_str().is_empty(),
            "storage.json_file must be non-empty"
        );
        anyhow::ensure!(
            !self.storage.csv_file.as_os_str().is_empty(),
            "storage.csv_file must be non-empty"
        );
        anyhow::ensure!(
            !self.storage.log_dir.as_os_str().is_empty(),
            "storage.log_dir must be non-empty"
        );
        Ok(())
    }
}
