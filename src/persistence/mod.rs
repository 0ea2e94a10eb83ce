// Durable storage for snapshots: whole-document JSON or append-only CSV.
//
// Both writers are stateless; every path comes in as an argument. The CSV file is
// append-only with its header pinned by the first write, so the flattened row schema
// lives in one place (`CsvRecord`) and carries a version. Changing it means a new
// file, never a mixed-schema one: `write_csv` refuses to append under a foreign header.
//
// Writes are not atomic. A crash mid-write can leave a truncated JSON document or a
// partial CSV row; the probe is best-effort local monitoring, not a durable store.

mod csv_file;
mod json_file;

pub use csv_file::{
    CSV_HEADER, CSV_SCHEMA_VERSION, CsvRecord, PruneOutcome, load_csv, prune_csv, write_csv,
    write_csv_at,
};
pub use json_file::{load_json, write_json};

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::Snapshot;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    Json,
    Csv,
}

impl StorageFormat {
    /// `csv` in any case selects CSV; every other value falls back to JSON.
    pub fn from_config(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("csv") {
            StorageFormat::Csv
        } else {
            StorageFormat::Json
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageFormat::Json => "json",
            StorageFormat::Csv => "csv",
        }
    }
}

/// Write `snapshot` in the configured format, creating the target directory first.
/// Returns the file written.
pub fn write_by_format(snapshot: &Snapshot, config: &AppConfig) -> Result<PathBuf> {
    let path = config.data_path();
    ensure_parent_dir(&path)?;
    match config.storage_format() {
        StorageFormat::Json => write_json(snapshot, &path)?,
        StorageFormat::Csv => write_csv(snapshot, &path)?,
    }
    Ok(path)
}

/// Create `path`'s parent directory (recursively) if missing.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
