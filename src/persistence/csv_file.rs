// CSV history: one flattened row per tick, append-only, pruned by age.

use crate::error::{Result, StorageError};
use crate::models::{Snapshot, bytes_to_gb, round2};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::instrument;

/// Bumped whenever `CsvRecord` gains, loses, or reorders a field.
pub const CSV_SCHEMA_VERSION: u32 = 1;

/// Column order of schema v1; must match `CsvRecord`'s field order.
pub const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "cpu_usage",
    "cpu_count",
    "memory_total_gb",
    "memory_used_gb",
    "memory_percentage",
    "disk_total_gb",
    "disk_used_gb",
    "disk_percentage",
];

/// Flattened, fixed-schema projection of a snapshot (schema v1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRecord {
    /// ISO-8601 with offset, stamped when the row is written.
    pub timestamp: String,
    pub cpu_usage: f64,
    pub cpu_count: u32,
    pub memory_total_gb: f64,
    pub memory_used_gb: f64,
    pub memory_percentage: f64,
    pub disk_total_gb: f64,
    pub disk_used_gb: f64,
    pub disk_percentage: f64,
}

impl CsvRecord {
    pub fn from_snapshot(snapshot: &Snapshot, at: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, false),
            cpu_usage: round2(snapshot.cpu.usage_percent),
            cpu_count: snapshot.cpu.cpu_count,
            memory_total_gb: bytes_to_gb(snapshot.memory.total),
            memory_used_gb: bytes_to_gb(snapshot.memory.used),
            memory_percentage: round2(snapshot.memory.percentage),
            disk_total_gb: bytes_to_gb(snapshot.disk.total),
            disk_used_gb: bytes_to_gb(snapshot.disk.used),
            disk_percentage: round2(snapshot.disk.percentage),
        }
    }
}

/// Append one row for `snapshot` stamped with the current local time.
pub fn write_csv(snapshot: &Snapshot, path: &Path) -> Result<()> {
    write_csv_at(snapshot, path, Local::now().fixed_offset())
}

/// Append one row stamped `at`. Writes the header first when the file is new or empty;
/// refuses to append under a header from a different schema.
#[instrument(skip(snapshot), fields(operation = "write_csv", path = %path.display()))]
pub fn write_csv_at(snapshot: &Snapshot, path: &Path, at: DateTime<FixedOffset>) -> Result<()> {
    let has_content = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    if has_content {
        check_header(path)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(!has_content)
        .from_writer(file);
    writer.serialize(CsvRecord::from_snapshot(snapshot, at))?;
    writer.flush()?;
    Ok(())
}

fn check_header(path: &Path) -> Result<()> {
    let mut first = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first)?;
    let found = first.trim_end_matches(['\r', '\n']);
    if found != CSV_HEADER.join(",") {
        return Err(StorageError::SchemaMismatch {
            path: path.to_path_buf(),
            version: CSV_SCHEMA_VERSION,
            found: found.to_string(),
        });
    }
    Ok(())
}

/// All stored rows; `None` when the file does not exist.
pub fn load_csv(path: &Path) -> Result<Option<Vec<CsvRecord>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<CsvRecord>, _>>()?;
    Ok(Some(rows))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub kept: usize,
    pub removed: usize,
}

/// Drop rows older than `retention_hours`, rewriting the file with the survivors.
/// Rows whose timestamp does not parse are kept. An absent or empty file is left untouched.
#[instrument(fields(operation = "prune_csv", path = %path.display()))]
pub fn prune_csv(path: &Path, retention_hours: u64) -> Result<PruneOutcome> {
    let has_content = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    if !has_content {
        return Ok(PruneOutcome::default());
    }
    let Some(cutoff) = i64::try_from(retention_hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .and_then(|window| Local::now().fixed_offset().checked_sub_signed(window))
    else {
        // Window reaches past the representable range; nothing can be old enough.
        return Ok(PruneOutcome::default());
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let Some(ts_idx) = headers.iter().position(|h| h == "timestamp") else {
        return Ok(PruneOutcome::default());
    };

    let mut kept = Vec::new();
    let mut removed = 0;
    for row in reader.records() {
        let row = row?;
        let expired = row
            .get(ts_idx)
            .and_then(parse_timestamp)
            .is_some_and(|ts| ts < cutoff);
        if expired {
            removed += 1;
        } else {
            kept.push(row);
        }
    }
    drop(reader);

    if removed > 0 {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(File::create(path)?);
        writer.write_record(&headers)?;
        for row in &kept {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(PruneOutcome {
        kept: kept.len(),
        removed,
    })
}

/// RFC 3339 with offset, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as local time.
fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.fixed_offset())
}
