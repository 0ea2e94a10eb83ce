// JSON snapshot file: the full nested snapshot, overwritten on every write.

use crate::error::Result;
use crate::models::Snapshot;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::instrument;

/// Replace `path` with `snapshot` as pretty-printed JSON.
#[instrument(skip_all, fields(operation = "write_json", path = %path.display()))]
pub fn write_json(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read the stored snapshot back; `None` when the file does not exist.
pub fn load_json(path: &Path) -> Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(Some(serde_json::from_reader(reader)?))
}
