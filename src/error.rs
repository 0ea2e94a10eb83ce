// Persistence error taxonomy

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header in {path} does not match schema v{version}: found [{found}]")]
    SchemaMismatch {
        path: PathBuf,
        version: u32,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
