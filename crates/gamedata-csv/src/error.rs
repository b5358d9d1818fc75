//! Error types for CSV artifacts.

use gamedata_core::{Entity, RecordError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or reading an artifact.
#[derive(Error, Debug)]
pub enum SerializationError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The finished temp file could not be moved to the published path.
    #[error("Failed to publish artifact: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// A row handed to the writer does not match its column layout.
    #[error("Invalid {entity} row {row}: {reason}")]
    InvalidRow {
        entity: Entity,
        row: u64,
        reason: String,
    },

    /// The header row does not name the expected columns.
    #[error("Unexpected header in '{}': expected [{expected}], found [{found}]", .path.display())]
    Header {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A field could not be parsed into its column type.
    #[error("Parse error in '{}' at line {line}, column '{column}': {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        column: String,
        message: String,
    },

    /// The parsed fields do not form a valid record.
    #[error("Invalid record in '{}' at line {line}: {source}", .path.display())]
    Record {
        path: PathBuf,
        line: u64,
        #[source]
        source: RecordError,
    },
}
