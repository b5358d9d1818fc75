//! Error types for the warehouse loader.

use gamedata_csv::SerializationError;
use thiserror::Error;

/// Errors that can occur while loading artifacts into a destination.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The destination could not be reached. Raised before any write.
    #[error("Connection error: {0}")]
    Connection(String),

    /// One entity's write was aborted; nothing from it was kept.
    #[error("Failed to write table '{table}': {reason}")]
    Write { table: String, reason: String },

    /// An artifact could not be read.
    #[error("Failed to read artifact: {0}")]
    Read(#[from] SerializationError),

    /// PostgreSQL query error outside of a table write.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),
}

impl LoaderError {
    /// Whether this error aborted a single table write.
    pub fn is_write(&self) -> bool {
        matches!(self, LoaderError::Write { .. })
    }
}
