//! Error type for generation and defect injection.

use gamedata_core::ConfigError;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Invalid run parameters, detected before any row is produced
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A draw from the random context could not be performed
    #[error("Sampling error: {0}")]
    Sampling(String),
}
