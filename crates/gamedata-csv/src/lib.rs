//! CSV artifacts for the gamedata pipeline.
//!
//! Each entity is written to one artifact with a fixed file name and column
//! order. Writes are atomic: rows go to a temp file in the target directory
//! which is renamed over the published path only once complete.
//!
//! # Modules
//!
//! - [`forward`] - FieldValue → CSV string conversion
//! - [`reverse`] - CSV string → FieldValue conversion
//! - [`writer`] - atomic artifact publishing
//! - [`reader`] - typed artifact read-back
//!
//! # Example
//!
//! ```ignore
//! use gamedata_csv::{read_table, write_dataset};
//! use gamedata_core::Player;
//!
//! let metrics = write_dataset("data/raw", &dataset)?;
//! let players: Vec<Player> = read_table("data/raw/player_demographics.csv")?;
//! ```

mod error;
pub mod forward;
pub mod reader;
pub mod reverse;
pub mod writer;

pub use error::SerializationError;
pub use forward::{CsvValue, DATE_FORMAT, TIMESTAMP_FORMAT};
pub use reader::{read_dataset, read_table};
pub use reverse::{csv_string_to_field_value, CsvParseError};
pub use writer::{artifact_path, write_dataset, write_table, WriteMetrics};
