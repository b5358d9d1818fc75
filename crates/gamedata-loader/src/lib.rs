//! Warehouse loader for gamedata artifacts.
//!
//! Reads the three CSV artifacts and appends them to a [`Destination`]:
//!
//! - [`PostgresDestination`] - raw landing tables in PostgreSQL (`bronze` schema by default)
//! - [`MemoryDestination`] - in-process tables for tests and dry runs
//!
//! The only transformation applied on the way in is `event_id`
//! deduplication of the events table. Each entity is appended as one atomic
//! unit; loads are never truncating, so repeated runs accumulate rows.
//!
//! # Example
//!
//! ```ignore
//! use gamedata_loader::{PostgresDestination, WarehouseLoader};
//!
//! let destination = PostgresDestination::connect(&connection_string)
//!     .await?
//!     .with_schema("bronze")
//!     .with_batch_size(500);
//! destination.ensure_tables().await?;
//!
//! let report = WarehouseLoader::new(destination, "data/raw").load_all().await;
//! if !report.is_success() {
//!     // at least one entity failed to load
//! }
//! ```

pub mod args;
pub mod destination;
mod error;
pub mod insert;
pub mod loader;
pub mod postgres;

pub use args::WarehouseArgs;
pub use destination::{Destination, MemoryDestination};
pub use error::LoaderError;
pub use insert::{DEFAULT_BATCH_SIZE, DEFAULT_SCHEMA};
pub use loader::{dedup_events, EntityLoad, LoadReport, LoadStats, WarehouseLoader};
pub use postgres::PostgresDestination;
