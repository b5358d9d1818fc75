//! Core types for the gamedata pipeline.
//!
//! This crate provides the foundational types shared by the generator,
//! the CSV serializer and the warehouse loader:
//!
//! - [`Player`], [`Event`], [`Purchase`] - the three generated entities
//! - [`Record`] / [`FieldValue`] - column-ordered, typed row representation
//! - [`Vocabulary`] - categorical pools every generator draws from
//! - [`GenerationPlan`] - validated run parameters
//!
//! # Architecture
//!
//! ```text
//! gamedata-core (this crate)
//!    │
//!    ├─── gamedata-generator  (produces entities, injects defects)
//!    ├─── gamedata-csv        (Record <-> CSV artifact)
//!    └─── gamedata-loader     (Record -> destination tables)
//! ```

pub mod entity;
pub mod error;
pub mod plan;
pub mod record;
pub mod vocabulary;

// Re-exports for convenience
pub use entity::{Event, EventKind, EventType, Player, ProductCategory, Purchase};
pub use error::{ConfigError, RecordError};
pub use plan::{
    affected_rows, CampaignWindow, Counts, DefectPass, DefectRates, GenerationPlan,
    WEIGHT_TOLERANCE,
};
pub use record::{Column, ColumnType, Entity, FieldCursor, FieldValue, Record};
pub use vocabulary::{Vocabulary, WeightedLabel};
