//! Deterministic data generation for the gamedata pipeline.
//!
//! This crate produces the player, event and purchase tables and then
//! corrupts a configured fraction of their rows with data-quality defects.
//! All randomness flows from a single [`RandomContext`] seeded once per run,
//! so the same seed and plan always yield the same dataset.
//!
//! # Architecture
//!
//! ```text
//! GenerationPlan
//!        │
//!        ▼
//! ┌──────────────────┐     ┌────────────────┐
//! │ DatasetGenerator │────▶│ RandomContext  │
//! │                  │     │ (StdRng, seed) │
//! └────────┬─────────┘     └───────▲────────┘
//!          │ Dataset               │
//!          ▼                       │
//! ┌──────────────────┐             │
//! │  DefectInjector  │─────────────┘
//! └────────┬─────────┘
//!          ▼
//!   Dataset + InjectionReport
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gamedata_core::{CampaignWindow, Counts, DefectRates, GenerationPlan, Vocabulary};
//! use gamedata_generator::DatasetGenerator;
//!
//! let window = CampaignWindow::from_dates(
//!     NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 10, 31).unwrap(),
//! )
//! .unwrap();
//! let plan = GenerationPlan::new(
//!     42,
//!     Counts::new(10, 100, 20).unwrap(),
//!     window,
//!     DefectRates::default(),
//!     Vocabulary::default(),
//! )
//! .unwrap();
//!
//! let (dataset, report) = DatasetGenerator::new(plan).generate().unwrap();
//! assert_eq!(dataset.players.len(), 10);
//! assert_eq!(dataset.events.len(), 102);
//! assert_eq!(report.affected(gamedata_core::DefectPass::DuplicateEvents), 2);
//! ```

pub mod context;
pub mod dataset;
pub mod defects;
pub mod error;
pub mod generators;

// Re-exports for convenience
pub use context::RandomContext;
pub use dataset::{generate_dataset, Dataset, DatasetGenerator, DatasetSummary};
pub use defects::{DefectInjector, InjectionReport, PassOutcome};
pub use error::GeneratorError;
