//! Error types shared across the pipeline.

use thiserror::Error;

/// Invalid run parameters.
///
/// Always raised while building a [`crate::GenerationPlan`], before any row
/// is produced or any file is written.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A row count was negative.
    #[error("{entity} count must not be negative (got {value})")]
    NegativeCount { entity: &'static str, value: i64 },

    /// Campaign end precedes campaign start.
    #[error("campaign end {end} is before campaign start {start}")]
    InvertedWindow { start: String, end: String },

    /// A defect fraction was outside [0, 1] or not a number.
    #[error("defect fraction for '{pass}' must be within [0, 1] (got {value})")]
    FractionOutOfRange { pass: &'static str, value: f64 },

    /// Weighted pool weights are negative, non-finite or do not sum to 1.
    #[error("weights for '{pool}' are invalid: {reason}")]
    InvalidWeights { pool: &'static str, reason: String },

    /// A categorical pool has no values to draw from.
    #[error("vocabulary pool '{0}' is empty")]
    EmptyPool(&'static str),

    /// A pool value is empty or whitespace, which a CSV artifact cannot
    /// distinguish from NULL.
    #[error("vocabulary pool '{pool}' contains a blank label '{label}'")]
    BlankLabel { pool: &'static str, label: String },

    /// Events or purchases were requested without any players to reference.
    #[error("cannot generate {0} without any players to reference")]
    EmptyPlayerUniverse(&'static str),

    /// A date could not be parsed or shifted.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// A row could not be rebuilt from its typed fields.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    /// Number of fields does not match the column layout.
    #[error("expected {expected} fields, found {found}")]
    WrongArity { expected: usize, found: usize },

    /// A field held a value of the wrong type.
    #[error("column '{column}' expected {expected}")]
    TypeMismatch {
        column: &'static str,
        expected: &'static str,
    },

    /// A non-nullable field was null.
    #[error("column '{0}' must not be null")]
    MissingValue(&'static str),

    /// Unknown `event_type` or `product_category` label.
    #[error("unknown {kind} '{value}'")]
    UnknownLabel { kind: &'static str, value: String },

    /// Optional payload does not agree with the event type.
    #[error("event type '{event_type}' is inconsistent with {detail}")]
    InconsistentPayload { event_type: String, detail: String },
}
