//! Validated run parameters.
//!
//! A [`GenerationPlan`] can only be built from parameters that pass every
//! check, so generators and the defect injector never see negative counts,
//! inverted windows or out-of-range fractions.

use crate::error::ConfigError;
use crate::vocabulary::Vocabulary;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Allowed deviation of a weighted pool's total from 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Campaign window
// ============================================================================

/// Inclusive datetime range for all non-defective timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl CampaignWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ConfigError> {
        if end < start {
            return Err(ConfigError::InvertedWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Whole days: `start 00:00:00` through `end 23:59:59`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        let last_second = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| ConfigError::InvalidDate("23:59:59".to_string()))?;
        Self::new(start.and_time(NaiveTime::MIN), end.and_time(last_second))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

// ============================================================================
// Counts
// ============================================================================

/// Number of base rows to generate per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub players: usize,
    pub events: usize,
    pub purchases: usize,
}

impl Counts {
    /// Validate raw (possibly negative) counts.
    pub fn new(players: i64, events: i64, purchases: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            players: non_negative("players", players)?,
            events: non_negative("events", events)?,
            purchases: non_negative("purchases", purchases)?,
        })
    }
}

fn non_negative(entity: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::NegativeCount { entity, value })
}

// ============================================================================
// Defect rates
// ============================================================================

/// The defect passes, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectPass {
    MissingCountry,
    DuplicateEvents,
    MissingEventPlayer,
    FutureEvents,
    NegativeAmounts,
    OrphanPurchases,
}

impl DefectPass {
    pub const ALL: [DefectPass; 6] = [
        DefectPass::MissingCountry,
        DefectPass::DuplicateEvents,
        DefectPass::MissingEventPlayer,
        DefectPass::FutureEvents,
        DefectPass::NegativeAmounts,
        DefectPass::OrphanPurchases,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DefectPass::MissingCountry => "missing_country",
            DefectPass::DuplicateEvents => "duplicate_events",
            DefectPass::MissingEventPlayer => "missing_event_player",
            DefectPass::FutureEvents => "future_events",
            DefectPass::NegativeAmounts => "negative_amounts",
            DefectPass::OrphanPurchases => "orphan_purchases",
        }
    }
}

/// Fraction of rows each defect pass corrupts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefectRates {
    pub missing_country: f64,
    pub duplicate_events: f64,
    pub missing_event_player: f64,
    pub future_events: f64,
    pub negative_amounts: f64,
    pub orphan_purchases: f64,
}

impl Default for DefectRates {
    fn default() -> Self {
        Self {
            missing_country: 0.05,
            duplicate_events: 0.02,
            missing_event_player: 0.01,
            future_events: 0.005,
            negative_amounts: 0.005,
            orphan_purchases: 0.02,
        }
    }
}

impl DefectRates {
    /// All passes disabled.
    pub fn none() -> Self {
        Self {
            missing_country: 0.0,
            duplicate_events: 0.0,
            missing_event_player: 0.0,
            future_events: 0.0,
            negative_amounts: 0.0,
            orphan_purchases: 0.0,
        }
    }

    pub fn fraction(&self, pass: DefectPass) -> f64 {
        match pass {
            DefectPass::MissingCountry => self.missing_country,
            DefectPass::DuplicateEvents => self.duplicate_events,
            DefectPass::MissingEventPlayer => self.missing_event_player,
            DefectPass::FutureEvents => self.future_events,
            DefectPass::NegativeAmounts => self.negative_amounts,
            DefectPass::OrphanPurchases => self.orphan_purchases,
        }
    }

    /// Every fraction must lie in [0, 1]; nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pass in DefectPass::ALL {
            let value = self.fraction(pass);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange {
                    pass: pass.name(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Number of rows a pass with `fraction` touches in a table of `row_count`.
///
/// Rounds half away from zero.
pub fn affected_rows(fraction: f64, row_count: usize) -> usize {
    let exact = fraction * row_count as f64;
    (exact.round() as usize).min(row_count)
}

// ============================================================================
// Generation plan
// ============================================================================

/// Validated parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub seed: u64,
    pub counts: Counts,
    pub window: CampaignWindow,
    pub defects: DefectRates,
    pub vocabulary: Vocabulary,
}

impl GenerationPlan {
    pub fn new(
        seed: u64,
        counts: Counts,
        window: CampaignWindow,
        defects: DefectRates,
        vocabulary: Vocabulary,
    ) -> Result<Self, ConfigError> {
        defects.validate()?;
        vocabulary.validate()?;
        if counts.players == 0 {
            if counts.events > 0 {
                return Err(ConfigError::EmptyPlayerUniverse("events"));
            }
            if counts.purchases > 0 {
                return Err(ConfigError::EmptyPlayerUniverse("purchases"));
            }
        }
        Ok(Self {
            seed,
            counts,
            window,
            defects,
            vocabulary,
        })
    }
}
