//! Categorical value pools shared by all generators.

use crate::error::ConfigError;
use crate::plan::WEIGHT_TOLERANCE;
use serde::{Deserialize, Serialize};

/// A label with its draw probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedLabel {
    pub label: String,
    pub weight: f64,
}

impl WeightedLabel {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

/// Every categorical pool the generators draw from.
///
/// Passed explicitly into each generator; configuration may replace any
/// pool individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub platforms: Vec<String>,
    pub countries: Vec<String>,
    pub age_groups: Vec<String>,
    pub genders: Vec<String>,
    pub account_statuses: Vec<WeightedLabel>,
    pub currencies: Vec<String>,
    pub payment_methods: Vec<String>,
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            platforms: labels(&["iOS", "Android", "Web"]),
            countries: labels(&["US", "TR", "GB", "DE", "FR", "JP", "BR", "IN"]),
            age_groups: labels(&["13-17", "18-24", "25-34", "35-44", "45+"]),
            genders: labels(&["M", "F", "O", "Unknown"]),
            account_statuses: vec![
                WeightedLabel::new("active", 0.85),
                WeightedLabel::new("inactive", 0.10),
                WeightedLabel::new("banned", 0.05),
            ],
            currencies: labels(&["USD", "EUR", "TRY"]),
            payment_methods: labels(&["credit_card", "paypal", "google_pay", "apple_pay"]),
        }
    }
}

impl Vocabulary {
    /// Check that every pool is drawable and every label survives a CSV
    /// round trip.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pools: [(&'static str, &[String]); 6] = [
            ("platforms", &self.platforms),
            ("countries", &self.countries),
            ("age_groups", &self.age_groups),
            ("genders", &self.genders),
            ("currencies", &self.currencies),
            ("payment_methods", &self.payment_methods),
        ];
        for (name, values) in pools {
            if values.is_empty() {
                return Err(ConfigError::EmptyPool(name));
            }
            check_labels(name, values.iter().map(String::as_str))?;
        }
        validate_weights("account_statuses", &self.account_statuses)?;
        check_labels(
            "account_statuses",
            self.account_statuses.iter().map(|item| item.label.as_str()),
        )
    }
}

// An empty field reads back as NULL, so a blank label cannot be told apart
// from a missing value.
fn check_labels<'a>(
    pool: &'static str,
    mut labels: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    match labels.find(|label| label.trim().is_empty()) {
        Some(label) => Err(ConfigError::BlankLabel {
            pool,
            label: label.to_string(),
        }),
        None => Ok(()),
    }
}

/// Weights must be finite, non-negative and sum to 1 within tolerance.
pub fn validate_weights(pool: &'static str, items: &[WeightedLabel]) -> Result<(), ConfigError> {
    if items.is_empty() {
        return Err(ConfigError::EmptyPool(pool));
    }
    if let Some(bad) = items
        .iter()
        .find(|item| !item.weight.is_finite() || item.weight < 0.0)
    {
        return Err(ConfigError::InvalidWeights {
            pool,
            reason: format!("weight {} for '{}'", bad.weight, bad.label),
        });
    }
    let total: f64 = items.iter().map(|item| item.weight).sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::InvalidWeights {
            pool,
            reason: format!("weights sum to {total}, expected 1"),
        });
    }
    Ok(())
}
