//! Rate-controlled defect injection.
//!
//! Each pass selects `round(fraction × rows)` row positions without
//! replacement and mutates only those rows. Passes select independently, so
//! one row may be hit by several passes. The passes always run in the order
//! of [`DefectPass::ALL`]; in particular, duplicate events are appended
//! before the other event passes so copies can be corrupted on their own.

use crate::context::RandomContext;
use crate::dataset::Dataset;
use crate::error::GeneratorError;
use chrono::Duration;
use gamedata_core::{
    affected_rows, ConfigError, DefectPass, DefectRates, Event, Player, Purchase,
};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

/// Days added to an event timestamp by the future-shift pass.
pub const FUTURE_SHIFT_DAYS: i64 = 365;

/// Rows touched by a single pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassOutcome {
    pub pass: DefectPass,
    pub fraction: f64,
    /// Rows in the table when the pass ran.
    pub rows_considered: usize,
    pub rows_affected: usize,
}

/// Outcome of every pass, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjectionReport {
    pub passes: Vec<PassOutcome>,
}

impl InjectionReport {
    /// Rows affected by `pass`, or 0 if it did not run.
    pub fn affected(&self, pass: DefectPass) -> usize {
        self.passes
            .iter()
            .find(|outcome| outcome.pass == pass)
            .map(|outcome| outcome.rows_affected)
            .unwrap_or(0)
    }
}

fn checked_fraction(pass: DefectPass, fraction: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(ConfigError::FractionOutOfRange {
            pass: pass.name(),
            value: fraction,
        })
    }
}

fn select(
    ctx: &mut RandomContext,
    pass: DefectPass,
    fraction: f64,
    len: usize,
) -> Result<Vec<usize>, GeneratorError> {
    let fraction = checked_fraction(pass, fraction)?;
    let positions = ctx.sample_positions(len, affected_rows(fraction, len))?;
    debug!(
        "Defect pass '{}' selected {} of {} rows",
        pass.name(),
        positions.len(),
        len
    );
    Ok(positions)
}

/// Pass 1: null `country` on a subset of players.
pub fn null_player_country(
    ctx: &mut RandomContext,
    players: &mut [Player],
    fraction: f64,
) -> Result<usize, GeneratorError> {
    let positions = select(ctx, DefectPass::MissingCountry, fraction, players.len())?;
    for &pos in &positions {
        players[pos].country = None;
    }
    Ok(positions.len())
}

/// Pass 2: append exact copies of a subset of events to the end of the table.
pub fn duplicate_events(
    ctx: &mut RandomContext,
    events: &mut Vec<Event>,
    fraction: f64,
) -> Result<usize, GeneratorError> {
    let positions = select(ctx, DefectPass::DuplicateEvents, fraction, events.len())?;
    let copies: Vec<Event> = positions.iter().map(|&pos| events[pos].clone()).collect();
    events.extend(copies);
    Ok(positions.len())
}

/// Pass 3: null `player_id` on a subset of events.
pub fn null_event_player(
    ctx: &mut RandomContext,
    events: &mut [Event],
    fraction: f64,
) -> Result<usize, GeneratorError> {
    let positions = select(ctx, DefectPass::MissingEventPlayer, fraction, events.len())?;
    for &pos in &positions {
        events[pos].player_id = None;
    }
    Ok(positions.len())
}

/// Pass 4: move a subset of events [`FUTURE_SHIFT_DAYS`] into the future.
pub fn shift_events_to_future(
    ctx: &mut RandomContext,
    events: &mut [Event],
    fraction: f64,
) -> Result<usize, GeneratorError> {
    let positions = select(ctx, DefectPass::FutureEvents, fraction, events.len())?;
    let shift = Duration::days(FUTURE_SHIFT_DAYS);
    for &pos in &positions {
        events[pos].event_timestamp += shift;
    }
    Ok(positions.len())
}

/// Pass 5: negate `amount` on a subset of purchases.
pub fn negate_purchase_amounts(
    ctx: &mut RandomContext,
    purchases: &mut [Purchase],
    fraction: f64,
) -> Result<usize, GeneratorError> {
    let positions = select(ctx, DefectPass::NegativeAmounts, fraction, purchases.len())?;
    for &pos in &positions {
        purchases[pos].amount = -purchases[pos].amount;
    }
    Ok(positions.len())
}

/// Pass 6: point a subset of purchases at players that do not exist.
pub fn orphan_purchases(
    ctx: &mut RandomContext,
    purchases: &mut [Purchase],
    player_universe: &HashSet<Uuid>,
    fraction: f64,
) -> Result<usize, GeneratorError> {
    let positions = select(ctx, DefectPass::OrphanPurchases, fraction, purchases.len())?;
    for &pos in &positions {
        let mut orphan = ctx.uuid();
        while player_universe.contains(&orphan) {
            orphan = ctx.uuid();
        }
        purchases[pos].player_id = orphan;
    }
    Ok(positions.len())
}

/// Applies every defect pass, in order, at the configured rates.
#[derive(Debug, Clone)]
pub struct DefectInjector {
    rates: DefectRates,
}

impl DefectInjector {
    /// Rejects any fraction outside [0, 1].
    pub fn new(rates: DefectRates) -> Result<Self, ConfigError> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &DefectRates {
        &self.rates
    }

    /// Corrupt `dataset` in place.
    pub fn apply(
        &self,
        ctx: &mut RandomContext,
        dataset: &mut Dataset,
    ) -> Result<InjectionReport, GeneratorError> {
        let universe: HashSet<Uuid> = dataset.players.iter().map(|p| p.player_id).collect();
        let mut report = InjectionReport::default();

        for pass in DefectPass::ALL {
            let fraction = self.rates.fraction(pass);
            let (rows_considered, rows_affected) = match pass {
                DefectPass::MissingCountry => (
                    dataset.players.len(),
                    null_player_country(ctx, &mut dataset.players, fraction)?,
                ),
                DefectPass::DuplicateEvents => (
                    dataset.events.len(),
                    duplicate_events(ctx, &mut dataset.events, fraction)?,
                ),
                DefectPass::MissingEventPlayer => (
                    dataset.events.len(),
                    null_event_player(ctx, &mut dataset.events, fraction)?,
                ),
                DefectPass::FutureEvents => (
                    dataset.events.len(),
                    shift_events_to_future(ctx, &mut dataset.events, fraction)?,
                ),
                DefectPass::NegativeAmounts => (
                    dataset.purchases.len(),
                    negate_purchase_amounts(ctx, &mut dataset.purchases, fraction)?,
                ),
                DefectPass::OrphanPurchases => (
                    dataset.purchases.len(),
                    orphan_purchases(ctx, &mut dataset.purchases, &universe, fraction)?,
                ),
            };

            info!(
                "Injected '{}' defects into {} of {} rows ({:.2}%)",
                pass.name(),
                rows_affected,
                rows_considered,
                fraction * 100.0
            );
            report.passes.push(PassOutcome {
                pass,
                fraction,
                rows_considered,
                rows_affected,
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{generate_events, generate_players, generate_purchases};
    use chrono::NaiveDate;
    use gamedata_core::{CampaignWindow, Vocabulary};
    use rust_decimal::Decimal;

    fn october() -> CampaignWindow {
        CampaignWindow::from_dates(
            NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 31).unwrap(),
        )
        .unwrap()
    }

    fn clean_dataset(
        ctx: &mut RandomContext,
        players: usize,
        events: usize,
        purchases: usize,
    ) -> Dataset {
        let window = october();
        let vocabulary = Vocabulary::default();
        let players = generate_players(ctx, players, &window, &vocabulary).unwrap();
        let ids: Vec<Uuid> = players.iter().map(|p| p.player_id).collect();
        let events = generate_events(ctx, events, &window, &vocabulary, &ids).unwrap();
        let purchases = generate_purchases(ctx, purchases, &window, &vocabulary, &ids).unwrap();
        Dataset {
            players,
            events,
            purchases,
        }
    }

    #[test]
    fn test_null_player_country_count() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 1000, 0, 0);

        let affected = null_player_country(&mut ctx, &mut dataset.players, 0.05).unwrap();
        assert_eq!(affected, 50);
        let nulls = dataset.players.iter().filter(|p| p.country.is_none()).count();
        assert_eq!(nulls, 50);
    }

    #[test]
    fn test_duplicate_events_are_exact_copies() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 10, 500, 0);
        let original = dataset.events.clone();

        let affected = duplicate_events(&mut ctx, &mut dataset.events, 0.02).unwrap();
        assert_eq!(affected, 10);
        assert_eq!(dataset.events.len(), 510);
        assert_eq!(&dataset.events[..500], &original[..]);
        for copy in &dataset.events[500..] {
            assert!(original.contains(copy));
        }

        // Copies are distinct rows: no row is duplicated twice in one pass
        let copied_ids: HashSet<Uuid> = dataset.events[500..].iter().map(|e| e.event_id).collect();
        assert_eq!(copied_ids.len(), 10);
    }

    #[test]
    fn test_future_shift() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 10, 1000, 0);
        let window = october();
        let before = dataset.events.clone();

        let affected = shift_events_to_future(&mut ctx, &mut dataset.events, 0.005).unwrap();
        assert_eq!(affected, 5);

        let shifted: Vec<_> = before
            .iter()
            .zip(&dataset.events)
            .filter(|(a, b)| a.event_timestamp != b.event_timestamp)
            .collect();
        assert_eq!(shifted.len(), 5);
        for (a, b) in shifted {
            assert_eq!(b.event_timestamp - a.event_timestamp, Duration::days(365));
            assert!(!window.contains(b.event_timestamp));
        }
    }

    #[test]
    fn test_negate_amounts() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 10, 0, 1000);

        let affected = negate_purchase_amounts(&mut ctx, &mut dataset.purchases, 0.005).unwrap();
        assert_eq!(affected, 5);
        let negative = dataset
            .purchases
            .iter()
            .filter(|p| p.amount < Decimal::ZERO)
            .count();
        assert_eq!(negative, 5);
    }

    #[test]
    fn test_orphans_never_resolve() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 10, 0, 500);
        let universe: HashSet<Uuid> = dataset.players.iter().map(|p| p.player_id).collect();

        let affected = orphan_purchases(&mut ctx, &mut dataset.purchases, &universe, 0.02).unwrap();
        assert_eq!(affected, 10);
        let orphans = dataset
            .purchases
            .iter()
            .filter(|p| !universe.contains(&p.player_id))
            .count();
        assert_eq!(orphans, 10);
    }

    #[test]
    fn test_out_of_range_fraction_leaves_rows_untouched() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 20, 0, 0);
        let before = dataset.players.clone();

        let result = null_player_country(&mut ctx, &mut dataset.players, 1.01);
        assert!(matches!(
            result,
            Err(GeneratorError::Config(ConfigError::FractionOutOfRange { .. }))
        ));
        assert_eq!(dataset.players, before);
    }

    #[test]
    fn test_injector_rejects_invalid_rates() {
        let rates = DefectRates {
            duplicate_events: -0.5,
            ..DefectRates::default()
        };
        assert!(DefectInjector::new(rates).is_err());
    }

    #[test]
    fn test_injector_report_order_and_counts() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 1000, 4000, 2000);
        let injector = DefectInjector::new(DefectRates::default()).unwrap();

        let report = injector.apply(&mut ctx, &mut dataset).unwrap();

        let order: Vec<DefectPass> = report.passes.iter().map(|p| p.pass).collect();
        assert_eq!(order, DefectPass::ALL.to_vec());
        assert_eq!(report.affected(DefectPass::MissingCountry), 50);
        assert_eq!(report.affected(DefectPass::DuplicateEvents), 80);
        // Later event passes see the duplicated table
        assert_eq!(report.passes[2].rows_considered, 4080);
        assert_eq!(report.affected(DefectPass::MissingEventPlayer), 41);
        assert_eq!(report.affected(DefectPass::FutureEvents), 20);
        assert_eq!(report.affected(DefectPass::NegativeAmounts), 10);
        assert_eq!(report.affected(DefectPass::OrphanPurchases), 40);
        assert_eq!(dataset.events.len(), 4080);
    }

    #[test]
    fn test_zero_rates_change_nothing() {
        let mut ctx = RandomContext::new(42);
        let mut dataset = clean_dataset(&mut ctx, 50, 200, 100);
        let before = dataset.clone();

        let injector = DefectInjector::new(DefectRates::none()).unwrap();
        let report = injector.apply(&mut ctx, &mut dataset).unwrap();

        assert_eq!(dataset, before);
        assert!(report.passes.iter().all(|p| p.rows_affected == 0));
    }
}
