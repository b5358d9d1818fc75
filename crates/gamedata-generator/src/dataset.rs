//! Whole-dataset generation: the three tables plus defect injection.

use crate::context::RandomContext;
use crate::defects::{DefectInjector, InjectionReport};
use crate::error::GeneratorError;
use crate::generators::{generate_events, generate_players, generate_purchases};
use gamedata_core::{Event, GenerationPlan, Player, Purchase};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// The three generated tables, in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub players: Vec<Player>,
    pub events: Vec<Event>,
    pub purchases: Vec<Purchase>,
}

/// Row counts and defect tallies observed in a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub players: usize,
    pub events: usize,
    pub purchases: usize,
    pub players_missing_country: usize,
    pub events_missing_player: usize,
    pub negative_amounts: usize,
    pub orphan_purchases: usize,
}

impl Dataset {
    pub fn player_ids(&self) -> Vec<Uuid> {
        self.players.iter().map(|p| p.player_id).collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        let known: HashSet<Uuid> = self.players.iter().map(|p| p.player_id).collect();
        DatasetSummary {
            players: self.players.len(),
            events: self.events.len(),
            purchases: self.purchases.len(),
            players_missing_country: self.players.iter().filter(|p| p.country.is_none()).count(),
            events_missing_player: self.events.iter().filter(|e| e.player_id.is_none()).count(),
            negative_amounts: self
                .purchases
                .iter()
                .filter(|p| p.amount < Decimal::ZERO)
                .count(),
            orphan_purchases: self
                .purchases
                .iter()
                .filter(|p| !known.contains(&p.player_id))
                .count(),
        }
    }
}

/// Generate the clean tables: players first, then events and purchases
/// referencing the generated player ids.
pub fn generate_dataset(
    ctx: &mut RandomContext,
    plan: &GenerationPlan,
) -> Result<Dataset, GeneratorError> {
    let players = generate_players(ctx, plan.counts.players, &plan.window, &plan.vocabulary)?;
    let universe: Vec<Uuid> = players.iter().map(|p| p.player_id).collect();
    let events = generate_events(
        ctx,
        plan.counts.events,
        &plan.window,
        &plan.vocabulary,
        &universe,
    )?;
    let purchases = generate_purchases(
        ctx,
        plan.counts.purchases,
        &plan.window,
        &plan.vocabulary,
        &universe,
    )?;

    Ok(Dataset {
        players,
        events,
        purchases,
    })
}

/// Runs a [`GenerationPlan`] end to end from its seed.
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    plan: GenerationPlan,
}

impl DatasetGenerator {
    pub fn new(plan: GenerationPlan) -> Self {
        Self { plan }
    }

    /// Generate the tables without defects using the caller's context.
    pub fn generate_clean(&self, ctx: &mut RandomContext) -> Result<Dataset, GeneratorError> {
        generate_dataset(ctx, &self.plan)
    }

    /// Generate and corrupt a dataset from a fresh context seeded with
    /// `plan.seed`.
    pub fn generate(&self) -> Result<(Dataset, InjectionReport), GeneratorError> {
        let start = Instant::now();
        let injector = DefectInjector::new(self.plan.defects)?;
        let mut ctx = RandomContext::new(self.plan.seed);

        let mut dataset = self.generate_clean(&mut ctx)?;
        info!(
            "Generated {} players, {} events, {} purchases (seed {})",
            dataset.players.len(),
            dataset.events.len(),
            dataset.purchases.len(),
            self.plan.seed
        );

        let report = injector.apply(&mut ctx, &mut dataset)?;
        info!(
            "Dataset ready in {:?}: {} event rows after duplication",
            start.elapsed(),
            dataset.events.len()
        );
        Ok((dataset, report))
    }
}
