//! Player demographics generator.

use crate::context::RandomContext;
use crate::error::GeneratorError;
use chrono::{Months, NaiveDate, NaiveTime};
use gamedata_core::{CampaignWindow, ConfigError, Player, Vocabulary};
use std::collections::HashSet;
use tracing::debug;

/// How far before the campaign start registrations may reach.
pub const REGISTRATION_LOOKBACK_MONTHS: u32 = 24;

/// Earliest possible registration date for the window.
pub fn registration_floor(window: &CampaignWindow) -> Result<NaiveDate, ConfigError> {
    let start = window.start().date();
    start
        .checked_sub_months(Months::new(REGISTRATION_LOOKBACK_MONTHS))
        .ok_or_else(|| ConfigError::InvalidDate(format!("{start} minus 2 years")))
}

/// Generate `count` players with unique ids.
pub fn generate_players(
    ctx: &mut RandomContext,
    count: usize,
    window: &CampaignWindow,
    vocabulary: &Vocabulary,
) -> Result<Vec<Player>, GeneratorError> {
    let floor = registration_floor(window)?;
    let campaign_start = window.start().date();

    let mut players = Vec::with_capacity(count);
    let mut seen = HashSet::with_capacity(count);
    for _ in 0..count {
        let mut player_id = ctx.uuid();
        while !seen.insert(player_id) {
            player_id = ctx.uuid();
        }
        let registration_date = ctx.uniform_date(floor, campaign_start)?;
        let country = ctx.choose(&vocabulary.countries)?.clone();
        let age_group = ctx.choose(&vocabulary.age_groups)?.clone();
        let gender = ctx.choose(&vocabulary.genders)?.clone();
        let preferred_platform = ctx.choose(&vocabulary.platforms)?.clone();
        let account_status = ctx
            .weighted(&vocabulary.account_statuses, |s| s.weight)?
            .label
            .clone();
        let last_login =
            ctx.uniform_datetime(registration_date.and_time(NaiveTime::MIN), window.end())?;

        players.push(Player {
            player_id,
            registration_date,
            country: Some(country),
            age_group,
            gender,
            preferred_platform,
            account_status,
            last_login,
        });
    }

    debug!("Generated {} players", players.len());
    Ok(players)
}
