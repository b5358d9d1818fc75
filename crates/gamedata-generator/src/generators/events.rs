//! Player event generator.

use crate::context::RandomContext;
use crate::error::GeneratorError;
use gamedata_core::{CampaignWindow, ConfigError, Event, EventKind, EventType, Vocabulary};
use tracing::debug;
use uuid::Uuid;

/// Inclusive range of `level_id` values.
pub const LEVEL_ID_RANGE: (i32, i32) = (1, 100);
/// Inclusive range of `achievement_id` values.
pub const ACHIEVEMENT_ID_RANGE: (i32, i32) = (1, 50);

/// Draw the kind and, for level and achievement events, its payload.
fn draw_kind(ctx: &mut RandomContext) -> Result<EventKind, GeneratorError> {
    let kind = match *ctx.choose(&EventType::ALL)? {
        EventType::Login => EventKind::Login,
        EventType::Logout => EventKind::Logout,
        EventType::Purchase => EventKind::Purchase,
        EventType::LevelStart => EventKind::LevelStart {
            level_id: ctx.uniform_int(LEVEL_ID_RANGE.0, LEVEL_ID_RANGE.1)?,
        },
        EventType::LevelComplete => EventKind::LevelComplete {
            level_id: ctx.uniform_int(LEVEL_ID_RANGE.0, LEVEL_ID_RANGE.1)?,
        },
        EventType::Achievement => EventKind::Achievement {
            achievement_id: ctx.uniform_int(ACHIEVEMENT_ID_RANGE.0, ACHIEVEMENT_ID_RANGE.1)?,
        },
    };
    Ok(kind)
}

/// Generate `count` events referencing players drawn with replacement from
/// `player_universe`.
pub fn generate_events(
    ctx: &mut RandomContext,
    count: usize,
    window: &CampaignWindow,
    vocabulary: &Vocabulary,
    player_universe: &[Uuid],
) -> Result<Vec<Event>, GeneratorError> {
    if count > 0 && player_universe.is_empty() {
        return Err(ConfigError::EmptyPlayerUniverse("events").into());
    }

    let mut events = Vec::with_capacity(count);
    for _ in 0..count {
        let kind = draw_kind(ctx)?;
        let event_timestamp = ctx.uniform_datetime(window.start(), window.end())?;
        let event_id = ctx.uuid();
        let player_id = *ctx.choose(player_universe)?;
        let game_version = format!(
            "1.{}.{}",
            ctx.uniform_int(0, 5)?,
            ctx.uniform_int(0, 10)?
        );
        let platform = ctx.choose(&vocabulary.platforms)?.clone();
        let country = ctx.choose(&vocabulary.countries)?.clone();
        let session_id = ctx.uuid();

        events.push(Event {
            event_id,
            player_id: Some(player_id),
            kind,
            event_timestamp,
            game_version,
            platform,
            country,
            session_id,
        });
    }

    debug!("Generated {} events", events.len());
    Ok(events)
}
