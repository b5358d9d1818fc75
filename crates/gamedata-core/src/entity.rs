//! Player, event and purchase entities.

use crate::error::RecordError;
use crate::record::{Column, ColumnType, Entity, FieldCursor, FieldValue, Record};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Player
// ============================================================================

pub const PLAYER_COLUMNS: &[Column] = &[
    Column::required("player_id", ColumnType::Uuid),
    Column::required("registration_date", ColumnType::Date),
    Column::nullable("country", ColumnType::Text),
    Column::required("age_group", ColumnType::Text),
    Column::required("gender", ColumnType::Text),
    Column::required("preferred_platform", ColumnType::Text),
    Column::required("account_status", ColumnType::Text),
    Column::required("last_login", ColumnType::Timestamp),
];

/// A row of the player demographics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: Uuid,
    pub registration_date: NaiveDate,
    /// `None` after the missing-country defect pass.
    pub country: Option<String>,
    pub age_group: String,
    pub gender: String,
    pub preferred_platform: String,
    pub account_status: String,
    pub last_login: NaiveDateTime,
}

impl Record for Player {
    const ENTITY: Entity = Entity::Players;

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Uuid(self.player_id),
            FieldValue::Date(self.registration_date),
            self.country.clone().into(),
            FieldValue::Text(self.age_group.clone()),
            FieldValue::Text(self.gender.clone()),
            FieldValue::Text(self.preferred_platform.clone()),
            FieldValue::Text(self.account_status.clone()),
            FieldValue::Timestamp(self.last_login),
        ]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self, RecordError> {
        let mut cursor = FieldCursor::new(Self::ENTITY, fields)?;
        Ok(Self {
            player_id: cursor.uuid()?,
            registration_date: cursor.date()?,
            country: cursor.opt_text()?,
            age_group: cursor.text()?,
            gender: cursor.text()?,
            preferred_platform: cursor.text()?,
            account_status: cursor.text()?,
            last_login: cursor.timestamp()?,
        })
    }
}

// ============================================================================
// Event
// ============================================================================

pub const EVENT_COLUMNS: &[Column] = &[
    Column::required("event_id", ColumnType::Uuid),
    Column::nullable("player_id", ColumnType::Uuid),
    Column::required("event_type", ColumnType::Text),
    Column::required("event_timestamp", ColumnType::Timestamp),
    Column::required("game_version", ColumnType::Text),
    Column::required("platform", ColumnType::Text),
    Column::required("country", ColumnType::Text),
    Column::required("session_id", ColumnType::Uuid),
    Column::nullable("level_id", ColumnType::Int),
    Column::nullable("achievement_id", ColumnType::Int),
];

/// Event type label as stored in the `event_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Login,
    Logout,
    LevelStart,
    LevelComplete,
    Purchase,
    Achievement,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Login,
        EventType::Logout,
        EventType::LevelStart,
        EventType::LevelComplete,
        EventType::Purchase,
        EventType::Achievement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Login => "login",
            EventType::Logout => "logout",
            EventType::LevelStart => "level_start",
            EventType::LevelComplete => "level_complete",
            EventType::Purchase => "purchase",
            EventType::Achievement => "achievement",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RecordError::UnknownLabel {
                kind: "event_type",
                value: s.to_string(),
            })
    }
}

/// Event type together with the payload only some types carry.
///
/// `level_id` exists only on level events and `achievement_id` only on
/// achievements; every other kind has neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    Login,
    Logout,
    LevelStart { level_id: i32 },
    LevelComplete { level_id: i32 },
    Purchase,
    Achievement { achievement_id: i32 },
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Login => EventType::Login,
            EventKind::Logout => EventType::Logout,
            EventKind::LevelStart { .. } => EventType::LevelStart,
            EventKind::LevelComplete { .. } => EventType::LevelComplete,
            EventKind::Purchase => EventType::Purchase,
            EventKind::Achievement { .. } => EventType::Achievement,
        }
    }

    pub fn level_id(&self) -> Option<i32> {
        match self {
            EventKind::LevelStart { level_id } | EventKind::LevelComplete { level_id } => {
                Some(*level_id)
            }
            _ => None,
        }
    }

    pub fn achievement_id(&self) -> Option<i32> {
        match self {
            EventKind::Achievement { achievement_id } => Some(*achievement_id),
            _ => None,
        }
    }

    /// Rebuild from the flat `event_type`, `level_id`, `achievement_id` columns.
    pub fn from_columns(
        event_type: EventType,
        level_id: Option<i32>,
        achievement_id: Option<i32>,
    ) -> Result<Self, RecordError> {
        let inconsistent = |detail: &str| RecordError::InconsistentPayload {
            event_type: event_type.to_string(),
            detail: detail.to_string(),
        };
        match (event_type, level_id, achievement_id) {
            (EventType::Login, None, None) => Ok(EventKind::Login),
            (EventType::Logout, None, None) => Ok(EventKind::Logout),
            (EventType::Purchase, None, None) => Ok(EventKind::Purchase),
            (EventType::LevelStart, Some(level_id), None) => Ok(EventKind::LevelStart { level_id }),
            (EventType::LevelComplete, Some(level_id), None) => {
                Ok(EventKind::LevelComplete { level_id })
            }
            (EventType::Achievement, None, Some(achievement_id)) => {
                Ok(EventKind::Achievement { achievement_id })
            }
            (EventType::LevelStart | EventType::LevelComplete, None, _) => {
                Err(inconsistent("a missing level_id"))
            }
            (EventType::Achievement, _, None) => Err(inconsistent("a missing achievement_id")),
            (_, Some(_), _) => Err(inconsistent("a level_id")),
            (_, _, Some(_)) => Err(inconsistent("an achievement_id")),
        }
    }
}

/// A row of the player events table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    /// `None` after the missing-player defect pass.
    pub player_id: Option<Uuid>,
    pub kind: EventKind,
    pub event_timestamp: NaiveDateTime,
    pub game_version: String,
    pub platform: String,
    pub country: String,
    pub session_id: Uuid,
}

impl Event {
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }
}

impl Record for Event {
    const ENTITY: Entity = Entity::Events;

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Uuid(self.event_id),
            self.player_id.into(),
            FieldValue::Text(self.event_type().as_str().to_string()),
            FieldValue::Timestamp(self.event_timestamp),
            FieldValue::Text(self.game_version.clone()),
            FieldValue::Text(self.platform.clone()),
            FieldValue::Text(self.country.clone()),
            FieldValue::Uuid(self.session_id),
            self.kind.level_id().into(),
            self.kind.achievement_id().into(),
        ]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self, RecordError> {
        let mut cursor = FieldCursor::new(Self::ENTITY, fields)?;
        let event_id = cursor.uuid()?;
        let player_id = cursor.opt_uuid()?;
        let event_type: EventType = cursor.text()?.parse()?;
        let event_timestamp = cursor.timestamp()?;
        let game_version = cursor.text()?;
        let platform = cursor.text()?;
        let country = cursor.text()?;
        let session_id = cursor.uuid()?;
        let level_id = cursor.opt_int()?;
        let achievement_id = cursor.opt_int()?;

        Ok(Self {
            event_id,
            player_id,
            kind: EventKind::from_columns(event_type, level_id, achievement_id)?,
            event_timestamp,
            game_version,
            platform,
            country,
            session_id,
        })
    }
}

// ============================================================================
// Purchase
// ============================================================================

pub const PURCHASE_COLUMNS: &[Column] = &[
    Column::required("transaction_id", ColumnType::Uuid),
    Column::required("player_id", ColumnType::Uuid),
    Column::required("purchase_timestamp", ColumnType::Timestamp),
    Column::required("product_id", ColumnType::Text),
    Column::required("product_name", ColumnType::Text),
    Column::required("product_category", ColumnType::Text),
    Column::required("amount", ColumnType::Decimal),
    Column::required("currency", ColumnType::Text),
    Column::required("payment_method", ColumnType::Text),
    Column::required("platform", ColumnType::Text),
    Column::required("country", ColumnType::Text),
    Column::required("session_id", ColumnType::Uuid),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Currency,
    Powerup,
    Cosmetic,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::Currency,
        ProductCategory::Powerup,
        ProductCategory::Cosmetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Currency => "currency",
            ProductCategory::Powerup => "powerup",
            ProductCategory::Cosmetic => "cosmetic",
        }
    }

    /// Title-cased label used in product names.
    pub fn title(self) -> &'static str {
        match self {
            ProductCategory::Currency => "Currency",
            ProductCategory::Powerup => "Powerup",
            ProductCategory::Cosmetic => "Cosmetic",
        }
    }

    /// Product name for the given pack index, e.g. `Powerup Pack 3`.
    pub fn product_name(self, pack: i32) -> String {
        format!("{} Pack {pack}", self.title())
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RecordError::UnknownLabel {
                kind: "product_category",
                value: s.to_string(),
            })
    }
}

/// A row of the purchases table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub transaction_id: Uuid,
    /// May not resolve to any player after the orphan defect pass.
    pub player_id: Uuid,
    pub purchase_timestamp: NaiveDateTime,
    pub product_id: String,
    pub product_name: String,
    pub product_category: ProductCategory,
    /// Two fractional digits; negative after the sign-flip defect pass.
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub platform: String,
    pub country: String,
    pub session_id: Uuid,
}

impl Record for Purchase {
    const ENTITY: Entity = Entity::Purchases;

    fn to_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Uuid(self.transaction_id),
            FieldValue::Uuid(self.player_id),
            FieldValue::Timestamp(self.purchase_timestamp),
            FieldValue::Text(self.product_id.clone()),
            FieldValue::Text(self.product_name.clone()),
            FieldValue::Text(self.product_category.as_str().to_string()),
            FieldValue::Decimal(self.amount),
            FieldValue::Text(self.currency.clone()),
            FieldValue::Text(self.payment_method.clone()),
            FieldValue::Text(self.platform.clone()),
            FieldValue::Text(self.country.clone()),
            FieldValue::Uuid(self.session_id),
        ]
    }

    fn from_fields(fields: Vec<FieldValue>) -> Result<Self, RecordError> {
        let mut cursor = FieldCursor::new(Self::ENTITY, fields)?;
        Ok(Self {
            transaction_id: cursor.uuid()?,
            player_id: cursor.uuid()?,
            purchase_timestamp: cursor.timestamp()?,
            product_id: cursor.text()?,
            product_name: cursor.text()?,
            product_category: cursor.text()?.parse()?,
            amount: cursor.decimal()?,
            currency: cursor.text()?,
            payment_method: cursor.text()?,
            platform: cursor.text()?,
            country: cursor.text()?,
            session_id: cursor.uuid()?,
        })
    }
}
