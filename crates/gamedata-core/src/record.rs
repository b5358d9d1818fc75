//! Column-ordered row representation.
//!
//! Every entity is flattened into a `Vec<FieldValue>` following its fixed
//! column layout. The CSV serializer and the warehouse loader only ever see
//! this representation, so both agree on column order and nullability.

use crate::error::RecordError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Uuid,
    Text,
    Date,
    Timestamp,
    Int,
    Decimal,
}

impl ColumnType {
    /// Human readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Uuid => "uuid",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Int => "integer",
            ColumnType::Decimal => "decimal",
        }
    }
}

/// A single column in an entity layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    pub const fn required(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: false,
        }
    }

    pub const fn nullable(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
        }
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Null,
    Uuid(Uuid),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Int(i32),
    Decimal(Decimal),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Whether this value may be stored in a column of the given type.
    pub fn fits(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (FieldValue::Null, _)
                | (FieldValue::Uuid(_), ColumnType::Uuid)
                | (FieldValue::Text(_), ColumnType::Text)
                | (FieldValue::Date(_), ColumnType::Date)
                | (FieldValue::Timestamp(_), ColumnType::Timestamp)
                | (FieldValue::Int(_), ColumnType::Int)
                | (FieldValue::Decimal(_), ColumnType::Decimal)
        )
    }
}

impl From<Option<Uuid>> for FieldValue {
    fn from(value: Option<Uuid>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Uuid)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Text)
    }
}

impl From<Option<i32>> for FieldValue {
    fn from(value: Option<i32>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Int)
    }
}

/// The three generated entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Players,
    Events,
    Purchases,
}

impl Entity {
    /// Load order used by the warehouse loader.
    pub const ALL: [Entity; 3] = [Entity::Players, Entity::Events, Entity::Purchases];

    /// Destination table name.
    pub fn table_name(self) -> &'static str {
        match self {
            Entity::Players => "player_demographics",
            Entity::Events => "player_events",
            Entity::Purchases => "purchases",
        }
    }

    /// Published artifact file name.
    pub fn file_name(self) -> &'static str {
        match self {
            Entity::Players => "player_demographics.csv",
            Entity::Events => "player_events.csv",
            Entity::Purchases => "purchases.csv",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Entity::Players => crate::entity::PLAYER_COLUMNS,
            Entity::Events => crate::entity::EVENT_COLUMNS,
            Entity::Purchases => crate::entity::PURCHASE_COLUMNS,
        }
    }

    pub fn column_names(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.name).collect()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// An entity that can be flattened to, and rebuilt from, typed fields.
pub trait Record: Sized {
    const ENTITY: Entity;

    /// Flatten into fields following `ENTITY.columns()`.
    fn to_fields(&self) -> Vec<FieldValue>;

    /// Rebuild from fields following `ENTITY.columns()`.
    fn from_fields(fields: Vec<FieldValue>) -> Result<Self, RecordError>;
}

/// Sequential reader over a row's fields, checking each against its column.
pub struct FieldCursor {
    columns: &'static [Column],
    values: std::vec::IntoIter<FieldValue>,
    position: usize,
}

impl FieldCursor {
    pub fn new(entity: Entity, values: Vec<FieldValue>) -> Result<Self, RecordError> {
        let columns = entity.columns();
        if values.len() != columns.len() {
            return Err(RecordError::WrongArity {
                expected: columns.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            columns,
            values: values.into_iter(),
            position: 0,
        })
    }

    fn next_value(&mut self) -> Result<(&'static Column, FieldValue), RecordError> {
        let columns = self.columns;
        match (columns.get(self.position), self.values.next()) {
            (Some(column), Some(value)) => {
                self.position += 1;
                Ok((column, value))
            }
            _ => Err(RecordError::WrongArity {
                expected: columns.len(),
                found: self.position,
            }),
        }
    }

    fn take<T>(
        &mut self,
        extract: impl FnOnce(FieldValue) -> Option<T>,
    ) -> Result<(&'static Column, Option<T>), RecordError> {
        let (column, value) = self.next_value()?;
        if value.is_null() {
            return Ok((column, None));
        }
        match extract(value) {
            Some(v) => Ok((column, Some(v))),
            None => Err(RecordError::TypeMismatch {
                column: column.name,
                expected: column.column_type.name(),
            }),
        }
    }

    fn optional<T>(
        &mut self,
        extract: impl FnOnce(FieldValue) -> Option<T>,
    ) -> Result<Option<T>, RecordError> {
        self.take(extract).map(|(_, value)| value)
    }

    fn required<T>(
        &mut self,
        extract: impl FnOnce(FieldValue) -> Option<T>,
    ) -> Result<T, RecordError> {
        let (column, value) = self.take(extract)?;
        value.ok_or(RecordError::MissingValue(column.name))
    }

    pub fn uuid(&mut self) -> Result<Uuid, RecordError> {
        self.required(|v| match v {
            FieldValue::Uuid(u) => Some(u),
            _ => None,
        })
    }

    pub fn opt_uuid(&mut self) -> Result<Option<Uuid>, RecordError> {
        self.optional(|v| match v {
            FieldValue::Uuid(u) => Some(u),
            _ => None,
        })
    }

    pub fn text(&mut self) -> Result<String, RecordError> {
        self.required(|v| match v {
            FieldValue::Text(s) => Some(s),
            _ => None,
        })
    }

    pub fn opt_text(&mut self) -> Result<Option<String>, RecordError> {
        self.optional(|v| match v {
            FieldValue::Text(s) => Some(s),
            _ => None,
        })
    }

    pub fn date(&mut self) -> Result<NaiveDate, RecordError> {
        self.required(|v| match v {
            FieldValue::Date(d) => Some(d),
            _ => None,
        })
    }

    pub fn timestamp(&mut self) -> Result<NaiveDateTime, RecordError> {
        self.required(|v| match v {
            FieldValue::Timestamp(ts) => Some(ts),
            _ => None,
        })
    }

    pub fn opt_int(&mut self) -> Result<Option<i32>, RecordError> {
        self.optional(|v| match v {
            FieldValue::Int(i) => Some(i),
            _ => None,
        })
    }

    pub fn decimal(&mut self) -> Result<Decimal, RecordError> {
        self.required(|v| match v {
            FieldValue::Decimal(d) => Some(d),
            _ => None,
        })
    }
}
