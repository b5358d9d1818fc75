//! Reverse conversion: CSV string → FieldValue.

use crate::forward::{DATE_FORMAT, TIMESTAMP_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use gamedata_core::{Column, ColumnType, FieldValue};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

/// Error type for CSV field parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvParseError {
    pub message: String,
    pub value: String,
    pub expected_type: &'static str,
}

impl std::fmt::Display for CsvParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to parse '{}' as {}: {}",
            self.value, self.expected_type, self.message
        )
    }
}

impl std::error::Error for CsvParseError {}

fn parse_error(value: &str, column_type: ColumnType, message: impl ToString) -> CsvParseError {
    CsvParseError {
        message: message.to_string(),
        value: value.to_string(),
        expected_type: column_type.name(),
    }
}

/// Parse a CSV field according to its column.
///
/// An empty field is null, except in a non-nullable text column where it is
/// the empty string. Nullability of other columns is checked when the record
/// is assembled.
pub fn csv_string_to_field_value(
    value: &str,
    column: &Column,
) -> Result<FieldValue, CsvParseError> {
    let column_type = column.column_type;
    if value.is_empty() {
        return Ok(match column_type {
            ColumnType::Text if !column.nullable => FieldValue::Text(String::new()),
            _ => FieldValue::Null,
        });
    }

    match column_type {
        ColumnType::Uuid => Uuid::parse_str(value)
            .map(FieldValue::Uuid)
            .map_err(|e| parse_error(value, column_type, e)),
        ColumnType::Text => Ok(FieldValue::Text(value.to_string())),
        ColumnType::Date => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|e| parse_error(value, column_type, e)),
        ColumnType::Timestamp => NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map(FieldValue::Timestamp)
            .map_err(|e| parse_error(value, column_type, e)),
        ColumnType::Int => value
            .parse::<i32>()
            .map(FieldValue::Int)
            .map_err(|e| parse_error(value, column_type, e)),
        ColumnType::Decimal => Decimal::from_str(value)
            .map(FieldValue::Decimal)
            .map_err(|e| parse_error(value, column_type, e)),
    }
}
