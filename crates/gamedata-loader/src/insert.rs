//! SQL generation and parameter binding for PostgreSQL writes.

use chrono::{NaiveDate, NaiveDateTime};
use gamedata_core::{ColumnType, Entity, FieldValue};
use rust_decimal::Decimal;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

/// Default batch size for INSERT operations.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default schema for the raw tables.
pub const DEFAULT_SCHEMA: &str = "bronze";

/// Bind parameters PostgreSQL accepts in a single statement.
pub const MAX_BIND_PARAMETERS: usize = 65_535;

/// Rows per INSERT for `entity`: the requested batch size, at least 1 and
/// never more than fits in [`MAX_BIND_PARAMETERS`].
pub fn rows_per_statement(entity: Entity, batch_size: usize) -> usize {
    let limit = MAX_BIND_PARAMETERS / entity.columns().len();
    batch_size.clamp(1, limit)
}

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `"<schema>"."<table>"` for an entity.
pub fn qualified_table(schema: &str, entity: Entity) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(entity.table_name()))
}

/// Multi-row INSERT with `$n` placeholders for `row_count` rows.
pub fn generate_insert(schema: &str, entity: Entity, row_count: usize) -> String {
    let columns = entity.columns();
    let col_count = columns.len();

    let placeholders: Vec<String> = (0..row_count)
        .map(|row| {
            let row_placeholders: Vec<String> = (1..=col_count)
                .map(|col| format!("${}", row * col_count + col))
                .collect();
            format!("({})", row_placeholders.join(", "))
        })
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        qualified_table(schema, entity),
        columns
            .iter()
            .map(|c| quote_ident(c.name))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", ")
    )
}

fn sql_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Uuid => "UUID",
        ColumnType::Text => "TEXT",
        ColumnType::Date => "DATE",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::Int => "INTEGER",
        ColumnType::Decimal => "NUMERIC(10, 2)",
    }
}

/// Generate CREATE SCHEMA statement.
pub fn generate_create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema))
}

/// Generate CREATE TABLE statement for an entity.
///
/// The tables carry no keys: they are append-only raw landing tables.
pub fn generate_create_table(schema: &str, entity: Entity) -> String {
    let columns: Vec<String> = entity
        .columns()
        .iter()
        .map(|c| {
            let null = if c.nullable { "" } else { " NOT NULL" };
            format!("{} {}{}", quote_ident(c.name), sql_type(c.column_type), null)
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified_table(schema, entity),
        columns.join(", ")
    )
}

/// Generate row count query.
pub fn generate_count(schema: &str, entity: Entity) -> String {
    format!("SELECT COUNT(*) FROM {}", qualified_table(schema, entity))
}

/// Convert a field to a boxed ToSql trait object.
///
/// Nulls are bound with the column's Rust type so the server accepts them
/// for non-text columns.
pub fn field_to_boxed(
    value: &FieldValue,
    column_type: ColumnType,
) -> Box<dyn ToSql + Sync + Send> {
    match value {
        FieldValue::Null => match column_type {
            ColumnType::Uuid => Box::new(None::<Uuid>),
            ColumnType::Text => Box::new(None::<String>),
            ColumnType::Date => Box::new(None::<NaiveDate>),
            ColumnType::Timestamp => Box::new(None::<NaiveDateTime>),
            ColumnType::Int => Box::new(None::<i32>),
            ColumnType::Decimal => Box::new(None::<Decimal>),
        },
        FieldValue::Uuid(u) => Box::new(*u),
        FieldValue::Text(s) => Box::new(s.clone()),
        FieldValue::Date(d) => Box::new(*d),
        FieldValue::Timestamp(ts) => Box::new(*ts),
        FieldValue::Int(i) => Box::new(*i),
        FieldValue::Decimal(d) => Box::new(*d),
    }
}

/// Parameters for one multi-row INSERT, row-major.
pub fn batch_params(
    entity: Entity,
    rows: &[Vec<FieldValue>],
) -> Vec<Box<dyn ToSql + Sync + Send>> {
    let columns = entity.columns();
    let mut params = Vec::with_capacity(rows.len() * columns.len());
    for row in rows {
        for (column, value) in columns.iter().zip(row) {
            params.push(field_to_boxed(value, column.column_type));
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_insert() {
        let sql = generate_insert("bronze", Entity::Players, 2);
        assert!(sql.starts_with(
            "INSERT INTO \"bronze\".\"player_demographics\" (\"player_id\", \"registration_date\""
        ));
        assert!(sql.ends_with(
            "VALUES ($1, $2, $3, $4, $5, $6, $7, $8), ($9, $10, $11, $12, $13, $14, $15, $16)"
        ));
    }

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table("bronze", Entity::Events);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"bronze\".\"player_events\" ("));
        assert!(sql.contains("\"event_id\" UUID NOT NULL"));
        assert!(sql.contains("\"player_id\" UUID,"));
        assert!(sql.contains("\"level_id\" INTEGER"));
        assert!(!sql.contains("PRIMARY KEY"));

        let sql = generate_create_table("bronze", Entity::Purchases);
        assert!(sql.contains("\"amount\" NUMERIC(10, 2) NOT NULL"));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("bronze"), "\"bronze\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(
            generate_create_schema("raw"),
            "CREATE SCHEMA IF NOT EXISTS \"raw\""
        );
        assert_eq!(
            generate_count("raw", Entity::Purchases),
            "SELECT COUNT(*) FROM \"raw\".\"purchases\""
        );
    }

    #[test]
    fn test_rows_per_statement_fits_bind_limit() {
        assert_eq!(rows_per_statement(Entity::Purchases, 500), 500);
        assert_eq!(rows_per_statement(Entity::Purchases, 0), 1);
        // 12 purchase columns
        assert_eq!(rows_per_statement(Entity::Purchases, 10_000), 5461);
        assert_eq!(rows_per_statement(Entity::Players, usize::MAX), 65_535 / 8);

        for entity in Entity::ALL {
            let rows = rows_per_statement(entity, 1_000_000);
            assert!(rows * entity.columns().len() <= MAX_BIND_PARAMETERS);
        }
    }

    #[test]
    fn test_batch_params_len() {
        let row = vec![FieldValue::Null; Entity::Events.columns().len()];
        let params = batch_params(Entity::Events, &[row.clone(), row]);
        assert_eq!(params.len(), 20);
    }
}
