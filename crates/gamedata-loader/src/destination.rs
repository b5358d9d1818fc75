//! Destination trait and the in-memory implementation.

use crate::error::LoaderError;
use async_trait::async_trait;
use gamedata_core::{Entity, FieldValue};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Mutex;
use tracing::debug;

/// A store the loader appends entity rows to.
///
/// Implementations:
/// - [`crate::PostgresDestination`] - `<schema>.<table>` in PostgreSQL
/// - [`MemoryDestination`] - in-process tables for tests and dry runs
#[async_trait]
pub trait Destination: Send + Sync {
    /// Append `rows` to `entity`'s table as one atomic unit.
    ///
    /// Either every row is stored or none is. Returns the number of rows
    /// written.
    async fn append(&self, entity: Entity, rows: &[Vec<FieldValue>]) -> Result<u64, LoaderError>;

    /// Number of rows currently stored for `entity`.
    async fn row_count(&self, entity: Entity) -> Result<u64, LoaderError>;
}

/// Append-only in-memory destination.
#[derive(Debug, Default)]
pub struct MemoryDestination {
    tables: Mutex<BTreeMap<Entity, Vec<Vec<FieldValue>>>>,
    failing: HashSet<Entity>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every append to `entity` fail without storing anything.
    pub fn fail_writes_to(mut self, entity: Entity) -> Self {
        self.failing.insert(entity);
        self
    }

    /// Snapshot of the rows stored for `entity`.
    pub async fn rows(&self, entity: Entity) -> Vec<Vec<FieldValue>> {
        let tables = self.tables.lock().await;
        tables.get(&entity).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Destination for MemoryDestination {
    async fn append(&self, entity: Entity, rows: &[Vec<FieldValue>]) -> Result<u64, LoaderError> {
        if self.failing.contains(&entity) {
            return Err(LoaderError::Write {
                table: entity.table_name().to_string(),
                reason: "write rejected by destination".to_string(),
            });
        }

        let mut tables = self.tables.lock().await;
        let table = tables.entry(entity).or_default();
        table.extend(rows.iter().cloned());
        debug!("Appended {} rows to in-memory {}", rows.len(), entity);
        Ok(rows.len() as u64)
    }

    async fn row_count(&self, entity: Entity) -> Result<u64, LoaderError> {
        let tables = self.tables.lock().await;
        Ok(tables.get(&entity).map_or(0, |rows| rows.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: i32) -> Vec<FieldValue> {
        vec![FieldValue::Int(n), FieldValue::Null]
    }

    #[tokio::test]
    async fn test_memory_append_accumulates() {
        let destination = MemoryDestination::new();
        assert_eq!(destination.row_count(Entity::Events).await.unwrap(), 0);

        destination
            .append(Entity::Events, &[row(1), row(2)])
            .await
            .unwrap();
        destination.append(Entity::Events, &[row(1)]).await.unwrap();

        assert_eq!(destination.row_count(Entity::Events).await.unwrap(), 3);
        assert_eq!(destination.row_count(Entity::Players).await.unwrap(), 0);
        assert_eq!(destination.rows(Entity::Events).await[2], row(1));
    }

    #[tokio::test]
    async fn test_memory_failure_stores_nothing() {
        let destination = MemoryDestination::new().fail_writes_to(Entity::Purchases);

        let err = destination
            .append(Entity::Purchases, &[row(1)])
            .await
            .unwrap_err();
        assert!(err.is_write());
        assert_eq!(destination.row_count(Entity::Purchases).await.unwrap(), 0);

        // Other tables are unaffected
        destination.append(Entity::Players, &[row(1)]).await.unwrap();
        assert_eq!(destination.row_count(Entity::Players).await.unwrap(), 1);
    }
}
