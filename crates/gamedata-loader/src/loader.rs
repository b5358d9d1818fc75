//! Artifact-to-destination loading.
//!
//! Demographics and purchases are appended as-is. Events are deduplicated
//! on `event_id` first, keeping the first occurrence in file order. Nothing
//! else is validated: nulls, negative amounts and orphan references land in
//! the destination unchanged.

use crate::destination::Destination;
use crate::error::LoaderError;
use gamedata_core::{Entity, Event, Player, Purchase, Record};
use gamedata_csv::{artifact_path, read_table};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Counts for one entity load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows read from the artifact.
    pub rows_read: u64,
    /// Rows appended to the destination.
    pub rows_written: u64,
    /// Rows dropped as duplicate `event_id`s. Always 0 for other entities.
    pub duplicates_removed: u64,
}

/// Outcome of loading one entity.
#[derive(Debug)]
pub struct EntityLoad {
    pub entity: Entity,
    pub result: Result<LoadStats, LoaderError>,
    pub duration: Duration,
}

/// Outcome of [`WarehouseLoader::load_all`], one entry per entity in load
/// order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub entities: Vec<EntityLoad>,
}

impl LoadReport {
    /// True when every entity loaded.
    pub fn is_success(&self) -> bool {
        self.entities.iter().all(|load| load.result.is_ok())
    }

    pub fn stats(&self, entity: Entity) -> Option<&LoadStats> {
        self.entities
            .iter()
            .find(|load| load.entity == entity)
            .and_then(|load| load.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (Entity, &LoaderError)> {
        self.entities
            .iter()
            .filter_map(|load| load.result.as_ref().err().map(|e| (load.entity, e)))
    }

    pub fn rows_written(&self) -> u64 {
        self.entities
            .iter()
            .filter_map(|load| load.result.as_ref().ok())
            .map(|stats| stats.rows_written)
            .sum()
    }
}

/// Drop events whose `event_id` was already seen, keeping the first.
///
/// Returns the kept events and the number removed.
pub fn dedup_events(events: Vec<Event>) -> (Vec<Event>, u64) {
    let total = events.len();
    let mut seen = HashSet::with_capacity(total);
    let kept: Vec<Event> = events
        .into_iter()
        .filter(|event| seen.insert(event.event_id))
        .collect();
    let removed = (total - kept.len()) as u64;
    (kept, removed)
}

/// Loads the artifacts in one directory into a [`Destination`].
pub struct WarehouseLoader<D> {
    destination: D,
    input_dir: PathBuf,
}

impl<D: Destination> WarehouseLoader<D> {
    pub fn new(destination: D, input_dir: impl Into<PathBuf>) -> Self {
        Self {
            destination,
            input_dir: input_dir.into(),
        }
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    fn read<R: Record>(&self) -> Result<Vec<R>, LoaderError> {
        let path = artifact_path(&self.input_dir, R::ENTITY);
        info!("Reading {} from '{}'", R::ENTITY, path.display());
        Ok(read_table(path)?)
    }

    async fn append<R: Record>(
        &self,
        rows: &[R],
        rows_read: u64,
        duplicates_removed: u64,
    ) -> Result<LoadStats, LoaderError> {
        let fields: Vec<_> = rows.iter().map(Record::to_fields).collect();
        let rows_written = self.destination.append(R::ENTITY, &fields).await?;
        info!("Loaded {} rows into {}", rows_written, R::ENTITY.table_name());
        Ok(LoadStats {
            rows_read,
            rows_written,
            duplicates_removed,
        })
    }

    /// Append every demographics row.
    pub async fn load_players(&self) -> Result<LoadStats, LoaderError> {
        let players: Vec<Player> = self.read()?;
        let rows_read = players.len() as u64;
        self.append(&players, rows_read, 0).await
    }

    /// Append events with duplicate `event_id`s removed.
    pub async fn load_events(&self) -> Result<LoadStats, LoaderError> {
        let events: Vec<Event> = self.read()?;
        let rows_read = events.len() as u64;

        let (events, duplicates_removed) = dedup_events(events);
        if duplicates_removed > 0 {
            info!("Removed {} duplicate events", duplicates_removed);
        }
        self.append(&events, rows_read, duplicates_removed).await
    }

    /// Append every purchase row, including negative amounts and orphans.
    pub async fn load_purchases(&self) -> Result<LoadStats, LoaderError> {
        let purchases: Vec<Purchase> = self.read()?;
        let rows_read = purchases.len() as u64;
        self.append(&purchases, rows_read, 0).await
    }

    /// Load players, events and purchases in order.
    ///
    /// A failing entity is recorded in the report and does not stop the
    /// others; entities already loaded are not rolled back.
    pub async fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();

        for entity in Entity::ALL {
            let start = Instant::now();
            let result = match entity {
                Entity::Players => self.load_players().await,
                Entity::Events => self.load_events().await,
                Entity::Purchases => self.load_purchases().await,
            };

            match &result {
                Ok(stats) => info!(
                    "{}: {} read, {} written, {} duplicates removed",
                    entity, stats.rows_read, stats.rows_written, stats.duplicates_removed
                ),
                Err(e) if e.is_write() => error!("{}: {}", entity, e),
                Err(e) => warn!("{}: {}", entity, e),
            }

            report.entities.push(EntityLoad {
                entity,
                result,
                duration: start.elapsed(),
            });
        }

        report
    }
}
