//! Atomic artifact writer.
//!
//! Rows are written to a temp file next to the published path, flushed and
//! synced, then renamed into place. A failed write drops the temp file, so
//! the published path either holds a complete artifact or is untouched.

use crate::error::SerializationError;
use crate::forward::fields_to_csv_record;
use csv::Writer;
use gamedata_core::{Entity, FieldValue, Record};
use gamedata_generator::Dataset;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from writing one artifact.
#[derive(Debug, Clone)]
pub struct WriteMetrics {
    pub entity: Entity,
    /// Published path of the artifact.
    pub path: PathBuf,
    /// Number of data rows written, excluding the header.
    pub rows_written: u64,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
    /// Total time taken.
    pub total_duration: Duration,
}

impl WriteMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.file_size_bytes as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Published path of `entity`'s artifact inside `dir`.
pub fn artifact_path(dir: &Path, entity: Entity) -> PathBuf {
    dir.join(entity.file_name())
}

/// Write `rows` as the artifact for `R::ENTITY` inside `dir`.
pub fn write_table<R: Record>(
    dir: impl AsRef<Path>,
    rows: &[R],
) -> Result<WriteMetrics, SerializationError> {
    write_rows(dir.as_ref(), R::ENTITY, rows.iter().map(Record::to_fields))
}

/// Write all three artifacts, creating `dir` if needed.
pub fn write_dataset(
    dir: impl AsRef<Path>,
    dataset: &Dataset,
) -> Result<Vec<WriteMetrics>, SerializationError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    Ok(vec![
        write_table(dir, &dataset.players)?,
        write_table(dir, &dataset.events)?,
        write_table(dir, &dataset.purchases)?,
    ])
}

fn write_rows<I>(dir: &Path, entity: Entity, rows: I) -> Result<WriteMetrics, SerializationError>
where
    I: IntoIterator<Item = Vec<FieldValue>>,
{
    let start_time = Instant::now();
    let path = artifact_path(dir, entity);
    info!("Writing {} artifact '{}'", entity, path.display());

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", entity.table_name()))
        .suffix(".tmp")
        .tempfile_in(dir)?;

    let mut rows_written = 0u64;
    {
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, temp.as_file_mut());
        let mut writer = Writer::from_writer(buf_writer);
        writer.write_record(entity.column_names())?;

        for fields in rows {
            check_row(entity, rows_written + 1, &fields)?;
            writer.write_record(fields_to_csv_record(&fields))?;
            rows_written += 1;

            if rows_written % 10000 == 0 {
                debug!("Written {} {} rows", rows_written, entity);
            }
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    let file_size_bytes = temp.as_file().metadata()?.len();
    temp.persist(&path)?;

    let metrics = WriteMetrics {
        entity,
        path,
        rows_written,
        file_size_bytes,
        total_duration: start_time.elapsed(),
    };
    info!(
        "Published '{}': {} rows, {} bytes in {:?} ({:.2} rows/sec)",
        metrics.path.display(),
        metrics.rows_written,
        metrics.file_size_bytes,
        metrics.total_duration,
        metrics.rows_per_second()
    );
    Ok(metrics)
}

/// Every field must fit its column's type and nullability.
fn check_row(entity: Entity, row: u64, fields: &[FieldValue]) -> Result<(), SerializationError> {
    let columns = entity.columns();
    if fields.len() != columns.len() {
        return Err(SerializationError::InvalidRow {
            entity,
            row,
            reason: format!("expected {} fields, found {}", columns.len(), fields.len()),
        });
    }

    for (column, value) in columns.iter().zip(fields) {
        if value.is_null() && !column.nullable {
            return Err(SerializationError::InvalidRow {
                entity,
                row,
                reason: format!("column '{}' must not be null", column.name),
            });
        }
        if !value.fits(column.column_type) {
            return Err(SerializationError::InvalidRow {
                entity,
                row,
                reason: format!(
                    "column '{}' expected {}",
                    column.name,
                    column.column_type.name()
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gamedata_core::{
        CampaignWindow, Counts, DefectRates, GenerationPlan, Player, RecordError, Vocabulary,
    };
    use gamedata_generator::DatasetGenerator;
    use tempfile::TempDir;

    fn dataset(seed: u64) -> Dataset {
        let window = CampaignWindow::from_dates(
            NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 31).unwrap(),
        )
        .unwrap();
        let plan = GenerationPlan::new(
            seed,
            Counts::new(40, 300, 100).unwrap(),
            window,
            DefectRates::default(),
            Vocabulary::default(),
        )
        .unwrap();
        DatasetGenerator::new(plan).generate().unwrap().0
    }

    /// A player whose uuid column can be replaced by text.
    struct BrokenPlayer {
        player: Player,
        broken: bool,
    }

    impl Record for BrokenPlayer {
        const ENTITY: Entity = Entity::Players;

        fn to_fields(&self) -> Vec<FieldValue> {
            let mut fields = self.player.to_fields();
            if self.broken {
                fields[0] = FieldValue::Text("oops".to_string());
            }
            fields
        }

        fn from_fields(_fields: Vec<FieldValue>) -> Result<Self, RecordError> {
            unreachable!("write-only test record")
        }
    }

    /// Five players, the third of which cannot be written.
    fn broken_rows() -> Vec<BrokenPlayer> {
        dataset(7)
            .players
            .into_iter()
            .take(5)
            .enumerate()
            .map(|(i, player)| BrokenPlayer {
                player,
                broken: i == 2,
            })
            .collect()
    }

    #[test]
    fn test_metrics() {
        let metrics = WriteMetrics {
            entity: Entity::Events,
            path: PathBuf::from("player_events.csv"),
            rows_written: 1000,
            file_size_bytes: 100000,
            total_duration: Duration::from_secs(10),
        };

        assert_eq!(metrics.rows_per_second(), 100.0);
        assert_eq!(metrics.bytes_per_second(), 10000.0);
    }

    #[test]
    fn test_write_table() {
        let data = dataset(42);
        let temp_dir = TempDir::new().unwrap();

        let metrics = write_table(temp_dir.path(), &data.players).unwrap();

        assert_eq!(metrics.rows_written, 40);
        assert_eq!(metrics.path, temp_dir.path().join("player_demographics.csv"));

        let content = std::fs::read_to_string(&metrics.path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 41); // 1 header + 40 data rows
        assert_eq!(
            lines[0],
            "player_id,registration_date,country,age_group,gender,preferred_platform,account_status,last_login"
        );
        assert_eq!(metrics.file_size_bytes, content.len() as u64);
    }

    #[test]
    fn test_null_written_as_empty_field() {
        let mut data = dataset(42);
        data.players.truncate(1);
        data.players[0].country = None;
        let temp_dir = TempDir::new().unwrap();

        let metrics = write_table(temp_dir.path(), &data.players).unwrap();
        let content = std::fs::read_to_string(metrics.path).unwrap();
        let row: Vec<&str> = content.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[2], "");
    }

    #[test]
    fn test_write_dataset_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("data").join("raw");

        let metrics = write_dataset(&out, &dataset(1)).unwrap();

        assert_eq!(metrics.len(), 3);
        for entity in Entity::ALL {
            assert!(out.join(entity.file_name()).exists());
        }
        assert_eq!(metrics[1].rows_written, 306);
    }

    #[test]
    fn test_deterministic_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");

        write_dataset(&first, &dataset(42)).unwrap();
        write_dataset(&second, &dataset(42)).unwrap();

        for entity in Entity::ALL {
            let a = std::fs::read(first.join(entity.file_name())).unwrap();
            let b = std::fs::read(second.join(entity.file_name())).unwrap();
            assert_eq!(a, b, "{entity} artifacts differ");
        }
    }

    #[test]
    fn test_failed_write_publishes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let rows = broken_rows();

        let err = write_table(temp_dir.path(), &rows).unwrap_err();
        assert!(matches!(err, SerializationError::InvalidRow { row: 3, .. }));

        // Neither the artifact nor the temp file is left behind
        let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_failed_write_keeps_previous_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let published = temp_dir.path().join("player_demographics.csv");
        std::fs::write(&published, "previous run\n").unwrap();

        let rows = broken_rows();
        assert!(write_table(temp_dir.path(), &rows).is_err());

        assert_eq!(std::fs::read_to_string(&published).unwrap(), "previous run\n");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let players: Vec<Player> = Vec::new();

        let err = write_table(&missing, &players).unwrap_err();
        assert!(matches!(err, SerializationError::Io(_)));
        assert!(!missing.exists());
    }
}
