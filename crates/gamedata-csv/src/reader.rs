//! Typed artifact reader.

use crate::error::SerializationError;
use crate::reverse::csv_string_to_field_value;
use crate::writer::artifact_path;
use csv::ReaderBuilder;
use gamedata_core::{Entity, Record};
use gamedata_generator::Dataset;
use std::path::Path;
use tracing::debug;

/// Read an artifact back into typed rows of `R`.
///
/// The header must name `R::ENTITY`'s columns in order.
pub fn read_table<R: Record>(path: impl AsRef<Path>) -> Result<Vec<R>, SerializationError> {
    let path = path.as_ref();
    let columns = R::ENTITY.columns();

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.headers()?;
    let expected = R::ENTITY.column_names();
    if !headers.iter().eq(expected.iter().copied()) {
        return Err(SerializationError::Header {
            path: path.to_path_buf(),
            expected: expected.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let mut fields = Vec::with_capacity(columns.len());
        for (column, raw) in columns.iter().zip(record.iter()) {
            let value = csv_string_to_field_value(raw, column).map_err(|e| {
                SerializationError::Parse {
                    path: path.to_path_buf(),
                    line,
                    column: column.name.to_string(),
                    message: e.to_string(),
                }
            })?;
            fields.push(value);
        }

        let row = R::from_fields(fields).map_err(|source| SerializationError::Record {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        rows.push(row);
    }

    debug!("Read {} {} rows from '{}'", rows.len(), R::ENTITY, path.display());
    Ok(rows)
}

/// Read all three artifacts from `dir`.
pub fn read_dataset(dir: impl AsRef<Path>) -> Result<Dataset, SerializationError> {
    let dir = dir.as_ref();
    Ok(Dataset {
        players: read_table(artifact_path(dir, Entity::Players))?,
        events: read_table(artifact_path(dir, Entity::Events))?,
        purchases: read_table(artifact_path(dir, Entity::Purchases))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{write_dataset, write_table};
    use chrono::NaiveDate;
    use gamedata_core::{
        CampaignWindow, Counts, DefectRates, Event, GenerationPlan, Player, RecordError,
        Vocabulary,
    };
    use gamedata_generator::DatasetGenerator;
    use tempfile::TempDir;

    fn dataset() -> Dataset {
        let window = CampaignWindow::from_dates(
            NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 31).unwrap(),
        )
        .unwrap();
        let plan = GenerationPlan::new(
            42,
            Counts::new(100, 1000, 400).unwrap(),
            window,
            DefectRates::default(),
            Vocabulary::default(),
        )
        .unwrap();
        DatasetGenerator::new(plan).generate().unwrap().0
    }

    const PLAYER_HEADER: &str =
        "player_id,registration_date,country,age_group,gender,preferred_platform,account_status,last_login";

    #[test]
    fn test_read_back_preserves_defects() {
        let original = dataset();
        let temp_dir = TempDir::new().unwrap();
        write_dataset(temp_dir.path(), &original).unwrap();

        let restored = read_dataset(temp_dir.path()).unwrap();

        assert_eq!(restored, original);
        assert_eq!(restored.summary(), original.summary());
        assert_eq!(restored.summary().players_missing_country, 5);
        assert_eq!(restored.summary().events_missing_player, 10);
    }

    #[test]
    fn test_malformed_field_names_line_and_column() {
        let temp_dir = TempDir::new().unwrap();
        let original = dataset();
        let metrics = write_table(temp_dir.path(), &original.players[..3]).unwrap();

        // Corrupt the player_id of the second data row (line 3)
        let content = std::fs::read_to_string(&metrics.path).unwrap();
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        let rest = lines[2].split_once(',').unwrap().1.to_string();
        lines[2] = format!("not-a-uuid,{rest}");
        std::fs::write(&metrics.path, lines.join("\n") + "\n").unwrap();

        let err = read_table::<Player>(&metrics.path).unwrap_err();
        match err {
            SerializationError::Parse { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "player_id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("player_events.csv");
        std::fs::write(&path, format!("{PLAYER_HEADER}\n")).unwrap();

        let err = read_table::<Event>(&path).unwrap_err();
        assert!(matches!(err, SerializationError::Header { .. }));
    }

    #[test]
    fn test_missing_required_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("player_demographics.csv");
        std::fs::write(
            &path,
            format!(
                "{PLAYER_HEADER}\n550e8400-e29b-41d4-a716-446655440000,,US,18-24,M,iOS,active,2024-10-02 10:00:00\n"
            ),
        )
        .unwrap();

        let err = read_table::<Player>(&path).unwrap_err();
        assert!(matches!(
            err,
            SerializationError::Record {
                line: 2,
                source: RecordError::MissingValue("registration_date"),
                ..
            }
        ));
    }

    #[test]
    fn test_short_row_is_csv_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("player_demographics.csv");
        std::fs::write(&path, format!("{PLAYER_HEADER}\na,b\n")).unwrap();

        let err = read_table::<Player>(&path).unwrap_err();
        assert!(matches!(err, SerializationError::Csv(_)));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_table::<Player>(temp_dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, SerializationError::Csv(_)));
    }
}
