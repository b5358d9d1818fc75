//! Stage runners shared by the `generate`, `load` and `run` commands.

use crate::config::RunConfig;
use crate::logging::mask_connection_password;
use anyhow::{bail, Context};
use gamedata_csv::{write_dataset, WriteMetrics};
use gamedata_generator::{Dataset, DatasetGenerator, InjectionReport};
use gamedata_loader::{Destination, LoadReport, PostgresDestination, WarehouseLoader};
use std::path::Path;
use tracing::{error, info};

/// Generate the dataset described by `config`, defects included.
pub fn generate(config: &RunConfig) -> anyhow::Result<(Dataset, InjectionReport)> {
    let plan = config.plan().context("Invalid run configuration")?;
    info!(
        "Generating {} players, {} events, {} purchases for {} .. {} (seed={})",
        plan.counts.players,
        plan.counts.events,
        plan.counts.purchases,
        plan.window.start(),
        plan.window.end(),
        plan.seed
    );

    let (dataset, report) = DatasetGenerator::new(plan)
        .generate()
        .context("Data generation failed")?;

    for pass in &report.passes {
        info!(
            "Defect pass {}: {} of {} rows",
            pass.pass.name(),
            pass.rows_affected,
            pass.rows_considered
        );
    }
    Ok((dataset, report))
}

/// Publish the three artifacts into `dir`.
pub fn publish(dataset: &Dataset, dir: &Path) -> anyhow::Result<Vec<WriteMetrics>> {
    let metrics = write_dataset(dir, dataset)
        .with_context(|| format!("Failed to write artifacts to {dir:?}"))?;
    for artifact in &metrics {
        info!(
            "Wrote {} rows ({} bytes, {:.0} bytes/sec) to {}",
            artifact.rows_written,
            artifact.file_size_bytes,
            artifact.bytes_per_second(),
            artifact.path.display()
        );
    }
    Ok(metrics)
}

/// Connect to the configured warehouse, optionally creating its tables.
pub async fn connect_warehouse(
    config: &RunConfig,
    create_tables: bool,
) -> anyhow::Result<PostgresDestination> {
    let destination = &config.destination;
    info!(
        "Connecting to warehouse: {}",
        mask_connection_password(&destination.connection_string)
    );

    let warehouse = PostgresDestination::connect(&destination.connection_string)
        .await
        .context("Failed to connect to warehouse")?
        .with_schema(destination.schema.clone())
        .with_batch_size(destination.batch_size);

    if create_tables {
        warehouse
            .ensure_tables()
            .await
            .context("Failed to create warehouse tables")?;
    }
    Ok(warehouse)
}

/// Load every artifact in `input_dir` into `destination`.
pub async fn load<D: Destination>(destination: D, input_dir: &Path) -> LoadReport {
    info!("Loading artifacts from {}", input_dir.display());
    WarehouseLoader::new(destination, input_dir)
        .load_all()
        .await
}

/// Turn a report with failed entities into an error naming them.
pub fn check_load_report(report: &LoadReport) -> anyhow::Result<()> {
    if report.is_success() {
        info!(
            "Load complete: {} rows written across {} tables",
            report.rows_written(),
            report.entities.len()
        );
        return Ok(());
    }

    let failures: Vec<String> = report
        .failures()
        .map(|(entity, e)| format!("{}: {e}", entity.table_name()))
        .collect();
    for failure in &failures {
        error!("Load failed for {}", failure);
    }
    bail!(
        "{} of {} table loads failed: {}",
        failures.len(),
        report.entities.len(),
        failures.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamedata_core::{DefectPass, Entity};
    use gamedata_loader::MemoryDestination;
    use tempfile::TempDir;

    fn small_config(output_dir: &Path) -> RunConfig {
        RunConfig {
            players: 20,
            events: 100,
            purchases: 40,
            output_dir: output_dir.to_path_buf(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_generate_reports_passes() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset, report) = generate(&small_config(temp_dir.path())).unwrap();

        assert_eq!(dataset.events.len(), 102);
        assert_eq!(report.passes.len(), DefectPass::ALL.len());
    }

    #[test]
    fn test_invalid_config_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("raw");
        let config = RunConfig {
            purchases: -5,
            ..small_config(&out)
        };

        let err = generate(&config).unwrap_err();
        assert!(format!("{err:#}").contains("purchases"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_check_load_report() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset, _) = generate(&small_config(temp_dir.path())).unwrap();
        publish(&dataset, temp_dir.path()).unwrap();

        let report = load(MemoryDestination::new(), temp_dir.path()).await;
        assert!(check_load_report(&report).is_ok());

        let failing = MemoryDestination::new().fail_writes_to(Entity::Purchases);
        let report = load(failing, temp_dir.path()).await;
        let err = check_load_report(&report).unwrap_err();
        assert!(err.to_string().contains("purchases"));
    }
}
