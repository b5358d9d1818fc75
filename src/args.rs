//! CLI argument definitions for the gamedata binary.

use clap::Args;
use gamedata_loader::WarehouseArgs;
use std::path::PathBuf;

/// Generation arguments. Unset values fall back to the run config.
#[derive(Args, Clone, Debug, Default)]
pub struct GenerateArgs {
    /// Run config file (.toml, .yaml or .yml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Random seed (same seed = same artifacts)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of players to generate
    #[arg(long, allow_negative_numbers = true)]
    pub players: Option<i64>,

    /// Number of events to generate, before duplication
    #[arg(long, allow_negative_numbers = true)]
    pub events: Option<i64>,

    /// Number of purchases to generate
    #[arg(long, allow_negative_numbers = true)]
    pub purchases: Option<i64>,

    /// First day of the campaign window (YYYY-MM-DD)
    #[arg(long)]
    pub campaign_start: Option<chrono::NaiveDate>,

    /// Last day of the campaign window (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub campaign_end: Option<chrono::NaiveDate>,

    /// Directory the CSV artifacts are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Leave the output directory and the warehouse untouched
    ///
    /// `generate` validates and generates but writes nothing. `run` also
    /// publishes to a scratch directory and loads it into an in-memory
    /// destination, which is discarded afterwards.
    #[arg(long)]
    pub dry_run: bool,
}

/// Load arguments.
#[derive(Args, Clone, Debug, Default)]
pub struct LoadArgs {
    /// Run config file (.toml, .yaml or .yml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the CSV artifacts (defaults to the config's output_dir)
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    #[command(flatten)]
    pub warehouse: WarehouseArgs,
}
