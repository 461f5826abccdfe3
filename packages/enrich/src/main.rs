#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI entry point for the heritage survey enrichment pipeline.
//!
//! Converts the raw survey CSV plus the optional heritage inventory
//! `GeoJSON` into the static snapshot the map viewer consumes.

use std::path::PathBuf;

use clap::Parser;
use heritage_map_enrich::{PipelineConfig, run};
use heritage_map_matching::MatchThresholds;

#[derive(Parser)]
#[command(name = "heritage_map_enrich", about = "Heritage survey enrichment pipeline")]
struct Cli {
    /// Survey CSV file (mandatory).
    #[arg(long)]
    survey: PathBuf,

    /// Heritage inventory GeoJSON file. When absent or missing on disk,
    /// rows are emitted without enrichment.
    #[arg(long)]
    inventory: Option<PathBuf>,

    /// Snapshot output path.
    #[arg(long, default_value = "data/heritage_snapshot.geojson")]
    output: PathBuf,

    /// Minimum fuzzy score for a medium-confidence match.
    #[arg(long)]
    high_threshold: Option<u32>,

    /// Minimum fuzzy score for a low-confidence match.
    #[arg(long)]
    low_threshold: Option<u32>,

    /// Maximum number of survey rows to process (useful for testing).
    #[arg(long)]
    limit: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut thresholds = MatchThresholds::default();
    if let Some(high) = cli.high_threshold {
        thresholds.high = high;
    }
    if let Some(low) = cli.low_threshold {
        thresholds.low = low;
    }

    if let Some(parent) = cli.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let config = PipelineConfig {
        survey_path: cli.survey,
        inventory_path: cli.inventory,
        output_path: cli.output,
        thresholds,
        limit: cli.limit,
    };

    let summary = run(&config)?;

    log::info!(
        "Snapshot written to {}: {} rows in, {} skipped, {} matched",
        config.output_path.display(),
        summary.total_rows,
        summary.skipped_rows,
        summary.matched_rows
    );

    Ok(())
}
