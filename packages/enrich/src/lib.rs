#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heritage survey enrichment pipeline.
//!
//! Reads the raw survey CSV, resolves its column schema, and runs every
//! row through the enrichment state machine: parse GPS (unparseable rows
//! are dropped and counted), project to Web-Mercator, try exact polygon
//! containment against the inventory index, fall back to fuzzy address
//! scoring, and emit one snapshot document for the viewer.
//!
//! Per-row problems never abort the batch; only a missing survey file, a
//! missing mandatory column, or a malformed inventory file is fatal, and
//! a fatal startup error writes no partial output.

pub mod schema;
pub mod snapshot;

use std::path::{Path, PathBuf};

use heritage_map_geo::{coords, mercator};
use heritage_map_matching::{MatchTarget, MatchThresholds, score};
use heritage_map_models::{EnrichedPoint, HeritageMatch, MatchMethod, RunSummary, SourceRecord};
use heritage_map_spatial::{CandidateIndex, HeritageCandidate, InventorySchema};

use crate::schema::SurveySchema;

/// Score recorded for an exact spatial containment match. Fuzzy scores
/// are unbounded in principle but sit far below this in practice.
const EXACT_MATCH_SCORE: u32 = 100;

/// Errors that abort a pipeline run before or during setup.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The mandatory survey file does not exist.
    #[error("survey file not found: {}", .0.display())]
    SurveyMissing(PathBuf),

    /// A mandatory survey column is absent under every known alias.
    #[error("survey is missing required column: {0}")]
    MissingColumn(String),

    /// The inventory file exists but could not be indexed.
    #[error("inventory error: {0}")]
    Inventory(#[from] heritage_map_spatial::IndexError),
}

/// Everything one pipeline run needs, resolved before any row is read.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Survey CSV path (mandatory input).
    pub survey_path: PathBuf,
    /// Heritage inventory `GeoJSON` path; `None` or a missing file
    /// degrades enrichment to "no match" for every row.
    pub inventory_path: Option<PathBuf>,
    /// Snapshot output path.
    pub output_path: PathBuf,
    /// Fuzzy tier thresholds.
    pub thresholds: MatchThresholds,
    /// Cap on survey rows processed (useful for testing).
    pub limit: Option<u64>,
}

/// Runs the full pipeline: load, enrich every row, write the snapshot.
///
/// # Errors
///
/// Returns [`EnrichError`] for fatal startup conditions (missing survey
/// file, missing mandatory column, malformed inventory) and for snapshot
/// write failures. Per-row problems are absorbed into the summary.
pub fn run(config: &PipelineConfig) -> Result<RunSummary, EnrichError> {
    if !config.survey_path.exists() {
        return Err(EnrichError::SurveyMissing(config.survey_path.clone()));
    }

    let records = load_survey(&config.survey_path, config.limit)?;
    log::info!(
        "Loaded {} survey rows from {}",
        records.len(),
        config.survey_path.display()
    );

    let index = load_inventory(config.inventory_path.as_deref())?;

    let mut summary = RunSummary::default();
    let mut points = Vec::with_capacity(records.len());

    for record in &records {
        summary.total_rows += 1;

        let Some(point) = enrich_record(record, index.as_ref(), config.thresholds) else {
            log::debug!("Skipping row {}: unparseable GPS {:?}", record.id, record.gps);
            summary.skipped_rows += 1;
            continue;
        };

        if point.has_heritage_match() {
            summary.matched_rows += 1;
        }
        points.push(point);
    }

    let survey_source = file_name(&config.survey_path);
    let inventory_source = config.inventory_path.as_deref().map(file_name);
    snapshot::write(
        &config.output_path,
        &points,
        summary,
        &survey_source,
        inventory_source.as_deref(),
    )?;

    log::info!(
        "Run complete: {} rows, {} skipped, {} matched",
        summary.total_rows,
        summary.skipped_rows,
        summary.matched_rows
    );

    Ok(summary)
}

/// Enriches one survey row.
///
/// Returns `None` when the GPS field is unparseable (the row is dropped
/// and counted by the caller). A row that merely fails to match heritage
/// data is still emitted, just without enrichment fields.
#[must_use]
pub fn enrich_record(
    record: &SourceRecord,
    index: Option<&CandidateIndex>,
    thresholds: MatchThresholds,
) -> Option<EnrichedPoint> {
    let (longitude, latitude) = coords::parse_gps(&record.gps)?;
    let projected = mercator::project(longitude, latitude);

    let heritage = index.and_then(|index| attribute(record, index, thresholds, projected));

    Some(EnrichedPoint {
        longitude,
        latitude,
        record: record.clone(),
        heritage,
    })
}

/// Selects at most one candidate for a row: exact containment first, then
/// the single best fuzzy score at or above the low threshold.
fn attribute(
    record: &SourceRecord,
    index: &CandidateIndex,
    thresholds: MatchThresholds,
    projected: [f64; 2],
) -> Option<HeritageMatch> {
    if let Some(candidate) = index.find_containing(projected) {
        return Some(heritage_match(
            MatchMethod::ExactSpatial,
            EXACT_MATCH_SCORE,
            candidate,
        ));
    }

    let target = MatchTarget::new(&record.address, &record.name);

    let mut best: Option<(u32, &HeritageCandidate)> = None;
    for candidate in index.candidates() {
        let candidate_score = score(&target, &candidate.target);
        // Strictly greater keeps the first candidate of a tie, so output
        // is stable for a fixed inventory ordering.
        if best.is_none_or(|(best_score, _)| candidate_score > best_score) {
            best = Some((candidate_score, candidate));
        }
    }

    let (best_score, candidate) = best?;
    let method = thresholds.classify(best_score)?;
    Some(heritage_match(method, best_score, candidate))
}

fn heritage_match(
    method: MatchMethod,
    score: u32,
    candidate: &HeritageCandidate,
) -> HeritageMatch {
    HeritageMatch {
        method,
        score,
        confidence: method.confidence(),
        attributes: candidate.attributes.clone(),
    }
}

/// Reads the survey CSV into source records, resolving the column schema
/// from the header row once.
fn load_survey(path: &Path, limit: Option<u64>) -> Result<Vec<SourceRecord>, EnrichError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let survey_schema = SurveySchema::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let row_number = records.len() as u64 + 1;
        records.push(survey_schema.record(&row, row_number));

        if let Some(limit) = limit
            && records.len() as u64 >= limit
        {
            log::info!("Reached row limit ({limit}), stopping survey load");
            break;
        }
    }

    Ok(records)
}

/// Loads the inventory index when a path was given and the file exists.
///
/// A missing file degrades the run to "no match" with a warning; a file
/// that exists but fails to parse is a fatal startup error.
fn load_inventory(path: Option<&Path>) -> Result<Option<CandidateIndex>, EnrichError> {
    let Some(path) = path else {
        log::info!("No inventory provided; rows will not be enriched");
        return Ok(None);
    };

    if !path.exists() {
        log::warn!(
            "Inventory file {} not found; rows will not be enriched",
            path.display()
        );
        return Ok(None);
    }

    let index = CandidateIndex::load(path, &InventorySchema::default())?;
    Ok(Some(index))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
