//! Static snapshot output for the map viewer.
//!
//! Emits one `GeoJSON` FeatureCollection: every enriched row becomes a
//! Point feature with a flat property bag, and a top-level `metadata`
//! object carries the run counters and input identifiers. Output is
//! deterministic for identical inputs except the `generatedAt` timestamp.

use std::path::Path;

use heritage_map_models::{EnrichedPoint, RunSummary};

use crate::EnrichError;

/// Builds the snapshot document with an injected generation timestamp.
///
/// Split from [`write`] so determinism can be tested with a fixed
/// timestamp.
#[must_use]
pub fn build_document(
    points: &[EnrichedPoint],
    summary: RunSummary,
    survey_source: &str,
    inventory_source: Option<&str>,
    generated_at: &str,
) -> serde_json::Value {
    let features: Vec<serde_json::Value> = points.iter().map(feature).collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "metadata": {
            "generatedAt": generated_at,
            "surveySource": survey_source,
            "inventorySource": inventory_source,
            "totalRows": summary.total_rows,
            "skippedRows": summary.skipped_rows,
            "matchedRows": summary.matched_rows,
        },
        "features": features,
    })
}

/// Serializes the snapshot to `path`, stamped with the current time.
///
/// # Errors
///
/// Returns [`EnrichError`] if serialization or the file write fails.
pub fn write(
    path: &Path,
    points: &[EnrichedPoint],
    summary: RunSummary,
    survey_source: &str,
    inventory_source: Option<&str>,
) -> Result<(), EnrichError> {
    let generated_at = chrono::Utc::now().to_rfc3339();
    let document = build_document(points, summary, survey_source, inventory_source, &generated_at);

    std::fs::write(path, serde_json::to_string(&document)?)?;
    log::info!("Wrote {} features to {}", points.len(), path.display());
    Ok(())
}

/// One Point feature with the flat property bag the viewer expects.
///
/// Source fields always come first and win on key collision with the
/// heritage attribute bag; match-provenance fields are authoritative and
/// inserted last.
fn feature(point: &EnrichedPoint) -> serde_json::Value {
    let record = &point.record;
    let mut properties = serde_json::Map::new();

    let text = |value: &str| serde_json::Value::String(value.to_owned());
    properties.insert("id".to_owned(), text(&record.id));
    properties.insert("name".to_owned(), text(&record.name));
    properties.insert("address".to_owned(), text(&record.address));
    properties.insert("gps".to_owned(), text(&record.gps));
    properties.insert("erf".to_owned(), text(&record.erf));
    properties.insert("erfSize".to_owned(), text(&record.erf_size));
    properties.insert("valuation".to_owned(), text(&record.valuation));
    properties.insert("rates".to_owned(), text(&record.rates));
    properties.insert("zoning".to_owned(), text(&record.zoning));
    properties.insert("usage".to_owned(), text(&record.usage));
    properties.insert("owner".to_owned(), text(&record.owner));
    properties.insert("significance".to_owned(), text(&record.significance));

    properties.insert(
        "hasHeritageMatch".to_owned(),
        serde_json::Value::Bool(point.has_heritage_match()),
    );

    if let Some(heritage) = &point.heritage {
        for (key, value) in &heritage.attributes {
            if !properties.contains_key(key) {
                properties.insert(key.clone(), value.clone());
            }
        }

        properties.insert("matchMethod".to_owned(), text(heritage.method.as_str()));
        properties.insert(
            "matchScore".to_owned(),
            serde_json::Value::from(heritage.score),
        );
        properties.insert(
            "matchConfidence".to_owned(),
            text(heritage.confidence.as_str()),
        );
    }

    serde_json::json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [point.longitude, point.latitude],
        },
        "properties": properties,
    })
}
