#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for the heritage building survey enrichment pipeline.
//!
//! Survey rows come in as [`SourceRecord`]s, leave as [`EnrichedPoint`]s,
//! and every match carries explicit provenance ([`MatchMethod`],
//! [`Confidence`], numeric score) so the viewer can expose how trustworthy
//! each heritage attribution is.

use serde::{Deserialize, Serialize};

/// One row from the raw survey table, all fields as free text.
///
/// Blank cells are empty strings. The identifier is fallback-generated from
/// the row number at load time when the source cell is blank, so re-running
/// the pipeline on the same input yields the same IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Stable per-feature identifier (`properties.id` downstream).
    pub id: String,
    /// Building name / short description.
    pub name: String,
    /// Street address as surveyed.
    pub address: String,
    /// Raw combined GPS text field (e.g. `"33.9189 S, 18.4233 E"`).
    pub gps: String,
    /// ERF (cadastral parcel) number, opaque text.
    pub erf: String,
    /// ERF size, free text (may contain units or "+"-joined sums).
    pub erf_size: String,
    /// Municipal valuation estimate, free text (currency symbols kept).
    pub valuation: String,
    /// Rates estimate, free text.
    pub rates: String,
    /// Zoning designation.
    pub zoning: String,
    /// Current usage.
    pub usage: String,
    /// Registered owner.
    pub owner: String,
    /// Heritage significance notes from the surveyor.
    pub significance: String,
}

/// How a heritage candidate was attached to a survey row.
///
/// Tiers are mutually exclusive and ordered by confidence: exact spatial
/// containment beats any fuzzy score, and the two fuzzy tiers differ only
/// by threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    /// The projected survey point fell inside the candidate polygon.
    ExactSpatial,
    /// Fuzzy address score reached the high threshold.
    AddressFuzzy,
    /// Fuzzy address score reached only the low threshold.
    AddressFuzzyLow,
}

impl MatchMethod {
    /// Snapshot string for this method (`matchMethod` property).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactSpatial => "exact-spatial",
            Self::AddressFuzzy => "address-fuzzy",
            Self::AddressFuzzyLow => "address-fuzzy-low",
        }
    }

    /// Confidence tier implied by the method.
    #[must_use]
    pub const fn confidence(self) -> Confidence {
        match self {
            Self::ExactSpatial => Confidence::High,
            Self::AddressFuzzy => Confidence::Medium,
            Self::AddressFuzzyLow => Confidence::Low,
        }
    }
}

/// Confidence tier attached to every matched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Exact spatial containment.
    High,
    /// Fuzzy match at or above the high threshold.
    Medium,
    /// Fuzzy match at or above the low threshold only.
    Low,
}

impl Confidence {
    /// Snapshot string for this tier (`matchConfidence` property).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A heritage attribution merged into an output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeritageMatch {
    /// How the candidate was selected.
    pub method: MatchMethod,
    /// Fuzzy score, or 100 for exact spatial containment.
    pub score: u32,
    /// Confidence tier implied by the method.
    pub confidence: Confidence,
    /// The candidate feature's full property bag, carried opaquely.
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// One output feature: the survey row, its point geometry, and the
/// heritage attribution when one was found.
///
/// Coordinates are the original unprojected lon/lat; the Web-Mercator
/// projection is a matching aid only and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPoint {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// The originating survey row.
    pub record: SourceRecord,
    /// Heritage attribution, `None` when no candidate matched.
    pub heritage: Option<HeritageMatch>,
}

impl EnrichedPoint {
    /// Whether a heritage candidate was attached to this row.
    #[must_use]
    pub const fn has_heritage_match(&self) -> bool {
        self.heritage.is_some()
    }
}

/// Row counters reported after a completed run so an operator can
/// sanity-check match coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Rows read from the survey table.
    pub total_rows: u64,
    /// Rows dropped because the GPS field failed to parse.
    pub skipped_rows: u64,
    /// Rows that received a heritage attribution at any tier.
    pub matched_rows: u64,
}
