//! Survey column schema resolution.
//!
//! Survey spreadsheets are keyed by human-readable header text that has
//! drifted across revisions ("GPS Co-ordinates", "GPS Coordinates", plain
//! "GPS"). Rather than looking columns up by header string per access,
//! the header row is resolved once against a fixed alias table; a missing
//! mandatory column is a fatal startup error, not a silent empty string.

use heritage_map_models::SourceRecord;

use crate::EnrichError;

const ID_ALIASES: &[&str] = &["id", "no", "record no"];
const NAME_ALIASES: &[&str] = &["name", "name & description", "name and description", "building name"];
const ADDRESS_ALIASES: &[&str] = &["address", "street address", "physical address"];
const GPS_ALIASES: &[&str] = &["gps", "gps coordinates", "gps co-ordinates", "coordinates"];
const ERF_ALIASES: &[&str] = &["erf", "erf no", "erf number"];
const ERF_SIZE_ALIASES: &[&str] = &["erf size", "erf size m2", "erf size m²", "size"];
const VALUATION_ALIASES: &[&str] = &["valuation", "municipal valuation", "estimated value"];
const RATES_ALIASES: &[&str] = &["rates", "estimated rates", "monthly rates"];
const ZONING_ALIASES: &[&str] = &["zoning", "zone"];
const USAGE_ALIASES: &[&str] = &["usage", "current usage", "current use"];
const OWNER_ALIASES: &[&str] = &["owner", "registered owner"];
const SIGNIFICANCE_ALIASES: &[&str] = &["significance", "heritage significance"];

/// Column positions resolved from the survey header row.
///
/// GPS, address, and name are mandatory; everything else defaults to
/// empty text per row when the column is absent.
#[derive(Debug, Clone)]
pub struct SurveySchema {
    name: usize,
    address: usize,
    gps: usize,
    id: Option<usize>,
    erf: Option<usize>,
    erf_size: Option<usize>,
    valuation: Option<usize>,
    rates: Option<usize>,
    zoning: Option<usize>,
    usage: Option<usize>,
    owner: Option<usize>,
    significance: Option<usize>,
}

impl SurveySchema {
    /// Resolves the header row against the alias table.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::MissingColumn`] when a mandatory column
    /// (GPS, address, name) cannot be found under any known alias.
    pub fn resolve(headers: &csv::StringRecord) -> Result<Self, EnrichError> {
        let canonical: Vec<String> = headers.iter().map(canonical_header).collect();

        let find = |aliases: &[&str]| {
            canonical
                .iter()
                .position(|header| aliases.contains(&header.as_str()))
        };

        let name = find(NAME_ALIASES).ok_or_else(|| EnrichError::MissingColumn("name".to_owned()))?;
        let address =
            find(ADDRESS_ALIASES).ok_or_else(|| EnrichError::MissingColumn("address".to_owned()))?;
        let gps = find(GPS_ALIASES).ok_or_else(|| EnrichError::MissingColumn("GPS".to_owned()))?;

        Ok(Self {
            name,
            address,
            gps,
            id: find(ID_ALIASES),
            erf: find(ERF_ALIASES),
            erf_size: find(ERF_SIZE_ALIASES),
            valuation: find(VALUATION_ALIASES),
            rates: find(RATES_ALIASES),
            zoning: find(ZONING_ALIASES),
            usage: find(USAGE_ALIASES),
            owner: find(OWNER_ALIASES),
            significance: find(SIGNIFICANCE_ALIASES),
        })
    }

    /// Builds a [`SourceRecord`] from one data row.
    ///
    /// `row_number` is the 1-based data row position, used to generate a
    /// deterministic fallback identifier when the ID cell is blank or the
    /// column is missing entirely.
    #[must_use]
    pub fn record(&self, row: &csv::StringRecord, row_number: u64) -> SourceRecord {
        let id = optional_cell(row, self.id);
        let id = if id.is_empty() {
            format!("rec-{row_number}")
        } else {
            id
        };

        SourceRecord {
            id,
            name: cell(row, self.name),
            address: cell(row, self.address),
            gps: cell(row, self.gps),
            erf: optional_cell(row, self.erf),
            erf_size: optional_cell(row, self.erf_size),
            valuation: optional_cell(row, self.valuation),
            rates: optional_cell(row, self.rates),
            zoning: optional_cell(row, self.zoning),
            usage: optional_cell(row, self.usage),
            owner: optional_cell(row, self.owner),
            significance: optional_cell(row, self.significance),
        }
    }
}

/// Header text reduced to a comparable form: trimmed, lower-cased,
/// whitespace collapsed.
fn canonical_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell(row: &csv::StringRecord, index: usize) -> String {
    row.get(index).unwrap_or("").trim().to_owned()
}

fn optional_cell(row: &csv::StringRecord, index: Option<usize>) -> String {
    index.map_or_else(String::new, |i| cell(row, i))
}
