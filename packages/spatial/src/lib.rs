#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory heritage inventory index for survey enrichment.
//!
//! Loads Polygon/MultiPolygon features from the heritage inventory
//! `GeoJSON`, projects every ring to Web-Mercator meters, builds an R-tree
//! of per-candidate bounding boxes, and answers point-containment queries.
//! The envelope query guarantees the cheap box test precedes every exact
//! ray-cast containment test. Candidates are also kept in feature order so
//! the fuzzy fallback scan is deterministic for a fixed input file.

use std::path::Path;

use geo::MultiPolygon;
use geojson::GeoJson;
use rstar::{AABB, RTree, RTreeObject};

use heritage_map_geo::mercator;
use heritage_map_geo::polygon::{ProjectedPolygon, Ring};
use heritage_map_matching::MatchTarget;

/// Errors raised while loading the inventory resource.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Reading the inventory file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The inventory file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// The inventory document is valid `GeoJSON` but not a feature
    /// collection.
    #[error("inventory is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

/// Property keys used to pull matching text out of inventory features.
///
/// Resolved once at load time; everything else in the feature's property
/// bag is carried opaquely into the snapshot.
#[derive(Debug, Clone)]
pub struct InventorySchema {
    /// Property holding the candidate's street address.
    pub address_key: String,
    /// Property holding the candidate's site name.
    pub site_name_key: String,
}

impl Default for InventorySchema {
    fn default() -> Self {
        Self {
            address_key: "address".to_owned(),
            site_name_key: "siteName".to_owned(),
        }
    }
}

/// One inventory polygon record, geometry already projected.
#[derive(Debug, Clone)]
pub struct HeritageCandidate {
    /// Constituent polygons (exterior + holes each), projected meters.
    polygons: Vec<ProjectedPolygon>,
    /// Pre-normalized matching text for the fuzzy fallback.
    pub target: MatchTarget,
    /// The feature's full property bag, carried opaquely.
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl HeritageCandidate {
    /// Exact containment: the point must sit inside at least one
    /// constituent polygon (inside its exterior, outside its holes).
    #[must_use]
    pub fn contains(&self, point: [f64; 2]) -> bool {
        self.polygons.iter().any(|p| p.contains(point))
    }
}

/// R-tree entry: a candidate's envelope plus its position in load order.
struct CandidateEntry {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for CandidateEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built index over all usable inventory candidates.
///
/// Constructed once per run and read-only afterwards.
pub struct CandidateIndex {
    rtree: RTree<CandidateEntry>,
    candidates: Vec<HeritageCandidate>,
}

impl CandidateIndex {
    /// Reads and indexes an inventory `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the file cannot be read or is not a
    /// `GeoJSON` feature collection.
    pub fn load(path: &Path, schema: &InventorySchema) -> Result<Self, IndexError> {
        let text = std::fs::read_to_string(path)?;
        let index = Self::from_geojson_str(&text, schema)?;
        log::info!(
            "Loaded {} heritage candidates from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Parses and indexes inventory `GeoJSON` text.
    ///
    /// Features with no usable geometry, or with neither address nor site
    /// name, are excluded (counted and logged).
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the text is not a `GeoJSON` feature
    /// collection.
    pub fn from_geojson_str(text: &str, schema: &InventorySchema) -> Result<Self, IndexError> {
        let geojson: GeoJson = text.parse()?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(IndexError::NotFeatureCollection);
        };

        let mut candidates = Vec::new();
        let mut excluded = 0_usize;

        for feature in collection.features {
            let attributes = feature.properties.unwrap_or_default();

            let address = attributes
                .get(&schema.address_key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or("");
            let site_name = attributes
                .get(&schema.site_name_key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or("");
            let target = MatchTarget::new(address, site_name);

            let polygons = feature
                .geometry
                .and_then(|geometry| project_geometry(&geometry))
                .unwrap_or_default();

            if polygons.is_empty() || target.is_empty() {
                excluded += 1;
                log::debug!("Excluding unusable inventory feature (address={address:?})");
                continue;
            }

            candidates.push(HeritageCandidate {
                polygons,
                target,
                attributes,
            });
        }

        if excluded > 0 {
            log::warn!("Excluded {excluded} inventory features with no geometry or match text");
        }

        let entries = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| CandidateEntry {
                index,
                envelope: candidate_envelope(candidate),
            })
            .collect();

        Ok(Self {
            rtree: RTree::bulk_load(entries),
            candidates,
        })
    }

    /// Finds a candidate whose geometry contains the projected point.
    ///
    /// The R-tree envelope query rejects far-away candidates before any
    /// exact test runs. First containment found wins; the inventory is
    /// assumed overlap-free, so no "best overlap" ordering is attempted.
    #[must_use]
    pub fn find_containing(&self, point: [f64; 2]) -> Option<&HeritageCandidate> {
        let query = AABB::from_point(point);
        self.rtree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| &self.candidates[entry.index])
            .find(|candidate| candidate.contains(point))
    }

    /// All candidates in inventory feature order, for the deterministic
    /// fuzzy fallback scan.
    #[must_use]
    pub fn candidates(&self) -> &[HeritageCandidate] {
        &self.candidates
    }

    /// Number of indexed candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the index holds no candidates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Converts a `GeoJSON` geometry into projected polygons.
/// Handles both `Polygon` and `MultiPolygon`; everything else is unusable.
fn project_geometry(geometry: &geojson::Geometry) -> Option<Vec<ProjectedPolygon>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    let multi_polygon = match geo_geom {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return None,
    };

    Some(
        multi_polygon
            .0
            .into_iter()
            .map(|polygon| ProjectedPolygon {
                exterior: project_ring(polygon.exterior()),
                holes: polygon.interiors().iter().map(project_ring).collect(),
            })
            .filter(|polygon| polygon.exterior.len() >= 3)
            .collect(),
    )
}

/// Projects one lon/lat ring to Web-Mercator meters.
fn project_ring(ring: &geo::LineString<f64>) -> Ring {
    ring.coords()
        .map(|coord| mercator::project(coord.x, coord.y))
        .collect()
}

/// Axis-aligned bounding box over every ring point of every polygon.
fn candidate_envelope(candidate: &HeritageCandidate) -> AABB<[f64; 2]> {
    let mut min = [f64::INFINITY, f64::INFINITY];
    let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];

    for polygon in &candidate.polygons {
        for ring in std::iter::once(&polygon.exterior).chain(polygon.holes.iter()) {
            for &[x, y] in ring {
                min[0] = min[0].min(x);
                min[1] = min[1].min(y);
                max[0] = max[0].max(x);
                max[1] = max[1].max(y);
            }
        }
    }

    AABB::from_corners(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstar::Envelope as _;

    /// Two-feature inventory: a square block with a courtyard hole, and a
    /// disjoint square block further east.
    fn inventory_geojson() -> String {
        serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [
                            [
                                [18.420, -33.920], [18.424, -33.920],
                                [18.424, -33.916], [18.420, -33.916],
                                [18.420, -33.920]
                            ],
                            [
                                [18.4215, -33.9185], [18.4225, -33.9185],
                                [18.4225, -33.9175], [18.4215, -33.9175],
                                [18.4215, -33.9185]
                            ]
                        ]
                    },
                    "properties": {
                        "address": "121 Long Street",
                        "siteName": "Old Mutual Building",
                        "status": "Declared",
                        "grade": "IIIA"
                    }
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [
                            [
                                [18.430, -33.920], [18.434, -33.920],
                                [18.434, -33.916], [18.430, -33.916],
                                [18.430, -33.920]
                            ]
                        ]
                    },
                    "properties": {
                        "address": "7 Plein Street",
                        "siteName": "",
                        "status": "Graded"
                    }
                }
            ]
        })
        .to_string()
    }

    fn index() -> CandidateIndex {
        CandidateIndex::from_geojson_str(&inventory_geojson(), &InventorySchema::default())
            .expect("valid inventory")
    }

    #[test]
    fn loads_candidates_in_feature_order() {
        let index = index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.candidates()[0].target.address, "121 long street");
        assert_eq!(index.candidates()[1].target.address, "7 plein street");
    }

    #[test]
    fn finds_containing_candidate() {
        let index = index();
        let point = mercator::project(18.421, -33.919);
        let candidate = index.find_containing(point).expect("contained");
        assert_eq!(candidate.target.address, "121 long street");
    }

    #[test]
    fn courtyard_hole_is_not_contained() {
        let index = index();
        let point = mercator::project(18.422, -33.918);
        assert!(index.find_containing(point).is_none());
    }

    #[test]
    fn far_away_point_matches_nothing() {
        let index = index();
        let point = mercator::project(18.5, -34.0);
        assert!(index.find_containing(point).is_none());
    }

    #[test]
    fn containment_implies_envelope_membership() {
        // The bbox prefilter may produce false positives but never false
        // negatives: every contained point must sit inside the envelope.
        let index = index();
        let candidate = &index.candidates()[0];
        let envelope = candidate_envelope(candidate);

        for lon_step in 0..=20 {
            for lat_step in 0..=20 {
                let lon = 18.419 + f64::from(lon_step) * 0.000_35;
                let lat = -33.921 + f64::from(lat_step) * 0.000_35;
                let point = mercator::project(lon, lat);
                if candidate.contains(point) {
                    assert!(envelope.contains_point(&point));
                }
            }
        }
    }

    #[test]
    fn excludes_features_without_geometry_or_text() {
        let text = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": { "address": "1 Adderley Street" }
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [18.0, -33.0], [18.1, -33.0],
                            [18.1, -33.1], [18.0, -33.1], [18.0, -33.0]
                        ]]
                    },
                    "properties": { "address": "", "siteName": "" }
                }
            ]
        })
        .to_string();

        let index = CandidateIndex::from_geojson_str(&text, &InventorySchema::default())
            .expect("valid geojson");
        assert!(index.is_empty());
    }

    #[test]
    fn rejects_non_feature_collection() {
        let result = CandidateIndex::from_geojson_str(
            "{\"type\": \"Point\", \"coordinates\": [18.0, -33.0]}",
            &InventorySchema::default(),
        );
        assert!(matches!(result, Err(IndexError::NotFeatureCollection)));
    }
}
