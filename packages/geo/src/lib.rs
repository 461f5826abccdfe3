#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry primitives for the enrichment pipeline.
//!
//! Parses free-form survey GPS text into lon/lat pairs, projects them to
//! planar Web-Mercator meters, and tests projected points against polygon
//! rings (exterior + holes). All containment math happens in the projected
//! plane so it stays consistent with the projected inventory polygons.

pub mod coords;
pub mod mercator;
pub mod polygon;
