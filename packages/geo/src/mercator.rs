//! Spherical Web-Mercator projection (EPSG:3857).
//!
//! The inventory polygons are tested in the projected plane, so survey
//! points are run through the same projection before containment checks.

/// Earth radius used by the spherical Web-Mercator projection, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Latitude bound beyond which the Mercator projection is undefined.
pub const MAX_LATITUDE_DEGREES: f64 = 85.051_128_78;

/// Projects geographic degrees to planar Web-Mercator meters.
///
/// Latitude is clamped to ±[`MAX_LATITUDE_DEGREES`] before projecting, so
/// there is no failure mode. Pure and deterministic.
#[must_use]
pub fn project(longitude: f64, latitude: f64) -> [f64; 2] {
    let latitude = latitude.clamp(-MAX_LATITUDE_DEGREES, MAX_LATITUDE_DEGREES);
    let x = EARTH_RADIUS_METERS * longitude.to_radians();
    let y = EARTH_RADIUS_METERS
        * (std::f64::consts::FRAC_PI_4 + latitude.to_radians() / 2.0)
            .tan()
            .ln();
    [x, y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_origin() {
        let [x, y] = project(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn projects_cape_town_to_known_meters() {
        let [x, y] = project(18.4233, -33.9189);
        assert!((x - 2_051_270.0).abs() < 1_000.0, "x was {x}");
        assert!((y - -4_019_016.0).abs() < 2_000.0, "y was {y}");
    }

    #[test]
    fn clamps_polar_latitudes() {
        let [_, y_pole] = project(0.0, 90.0);
        let [_, y_max] = project(0.0, MAX_LATITUDE_DEGREES);
        assert!(y_pole.is_finite());
        assert!((y_pole - y_max).abs() < 1e-6);
    }

    #[test]
    fn longitude_is_linear() {
        let [x180, _] = project(180.0, 0.0);
        let [x90, _] = project(90.0, 0.0);
        assert!((x180 - 2.0 * x90).abs() < 1e-6);
    }
}
