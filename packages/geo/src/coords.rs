//! GPS text parsing for survey rows.
//!
//! Survey spreadsheets carry coordinates in many hand-typed shapes:
//! - Plain decimals: `"18.4233, -33.9189"`
//! - Degree + hemisphere: `"33.9189° S, 18.4233° E"`
//! - Reversed axis order: `"33.9189 S, 18.4233 E"` or `"-33.9189, 118.4233"`
//!
//! This module normalizes all of these into an ordered `(longitude,
//! latitude)` pair, or rejects the field entirely so the row can be
//! skipped and counted.

use regex::Regex;
use std::sync::LazyLock;

/// Leading signed decimal with optional degree symbol and hemisphere letter.
static COORD_HALF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+-]?\d+(?:\.\d+)?)\s*°?\s*([NSEW])?").expect("valid regex")
});

/// Which axis a hemisphere letter pins a value to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

/// One comma-separated half of the GPS field, sign already forced by its
/// hemisphere letter when one was present.
#[derive(Debug, Clone, Copy)]
struct Half {
    value: f64,
    hemisphere: Option<char>,
}

impl Half {
    const fn axis(self) -> Option<Axis> {
        match self.hemisphere {
            Some('N' | 'S') => Some(Axis::Latitude),
            Some('E' | 'W') => Some(Axis::Longitude),
            _ => None,
        }
    }
}

/// Parses one half: leading signed decimal, optional `°`, optional
/// hemisphere letter. A hemisphere letter overrides any written sign
/// (S/W negative, N/E positive).
fn parse_half(text: &str) -> Option<Half> {
    let caps = COORD_HALF_RE.captures(text.trim())?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;
    let hemisphere = caps
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_uppercase());

    let value = match hemisphere {
        Some('S' | 'W') => -number.abs(),
        Some('N' | 'E') => number.abs(),
        _ => number,
    };

    Some(Half { value, hemisphere })
}

/// Parses a free-form GPS field into an ordered `(longitude, latitude)`
/// pair in degrees.
///
/// Axis assignment:
/// - Hemisphere letters pin the axes regardless of written order, so
///   `"33.91 S, 18.42 E"` and `"18.42 E, 33.91 S"` parse identically.
/// - Without hemisphere letters the halves are taken as `(lon, lat)`,
///   swapped only when the first magnitude is ≤ 90 and the second is
///   > 90. Two plain values both ≤ 90 are genuinely ambiguous and are
///   passed through as written; the dataset is a single southern-
///   hemisphere municipality, so this is an accepted limitation.
/// - A latitude whose half carried no hemisphere letter is forced
///   negative (same southern-hemisphere assumption).
///
/// Returns `None` when fewer than two non-empty comma-separated halves
/// exist, when either half has no leading number, or when the final
/// latitude magnitude exceeds 90 or longitude magnitude exceeds 180.
#[must_use]
pub fn parse_gps(raw: &str) -> Option<(f64, f64)> {
    let mut halves = raw.split(',').map(str::trim).filter(|p| !p.is_empty());
    let a = parse_half(halves.next()?)?;
    let b = parse_half(halves.next()?)?;

    let any_hemisphere = a.hemisphere.is_some() || b.hemisphere.is_some();

    let (lon_half, lat_half) = if a.axis() == Some(Axis::Latitude) || b.axis() == Some(Axis::Longitude)
    {
        (b, a)
    } else if !any_hemisphere && a.value.abs() <= 90.0 && b.value.abs() > 90.0 {
        (b, a)
    } else {
        (a, b)
    };

    let longitude = lon_half.value;
    let latitude = if lat_half.hemisphere.is_some() {
        lat_half.value
    } else {
        -lat_half.value.abs()
    };

    if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
        return None;
    }

    Some((longitude, latitude))
}
