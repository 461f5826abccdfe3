//! Ray-casting point-in-polygon tests over projected rings.
//!
//! A polygon is an exterior ring plus zero or more hole rings; a point is
//! contained when it is inside the exterior and inside no hole. Points
//! exactly on a boundary edge get implementation-defined results, which is
//! acceptable for this dataset.

/// A closed ring of projected `[x, y]` points.
pub type Ring = Vec<[f64; 2]>;

/// One polygon: exterior boundary plus interior exclusion rings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPolygon {
    /// Outer boundary ring.
    pub exterior: Ring,
    /// Hole rings; a point inside any of these is not contained.
    pub holes: Vec<Ring>,
}

impl ProjectedPolygon {
    /// Whether `point` lies inside the exterior ring and outside every
    /// hole ring.
    #[must_use]
    pub fn contains(&self, point: [f64; 2]) -> bool {
        ring_contains(&self.exterior, point)
            && !self.holes.iter().any(|hole| ring_contains(hole, point))
    }
}

/// Standard even-odd ray cast against one ring.
///
/// Degenerate (horizontal or zero-length) edges substitute a tiny epsilon
/// for the zero denominator instead of dividing by zero.
fn ring_contains(ring: &[[f64; 2]], [x, y]: [f64; 2]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];

        if (yi > y) != (yj > y) {
            let mut dy = yj - yi;
            if dy.abs() < f64::EPSILON {
                dy = f64::EPSILON;
            }
            if x < (xj - xi) * (y - yi) / dy + xi {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}
