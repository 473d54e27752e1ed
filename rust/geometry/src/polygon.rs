// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon-with-holes records in 3D space.

use nalgebra::{Point3, Vector3};

/// Newell's method normal over an ordered loop, normalized.
///
/// Falls back to +Z for degenerate loops so downstream projections stay
/// finite; callers detect degeneracy through the polygon area instead.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    if n < 3 {
        return Vector3::new(0.0, 0.0, 1.0);
    }

    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    let len = normal.norm();
    if len > 1e-12 {
        normal / len
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    }
}

/// Signed-free area of an ordered coplanar loop.
pub fn loop_area(points: &[Point3<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let normal = newell_normal(points);
    let origin = points[0];
    let mut cross_sum = Vector3::<f64>::zeros();
    for i in 1..points.len() {
        let a = points[i] - origin;
        let b = points[(i + 1) % points.len()] - origin;
        cross_sum += a.cross(&b);
    }
    0.5 * cross_sum.dot(&normal).abs()
}

/// Remove consecutive vertices that coincide within the tolerance.
///
/// The comparison wraps around, so a loop whose last point repeats the
/// first (the closing duplicate left by polyline joining) loses the repeat.
pub fn dedup_vertices(points: &[Point3<f64>], tolerance: f64) -> Vec<Point3<f64>> {
    points
        .iter()
        .enumerate()
        .filter(|(i, pt)| {
            let prev = if *i == 0 { points.len() - 1 } else { i - 1 };
            nalgebra::distance(*pt, &points[prev]) > tolerance
        })
        .map(|(_, pt)| *pt)
        .collect()
}

/// An ordered outer boundary plus zero or more hole loops, with a derived
/// unit normal.
///
/// Invariants: the boundary holds at least 3 non-duplicate points, and no
/// hole vertex coincides with a boundary vertex within the construction
/// tolerance — the reconstruction algorithms route violators to the meshed
/// fallback instead of building a polygon from them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Polygon3D {
    boundary: Vec<Point3<f64>>,
    holes: Vec<Vec<Point3<f64>>>,
    normal: Vector3<f64>,
}

impl Polygon3D {
    pub fn new(boundary: Vec<Point3<f64>>) -> Self {
        let normal = newell_normal(&boundary);
        Self {
            boundary,
            holes: Vec::new(),
            normal,
        }
    }

    pub fn with_holes(boundary: Vec<Point3<f64>>, holes: Vec<Vec<Point3<f64>>>) -> Self {
        let normal = newell_normal(&boundary);
        Self {
            boundary,
            holes,
            normal,
        }
    }

    pub fn boundary(&self) -> &[Point3<f64>] {
        &self.boundary
    }

    pub fn holes(&self) -> &[Vec<Point3<f64>>] {
        &self.holes
    }

    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Outward unit normal derived from the boundary winding.
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Boundary area minus hole areas.
    pub fn area(&self) -> f64 {
        let hole_area: f64 = self.holes.iter().map(|h| loop_area(h)).sum();
        (loop_area(&self.boundary) - hole_area).max(0.0)
    }

    /// A point on the polygon's plane.
    pub fn plane_origin(&self) -> Point3<f64> {
        self.boundary[0]
    }
}
