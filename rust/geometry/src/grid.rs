// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor sampling: regular point/normal grids over faces.

use nalgebra::{Point2, Point3, Vector3};
use sim3dm_core::MeshData;

use crate::analysis::face_normal;
use crate::polygon::Polygon3D;
use crate::triangulation::{project_to_2d, project_to_2d_with_basis};

/// One sensor: a sample position with its facing direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SamplePoint {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// One sample per mesh face, at the face centroid, facing the face normal.
///
/// The sampling density is whatever the mesh density is; hand-meshing the
/// source object is the intended way to control grid resolution.
pub fn mesh_face_samples(mesh: &MeshData) -> Vec<SamplePoint> {
    mesh.faces
        .iter()
        .map(|face| {
            let points = mesh.face_points(face);
            let mut centroid = Vector3::<f64>::zeros();
            for p in &points {
                centroid += p.coords;
            }
            centroid /= points.len() as f64;
            SamplePoint {
                position: Point3::from(centroid),
                normal: face_normal(mesh, face),
            }
        })
        .collect()
}

/// Winding number of `(px, py)` with respect to `verts`; non-zero means
/// inside.
fn winding_number(px: f64, py: f64, verts: &[Point2<f64>]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let a = &verts[i];
        let b = &verts[(i + 1) % n];
        let cross = (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x);
        if a.y <= py {
            if b.y > py && cross > 0.0 {
                winding += 1;
            }
        } else if b.y <= py && cross < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Regular grid over a planar polygon: `spacing_x` x `spacing_y` cells laid
/// over the plane-projected bounding rectangle, keeping cell centers that
/// fall inside the boundary and outside every hole, offset along the
/// polygon normal.
///
/// Samples come back row-major from the bounding rectangle's minimum
/// corner, so the order is deterministic for a given polygon.
pub fn polygon_grid_samples(
    polygon: &Polygon3D,
    spacing_x: f64,
    spacing_y: f64,
    offset: f64,
) -> Vec<SamplePoint> {
    if spacing_x <= 0.0 || spacing_y <= 0.0 {
        return Vec::new();
    }

    let normal = polygon.normal();
    let (outer_2d, u_axis, v_axis, origin) = project_to_2d(polygon.boundary(), &normal);
    if outer_2d.len() < 3 {
        return Vec::new();
    }
    let holes_2d: Vec<Vec<Point2<f64>>> = polygon
        .holes()
        .iter()
        .map(|hole| project_to_2d_with_basis(hole, &u_axis, &v_axis, &origin))
        .collect();

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for p in &outer_2d {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let nx = ((max_x - min_x) / spacing_x).ceil().max(1.0) as usize;
    let ny = ((max_y - min_y) / spacing_y).ceil().max(1.0) as usize;

    let mut samples = Vec::new();
    for j in 0..ny {
        let cy = min_y + (j as f64 + 0.5) * spacing_y;
        for i in 0..nx {
            let cx = min_x + (i as f64 + 0.5) * spacing_x;

            if winding_number(cx, cy, &outer_2d) == 0 {
                continue;
            }
            if holes_2d.iter().any(|hole| winding_number(cx, cy, hole) != 0) {
                continue;
            }

            samples.push(SamplePoint {
                position: origin + u_axis * cx + v_axis * cy + normal * offset,
                normal,
            });
        }
    }
    samples
}
