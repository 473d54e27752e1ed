// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion tessellation - converting planar profiles to meshes.
//!
//! Extrusion profiles are never reconstructed analytically; the profile is
//! triangulated into caps and side quads and the result goes through the
//! mesh conversion rule.

use nalgebra::Point3;
use sim3dm_core::{Extrusion, MeshData, MeshFace};

use crate::error::{Error, Result};
use crate::polygon::newell_normal;
use crate::triangulation::{project_to_2d, project_to_2d_with_basis, triangulate_polygon_with_holes};

/// Tessellate an extrusion into an indexed tri/quad mesh: one quad per
/// profile edge, earcut caps at both ends when the extrusion is capped.
pub fn extrusion_to_mesh(extrusion: &Extrusion, tolerance: f64) -> Result<MeshData> {
    let outer = &extrusion.profile;
    if outer.len() < 3 {
        return Err(Error::InvalidExtrusion(
            "profile needs at least 3 points".to_string(),
        ));
    }
    if extrusion.holes.iter().any(|h| h.len() < 3) {
        return Err(Error::InvalidExtrusion(
            "profile hole with fewer than 3 points".to_string(),
        ));
    }

    let depth = extrusion.direction.norm();
    if depth <= tolerance {
        return Err(Error::InvalidExtrusion(
            "extrusion direction is zero".to_string(),
        ));
    }

    let profile_normal = newell_normal(outer);
    let up = profile_normal.dot(&extrusion.direction) > 0.0;

    // Bottom ring holds the outer loop then every hole loop; the top ring
    // repeats it shifted by the extrusion vector. Cap triangulation indices
    // line up with this layout.
    let ring: Vec<Point3<f64>> = outer
        .iter()
        .chain(extrusion.holes.iter().flatten())
        .copied()
        .collect();
    let ring_len = ring.len();

    let mut vertices = Vec::with_capacity(ring_len * 2);
    vertices.extend(ring.iter().copied());
    vertices.extend(ring.iter().map(|p| p + extrusion.direction));

    let mut faces = Vec::new();

    // Side walls, one quad per loop edge
    let mut loop_start = 0usize;
    let mut loops: Vec<usize> = vec![outer.len()];
    loops.extend(extrusion.holes.iter().map(|h| h.len()));
    for loop_len in loops {
        for i in 0..loop_len {
            let a = (loop_start + i) as u32;
            let b = (loop_start + (i + 1) % loop_len) as u32;
            let a_top = a + ring_len as u32;
            let b_top = b + ring_len as u32;
            let quad = if up {
                [a, b, b_top, a_top]
            } else {
                [b, a, a_top, b_top]
            };
            faces.push(MeshFace::Quad(quad));
        }
        loop_start += loop_len;
    }

    // Caps
    if extrusion.capped {
        let (outer_2d, u_axis, v_axis, origin) = project_to_2d(outer, &profile_normal);
        let holes_2d: Vec<_> = extrusion
            .holes
            .iter()
            .map(|hole| project_to_2d_with_basis(hole, &u_axis, &v_axis, &origin))
            .collect();

        let cap = triangulate_polygon_with_holes(&outer_2d, &holes_2d)?;

        for tri in cap.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as u32, tri[1] as u32, tri[2] as u32);
            let top = ring_len as u32;
            if up {
                // Cap triangles wind with the profile normal; the near cap
                // faces away from the extrusion, the far cap along it
                faces.push(MeshFace::Triangle([i0, i2, i1]));
                faces.push(MeshFace::Triangle([top + i0, top + i1, top + i2]));
            } else {
                faces.push(MeshFace::Triangle([i0, i1, i2]));
                faces.push(MeshFace::Triangle([top + i0, top + i2, top + i1]));
            }
        }
    }

    Ok(MeshData::new(vertices, faces))
}
