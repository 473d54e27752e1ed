// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The geometry converter.
//!
//! Dispatches once over the scene payload union and applies one
//! reconstruction rule per variant. Analytic reconstruction is attempted
//! only where the boundary topology supports it; everything else degrades
//! to the meshed fallback rather than failing.

use std::cmp::Ordering;

use nalgebra::{distance, Point3};
use rayon::prelude::*;
use sim3dm_core::{Extrusion, Geometry, MeshData, PatchFace};
use tracing::warn;

use crate::analysis::{faces_share_normal, is_planar_mesh};
use crate::error::{Error, Result};
use crate::extrusion::extrusion_to_mesh;
use crate::polyface::PolyFace;
use crate::polygon::{dedup_vertices, loop_area, Polygon3D};
use crate::polyline::{join_segments, Polyline3D};

/// Every mesh face becomes one polygon straight from its vertex indices.
/// This is the terminal fallback path for all other payload kinds too.
pub fn mesh_to_polygons(mesh: &MeshData) -> Vec<Polygon3D> {
    mesh.faces
        .par_iter()
        .map(|face| Polygon3D::new(mesh.face_points(face).into_vec()))
        .collect()
}

/// Reduces CAD payloads to planar polygon-with-holes records.
pub struct GeometryConverter {
    tolerance: f64,
    /// Radians; used where sub-mesh normals are compared
    angle_tolerance: f64,
}

impl GeometryConverter {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            angle_tolerance: 1.0_f64.to_radians(),
        }
    }

    pub fn with_angle_tolerance_degrees(mut self, degrees: f64) -> Self {
        self.angle_tolerance = degrees.to_radians();
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Convert one payload to polygons. Payload kinds outside the union
    /// are an error; [`Self::convert_lenient`] downgrades that to a
    /// warning and an empty result.
    pub fn convert(&self, geometry: &Geometry) -> Result<Vec<Polygon3D>> {
        let polygons = match geometry {
            Geometry::Mesh(mesh) => mesh_to_polygons(mesh),
            Geometry::Extrusion(extrusion) => self.extrusion(extrusion)?,
            Geometry::SurfacePatch(face) => self.surface_patch(face)?,
            Geometry::MultiPatchBody(faces) => self.multi_patch_body(faces)?,
            Geometry::SolidBody(faces) => self.solid_body(faces)?,
            Geometry::Other { kind } => {
                return Err(Error::UnsupportedObjectType(kind.clone()));
            }
        };
        Ok(self.drop_zero_area(polygons))
    }

    /// Like [`Self::convert`], but unsupported payload kinds are skipped
    /// with a warning instead of raising.
    pub fn convert_lenient(&self, geometry: &Geometry) -> Result<Vec<Polygon3D>> {
        match self.convert(geometry) {
            Err(Error::UnsupportedObjectType(kind)) => {
                warn!(kind = %kind, "unsupported object type is ignored");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn drop_zero_area(&self, polygons: Vec<Polygon3D>) -> Vec<Polygon3D> {
        let min_area = self.tolerance * self.tolerance;
        polygons
            .into_iter()
            .filter(|polygon| {
                if polygon.area() <= min_area {
                    warn!("zero-area polygon dropped");
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    fn extrusion(&self, extrusion: &Extrusion) -> Result<Vec<Polygon3D>> {
        let mesh = extrusion_to_mesh(extrusion, self.tolerance)?;
        Ok(mesh_to_polygons(&mesh))
    }

    /// Single-face, non-solid surface patch.
    fn surface_patch(&self, face: &PatchFace) -> Result<Vec<Polygon3D>> {
        let mesh = face.render_mesh.as_ref().ok_or(Error::MeshExtraction)?;

        // Any arc or spline edge disqualifies analytic reconstruction:
        // corners sampled off unrelated arcs would read as real ones.
        let curved = face.edges.iter().any(|e| !e.is_linear(self.tolerance));

        // 3- and 4-vertex tessellations are already simple
        if curved || mesh.vertices.len() <= 4 {
            return Ok(vec![self.stitched_boundary(mesh)?]);
        }

        let segments: Vec<_> = face.edges.iter().map(|e| (e.start(), e.end())).collect();
        let polylines = join_segments(&segments, self.tolerance);

        match polylines.len() {
            0 => Ok(mesh_to_polygons(mesh)),
            // One polyline: a single boundary, no holes
            1 => {
                let boundary = dedup_vertices(&polylines[0].points, self.tolerance);
                if boundary.len() < 3 {
                    return Err(Error::DegenerateBoundary {
                        tolerance: self.tolerance,
                    });
                }
                Ok(vec![Polygon3D::new(boundary)])
            }
            // More than one: hole candidates
            _ => match self.polygon_from_loops(&polylines)? {
                Some(polygon) => Ok(vec![polygon]),
                None => Ok(mesh_to_polygons(mesh)),
            },
        }
    }

    /// Multiple loops: the largest encloses, the rest are holes.
    /// `Ok(None)` means the topology could not be resolved from the loops
    /// alone and the caller should fall back to meshing.
    fn polygon_from_loops(&self, polylines: &[Polyline3D]) -> Result<Option<Polygon3D>> {
        if polylines.iter().any(|pl| !pl.is_closed(self.tolerance)) {
            warn!("open line chains left after edge joining; geometry will be meshed");
            return Ok(None);
        }

        let mut ranked: Vec<(f64, Vec<Point3<f64>>)> = polylines
            .iter()
            .map(|pl| {
                let points = dedup_vertices(&pl.points, self.tolerance);
                (loop_area(&points), points)
            })
            .collect();

        if ranked.iter().any(|(_, points)| points.len() < 3) {
            warn!("loop collapsed below 3 points after dedup; geometry will be meshed");
            return Ok(None);
        }

        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        let boundary = ranked.remove(0).1;
        let holes: Vec<Vec<Point3<f64>>> = ranked.into_iter().map(|(_, points)| points).collect();

        let touching = holes.iter().flatten().any(|hole_pt| {
            boundary
                .iter()
                .any(|boundary_pt| distance(hole_pt, boundary_pt) <= self.tolerance)
        });
        if touching {
            warn!("a hole touches the boundary of the face; geometry will be meshed");
            return Ok(None);
        }

        Ok(Some(Polygon3D::with_holes(boundary, holes)))
    }

    /// Multi-face, non-solid body: each split face is reconstructed on its
    /// own planarity.
    fn multi_patch_body(&self, faces: &[PatchFace]) -> Result<Vec<Polygon3D>> {
        let mut polygons = Vec::new();
        for face in faces {
            polygons.extend(self.patch_face(face)?);
        }
        Ok(polygons)
    }

    /// One face of a multi-face body: planar faces are rebuilt from the
    /// naked edges of their tessellation (holes included); curved faces
    /// keep their raw tessellation.
    fn patch_face(&self, face: &PatchFace) -> Result<Vec<Polygon3D>> {
        let mesh = face.render_mesh.as_ref().ok_or(Error::MeshExtraction)?;
        if !is_planar_mesh(mesh, self.tolerance) {
            return Ok(mesh_to_polygons(mesh));
        }

        let face_polygons = mesh_to_polygons(mesh);
        let polyface = PolyFace::from_faces(&face_polygons, self.tolerance);
        let polylines = join_segments(&polyface.naked_edges(), self.tolerance);

        match polylines.len() {
            0 => Ok(face_polygons),
            1 => {
                let boundary = dedup_vertices(&polylines[0].points, self.tolerance);
                if boundary.len() < 3 {
                    return Err(Error::DegenerateBoundary {
                        tolerance: self.tolerance,
                    });
                }
                Ok(vec![Polygon3D::new(boundary)])
            }
            _ => match self.polygon_from_loops(&polylines)? {
                Some(polygon) => Ok(vec![polygon]),
                None => Ok(face_polygons),
            },
        }
    }

    /// Closed solid body: planar facets are merged into one boundary
    /// polygon each; curved facets keep their raw tessellation. Hole
    /// detection is not attempted on solids.
    fn solid_body(&self, faces: &[PatchFace]) -> Result<Vec<Polygon3D>> {
        let mut polygons = Vec::new();
        for face in faces {
            let mesh = face.render_mesh.as_ref().ok_or(Error::MeshExtraction)?;
            if faces_share_normal(mesh, self.angle_tolerance) {
                polygons.push(self.stitched_boundary(mesh)?);
            } else {
                polygons.extend(mesh_to_polygons(mesh));
            }
        }
        Ok(polygons)
    }

    /// Stitch the naked edges of a tessellation back into one boundary
    /// polyline and emit a single polygon from it.
    fn stitched_boundary(&self, mesh: &MeshData) -> Result<Polygon3D> {
        let face_polygons = mesh_to_polygons(mesh);
        let polyface = PolyFace::from_faces(&face_polygons, self.tolerance);
        let polylines = join_segments(&polyface.naked_edges(), self.tolerance);

        let outline = polylines
            .iter()
            .map(|pl| (loop_area(&pl.points), pl))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map(|(_, pl)| pl)
            .ok_or(Error::DegenerateBoundary {
                tolerance: self.tolerance,
            })?;

        let boundary = dedup_vertices(&outline.points, self.tolerance);
        if boundary.len() < 3 {
            return Err(Error::DegenerateBoundary {
                tolerance: self.tolerance,
            });
        }
        Ok(Polygon3D::new(boundary))
    }
}
