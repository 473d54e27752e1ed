// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planarity and face-normal analysis of tessellated surfaces.

use nalgebra::{Point3, Vector3};
use sim3dm_core::{MeshData, MeshFace};

use crate::polygon::newell_normal;

/// Unit normal of one mesh face, from its winding order.
pub fn face_normal(mesh: &MeshData, face: &MeshFace) -> Vector3<f64> {
    let points = mesh.face_points(face);
    newell_normal(&points)
}

/// Area-weighted plane of a mesh: centroid of its vertices plus the summed
/// face cross products, normalized.
///
/// Returns `None` for meshes whose faces cancel out or carry no area.
pub fn mesh_plane(mesh: &MeshData) -> Option<(Point3<f64>, Vector3<f64>)> {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() {
        return None;
    }

    let mut weighted = Vector3::<f64>::zeros();
    for face in &mesh.faces {
        let points = mesh.face_points(face);
        let origin = points[0];
        for i in 1..points.len() - 1 {
            let a = points[i] - origin;
            let b = points[i + 1] - origin;
            weighted += a.cross(&b);
        }
    }

    let len = weighted.norm();
    if len <= 1e-12 {
        return None;
    }

    let mut centroid = Vector3::<f64>::zeros();
    for v in &mesh.vertices {
        centroid += v.coords;
    }
    centroid /= mesh.vertices.len() as f64;

    Some((Point3::from(centroid), weighted / len))
}

/// Whether every vertex of the mesh lies within `tolerance` of its
/// area-weighted plane.
pub fn is_planar_mesh(mesh: &MeshData, tolerance: f64) -> bool {
    let Some((origin, normal)) = mesh_plane(mesh) else {
        return false;
    };
    mesh.vertices
        .iter()
        .all(|v| (v - origin).dot(&normal).abs() <= tolerance)
}

/// Whether all face normals of the mesh agree within the angular tolerance
/// (radians).
pub fn faces_share_normal(mesh: &MeshData, angle_tolerance: f64) -> bool {
    let mut reference: Option<Vector3<f64>> = None;
    let cos_limit = angle_tolerance.cos();

    for face in &mesh.faces {
        let normal = face_normal(mesh, face);
        match reference {
            None => reference = Some(normal),
            Some(r) => {
                if r.dot(&normal) < cos_limit {
                    return false;
                }
            }
        }
    }
    reference.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    /// Two coplanar quads side by side on z = 2
    fn flat_mesh() -> MeshData {
        MeshData::new(
            vec![
                p(0.0, 0.0, 2.0),
                p(1.0, 0.0, 2.0),
                p(2.0, 0.0, 2.0),
                p(0.0, 1.0, 2.0),
                p(1.0, 1.0, 2.0),
                p(2.0, 1.0, 2.0),
            ],
            vec![MeshFace::Quad([0, 1, 4, 3]), MeshFace::Quad([1, 2, 5, 4])],
        )
    }

    /// Quads meeting at a ridge
    fn folded_mesh() -> MeshData {
        MeshData::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 1.0),
                p(2.0, 0.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(1.0, 1.0, 1.0),
                p(2.0, 1.0, 0.0),
            ],
            vec![MeshFace::Quad([0, 1, 4, 3]), MeshFace::Quad([1, 2, 5, 4])],
        )
    }

    #[test]
    fn flat_mesh_is_planar() {
        assert!(is_planar_mesh(&flat_mesh(), 0.01));
    }

    #[test]
    fn folded_mesh_is_not_planar() {
        assert!(!is_planar_mesh(&folded_mesh(), 0.01));
    }

    #[test]
    fn flat_mesh_plane_recovers_height_and_normal() {
        let (origin, normal) = mesh_plane(&flat_mesh()).unwrap();
        assert_relative_eq!(origin.z, 2.0, epsilon = 1e-9);
        assert_relative_eq!(normal.z.abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn shared_normal_detection() {
        let one_degree = 1.0_f64.to_radians();
        assert!(faces_share_normal(&flat_mesh(), one_degree));
        assert!(!faces_share_normal(&folded_mesh(), one_degree));
    }

    #[test]
    fn empty_mesh_has_no_plane() {
        assert!(mesh_plane(&MeshData::default()).is_none());
        assert!(!is_planar_mesh(&MeshData::default(), 0.01));
    }
}
