// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry payloads carried by scene objects.
//!
//! One tagged union covers every payload kind the converter understands;
//! the dispatch over it happens exactly once, at the top of the converter.

use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A mesh face: triangle or quad, indexing into [`MeshData::vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFace {
    Triangle([u32; 3]),
    Quad([u32; 4]),
}

impl MeshFace {
    pub fn indices(&self) -> &[u32] {
        match self {
            MeshFace::Triangle(idx) => idx,
            MeshFace::Quad(idx) => idx,
        }
    }
}

/// An indexed tri/quad mesh, welded: coincident corners share a vertex index.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<MeshFace>,
}

impl MeshData {
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<MeshFace>) -> Self {
        Self { vertices, faces }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The corner points of one face, in winding order.
    pub fn face_points(&self, face: &MeshFace) -> SmallVec<[Point3<f64>; 4]> {
        face.indices()
            .iter()
            .map(|&i| self.vertices[i as usize])
            .collect()
    }

    /// Whether the mesh bounds a closed volume: every undirected edge is
    /// shared by exactly two faces. Welded indices make this a pure
    /// index-topology check, no tolerance involved.
    pub fn is_closed(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }

        let mut edge_use: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        for face in &self.faces {
            let idx = face.indices();
            for i in 0..idx.len() {
                let a = idx[i];
                let b = idx[(i + 1) % idx.len()];
                let key = if a < b { (a, b) } else { (b, a) };
                *edge_use.entry(key).or_insert(0) += 1;
            }
        }

        edge_use.values().all(|&count| count == 2)
    }
}

/// A boundary edge of a trimmed face, sampled as a point run.
///
/// Linear edges carry two points; arcs and splines carry enough interior
/// samples to measure their deviation from the chord.
#[derive(Debug, Clone)]
pub struct EdgeCurve {
    pub points: Vec<Point3<f64>>,
}

impl EdgeCurve {
    /// A straight edge between two points.
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self {
            points: vec![start, end],
        }
    }

    pub fn start(&self) -> Point3<f64> {
        self.points[0]
    }

    pub fn end(&self) -> Point3<f64> {
        self.points[self.points.len() - 1]
    }

    /// Whether every interior sample lies within `tolerance` of the chord
    /// from start to end.
    pub fn is_linear(&self, tolerance: f64) -> bool {
        if self.points.len() <= 2 {
            return true;
        }

        let start = self.start();
        let chord = self.end() - start;
        let chord_len = chord.norm();

        // Degenerate chord: linear only if the whole edge collapses to a point
        if chord_len <= tolerance {
            return self
                .points
                .iter()
                .all(|p| (p - start).norm() <= tolerance);
        }

        let dir = chord / chord_len;
        self.points[1..self.points.len() - 1].iter().all(|p| {
            let v = p - start;
            (v - dir * v.dot(&dir)).norm() <= tolerance
        })
    }
}

/// One trimmed face of a surface patch or solid body.
#[derive(Debug, Clone)]
pub struct PatchFace {
    /// Display tessellation of the trimmed surface. `None` when the source
    /// file was saved without surface-display data.
    pub render_mesh: Option<MeshData>,
    /// Analytic boundary edges of the trim
    pub edges: Vec<EdgeCurve>,
}

impl PatchFace {
    pub fn new(render_mesh: MeshData, edges: Vec<EdgeCurve>) -> Self {
        Self {
            render_mesh: Some(render_mesh),
            edges,
        }
    }
}

/// A profile extruded along a direction vector.
#[derive(Debug, Clone)]
pub struct Extrusion {
    /// Planar outer profile loop, in 3D
    pub profile: Vec<Point3<f64>>,
    /// Planar hole loops inside the profile
    pub holes: Vec<Vec<Point3<f64>>>,
    /// Extrusion vector; its length is the extrusion depth
    pub direction: Vector3<f64>,
    /// Whether both ends are capped, making the extrusion a solid
    pub capped: bool,
}

impl Extrusion {
    pub fn is_solid(&self) -> bool {
        self.capped
    }
}

/// The geometry payload of a scene object.
#[derive(Debug, Clone)]
pub enum Geometry {
    Mesh(MeshData),
    Extrusion(Extrusion),
    /// A single trimmed boundary surface, not closed
    SurfacePatch(PatchFace),
    /// Several trimmed faces joined into one open body
    MultiPatchBody(Vec<PatchFace>),
    /// A closed body bounded by trimmed faces
    SolidBody(Vec<PatchFace>),
    /// Any payload kind the converter does not understand (curves, points,
    /// annotations, ...); carries the source type name for reporting
    Other { kind: String },
}

impl Geometry {
    /// Whether the payload's reported topology bounds a closed volume.
    pub fn is_closed_volume(&self) -> bool {
        match self {
            Geometry::Mesh(mesh) => mesh.is_closed(),
            Geometry::Extrusion(extrusion) => extrusion.is_solid(),
            Geometry::SolidBody(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    /// Closed tetrahedron over four vertices.
    fn tetrahedron() -> MeshData {
        MeshData::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(0.0, 0.0, 1.0),
            ],
            vec![
                MeshFace::Triangle([0, 2, 1]),
                MeshFace::Triangle([0, 1, 3]),
                MeshFace::Triangle([1, 2, 3]),
                MeshFace::Triangle([0, 3, 2]),
            ],
        )
    }

    #[test]
    fn tetrahedron_is_closed() {
        assert!(tetrahedron().is_closed());
    }

    #[test]
    fn open_mesh_is_not_closed() {
        let mut mesh = tetrahedron();
        mesh.faces.pop();
        assert!(!mesh.is_closed());
    }

    #[test]
    fn straight_edge_is_linear() {
        let edge = EdgeCurve::line(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
        assert!(edge.is_linear(0.01));
    }

    #[test]
    fn sampled_arc_is_not_linear() {
        let edge = EdgeCurve {
            points: vec![p(0.0, 0.0, 0.0), p(5.0, 2.0, 0.0), p(10.0, 0.0, 0.0)],
        };
        assert!(!edge.is_linear(0.01));
        // A tolerance larger than the bulge accepts the same edge
        assert!(edge.is_linear(2.5));
    }

    #[test]
    fn closed_volume_report_by_payload() {
        assert!(Geometry::Mesh(tetrahedron()).is_closed_volume());
        assert!(!Geometry::Mesh(MeshData::default()).is_closed_volume());
        assert!(Geometry::SolidBody(Vec::new()).is_closed_volume());
        assert!(!Geometry::Other {
            kind: "Curve".to_string()
        }
        .is_closed_volume());
    }
}
