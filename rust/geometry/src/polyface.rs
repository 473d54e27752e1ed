// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face collections with edge matching.
//!
//! Edges are keyed by their tolerance-quantized endpoints; an edge used by
//! exactly one face loop is naked. Naked edges come back in first-seen
//! order so downstream joining stays deterministic.

use nalgebra::Point3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::polygon::Polygon3D;

type QuantizedPoint = (i64, i64, i64);
type EdgeKey = (QuantizedPoint, QuantizedPoint);

fn quantize(point: &Point3<f64>, tolerance: f64) -> QuantizedPoint {
    let scale = 1.0 / tolerance;
    (
        (point.x * scale).round() as i64,
        (point.y * scale).round() as i64,
        (point.z * scale).round() as i64,
    )
}

fn edge_key(a: QuantizedPoint, b: QuantizedPoint) -> EdgeKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

struct EdgeEntry {
    count: u32,
    /// Original (unquantized) endpoints of the first occurrence
    first_seen: (Point3<f64>, Point3<f64>),
}

/// A set of faces joined by shared edges.
pub struct PolyFace {
    /// Keyed edge uses, in first-seen order
    edges: Vec<(EdgeKey, EdgeEntry)>,
    face_count: usize,
}

impl PolyFace {
    /// Join faces on matching edges. Both boundary and hole loops of each
    /// face contribute edges.
    pub fn from_faces(faces: &[Polygon3D], tolerance: f64) -> Self {
        let mut index: FxHashMap<EdgeKey, usize> = FxHashMap::default();
        let mut edges: Vec<(EdgeKey, EdgeEntry)> = Vec::new();

        for face in faces {
            let mut loops: SmallVec<[&[Point3<f64>]; 4]> = SmallVec::new();
            loops.push(face.boundary());
            for hole in face.holes() {
                loops.push(hole);
            }

            for loop_points in loops {
                let n = loop_points.len();
                if n < 2 {
                    continue;
                }
                for i in 0..n {
                    let a = loop_points[i];
                    let b = loop_points[(i + 1) % n];
                    let qa = quantize(&a, tolerance);
                    let qb = quantize(&b, tolerance);
                    if qa == qb {
                        continue; // collapsed edge
                    }
                    let key = edge_key(qa, qb);
                    match index.get(&key) {
                        Some(&slot) => edges[slot].1.count += 1,
                        None => {
                            index.insert(key, edges.len());
                            edges.push((
                                key,
                                EdgeEntry {
                                    count: 1,
                                    first_seen: (a, b),
                                },
                            ));
                        }
                    }
                }
            }
        }

        Self {
            edges,
            face_count: faces.len(),
        }
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Edges belonging to exactly one face, in first-seen order.
    pub fn naked_edges(&self) -> Vec<(Point3<f64>, Point3<f64>)> {
        self.edges
            .iter()
            .filter(|(_, entry)| entry.count == 1)
            .map(|(_, entry)| entry.first_seen)
            .collect()
    }

    pub fn naked_edge_count(&self) -> usize {
        self.edges.iter().filter(|(_, entry)| entry.count == 1).count()
    }

    /// A polyface with faces and no naked edges bounds a closed volume.
    pub fn is_closed(&self) -> bool {
        self.face_count > 0 && self.naked_edge_count() == 0
    }
}
