// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyline reconstruction from unordered line segments.

use nalgebra::{distance, Point3};
use std::collections::VecDeque;

/// An ordered run of points. Closed polylines repeat the first point as
/// the last one.
#[derive(Debug, Clone)]
pub struct Polyline3D {
    pub points: Vec<Point3<f64>>,
}

impl Polyline3D {
    /// Whether the run closes back on its start within the tolerance.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.points.len() > 3
            && distance(&self.points[0], &self.points[self.points.len() - 1]) <= tolerance
    }
}

/// Join unordered segments into polylines by matching endpoints within the
/// tolerance.
///
/// Every input segment ends up in exactly one polyline; segments that match
/// nothing come back as two-point open polylines. Seeds are taken in input
/// order, which keeps the result deterministic for a given segment list.
pub fn join_segments(segments: &[(Point3<f64>, Point3<f64>)], tolerance: f64) -> Vec<Polyline3D> {
    let mut used = vec![false; segments.len()];
    let mut polylines = Vec::new();

    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;

        let mut chain: VecDeque<Point3<f64>> = VecDeque::new();
        chain.push_back(segments[seed].0);
        chain.push_back(segments[seed].1);

        // Grow the chain from both ends until it closes or nothing attaches.
        // A closed chain stops accepting segments: further endpoints meeting
        // it at a vertex belong to a different loop.
        let mut closed = false;
        while !closed {
            let mut extended = false;
            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }
                let front = chain[0];
                let back = chain[chain.len() - 1];

                if distance(&back, &seg.0) <= tolerance {
                    chain.push_back(seg.1);
                } else if distance(&back, &seg.1) <= tolerance {
                    chain.push_back(seg.0);
                } else if distance(&front, &seg.1) <= tolerance {
                    chain.push_front(seg.0);
                } else if distance(&front, &seg.0) <= tolerance {
                    chain.push_front(seg.1);
                } else {
                    continue;
                }
                used[i] = true;
                extended = true;
                if chain.len() > 3 && distance(&chain[0], &chain[chain.len() - 1]) <= tolerance {
                    closed = true;
                    break;
                }
            }
            if !extended {
                break;
            }
        }

        polylines.push(Polyline3D {
            points: chain.into_iter().collect(),
        });
    }

    polylines
}
