// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # sim3dm Geometry Reconstruction
//!
//! Reduces arbitrary CAD surface and solid payloads to planar
//! polygon-with-holes records suitable for physical simulation, using
//! earcutr triangulation and nalgebra for the vector math.
//!
//! The entry point is [`GeometryConverter`], which dispatches once over the
//! scene's geometry payload union and applies one reconstruction rule per
//! payload kind: direct face extraction for meshes, profile tessellation
//! for extrusions, analytic edge-join reconstruction for planar surface
//! patches, and naked-edge stitching for solids — with a meshed fallback
//! wherever the analytic topology cannot be resolved.

pub mod analysis;
pub mod convert;
pub mod error;
pub mod extrusion;
pub mod grid;
pub mod polyface;
pub mod polygon;
pub mod polyline;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use convert::GeometryConverter;
pub use error::{Error, Result};
pub use extrusion::extrusion_to_mesh;
pub use grid::{mesh_face_samples, polygon_grid_samples, SamplePoint};
pub use polyface::PolyFace;
pub use polygon::{dedup_vertices, newell_normal, Polygon3D};
pub use polyline::{join_segments, Polyline3D};
pub use triangulation::{project_to_2d, triangulate_polygon, triangulate_polygon_with_holes};
