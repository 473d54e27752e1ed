// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # sim3dm Core Scene Model
//!
//! The in-memory representation of a CAD scene: layers, objects and their
//! geometry payloads, plus the layer-hierarchy resolver.
//!
//! ## Overview
//!
//! This crate holds everything the conversion pipeline reads from a source
//! file, already materialized in memory:
//!
//! - **Scene**: layers with hierarchical paths and visibility, objects with
//!   a geometry payload and a layer reference
//! - **Geometry**: one tagged union over the supported payload kinds
//!   (mesh, extrusion, surface patch, multi-patch body, solid body)
//! - **LayerTree**: parent/child adjacency built once per scene, answering
//!   descendant-closure and effective-visibility queries
//!
//! No file I/O happens here; reading the source file and populating a
//! [`Scene`] is the job of an external collaborator.
//!
//! ## Quick Start
//!
//! ```rust
//! use sim3dm_core::{Layer, LayerTree, Scene, SceneSettings};
//!
//! let mut scene = Scene::new(SceneSettings::default());
//! scene.layers.push(Layer::new("walls"));
//!
//! let tree = LayerTree::build(&scene);
//! let objects = tree.objects_on("walls", true, true).unwrap();
//! assert!(objects.is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for scene metadata

pub mod error;
pub mod geometry;
pub mod layers;
pub mod scene;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use error::{Error, Result};
pub use geometry::{EdgeCurve, Extrusion, Geometry, MeshData, MeshFace, PatchFace};
pub use layers::LayerTree;
pub use scene::{Layer, Scene, SceneObject, SceneSettings, UnitSystem};
