// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # sim3dm Processing Pipeline
//!
//! Turns a CAD scene into a building-performance-simulation model: typed
//! surface elements, closed room volumes and analysis sensor grids,
//! aggregated into one [`Model`] record that an external collaborator
//! serializes.
//!
//! The pipeline walks the scene's layers in file order, converts each
//! object's geometry through `sim3dm-geometry`, classifies the resulting
//! polygons against the user's layer configuration, and keeps every
//! generated identifier deterministic so two runs over the same input
//! produce byte-identical output.

pub mod config;
pub mod elements;
pub mod error;
pub mod grids;
pub mod material;
pub mod model;
pub mod naming;
pub mod rooms;

pub use config::{Config, GridSettings, LayerConfig, RoleMapping};
pub use elements::{classify, ElementKind, FaceKind, ObjectKind, SimulationElement};
pub use error::{Error, Result};
pub use grids::SensorGrid;
pub use material::{Material, MaterialTable};
pub use model::{convert_scene, ConvertOptions, Model};
pub use rooms::Room;
