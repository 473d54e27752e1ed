// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed conversion configuration.
//!
//! The raw config file is schema-validated by an external collaborator;
//! this module only defines the already-validated shape the pipeline
//! reads. Every role is an explicit optional field, not a string-keyed
//! lookup.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sim3dm_core::LayerTree;

use crate::elements::{FaceKind, ObjectKind};
use crate::error::{Error, Result};

/// Grid spacing and offset settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub spacing_x: f64,
    pub spacing_y: f64,
    /// Distance to move samples away from the parent face along its normal
    pub offset: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing_x: 1.0,
            spacing_y: 1.0,
            offset: 0.0,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-layer conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Explicit simulation face kind for everything on this layer
    pub face_kind: Option<FaceKind>,
    /// Explicit non-face object kind (aperture, door, shade)
    pub object_kind: Option<ObjectKind>,
    /// Identifier of a material in the external material table
    pub material: Option<String>,
    /// Whether this layer's settings extend to its descendant layers
    #[serde(default = "default_true")]
    pub include_child_layers: bool,
    /// Layer-specific grid settings, overriding the global ones
    pub grid_settings: Option<GridSettings>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            face_kind: None,
            object_kind: None,
            material: None,
            include_child_layers: true,
            grid_settings: None,
        }
    }
}

/// Binding of canonical simulation roles to actual layer names in the
/// scene. Absence is an explicit `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleMapping {
    pub wall: Option<String>,
    pub roof: Option<String>,
    pub floor: Option<String>,
    pub air_wall: Option<String>,
    pub aperture: Option<String>,
    pub door: Option<String>,
    pub shade: Option<String>,
    pub grid: Option<String>,
    pub room: Option<String>,
    /// Present only to be excluded from face import
    pub view: Option<String>,
}

impl RoleMapping {
    /// Face kind a layer gets through the role table, if any.
    pub fn face_kind_of(&self, layer_name: &str) -> Option<FaceKind> {
        let named = |role: &Option<String>| role.as_deref() == Some(layer_name);
        if named(&self.wall) {
            Some(FaceKind::Wall)
        } else if named(&self.roof) {
            Some(FaceKind::Roof)
        } else if named(&self.floor) {
            Some(FaceKind::Floor)
        } else if named(&self.air_wall) {
            Some(FaceKind::AirWall)
        } else {
            None
        }
    }

    /// Object kind a layer gets through the role table, if any.
    pub fn object_kind_of(&self, layer_name: &str) -> Option<ObjectKind> {
        let named = |role: &Option<String>| role.as_deref() == Some(layer_name);
        if named(&self.aperture) {
            Some(ObjectKind::Aperture)
        } else if named(&self.door) {
            Some(ObjectKind::Door)
        } else if named(&self.shade) {
            Some(ObjectKind::Shade)
        } else {
            None
        }
    }

    /// Layers reserved for grids, rooms and views never take part in face
    /// import.
    pub fn is_reserved(&self, layer_name: &str) -> bool {
        [&self.grid, &self.room, &self.view]
            .iter()
            .any(|role| role.as_deref() == Some(layer_name))
    }

    fn entries(&self) -> [(&'static str, &Option<String>); 10] {
        [
            ("wall", &self.wall),
            ("roof", &self.roof),
            ("floor", &self.floor),
            ("air_wall", &self.air_wall),
            ("aperture", &self.aperture),
            ("door", &self.door),
            ("shade", &self.shade),
            ("grid", &self.grid),
            ("room", &self.room),
            ("view", &self.view),
        ]
    }
}

/// The validated conversion configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-layer settings, keyed by layer name
    pub layers: FxHashMap<String, LayerConfig>,
    pub roles: RoleMapping,
    /// Global grid settings, overridable per layer
    pub grid: GridSettings,
}

impl Config {
    pub fn layer(&self, name: &str) -> Option<&LayerConfig> {
        self.layers.get(name)
    }

    /// Grid settings for a layer: its own when set, the global ones
    /// otherwise.
    pub fn grid_settings_for(&self, layer_name: &str) -> GridSettings {
        self.layer(layer_name)
            .and_then(|cfg| cfg.grid_settings)
            .unwrap_or(self.grid)
    }

    /// Structural validation against the scene: every configured layer and
    /// every mapped role must name a layer that exists.
    pub fn validate_against(&self, tree: &LayerTree<'_>) -> Result<()> {
        let mut layer_names: Vec<&String> = self.layers.keys().collect();
        layer_names.sort(); // deterministic error for multiple offenders
        for name in layer_names {
            if !tree.contains(name) {
                return Err(Error::UnknownConfigLayer(name.clone()));
            }
        }

        for (role, layer) in self.roles.entries() {
            if let Some(layer) = layer {
                if !tree.contains(layer) {
                    return Err(Error::MissingRoleLayer {
                        role,
                        layer: layer.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
