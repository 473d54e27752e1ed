// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene structure: layers, objects and file-level settings.

use crate::error::{Error, Result};
use crate::geometry::Geometry;

/// Unit system of the source file.
///
/// Only the unit systems the pipeline can hand to a simulation engine are
/// representable; anything else must be rejected while the scene is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitSystem {
    #[default]
    Meters,
    Millimeters,
    Centimeters,
    Feet,
    Inches,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Meters => "Meters",
            UnitSystem::Millimeters => "Millimeters",
            UnitSystem::Centimeters => "Centimeters",
            UnitSystem::Feet => "Feet",
            UnitSystem::Inches => "Inches",
        }
    }
}

/// File-level settings carried into the output model as metadata.
#[derive(Debug, Clone, Copy)]
pub struct SceneSettings {
    /// Linear tolerance, in scene units
    pub absolute_tolerance: f64,
    /// Angular tolerance, in degrees
    pub angle_tolerance_degrees: f64,
    pub unit_system: UnitSystem,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            absolute_tolerance: 0.01,
            angle_tolerance_degrees: 1.0,
            unit_system: UnitSystem::Meters,
        }
    }
}

/// A layer in the scene hierarchy.
///
/// `path` is the full hierarchical path from root to this layer; its last
/// entry is the layer's own name.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub path: Vec<String>,
    pub visible: bool,
    /// Name of a material assigned to the layer in the source file, if any
    pub material: Option<String>,
}

impl Layer {
    /// Create a root-level layer
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: vec![name.clone()],
            name,
            visible: true,
            material: None,
        }
    }

    /// Create a layer from its full root-to-leaf path
    pub fn with_path(path: Vec<String>) -> Self {
        let name = path.last().cloned().unwrap_or_default();
        Self {
            name,
            path,
            visible: true,
            material: None,
        }
    }
}

/// An object in the scene: a geometry payload on a layer.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// User-assigned name, if any
    pub name: Option<String>,
    /// Index into [`Scene::layers`]
    pub layer_index: usize,
    pub visible: bool,
    pub geometry: Geometry,
}

impl SceneObject {
    pub fn new(geometry: Geometry, layer_index: usize) -> Self {
        Self {
            name: None,
            layer_index,
            visible: true,
            geometry,
        }
    }

    /// Human-readable handle for error messages: the user name when present,
    /// otherwise the object's position in the scene.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("object #{index}"),
        }
    }
}

/// The scene: all layers and objects of the source file, read-only for the
/// remainder of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub settings: SceneSettings,
    pub layers: Vec<Layer>,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            layers: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Check that every object's layer reference resolves to a layer.
    pub fn validate(&self) -> Result<()> {
        for (i, obj) in self.objects.iter().enumerate() {
            if obj.layer_index >= self.layers.len() {
                return Err(Error::InvalidLayerReference {
                    object: obj.label(i),
                    index: obj.layer_index,
                });
            }
        }
        Ok(())
    }

    /// The layer an object sits on.
    pub fn layer_of(&self, obj: &SceneObject) -> Result<&Layer> {
        self.layers.get(obj.layer_index).ok_or_else(|| Error::InvalidLayerReference {
            object: obj.name.clone().unwrap_or_default(),
            index: obj.layer_index,
        })
    }
}
