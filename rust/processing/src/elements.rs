// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulation elements and their classification.

use serde::{Deserialize, Serialize};
use sim3dm_core::Layer;
use sim3dm_geometry::{Polygon3D, Vector3};
use tracing::warn;

use crate::config::{Config, LayerConfig};
use crate::error::{Error, Result};
use crate::material::MaterialTable;

/// Sub-type of an opaque face element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceKind {
    Wall,
    Roof,
    Floor,
    AirWall,
}

/// Non-face element kinds assignable through the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Aperture,
    Door,
    Shade,
}

/// What a classified polygon became.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Face(FaceKind),
    Aperture,
    Door,
    Shade,
}

impl From<ObjectKind> for ElementKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Aperture => ElementKind::Aperture,
            ObjectKind::Door => ElementKind::Door,
            ObjectKind::Shade => ElementKind::Shade,
        }
    }
}

/// One classified surface element. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationElement {
    pub identifier: String,
    pub display_name: String,
    pub polygon: Polygon3D,
    pub kind: ElementKind,
    pub material: Option<String>,
}

/// Face sub-type from the normal's inclination: within 60 degrees of +Z
/// is a roof, within 60 degrees of -Z a floor, everything between a wall.
pub fn face_kind_from_normal(normal: &Vector3<f64>) -> FaceKind {
    let angle = normal.z.clamp(-1.0, 1.0).acos().to_degrees();
    if angle <= 60.0 {
        FaceKind::Roof
    } else if angle >= 120.0 {
        FaceKind::Floor
    } else {
        FaceKind::Wall
    }
}

/// Classify one reconstructed polygon.
///
/// Kind resolution order: the layer's explicit face kind, then its
/// explicit object kind, then the role table, then the polygon normal.
/// `entry` is the layer configuration that governs this polygon (the
/// object's own layer or a configured ancestor).
pub fn classify(
    polygon: Polygon3D,
    layer: &Layer,
    entry: Option<&LayerConfig>,
    entry_layer_name: &str,
    config: &Config,
    materials: &MaterialTable,
    identifier: String,
    display_name: String,
) -> Result<SimulationElement> {
    let kind = if let Some(face_kind) = entry.and_then(|cfg| cfg.face_kind) {
        ElementKind::Face(face_kind)
    } else if let Some(object_kind) = entry.and_then(|cfg| cfg.object_kind) {
        object_kind.into()
    } else if let Some(face_kind) = config.roles.face_kind_of(&layer.name) {
        ElementKind::Face(face_kind)
    } else if let Some(object_kind) = config.roles.object_kind_of(&layer.name) {
        object_kind.into()
    } else {
        ElementKind::Face(face_kind_from_normal(&polygon.normal()))
    };

    let material = resolve_material(layer, entry, entry_layer_name, materials)?;

    Ok(SimulationElement {
        identifier,
        display_name,
        polygon,
        kind,
        material,
    })
}

/// A material named in the config must exist; one inherited from the
/// layer's own material reference degrades to none with a warning.
fn resolve_material(
    layer: &Layer,
    entry: Option<&LayerConfig>,
    entry_layer_name: &str,
    materials: &MaterialTable,
) -> Result<Option<String>> {
    if let Some(identifier) = entry.and_then(|cfg| cfg.material.as_ref()) {
        if !materials.contains(identifier) {
            return Err(Error::MissingMaterial {
                material: identifier.clone(),
                layer: entry_layer_name.to_string(),
            });
        }
        return Ok(Some(identifier.clone()));
    }

    if let Some(identifier) = &layer.material {
        if materials.contains(identifier) {
            return Ok(Some(identifier.clone()));
        }
        warn!(
            material = %identifier,
            layer = %layer.name,
            "layer material not found in the material table; element keeps no material"
        );
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayerConfig;
    use crate::material::Material;
    use sim3dm_geometry::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    fn horizontal_up() -> Polygon3D {
        Polygon3D::new(vec![
            p(0.0, 0.0, 3.0),
            p(1.0, 0.0, 3.0),
            p(1.0, 1.0, 3.0),
            p(0.0, 1.0, 3.0),
        ])
    }

    fn vertical() -> Polygon3D {
        Polygon3D::new(vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 0.0, 1.0),
            p(0.0, 0.0, 1.0),
        ])
    }

    #[test]
    fn normal_inclination_sub_typing() {
        assert_eq!(
            face_kind_from_normal(&Vector3::new(0.0, 0.0, 1.0)),
            FaceKind::Roof
        );
        assert_eq!(
            face_kind_from_normal(&Vector3::new(0.0, 0.0, -1.0)),
            FaceKind::Floor
        );
        assert_eq!(
            face_kind_from_normal(&Vector3::new(1.0, 0.0, 0.0)),
            FaceKind::Wall
        );
        // 45 degrees up still counts as a roof
        let tilted = Vector3::new(1.0, 0.0, 1.0).normalize();
        assert_eq!(face_kind_from_normal(&tilted), FaceKind::Roof);
    }

    #[test]
    fn explicit_face_kind_wins_over_normal() {
        let layer = Layer::new("slabs");
        let entry = LayerConfig {
            face_kind: Some(FaceKind::Floor),
            ..LayerConfig::default()
        };
        let config = Config::default();
        let materials = MaterialTable::new();

        let element = classify(
            horizontal_up(),
            &layer,
            Some(&entry),
            "slabs",
            &config,
            &materials,
            "slab_1".to_string(),
            "slab_1".to_string(),
        )
        .unwrap();

        // The upward normal would say roof; the config says floor
        assert_eq!(element.kind, ElementKind::Face(FaceKind::Floor));
    }

    #[test]
    fn object_kind_creates_non_face_elements() {
        let layer = Layer::new("glazing");
        let entry = LayerConfig {
            object_kind: Some(ObjectKind::Aperture),
            ..LayerConfig::default()
        };

        let element = classify(
            vertical(),
            &layer,
            Some(&entry),
            "glazing",
            &Config::default(),
            &MaterialTable::new(),
            "ap_1".to_string(),
            "ap_1".to_string(),
        )
        .unwrap();

        assert_eq!(element.kind, ElementKind::Aperture);
    }

    #[test]
    fn role_table_applies_without_layer_entry() {
        let layer = Layer::new("context");
        let mut config = Config::default();
        config.roles.shade = Some("context".to_string());

        let element = classify(
            vertical(),
            &layer,
            None,
            "context",
            &config,
            &MaterialTable::new(),
            "sh_1".to_string(),
            "sh_1".to_string(),
        )
        .unwrap();

        assert_eq!(element.kind, ElementKind::Shade);
    }

    #[test]
    fn unconfigured_layer_falls_back_to_normal() {
        let element = classify(
            vertical(),
            &Layer::new("misc"),
            None,
            "misc",
            &Config::default(),
            &MaterialTable::new(),
            "w_1".to_string(),
            "w_1".to_string(),
        )
        .unwrap();

        assert_eq!(element.kind, ElementKind::Face(FaceKind::Wall));
    }

    #[test]
    fn missing_config_material_is_an_error() {
        let entry = LayerConfig {
            material: Some("brick".to_string()),
            ..LayerConfig::default()
        };

        let result = classify(
            vertical(),
            &Layer::new("walls"),
            Some(&entry),
            "walls",
            &Config::default(),
            &MaterialTable::new(),
            "w_1".to_string(),
            "w_1".to_string(),
        );

        assert!(matches!(result, Err(Error::MissingMaterial { .. })));
    }

    #[test]
    fn layer_material_degrades_to_none_when_unknown() {
        let mut layer = Layer::new("walls");
        layer.material = Some("unknown".to_string());

        let element = classify(
            vertical(),
            &layer,
            None,
            "walls",
            &Config::default(),
            &MaterialTable::new(),
            "w_1".to_string(),
            "w_1".to_string(),
        )
        .unwrap();

        assert!(element.material.is_none());
    }

    #[test]
    fn layer_material_attaches_when_present() {
        let mut layer = Layer::new("walls");
        layer.material = Some("brick".to_string());
        let materials = MaterialTable::from_materials([Material {
            identifier: "brick".to_string(),
            definition: String::new(),
        }]);

        let element = classify(
            vertical(),
            &layer,
            None,
            "walls",
            &Config::default(),
            &materials,
            "w_1".to_string(),
            "w_1".to_string(),
        )
        .unwrap();

        assert_eq!(element.material.as_deref(), Some("brick"));
    }
}
