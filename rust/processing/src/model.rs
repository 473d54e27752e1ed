// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The conversion pipeline and its aggregate output record.
//!
//! Layers are walked in file order and objects in file order within each
//! layer, so generated identifiers and warnings are reproducible across
//! runs. Per-object geometry conversion is an independent map and runs in
//! parallel; the ordered collect keeps the output deterministic.

use rayon::prelude::*;
use serde::Serialize;
use sim3dm_core::{LayerTree, Scene, UnitSystem};
use sim3dm_geometry::{GeometryConverter, Polygon3D};

use crate::config::{Config, LayerConfig};
use crate::elements::{classify, ElementKind, SimulationElement};
use crate::error::Result;
use crate::grids::{self, SensorGrid};
use crate::material::MaterialTable;
use crate::naming::{clean_string, hashed_name, NameRegistry};
use crate::rooms::{self, Room};

/// Caller switches for one conversion run.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Honor layer and object visibility when collecting objects
    pub visibility_filter: bool,
    /// Raise on unsupported payload kinds instead of skipping them
    pub strict: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            visibility_filter: true,
            strict: false,
        }
    }
}

/// The aggregate simulation model. Owns every contained record; a
/// separate collaborator serializes it to the interchange format.
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    pub name: String,
    pub unit_system: UnitSystem,
    /// Linear tolerance the scene was converted at
    pub tolerance: f64,
    pub angle_tolerance_degrees: f64,
    pub faces: Vec<SimulationElement>,
    pub shades: Vec<SimulationElement>,
    pub apertures: Vec<SimulationElement>,
    pub doors: Vec<SimulationElement>,
    pub rooms: Vec<Room>,
    pub grids: Vec<SensorGrid>,
}

/// Convert a scene into a simulation model.
pub fn convert_scene(
    scene: &Scene,
    name: &str,
    config: &Config,
    materials: &MaterialTable,
    options: &ConvertOptions,
) -> Result<Model> {
    scene.validate()?;
    let tree = LayerTree::build(scene);
    config.validate_against(&tree)?;

    let settings = scene.settings;
    let converter = GeometryConverter::new(settings.absolute_tolerance)
        .with_angle_tolerance_degrees(settings.angle_tolerance_degrees);

    let mut registry = NameRegistry::new();
    let mut faces = Vec::new();
    let mut shades = Vec::new();
    let mut apertures = Vec::new();
    let mut doors = Vec::new();

    // Face import: every object is emitted under its own layer, inheriting
    // a configured ancestor's entry when that ancestor includes child
    // layers. Layers reserved for grids, rooms and views are skipped.
    for (layer_index, layer) in scene.layers.iter().enumerate() {
        if config.roles.is_reserved(&layer.name) {
            continue;
        }
        if options.visibility_filter && !tree.is_effectively_visible(layer_index) {
            continue;
        }

        let (entry_layer_name, entry) = effective_entry(scene, &tree, config, layer_index);

        let object_indices: Vec<usize> = scene
            .objects
            .iter()
            .enumerate()
            .filter(|(_, obj)| obj.layer_index == layer_index && obj.visible)
            .map(|(i, _)| i)
            .collect();

        let converted: Vec<(usize, Vec<Polygon3D>)> = object_indices
            .par_iter()
            .map(|&i| -> Result<(usize, Vec<Polygon3D>)> {
                let geometry = &scene.objects[i].geometry;
                let polygons = if options.strict {
                    converter.convert(geometry)?
                } else {
                    converter.convert_lenient(geometry)?
                };
                Ok((i, polygons))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut sequence = 0usize;
        for (object_index, polygons) in converted {
            let obj = &scene.objects[object_index];
            for polygon in polygons {
                let display_name = obj
                    .name
                    .clone()
                    .unwrap_or_else(|| hashed_name(&layer.name, sequence));
                let identifier = registry.claim(clean_string(&display_name));
                sequence += 1;

                let element = classify(
                    polygon,
                    layer,
                    entry,
                    entry_layer_name,
                    config,
                    materials,
                    identifier,
                    display_name,
                )?;
                match element.kind {
                    ElementKind::Face(_) => faces.push(element),
                    ElementKind::Shade => shades.push(element),
                    ElementKind::Aperture => apertures.push(element),
                    ElementKind::Door => doors.push(element),
                }
            }
        }
    }

    // Rooms from the role-mapped layer
    let mut rooms_out = Vec::new();
    if let Some(room_layer) = &config.roles.room {
        let include_children = config
            .layer(room_layer)
            .map(|cfg| cfg.include_child_layers)
            .unwrap_or(true);
        let object_indices =
            tree.objects_on(room_layer, options.visibility_filter, include_children)?;

        for (sequence, &object_index) in object_indices.iter().enumerate() {
            let obj = &scene.objects[object_index];
            let display_name = obj
                .name
                .clone()
                .unwrap_or_else(|| hashed_name(room_layer, sequence));
            let identifier = registry.claim(clean_string(&display_name));
            rooms_out.push(rooms::assemble(
                scene,
                object_index,
                &converter,
                identifier,
                display_name,
            )?);
        }
    }

    // Grids from the role-mapped layer
    let mut grids_out = Vec::new();
    if let Some(grid_layer) = &config.roles.grid {
        let include_children = config
            .layer(grid_layer)
            .map(|cfg| cfg.include_child_layers)
            .unwrap_or(true);
        let grid_settings = config.grid_settings_for(grid_layer);
        let object_indices =
            tree.objects_on(grid_layer, options.visibility_filter, include_children)?;

        for (sequence, &object_index) in object_indices.iter().enumerate() {
            let obj = &scene.objects[object_index];
            let display_name = obj
                .name
                .clone()
                .unwrap_or_else(|| hashed_name(grid_layer, sequence));
            let identifier = registry.claim(clean_string(&display_name));
            if let Some(grid) = grids::generate(
                scene,
                object_index,
                &converter,
                &grid_settings,
                identifier,
                display_name,
            )? {
                grids_out.push(grid);
            }
        }
    }

    Ok(Model {
        name: clean_string(name),
        unit_system: settings.unit_system,
        tolerance: settings.absolute_tolerance,
        angle_tolerance_degrees: settings.angle_tolerance_degrees,
        faces,
        shades,
        apertures,
        doors,
        rooms: rooms_out,
        grids: grids_out,
    })
}

/// The layer configuration governing objects on a layer: the layer's own
/// entry, or the nearest configured ancestor that includes child layers.
fn effective_entry<'a>(
    scene: &'a Scene,
    tree: &LayerTree<'_>,
    config: &'a Config,
    layer_index: usize,
) -> (&'a str, Option<&'a LayerConfig>) {
    let own = scene.layers[layer_index].name.as_str();
    if let Some(entry) = config.layer(own) {
        return (own, Some(entry));
    }

    let mut current = tree.parent(layer_index);
    while let Some(i) = current {
        let name = scene.layers[i].name.as_str();
        if let Some(entry) = config.layer(name) {
            if entry.include_child_layers {
                return (name, Some(entry));
            }
            break;
        }
        current = tree.parent(i);
    }
    (own, None)
}
