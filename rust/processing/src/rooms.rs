// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room assembly from closed CAD volumes.

use serde::Serialize;
use sim3dm_core::Scene;
use sim3dm_geometry::{GeometryConverter, PolyFace, Polygon3D};

use crate::error::{Error, Result};

/// A closed room volume: its bounding faces and the CAD object it came
/// from.
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub identifier: String,
    pub display_name: String,
    pub faces: Vec<Polygon3D>,
    /// Label of the source CAD object
    pub source: String,
}

/// Assemble one scene object into a room.
///
/// The object's reported topology must be closed (a solid body, a capped
/// extrusion or a closed mesh), and the converted faces must recombine
/// into a polyface without naked edges; anything else is rejected, never
/// coerced.
pub fn assemble(
    scene: &Scene,
    object_index: usize,
    converter: &GeometryConverter,
    identifier: String,
    display_name: String,
) -> Result<Room> {
    let obj = &scene.objects[object_index];
    let source = obj.label(object_index);

    if !obj.geometry.is_closed_volume() {
        return Err(Error::NotAClosedVolume { object: source });
    }

    let faces = converter.convert(&obj.geometry)?;
    let polyface = PolyFace::from_faces(&faces, converter.tolerance());
    if !polyface.is_closed() {
        return Err(Error::NotAClosedVolume { object: source });
    }

    Ok(Room {
        identifier,
        display_name,
        faces,
        source,
    })
}
