// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the simulation model
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] sim3dm_geometry::Error),

    #[error(transparent)]
    Scene(#[from] sim3dm_core::Error),

    #[error("object {object} is not a closed volume")]
    NotAClosedVolume { object: String },

    #[error(
        "object {object} is not supported for grids; the faces may be too \
         small for the grid spacing, correct the source geometry or reduce \
         the spacing"
    )]
    GridNotSupported { object: String },

    #[error("material \"{material}\" requested for layer \"{layer}\" is not in the material table")]
    MissingMaterial { material: String, layer: String },

    #[error("config layer \"{0}\" is not a layer in the scene")]
    UnknownConfigLayer(String),

    #[error("role \"{role}\" is mapped to layer \"{layer}\", which is not in the scene")]
    MissingRoleLayer { role: &'static str, layer: String },
}
