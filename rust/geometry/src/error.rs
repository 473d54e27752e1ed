// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry reconstruction
#[derive(Error, Debug)]
pub enum Error {
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("invalid extrusion: {0}")]
    InvalidExtrusion(String),

    #[error(
        "surface carries no display mesh; re-save the source file with \
         surface-display data materialized"
    )]
    MeshExtraction,

    #[error("boundary collapsed below 3 distinct points at tolerance {tolerance}")]
    DegenerateBoundary { tolerance: f64 },

    #[error("unsupported object type: {0}")]
    UnsupportedObjectType(String),
}
