// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading the scene structure
#[derive(Error, Debug)]
pub enum Error {
    #[error("no layer named \"{0}\" in the scene")]
    LayerNotFound(String),

    #[error("object {object} references layer index {index}, which is not in the scene")]
    InvalidLayerReference { object: String, index: usize },
}
