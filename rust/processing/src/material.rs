// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The external material table.
//!
//! Materials come from a flat definition file that an external
//! collaborator parses; the pipeline only indexes into the resulting
//! identifier lookup and never interprets the definitions.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One opaque material definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub identifier: String,
    /// The unparsed definition text, passed through to the output
    pub definition: String,
}

/// Identifier-keyed material lookup.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: FxHashMap<String, Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_materials(materials: impl IntoIterator<Item = Material>) -> Self {
        let mut table = Self::new();
        for material in materials {
            table.insert(material);
        }
        table
    }

    pub fn insert(&mut self, material: Material) {
        self.materials.insert(material.identifier.clone(), material);
    }

    pub fn get(&self, identifier: &str) -> Option<&Material> {
        self.materials.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.materials.contains_key(identifier)
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }
}
