// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deterministic identifier derivation.
//!
//! Generated names hash the layer name together with a per-layer sequence
//! index instead of drawing randomness, so re-running the conversion on
//! the same input reproduces every identifier.

use rustc_hash::{FxHashSet, FxHasher};
use std::hash::{Hash, Hasher};

/// Reduce a display name to a safe identifier: alphanumerics, `-`, `_`
/// pass through, everything else becomes `_`.
pub fn clean_string(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Synthesize a name for an unnamed element from its layer and its
/// position in that layer's output sequence.
pub fn hashed_name(layer_name: &str, sequence: usize) -> String {
    let mut hasher = FxHasher::default();
    layer_name.hash(&mut hasher);
    sequence.hash(&mut hasher);
    let digest = hasher.finish() as u32;
    format!("{}_{digest:08x}", clean_string(layer_name))
}

/// Hands out identifiers that are unique within one model.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: FxHashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an identifier, appending a numeric suffix on collision.
    pub fn claim(&mut self, candidate: String) -> String {
        if self.used.insert(candidate.clone()) {
            return candidate;
        }
        let mut n = 2usize;
        loop {
            let suffixed = format!("{candidate}_{n}");
            if self.used.insert(suffixed.clone()) {
                return suffixed;
            }
            n += 1;
        }
    }
}
