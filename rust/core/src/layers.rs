// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer hierarchy resolution.
//!
//! The hierarchy is rebuilt once per scene from the layers' full paths and
//! then queried as an explicit tree; path strings are never re-parsed per
//! query. A layer's closure is the layer itself plus all of its
//! descendants, and a layer is effectively visible only when it and every
//! ancestor are visible.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::scene::Scene;

/// Parent/child adjacency over a scene's layers.
pub struct LayerTree<'a> {
    scene: &'a Scene,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    by_name: FxHashMap<&'a str, usize>,
}

impl<'a> LayerTree<'a> {
    /// Build the adjacency from the layers' root-to-leaf paths.
    pub fn build(scene: &'a Scene) -> Self {
        let layer_count = scene.layers.len();

        let mut by_path: FxHashMap<&[String], usize> = FxHashMap::default();
        for (i, layer) in scene.layers.iter().enumerate() {
            by_path.insert(layer.path.as_slice(), i);
        }

        let mut parent = vec![None; layer_count];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
        for (i, layer) in scene.layers.iter().enumerate() {
            if layer.path.len() > 1 {
                if let Some(&p) = by_path.get(&layer.path[..layer.path.len() - 1]) {
                    parent[i] = Some(p);
                    children[p].push(i);
                }
            }
        }

        // First occurrence wins when sibling subtrees reuse a name
        let mut by_name: FxHashMap<&'a str, usize> = FxHashMap::default();
        for (i, layer) in scene.layers.iter().enumerate() {
            by_name.entry(layer.name.as_str()).or_insert(i);
        }

        Self {
            scene,
            parent,
            children,
            by_name,
        }
    }

    /// Index of the layer with the given name.
    pub fn find(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::LayerNotFound(name.to_string()))
    }

    /// Whether the layer exists at all.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Index of a layer's parent, if it has one.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parent[index]
    }

    /// A layer is effectively visible when it and all ancestors are visible.
    pub fn is_effectively_visible(&self, index: usize) -> bool {
        let mut current = Some(index);
        while let Some(i) = current {
            if !self.scene.layers[i].visible {
                return false;
            }
            current = self.parent[i];
        }
        true
    }

    /// The layer plus all of its descendants, in preorder.
    pub fn closure(&self, index: usize) -> Vec<usize> {
        let mut members = Vec::new();
        let mut stack = vec![index];
        while let Some(i) = stack.pop() {
            members.push(i);
            // Reverse keeps preorder stable under stack-based traversal
            for &child in self.children[i].iter().rev() {
                stack.push(child);
            }
        }
        members
    }

    /// Indices of all objects on a layer, optionally including descendant
    /// layers, in the scene's object iteration order.
    ///
    /// When `visibility_filter` is set, layers that are not effectively
    /// visible contribute nothing. An object's own visibility flag is
    /// always honored.
    pub fn objects_on(
        &self,
        name: &str,
        visibility_filter: bool,
        include_children: bool,
    ) -> Result<Vec<usize>> {
        let root = self.find(name)?;
        let members = if include_children {
            self.closure(root)
        } else {
            vec![root]
        };

        let mut on_layer = vec![false; self.scene.layers.len()];
        for &i in &members {
            if !visibility_filter || self.is_effectively_visible(i) {
                on_layer[i] = true;
            }
        }

        Ok(self
            .scene
            .objects
            .iter()
            .enumerate()
            .filter(|(_, obj)| obj.visible && on_layer.get(obj.layer_index) == Some(&true))
            .map(|(i, _)| i)
            .collect())
    }
}
