/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! View and filter state consumed by the rendering surface.
//!
//! Two independent filters:
//! - active folders decide what is *shown* (hide),
//! - the search query decides what is *emphasized* (dim).
//!
//! They only meet when a scene is rendered.

use euclid::default::{Point2D, Vector2D};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::graph::{NodeId, NodeStore};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 4.0;

/// Pan/zoom transform: `screen = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vector2D<f32>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Vector2D::zero(),
        }
    }

    pub fn world_to_screen(&self, world: Point2D<f32>) -> Point2D<f32> {
        (world.to_vector() * self.scale + self.offset).to_point()
    }

    pub fn screen_to_world(&self, screen: Point2D<f32>) -> Point2D<f32> {
        ((screen.to_vector() - self.offset) / self.scale).to_point()
    }

    pub fn pan(&mut self, delta: Vector2D<f32>) {
        self.offset += delta;
    }

    /// Zoom by `factor` keeping the world point under `screen_anchor` fixed.
    pub fn zoom_about(&mut self, screen_anchor: Point2D<f32>, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world = self.screen_to_world(screen_anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = screen_anchor.to_vector() - world.to_vector() * self.scale;
    }
}

/// Active-folder selection, search query and view transform.
#[derive(Debug, Clone, Default)]
pub struct ViewFilterState {
    active_folders: HashSet<NodeId>,
    query: String,
    pub transform: ViewTransform,
}

impl ViewFilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_folders(&self) -> &HashSet<NodeId> {
        &self.active_folders
    }

    pub fn is_active(&self, folder: NodeId) -> bool {
        self.active_folders.contains(&folder)
    }

    pub fn set_active(&mut self, folder: NodeId, active: bool) {
        if active {
            self.active_folders.insert(folder);
        } else {
            self.active_folders.remove(&folder);
        }
    }

    pub fn toggle_active(&mut self, folder: NodeId) {
        let active = !self.is_active(folder);
        self.set_active(folder, active);
    }

    /// Activate every folder in `store`.
    pub fn activate_all(&mut self, store: &NodeStore) {
        self.active_folders = store.iter().filter(|n| n.is_folder()).map(|n| n.id).collect();
    }

    pub fn clear_active(&mut self) {
        self.active_folders.clear();
    }

    /// Forget active ids that are no longer folders in `store`.
    pub fn prune(&mut self, store: &NodeStore) {
        self.active_folders
            .retain(|id| store.get(*id).is_some_and(|n| n.is_folder()));
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Active folders plus every ancestor of each.
    pub fn effective_folders(&self, store: &NodeStore) -> HashSet<NodeId> {
        let mut effective = HashSet::new();
        for &folder in &self.active_folders {
            if !store.get(folder).is_some_and(|n| n.is_folder()) {
                continue;
            }
            insert_with_ancestors(&mut effective, store, folder);
        }
        effective
    }

    /// Ids of nodes the renderer should show.
    pub fn visible_nodes(&self, store: &NodeStore) -> HashSet<NodeId> {
        let effective = self.effective_folders(store);
        store
            .iter()
            .filter(|n| {
                if n.is_folder() {
                    effective.contains(&n.id)
                } else {
                    n.parent_id.is_none_or(|p| effective.contains(&p))
                }
            })
            .map(|n| n.id)
            .collect()
    }

    /// Nodes matching the query, plus all their ancestors.
    ///
    /// Empty for a blank query.
    pub fn search_matches(&self, store: &NodeStore) -> HashSet<NodeId> {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return HashSet::new();
        }

        let mut matches = HashSet::new();
        for node in store.iter() {
            let label_hit = node.label.to_lowercase().contains(&needle);
            let url_hit = node.is_bookmark()
                && node
                    .url
                    .as_deref()
                    .is_some_and(|u| u.to_lowercase().contains(&needle));
            if label_hit || url_hit {
                insert_with_ancestors(&mut matches, store, node.id);
            }
        }
        matches
    }

    /// Nodes rendered dimmed: everything outside the match set while a
    /// query is active.
    pub fn dimmed_nodes(&self, store: &NodeStore) -> HashSet<NodeId> {
        if self.query.trim().is_empty() {
            return HashSet::new();
        }
        let matches = self.search_matches(store);
        store
            .iter()
            .map(|n| n.id)
            .filter(|id| !matches.contains(id))
            .collect()
    }

    /// Copy of `store` with the derived `hidden` flag recomputed.
    pub fn with_hidden_flags(&self, store: &NodeStore) -> NodeStore {
        let visible = self.visible_nodes(store);
        let nodes = store
            .iter()
            .map(|n| {
                let mut node = n.clone();
                node.hidden = !visible.contains(&n.id);
                node
            })
            .collect();
        NodeStore::new(nodes)
    }
}

/// Add `id` and its ancestors to `set`, stopping at the first one already
/// present: every member's ancestors are members too.
fn insert_with_ancestors(set: &mut HashSet<NodeId>, store: &NodeStore, id: NodeId) {
    for node in std::iter::once(id).chain(store.ancestors(id)) {
        if !set.insert(node) {
            break;
        }
    }
}
