/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Per-folder pagination cursor and node selection. Both are UI state kept
//! outside the node store.

use std::collections::{HashMap, HashSet};

use crate::layout::{LayoutMetrics, page_count};
use crate::model::graph::{NodeId, NodeStore};

/// Current page per folder. Folders without an entry are on page 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPages {
    current: HashMap<NodeId, usize>,
}

impl FolderPages {
    pub fn current(&self, folder: NodeId) -> usize {
        self.current.get(&folder).copied().unwrap_or(0)
    }

    /// Set the page, clamped to `[0, total - 1]`.
    pub fn set(&mut self, folder: NodeId, page: usize, total: usize) {
        let page = page.min(total.saturating_sub(1));
        if page == 0 {
            self.current.remove(&folder);
        } else {
            self.current.insert(folder, page);
        }
    }

    pub fn next(&mut self, folder: NodeId, total: usize) {
        self.set(folder, self.current(folder).saturating_add(1), total);
    }

    pub fn previous(&mut self, folder: NodeId, total: usize) {
        self.set(folder, self.current(folder).saturating_sub(1), total);
    }

    /// Re-clamp after folder contents changed; drops folders that vanished.
    pub fn clamp_all(&mut self, store: &NodeStore, metrics: &LayoutMetrics) {
        let entries: Vec<(NodeId, usize)> = self.current.drain().collect();
        for (folder, page) in entries {
            if store.get(folder).is_some_and(|n| n.is_folder()) {
                self.set(folder, page, page_count(store, metrics, folder));
            }
        }
    }

    pub fn reset(&mut self) {
        self.current.clear();
    }
}

/// Selected nodes with an optional primary (most recently clicked) node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: HashSet<NodeId>,
    primary: Option<NodeId>,
}

impl Selection {
    /// Select `node`, replacing the selection unless `additive`. An
    /// additive click on a selected node deselects it.
    pub fn click(&mut self, node: NodeId, additive: bool) {
        if !additive {
            self.nodes.clear();
        } else if self.nodes.remove(&node) {
            if self.primary == Some(node) {
                self.primary = None;
            }
            return;
        }
        self.nodes.insert(node);
        self.primary = Some(node);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.primary = None;
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn prune(&mut self, store: &NodeStore) {
        self.nodes.retain(|id| store.contains(*id));
        if self.primary.is_some_and(|p| !store.contains(p)) {
            self.primary = None;
        }
    }
}
