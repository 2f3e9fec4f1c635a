/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Explicit folder-to-folder reparenting (two-click arm/commit).

use crate::model::graph::geometry::AbsolutePositions;
use crate::model::graph::{NodeId, NodeStore};

/// Outcome of a click on a folder's reparent handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparentClick {
    /// First click: `folder` is now the armed source.
    Armed(NodeId),
    /// The armed folder was clicked again.
    Disarmed,
    /// Second click on another folder: try moving `source` under `target`.
    Commit { source: NodeId, target: NodeId },
}

/// Armed reparent source, owned by the editor session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReparentSelector {
    source: Option<NodeId>,
}

impl ReparentSelector {
    pub fn armed(&self) -> Option<NodeId> {
        self.source
    }

    pub fn cancel(&mut self) {
        self.source = None;
    }

    /// Disarms after every commit attempt, successful or not.
    pub fn click(&mut self, folder: NodeId) -> ReparentClick {
        match self.source.take() {
            None => {
                self.source = Some(folder);
                ReparentClick::Armed(folder)
            },
            Some(source) if source == folder => ReparentClick::Disarmed,
            Some(source) => ReparentClick::Commit {
                source,
                target: folder,
            },
        }
    }
}

/// Move folder `source` under folder `target`, keeping its absolute position.
///
/// `None` when either id is missing or not a folder, when `target` already
/// is the parent, or when `source` is `target` or one of its ancestors.
pub fn reparent_folder(store: &NodeStore, source: NodeId, target: NodeId) -> Option<NodeStore> {
    let source_node = store.get(source)?;
    let target_node = store.get(target)?;
    if !source_node.is_folder() || !target_node.is_folder() {
        return None;
    }
    if source_node.parent_id == Some(target) {
        return None;
    }
    if store.is_self_or_ancestor(source, target) {
        log::debug!("Rejected reparent of {source} under {target}: would form a cycle");
        return None;
    }

    let positions = AbsolutePositions::compute(store);
    let absolute = positions.get(source)?;
    let position = positions.relative_to(Some(target), absolute);
    store.with_node_updated(source, |n| {
        n.parent_id = Some(target);
        n.position = position;
    })
}

/// Move folder `source` back to the top level, keeping its absolute position.
pub fn detach_folder(store: &NodeStore, source: NodeId) -> Option<NodeStore> {
    let node = store.get(source)?;
    if !node.is_folder() || node.parent_id.is_none() {
        return None;
    }
    let absolute = AbsolutePositions::compute(store).get(source)?;
    store.with_node_updated(source, |n| {
        n.parent_id = None;
        n.position = absolute;
    })
}
