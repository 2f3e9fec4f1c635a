/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Drag gestures and drop resolution.
//!
//! Bookmarks may change parent on drop; folders never do (see
//! `reparent` for the explicit folder move).

use euclid::default::{Point2D, Vector2D};

use crate::layout::LayoutMetrics;
use crate::model::graph::geometry::{AbsolutePositions, folder_at};
use crate::model::graph::{Node, NodeId, NodeStore};

/// One in-flight drag, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    node: NodeId,
    grab_offset: Vector2D<f32>,
    pointer: Point2D<f32>,
}

impl DragState {
    /// Begin dragging `node` grabbed at `pointer`.
    pub fn start(positions: &AbsolutePositions, node: NodeId, pointer: Point2D<f32>) -> Option<Self> {
        let origin = positions.get(node)?;
        Some(Self {
            node,
            grab_offset: pointer - origin,
            pointer,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn update(&mut self, pointer: Point2D<f32>) {
        self.pointer = pointer;
    }

    /// Where the node's top-left would land if dropped now.
    pub fn preview_origin(&self) -> Point2D<f32> {
        self.pointer - self.grab_offset
    }

    /// End the drag, yielding the node and its absolute drop origin.
    pub fn finish(self) -> (NodeId, Point2D<f32>) {
        (self.node, self.preview_origin())
    }
}

/// Drop a bookmark whose top-left lands at absolute `drop_at`.
///
/// The deepest folder (first in store order among equals) containing the
/// drop point and accepted by `accepts` becomes the new parent; otherwise
/// the bookmark becomes a root at `drop_at`. The absolute location is kept
/// either way. The page index is cleared until the next layout pass.
pub fn drop_bookmark(
    store: &NodeStore,
    metrics: &LayoutMetrics,
    node: NodeId,
    drop_at: Point2D<f32>,
    accepts: impl Fn(&Node) -> bool,
) -> Option<NodeStore> {
    if !store.get(node)?.is_bookmark() {
        return None;
    }
    let positions = AbsolutePositions::compute(store);
    let target = folder_at(store, &positions, metrics, drop_at, accepts);
    let position = positions.relative_to(target, drop_at);

    log::debug!("Dropping bookmark {node} into {target:?}");
    store.with_node_updated(node, |n| {
        if n.parent_id != target {
            n.page_index = None;
        }
        n.parent_id = target;
        n.position = position;
    })
}

/// Move a folder to absolute `drop_at` inside its current parent.
pub fn drop_folder(store: &NodeStore, node: NodeId, drop_at: Point2D<f32>) -> Option<NodeStore> {
    let folder = store.get(node)?;
    if !folder.is_folder() {
        return None;
    }
    let parent = folder.parent_id;
    let positions = AbsolutePositions::compute(store);
    let position = positions.relative_to(parent, drop_at);
    store.with_node_updated(node, |n| n.position = position)
}

/// Resolve a finished drag by node kind.
pub fn drop_node(
    store: &NodeStore,
    metrics: &LayoutMetrics,
    node: NodeId,
    drop_at: Point2D<f32>,
    accepts: impl Fn(&Node) -> bool,
) -> Option<NodeStore> {
    if store.get(node)?.is_folder() {
        drop_folder(store, node, drop_at)
    } else {
        drop_bookmark(store, metrics, node, drop_at, accepts)
    }
}
