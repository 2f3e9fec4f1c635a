/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Absolute-position resolution and hit testing over a `NodeStore`.

use euclid::default::{Point2D, Rect, Size2D, Vector2D};
use std::collections::HashMap;

use super::{Node, NodeId, NodeStore};
use crate::layout::LayoutMetrics;

/// Memoized world positions for one store snapshot.
///
/// Each node is resolved once; chains are walked iteratively and every node
/// on the walked chain is cached on the way back down.
#[derive(Debug, Clone, Default)]
pub struct AbsolutePositions {
    resolved: HashMap<NodeId, Point2D<f32>>,
}

impl AbsolutePositions {
    pub fn compute(store: &NodeStore) -> Self {
        let mut resolved: HashMap<NodeId, Point2D<f32>> = HashMap::with_capacity(store.len());
        let mut chain: Vec<&Node> = Vec::new();

        for node in store.iter() {
            if resolved.contains_key(&node.id) {
                continue;
            }

            chain.clear();
            let mut cursor = Some(node);
            let mut base = Point2D::origin();
            while let Some(current) = cursor {
                if let Some(known) = resolved.get(&current.id) {
                    base = *known;
                    break;
                }
                chain.push(current);
                if chain.len() > store.len() {
                    log::warn!("Parent chain of {} exceeds store size", node.id);
                    break;
                }
                cursor = current.parent_id.and_then(|p| store.get(p));
            }

            // `chain` runs child -> topmost unresolved ancestor.
            for current in chain.iter().rev() {
                base += current.position.to_vector();
                resolved.insert(current.id, base);
            }
        }

        Self { resolved }
    }

    pub fn get(&self, id: NodeId) -> Option<Point2D<f32>> {
        self.resolved.get(&id).copied()
    }

    /// Absolute origin of `parent`, or the world origin for roots.
    pub fn origin_of(&self, parent: Option<NodeId>) -> Point2D<f32> {
        parent.and_then(|p| self.get(p)).unwrap_or_else(Point2D::origin)
    }

    /// Convert an absolute point into coordinates relative to `parent`.
    pub fn relative_to(&self, parent: Option<NodeId>, absolute: Point2D<f32>) -> Point2D<f32> {
        let origin: Vector2D<f32> = self.origin_of(parent).to_vector();
        absolute - origin
    }
}

/// Box size used for rendering and hit testing.
pub fn node_size(node: &Node, metrics: &LayoutMetrics) -> Size2D<f32> {
    if node.is_folder() {
        node.size.unwrap_or_else(|| metrics.folder_size())
    } else {
        metrics.bookmark_size()
    }
}

/// Absolute bounding box of `node`.
pub fn node_bounds(
    node: &Node,
    positions: &AbsolutePositions,
    metrics: &LayoutMetrics,
) -> Option<Rect<f32>> {
    let origin = positions.get(node.id)?;
    Some(Rect::new(origin, node_size(node, metrics)))
}

/// Folder whose box contains `point`.
///
/// Bounds are half-open (`[origin, origin + size)`). When several folders
/// match, the deepest one wins; equally deep matches resolve to the first in
/// store order. Folders rejected by `candidate` are skipped.
pub fn folder_at(
    store: &NodeStore,
    positions: &AbsolutePositions,
    metrics: &LayoutMetrics,
    point: Point2D<f32>,
    candidate: impl Fn(&Node) -> bool,
) -> Option<NodeId> {
    let mut best: Option<(usize, NodeId)> = None;
    for node in store.iter().filter(|n| n.is_folder() && candidate(n)) {
        let Some(bounds) = node_bounds(node, positions, metrics) else {
            continue;
        };
        if !bounds.contains(point) {
            continue;
        }
        let depth = store.depth(node.id);
        if best.is_none_or(|(best_depth, _)| depth > best_depth) {
            best = Some((depth, node.id));
        }
    }
    best.map(|(_, id)| id)
}
