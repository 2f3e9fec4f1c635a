/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Automatic layout of the bookmark tree.
//!
//! A pass runs in three phases:
//! 1. folder subtrees of each root folder as a top-down tree with children
//!    centered beneath their parent,
//! 2. roots on a fixed-column grid, spaced out where a subtree needs room,
//! 3. bookmarks inside every folder on a paginated interior grid.
//!
//! Only `position` and `page_index` are written.

use euclid::default::{Point2D, Size2D};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::graph::geometry::node_size;
use crate::model::graph::{Node, NodeId, NodeStore};

mod metrics;

pub use metrics::LayoutMetrics;

/// Store split into roots and per-folder children, all as indices in store order.
struct Partition {
    roots: Vec<usize>,
    folder_children: HashMap<NodeId, Vec<usize>>,
    bookmark_children: HashMap<NodeId, Vec<usize>>,
}

impl Partition {
    fn of(store: &NodeStore) -> Self {
        let mut partition = Self {
            roots: Vec::new(),
            folder_children: HashMap::new(),
            bookmark_children: HashMap::new(),
        };
        for (idx, node) in store.iter().enumerate() {
            match node.parent_id.filter(|p| store.contains(*p)) {
                None => partition.roots.push(idx),
                Some(parent) if node.is_folder() => {
                    partition.folder_children.entry(parent).or_default().push(idx)
                },
                Some(parent) => partition.bookmark_children.entry(parent).or_default().push(idx),
            }
        }
        partition
    }
}

/// Lay out every node. Returns the input snapshot unchanged when empty.
pub fn layout(store: &NodeStore, metrics: &LayoutMetrics) -> NodeStore {
    if store.is_empty() {
        return store.clone();
    }

    let partition = Partition::of(store);
    let mut nodes = store.nodes().to_vec();

    let extents: Vec<Extent> = partition
        .roots
        .iter()
        .map(|&idx| {
            if nodes[idx].is_bookmark() {
                nodes[idx].page_index = None;
            }
            if nodes[idx].is_folder() && partition.folder_children.contains_key(&nodes[idx].id) {
                place_folder_tree(&mut nodes, &partition, idx, metrics)
            } else {
                Extent::of_box(node_size(&nodes[idx], metrics))
            }
        })
        .collect();
    let origins = root_origins(&extents, metrics);
    for (&idx, origin) in partition.roots.iter().zip(origins) {
        nodes[idx].position = origin;
    }

    for (folder_id, bookmarks) in &partition.bookmark_children {
        let Some(folder_idx) = store.position_of(*folder_id) else {
            continue;
        };
        place_bookmarks(&mut nodes, folder_idx, bookmarks, metrics);
    }

    log::debug!(
        "Layout pass over {} nodes ({} roots)",
        nodes.len(),
        partition.roots.len()
    );
    NodeStore::with_nodes(nodes)
}

/// Run [`layout`] and report `None` when no node moved.
pub fn auto_layout(store: &NodeStore, metrics: &LayoutMetrics) -> Option<NodeStore> {
    let next = layout(store, metrics);
    (next != *store).then_some(next)
}

/// Pages needed for the bookmarks of `folder`. Always at least 1.
pub fn page_count(store: &NodeStore, metrics: &LayoutMetrics, folder: NodeId) -> usize {
    let Some(node) = store.get(folder) else {
        return 1;
    };
    let Some(capacity) = metrics.page_capacity(node_size(node, metrics)) else {
        return 1;
    };
    store.bookmark_children(folder).count().div_ceil(capacity).max(1)
}

/// Stable reading order used for pagination: top-to-bottom, left-to-right,
/// then by label.
pub fn reading_order(a: &Node, b: &Node) -> Ordering {
    a.position
        .y
        .total_cmp(&b.position.y)
        .then_with(|| a.position.x.total_cmp(&b.position.x))
        .then_with(|| a.label.cmp(&b.label))
}

/// Room a root and its folder tree take up, measured from the root's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    /// How far the tree reaches left of the root's origin.
    left: f32,
    right: f32,
    bottom: f32,
}

impl Extent {
    fn of_box(size: Size2D<f32>) -> Self {
        Self {
            left: 0.0,
            right: size.width,
            bottom: size.height,
        }
    }

    fn include(&mut self, origin: Point2D<f32>, size: Size2D<f32>) {
        self.left = self.left.max(-origin.x);
        self.right = self.right.max(origin.x + size.width);
        self.bottom = self.bottom.max(origin.y + size.height);
    }
}

/// Grid origins for the roots, in root order.
///
/// Cells start at the uniform root pitch. A column widens when a tree in it
/// reaches past its cell sideways, and a row is pushed down by the tallest
/// tree of the row above, so no two roots' trees share space.
fn root_origins(extents: &[Extent], metrics: &LayoutMetrics) -> Vec<Point2D<f32>> {
    let columns = metrics.root_columns.max(1);
    let pitch = metrics.root_pitch();

    let mut reach = vec![(0.0f32, 0.0f32); columns];
    for (order, extent) in extents.iter().enumerate() {
        let (left, right) = &mut reach[order % columns];
        *left = left.max(extent.left);
        *right = right.max(extent.right);
    }
    let mut column_x = vec![0.0f32; columns];
    for column in 1..columns {
        let previous = column_x[column - 1];
        let packed = previous + reach[column - 1].1 + metrics.node_gap + reach[column].0;
        column_x[column] = packed.max(previous + pitch.width);
    }

    let mut origins = Vec::with_capacity(extents.len());
    let mut row_y = 0.0f32;
    for row in extents.chunks(columns) {
        for column in 0..row.len() {
            origins.push(Point2D::new(column_x[column], row_y));
        }
        let tallest = row.iter().map(|e| e.bottom).fold(0.0f32, f32::max);
        row_y += pitch.height.max(tallest + metrics.node_gap);
    }
    origins
}

/// Lay out the folder tree under `root`, writing parent-relative positions.
fn place_folder_tree(
    nodes: &mut [Node],
    partition: &Partition,
    root: usize,
    metrics: &LayoutMetrics,
) -> Extent {
    // Pre-order: every folder precedes its descendants.
    let mut order = Vec::new();
    let mut stack = vec![root];
    let mut largest = node_size(&nodes[root], metrics);
    while let Some(idx) = stack.pop() {
        order.push(idx);
        let size = node_size(&nodes[idx], metrics);
        largest = Size2D::new(largest.width.max(size.width), largest.height.max(size.height));
        if let Some(children) = partition.folder_children.get(&nodes[idx].id) {
            stack.extend(children.iter().copied());
        }
    }

    let footprint = Size2D::new(
        largest.width + metrics.tree_padding,
        largest.height + metrics.tree_padding + metrics.tree_vertical_separation,
    );

    // Subtree widths, children before parents.
    let mut widths: HashMap<usize, f32> = HashMap::with_capacity(order.len());
    for &idx in order.iter().rev() {
        let children_width: f32 = partition
            .folder_children
            .get(&nodes[idx].id)
            .map(|children| children.iter().map(|c| widths.get(c).copied().unwrap_or(0.0)).sum::<f32>())
            .unwrap_or(0.0);
        widths.insert(idx, footprint.width.max(children_width));
    }

    // Origins relative to the root, parents before children.
    let mut extent = Extent::of_box(node_size(&nodes[root], metrics));
    let mut origins: HashMap<usize, Point2D<f32>> = HashMap::with_capacity(order.len());
    origins.insert(root, Point2D::origin());
    for &parent in &order {
        let Some(children) = partition.folder_children.get(&nodes[parent].id) else {
            continue;
        };
        let parent_origin = origins.get(&parent).copied().unwrap_or_else(Point2D::origin);
        let total: f32 = children.iter().map(|c| widths.get(c).copied().unwrap_or(0.0)).sum();
        let parent_center = parent_origin.x + node_size(&nodes[parent], metrics).width / 2.0;
        let y = parent_origin.y + footprint.height;
        let mut cursor = parent_center - total / 2.0;

        for &child in children {
            let slot = widths.get(&child).copied().unwrap_or(footprint.width);
            let size = node_size(&nodes[child], metrics);
            let origin = Point2D::new(cursor + slot / 2.0 - size.width / 2.0, y);
            nodes[child].position = origin - parent_origin.to_vector();
            extent.include(origin, size);
            origins.insert(child, origin);
            cursor += slot;
        }
    }
    extent
}

fn place_bookmarks(
    nodes: &mut [Node],
    folder: usize,
    bookmarks: &[usize],
    metrics: &LayoutMetrics,
) {
    let Some(capacity) = metrics.page_capacity(node_size(&nodes[folder], metrics)) else {
        log::debug!(
            "Folder {} has no interior room; leaving {} bookmarks in place",
            nodes[folder].id,
            bookmarks.len()
        );
        return;
    };

    // Pages share slots, so the previous page decides first.
    let mut order = bookmarks.to_vec();
    order.sort_by(|&a, &b| {
        let (a, b) = (&nodes[a], &nodes[b]);
        a.page_index
            .unwrap_or(0)
            .cmp(&b.page_index.unwrap_or(0))
            .then_with(|| reading_order(a, b))
    });

    for (rank, idx) in order.into_iter().enumerate() {
        nodes[idx].position = metrics.bookmark_slot(rank % capacity);
        nodes[idx].page_index = Some(rank / capacity);
    }
}
