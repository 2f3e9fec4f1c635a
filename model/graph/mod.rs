/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Bookmark graph data structures.
//!
//! Core structures:
//! - `Node`: folder or bookmark with a parent reference and a 2D position
//! - `NodeStore`: immutable snapshot of the flat node list plus an id index
//!
//! Boundary: every mutation returns a fresh `NodeStore`. Mutations that would
//! not change anything return `None`, which the history treats as a no-op.

use euclid::default::{Point2D, Size2D};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

pub mod geometry;

/// Stable node identity (never reused within a store).
pub type NodeId = Uuid;

/// Closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Named container; the only kind that may be a parent.
    Folder,
    /// Leaf with a destination URL.
    Bookmark,
}

/// A folder or bookmark in the editor tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,

    pub kind: NodeKind,

    /// Folder or bookmark title.
    pub label: String,

    /// Destination URL (bookmarks only).
    pub url: Option<String>,

    /// Icon reference carried through from the import document.
    pub icon: Option<String>,

    /// `ADD_DATE` attribute carried through from the import document.
    pub add_date: Option<String>,

    /// World position for roots, parent-relative otherwise.
    pub position: Point2D<f32>,

    pub parent_id: Option<NodeId>,

    /// Explicit folder box size; `None` means the default folder size.
    pub size: Option<Size2D<f32>>,

    /// Derived by the view filter. Stale after any store mutation.
    pub hidden: bool,

    /// Pagination page within the parent folder, written by layout.
    pub page_index: Option<usize>,
}

impl Node {
    /// New folder with a fresh id.
    pub fn folder(label: impl Into<String>, position: Point2D<f32>, parent_id: Option<NodeId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NodeKind::Folder,
            label: label.into(),
            url: None,
            icon: None,
            add_date: None,
            position,
            parent_id,
            size: None,
            hidden: false,
            page_index: None,
        }
    }

    /// New bookmark with a fresh id.
    pub fn bookmark(
        label: impl Into<String>,
        url: impl Into<String>,
        position: Point2D<f32>,
        parent_id: Option<NodeId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NodeKind::Bookmark,
            label: label.into(),
            url: Some(url.into()),
            icon: None,
            add_date: None,
            position,
            parent_id,
            size: None,
            hidden: false,
            page_index: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_bookmark(&self) -> bool {
        self.kind == NodeKind::Bookmark
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// First invariant violation found by [`NodeStore::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    DuplicateId(NodeId),
    DanglingParent { node: NodeId, parent: NodeId },
    ParentNotFolder { node: NodeId, parent: NodeId },
    Cycle(NodeId),
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::DuplicateId(id) => write!(f, "duplicate node id {id}"),
            InvariantViolation::DanglingParent { node, parent } => {
                write!(f, "node {node} references missing parent {parent}")
            },
            InvariantViolation::ParentNotFolder { node, parent } => {
                write!(f, "node {node} has non-folder parent {parent}")
            },
            InvariantViolation::Cycle(id) => write!(f, "parent chain of {id} does not terminate"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Immutable snapshot of the node list.
///
/// Cloning shares the underlying allocation. The id index is rebuilt
/// whenever a new snapshot is constructed.
#[derive(Clone)]
pub struct NodeStore {
    nodes: Arc<[Node]>,
    index: Arc<HashMap<NodeId, usize>>,
}

impl NodeStore {
    pub fn new(nodes: Vec<Node>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect();
        Self {
            nodes: nodes.into(),
            index: Arc::new(index),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build a store from untrusted input (e.g. a persisted snapshot).
    ///
    /// Drops repeated ids (first wins) and clears parent references that are
    /// dangling, point at a bookmark, or close a cycle.
    pub fn sanitized(nodes: Vec<Node>) -> Self {
        let mut seen = HashSet::new();
        let mut nodes: Vec<Node> = nodes.into_iter().filter(|n| seen.insert(n.id)).collect();

        let kinds: HashMap<NodeId, NodeKind> = nodes.iter().map(|n| (n.id, n.kind)).collect();
        for node in &mut nodes {
            if let Some(parent) = node.parent_id
                && kinds.get(&parent) != Some(&NodeKind::Folder)
            {
                log::warn!("Dropping invalid parent {parent} of node {}", node.id);
                node.parent_id = None;
            }
        }

        // Cut cycles: walk each chain, clearing the edge that closes a loop.
        let mut parents: HashMap<NodeId, Option<NodeId>> =
            nodes.iter().map(|n| (n.id, n.parent_id)).collect();
        let mut settled: HashSet<NodeId> = HashSet::new();
        for node in &nodes {
            let mut path = Vec::new();
            let mut on_path = HashSet::new();
            let mut cursor = Some(node.id);
            while let Some(id) = cursor {
                if settled.contains(&id) {
                    break;
                }
                if !on_path.insert(id) {
                    if let Some(last) = path.last() {
                        log::warn!("Breaking parent cycle at node {last}");
                        parents.insert(*last, None);
                    }
                    break;
                }
                path.push(id);
                cursor = parents.get(&id).copied().flatten();
            }
            settled.extend(path);
        }
        for node in &mut nodes {
            node.parent_id = parents.get(&node.id).copied().flatten();
        }

        Self::new(nodes)
    }

    /// True when both handles share the same snapshot allocation.
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Position of `id` in store order.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Nodes with no parent, or whose parent is missing, in store order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.is_none_or(|p| !self.contains(p)))
    }

    /// Direct children of `id`, in store order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.parent_id == Some(id))
    }

    pub fn folder_children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.children(id).filter(|n| n.is_folder())
    }

    pub fn bookmark_children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.children(id).filter(|n| n.is_bookmark())
    }

    /// Ancestors of `id`, nearest first. Bounded by `len()` steps.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            store: self,
            cursor: self.get(id).and_then(|n| n.parent_id),
            remaining: self.len(),
        }
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// True when `candidate` is `id` itself or one of its ancestors.
    pub fn is_self_or_ancestor(&self, candidate: NodeId, id: NodeId) -> bool {
        candidate == id || self.ancestors(id).any(|a| a == candidate)
    }

    /// Every node whose parent chain reaches `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> HashSet<NodeId> {
        let mut by_parent: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for node in self.nodes.iter() {
            if let Some(parent) = node.parent_id {
                by_parent.entry(parent).or_default().push(node.id);
            }
        }

        let mut found = HashSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for &child in by_parent.get(&current).into_iter().flatten() {
                if found.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        found
    }

    /// New snapshot with `f` applied to node `id`.
    ///
    /// Returns `None` if the node is missing or `f` left it unchanged.
    pub fn with_node_updated(&self, id: NodeId, f: impl FnOnce(&mut Node)) -> Option<Self> {
        let idx = self.position_of(id)?;
        let mut updated = self.nodes[idx].clone();
        f(&mut updated);
        if updated == self.nodes[idx] {
            return None;
        }
        let mut nodes = self.nodes.to_vec();
        nodes[idx] = updated;
        Some(Self::committed(nodes))
    }

    /// New snapshot with `extra` appended in order.
    pub fn with_nodes_appended(&self, extra: impl IntoIterator<Item = Node>) -> Self {
        let mut nodes = self.nodes.to_vec();
        nodes.extend(extra);
        Self::committed(nodes)
    }

    /// New snapshot without `id` and all of its descendants.
    pub fn without_subtree(&self, id: NodeId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let mut doomed = self.descendants(id);
        doomed.insert(id);
        let nodes = self
            .nodes
            .iter()
            .filter(|n| !doomed.contains(&n.id))
            .cloned()
            .collect();
        Some(Self::committed(nodes))
    }

    /// New snapshot with the whole node list replaced by `nodes`.
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self::committed(nodes)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.index.len() != self.nodes.len() {
            let mut seen = HashSet::new();
            if let Some(dup) = self.nodes.iter().find(|n| !seen.insert(n.id)) {
                return Err(InvariantViolation::DuplicateId(dup.id));
            }
        }
        for node in self.nodes.iter() {
            let Some(parent) = node.parent_id else {
                continue;
            };
            match self.get(parent) {
                None => {
                    return Err(InvariantViolation::DanglingParent {
                        node: node.id,
                        parent,
                    });
                },
                Some(p) if !p.is_folder() => {
                    return Err(InvariantViolation::ParentNotFolder {
                        node: node.id,
                        parent,
                    });
                },
                Some(_) => {},
            }
        }
        // Chains already walked to a root are not walked again.
        let mut rooted: HashSet<NodeId> = HashSet::with_capacity(self.len());
        for node in self.nodes.iter() {
            let mut path = Vec::new();
            let mut cursor = Some(node.id);
            while let Some(id) = cursor {
                if rooted.contains(&id) {
                    break;
                }
                if path.len() > self.len() {
                    return Err(InvariantViolation::Cycle(node.id));
                }
                path.push(id);
                cursor = self.get(id).and_then(|n| n.parent_id);
            }
            rooted.extend(path);
        }
        Ok(())
    }

    fn committed(nodes: Vec<Node>) -> Self {
        let store = Self::new(nodes);
        debug_assert!(
            store.check_invariants().is_ok(),
            "node store invariant violated: {:?}",
            store.check_invariants()
        );
        store
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for NodeStore {
    fn eq(&self, other: &Self) -> bool {
        self.same_snapshot(other) || self.nodes == other.nodes
    }
}

impl fmt::Debug for NodeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    store: &'a NodeStore,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.cursor?;
        let node = self.store.get(current)?;
        self.remaining -= 1;
        self.cursor = node.parent_id;
        Some(current)
    }
}
