/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Serializable types for editor persistence.

use euclid::default::{Point2D, Size2D};
use rkyv::{Archive, Deserialize, Serialize};
use uuid::Uuid;

use crate::model::graph::{Node, NodeKind};

/// Node kind for persistence (mirrors `NodeKind` in the graph model).
#[derive(
    Archive,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
)]
#[rkyv(derive(Debug, PartialEq))]
pub enum PersistedNodeKind {
    Folder,
    Bookmark,
}

impl From<NodeKind> for PersistedNodeKind {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Folder => Self::Folder,
            NodeKind::Bookmark => Self::Bookmark,
        }
    }
}

impl From<PersistedNodeKind> for NodeKind {
    fn from(kind: PersistedNodeKind) -> Self {
        match kind {
            PersistedNodeKind::Folder => Self::Folder,
            PersistedNodeKind::Bookmark => Self::Bookmark,
        }
    }
}

/// Persisted node. The view-derived `hidden` flag is not stored.
#[derive(Archive, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersistedNode {
    /// Stable node identity.
    pub node_id: String,
    pub kind: PersistedNodeKind,
    pub label: String,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub add_date: Option<String>,
    pub position_x: f32,
    pub position_y: f32,
    pub parent_id: Option<String>,
    /// Explicit folder size as `(width, height)`.
    pub size: Option<(f32, f32)>,
    /// Page within the parent folder from the last layout pass.
    pub page_index: Option<u64>,
}

impl PersistedNode {
    pub fn from_node(node: &Node) -> Self {
        Self {
            node_id: node.id.to_string(),
            kind: node.kind.into(),
            label: node.label.clone(),
            url: node.url.clone(),
            icon: node.icon.clone(),
            add_date: node.add_date.clone(),
            position_x: node.position.x,
            position_y: node.position.y,
            parent_id: node.parent_id.map(|p| p.to_string()),
            size: node.size.map(|s| (s.width, s.height)),
            page_index: node.page_index.map(|p| p as u64),
        }
    }

    /// `None` when the stored id does not parse. An unparsable parent id is
    /// dropped, leaving the node at the top level.
    pub fn to_node(&self) -> Option<Node> {
        let id = Uuid::parse_str(&self.node_id).ok()?;
        let parent_id = self
            .parent_id
            .as_deref()
            .and_then(|p| Uuid::parse_str(p).ok());
        Some(Node {
            id,
            kind: self.kind.into(),
            label: self.label.clone(),
            url: self.url.clone(),
            icon: self.icon.clone(),
            add_date: self.add_date.clone(),
            position: Point2D::new(self.position_x, self.position_y),
            parent_id,
            size: self.size.map(|(w, h)| Size2D::new(w, h)),
            hidden: false,
            page_index: self.page_index.and_then(|p| usize::try_from(p).ok()),
        })
    }
}

/// Full node list as written under the `nodes` key.
#[derive(Archive, Serialize, Deserialize, Clone, Debug)]
pub struct EditorSnapshot {
    pub nodes: Vec<PersistedNode>,
    pub timestamp_secs: u64,
}
