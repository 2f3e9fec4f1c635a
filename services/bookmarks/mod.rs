/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Bookmark document codec (Netscape bookmark file format).
//!
//! `decode` never fails: unreadable documents yield no nodes. `encode`
//! rebuilds nesting from parent references alone, so
//! `decode(encode(decode(x)))` matches `decode(x)` up to ids and positions.

use euclid::default::Point2D;

use crate::model::graph::{Node, NodeId};

mod emit;
mod parse;

pub use emit::encode;
use parse::{Entry, EntryKind};

/// Vertical spacing of provisional positions assigned on import, so that
/// position-based ordering reproduces document order until layout runs.
const PROVISIONAL_STEP: f32 = 40.0;

/// Parse `document` into a flat node list with fresh ids.
///
/// Nodes appear depth-first in document order; every folder precedes its
/// children.
pub fn decode(document: &str) -> Vec<Node> {
    match parse::parse(document) {
        Ok(entries) => {
            let nodes = flatten(entries);
            log::info!("Decoded {} bookmark nodes", nodes.len());
            nodes
        },
        Err(e) => {
            log::warn!("Bookmark document rejected: {e}");
            Vec::new()
        },
    }
}

fn flatten(entries: Vec<Entry>) -> Vec<Node> {
    let roots = entries.len();
    let mut ids: Vec<NodeId> = Vec::with_capacity(roots);
    // Siblings seen so far per parent entry; the last slot counts roots.
    let mut seen = vec![0usize; roots + 1];
    let mut nodes = Vec::with_capacity(entries.len());

    for Entry { parent, kind } in entries {
        let counter = &mut seen[parent.unwrap_or(roots)];
        let position = Point2D::new(0.0, *counter as f32 * PROVISIONAL_STEP);
        *counter += 1;
        let parent_id = parent.and_then(|p| ids.get(p).copied());

        let node = match kind {
            EntryKind::Folder { title, add_date } => {
                let mut folder = Node::folder(title, position, parent_id);
                folder.add_date = add_date;
                folder
            },
            EntryKind::Bookmark {
                title,
                href,
                icon,
                add_date,
            } => {
                let mut bookmark = Node::bookmark(title, href, position, parent_id);
                bookmark.icon = icon;
                bookmark.add_date = add_date;
                bookmark
            },
        };
        ids.push(node.id);
        nodes.push(node);
    }
    nodes
}
