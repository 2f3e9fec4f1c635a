/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Input handling for the bookmark graph editor.
//!
//! Pointer gestures resolve to pure store transforms (`drag`, `reparent`
//! and the edit helpers below). Keyboard shortcuts are collected into
//! `KeyboardActions` and converted to intents, which keeps detection apart
//! from application.

use euclid::default::Point2D;

use crate::app::EditorIntent;
use crate::model::graph::geometry::AbsolutePositions;
use crate::model::graph::{Node, NodeId, NodeStore};

pub mod drag;
pub mod pages;
pub mod reparent;

pub use drag::{DragState, drop_bookmark, drop_folder, drop_node};
pub use pages::{FolderPages, Selection};
pub use reparent::{ReparentClick, ReparentSelector, detach_folder, reparent_folder};

/// Remove `node` and every descendant.
pub fn delete_node(store: &NodeStore, node: NodeId) -> Option<NodeStore> {
    store.without_subtree(node)
}

/// Remove several nodes (and their descendants) as a single snapshot.
pub fn delete_nodes(store: &NodeStore, nodes: &[NodeId]) -> Option<NodeStore> {
    let mut next: Option<NodeStore> = None;
    for &id in nodes {
        let current = next.as_ref().unwrap_or(store);
        if let Some(trimmed) = current.without_subtree(id) {
            next = Some(trimmed);
        }
    }
    next
}

/// Change a node's label. Blank or unchanged labels are a no-op.
pub fn rename_node(store: &NodeStore, node: NodeId, label: &str) -> Option<NodeStore> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    store.with_node_updated(node, |n| n.label = label.to_string())
}

/// Add a folder whose top-left sits at absolute `at`.
///
/// `parent` must name a folder; anything else creates a root folder.
pub fn create_folder(
    store: &NodeStore,
    label: &str,
    at: Point2D<f32>,
    parent: Option<NodeId>,
) -> (NodeStore, NodeId) {
    let parent = parent.filter(|p| store.get(*p).is_some_and(|n| n.is_folder()));
    let position = AbsolutePositions::compute(store).relative_to(parent, at);
    let folder = Node::folder(label, position, parent);
    let id = folder.id;
    (store.with_nodes_appended([folder]), id)
}

/// Keys the editor reacts to, as reported by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Home,
    PageUp,
    PageDown,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                shift: false,
            },
        }
    }

    pub fn ctrl_shift(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                shift: true,
            },
        }
    }
}

/// Keyboard actions collected from one frame of key presses.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KeyboardActions {
    pub delete_selected: bool,
    pub undo: bool,
    pub redo: bool,
    pub cancel: bool,
    pub next_page: bool,
    pub previous_page: bool,
    pub reset_view: bool,
    pub auto_layout: bool,
    pub activate_all: bool,
}

/// Collect keyboard actions (detection only).
///
/// While a text field owns the keyboard only Escape is honoured.
pub fn collect_actions(presses: &[KeyPress], text_entry_active: bool) -> KeyboardActions {
    let mut actions = KeyboardActions::default();
    for press in presses {
        let Modifiers { ctrl, shift } = press.modifiers;
        if press.key == Key::Escape {
            actions.cancel = true;
            continue;
        }
        if text_entry_active {
            continue;
        }
        match press.key {
            Key::Delete | Key::Backspace if !ctrl => actions.delete_selected = true,
            Key::Char('z' | 'Z') if ctrl && shift => actions.redo = true,
            Key::Char('z' | 'Z') if ctrl => actions.undo = true,
            Key::Char('y' | 'Y') if ctrl => actions.redo = true,
            Key::Char('a' | 'A') if ctrl => actions.activate_all = true,
            Key::Char('l' | 'L') if !ctrl => actions.auto_layout = true,
            Key::PageDown => actions.next_page = true,
            Key::PageUp => actions.previous_page = true,
            Key::Home => actions.reset_view = true,
            _ => {},
        }
    }
    actions
}

/// Convert keyboard actions to editor intents without applying them.
pub fn intents_from_actions(actions: &KeyboardActions) -> Vec<EditorIntent> {
    let mut intents = Vec::new();
    if actions.cancel {
        intents.push(EditorIntent::CancelGesture);
    }
    if actions.delete_selected {
        intents.push(EditorIntent::DeleteSelected);
    }
    if actions.undo {
        intents.push(EditorIntent::Undo);
    }
    if actions.redo {
        intents.push(EditorIntent::Redo);
    }
    if actions.next_page {
        intents.push(EditorIntent::NextPageOfPrimary);
    }
    if actions.previous_page {
        intents.push(EditorIntent::PreviousPageOfPrimary);
    }
    if actions.reset_view {
        intents.push(EditorIntent::ResetView);
    }
    if actions.auto_layout {
        intents.push(EditorIntent::AutoLayout);
    }
    if actions.activate_all {
        intents.push(EditorIntent::ActivateAllFolders);
    }
    intents
}
