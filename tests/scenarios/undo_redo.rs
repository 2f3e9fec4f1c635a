/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bookmark_graph::app::{EditorIntent, EditorSession};
use bookmark_graph::layout::LayoutMetrics;
use euclid::default::Point2D;

use super::harness::{PROJECTS, TestHarness};

#[test]
fn test_three_undos_and_three_redos_are_symmetric() {
    let mut harness = TestHarness::new();
    let initial = harness.session.store().clone();

    let folder = harness.create_folder("Inbox", Point2D::new(0.0, 0.0), None);
    harness.session.apply_intents([
        EditorIntent::RenameNode {
            node: folder,
            label: "Reading".to_string(),
        },
        EditorIntent::BeginDrag {
            node: folder,
            pointer: Point2D::new(10.0, 10.0),
        },
        EditorIntent::DragTo {
            pointer: Point2D::new(210.0, 60.0),
        },
        EditorIntent::EndDrag,
    ]);
    let last = harness.session.store().clone();
    assert_eq!(harness.session.history().undo_depth(), 3);
    assert_eq!(last.get(folder).unwrap().position, Point2D::new(200.0, 50.0));

    for _ in 0..3 {
        assert!(harness.session.undo());
    }
    assert_eq!(*harness.session.store(), initial);
    assert!(!harness.session.undo(), "nothing left to undo");

    for _ in 0..3 {
        assert!(harness.session.redo());
    }
    assert_eq!(*harness.session.store(), last);
    assert!(!harness.session.history().can_redo());
}

#[test]
fn test_noop_edits_do_not_record_steps() {
    let mut harness = TestHarness::with_document(PROJECTS);
    let depth = harness.session.history().undo_depth();
    let rust = harness.id("Rust");
    let keep = harness.id("Keep");

    harness.session.apply_intents([
        EditorIntent::RenameNode {
            node: rust,
            label: "Rust".to_string(),
        },
        EditorIntent::DeleteSelected,
        EditorIntent::DetachFolder { folder: keep },
    ]);
    assert_eq!(harness.session.history().undo_depth(), depth);
}

#[test]
fn test_new_mutation_clears_redo() {
    let mut harness = TestHarness::with_document(PROJECTS);
    let kept = harness.id("Kept");
    harness.session.apply_intent(EditorIntent::DeleteNode { node: kept });
    harness.session.undo();
    assert!(harness.session.history().can_redo());

    let a = harness.id("A");
    harness.session.apply_intent(EditorIntent::DeleteNode { node: a });
    assert!(!harness.session.history().can_redo());
    assert!(harness.session.store().contains(kept));
}

#[test]
fn test_undo_limit_discards_oldest_steps() {
    let mut session = EditorSession::new(LayoutMetrics::default(), 2);
    for i in 0..4 {
        session.apply_intent(EditorIntent::CreateFolder {
            label: format!("f{i}"),
            at: Point2D::new(i as f32 * 400.0, 0.0),
            parent: None,
        });
    }
    assert_eq!(session.history().undo_depth(), 2);
    while session.undo() {}
    assert_eq!(session.store().len(), 2);
}

#[test]
fn test_delete_cascade_removes_eight_nodes_in_one_step() {
    let mut harness = TestHarness::with_document(PROJECTS);
    assert_eq!(harness.session.store().len(), 10);
    let before = harness.session.store().clone();

    let projects = harness.id("Projects");
    harness.session.apply_intent(EditorIntent::DeleteNode { node: projects });
    let labels: Vec<_> = harness.session.store().iter().map(|n| n.label.clone()).collect();
    assert_eq!(labels, ["Keep", "Kept"]);

    harness.session.undo();
    assert_eq!(*harness.session.store(), before);
}
