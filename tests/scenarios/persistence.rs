/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bookmark_graph::app::{EditorIntent, EditorSession, NoticeLevel};
use bookmark_graph::services::persistence::EditorStore;
use euclid::default::{Point2D, Vector2D};
use tempfile::TempDir;

use super::harness::{PROJECTS, TestHarness};

#[test]
fn test_saved_session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let mut harness = TestHarness::with_document(PROJECTS);
    let rust = harness.id("Rust");
    harness.session.apply_intents([
        EditorIntent::RenameNode {
            node: rust,
            label: "Rust lang".to_string(),
        },
        EditorIntent::Zoom {
            anchor: Point2D::new(0.0, 0.0),
            factor: 0.5,
        },
    ]);
    {
        let mut store = EditorStore::open(dir.path()).unwrap();
        assert!(harness.session.save(&mut store));
    }

    let store = EditorStore::open(dir.path()).unwrap();
    let mut restored = EditorSession::default();
    assert!(restored.load(&store));
    assert_eq!(restored.store(), harness.session.store());
    assert_eq!(restored.store().get(rust).unwrap().label, "Rust lang");
    assert_eq!(restored.view().transform.scale, 0.5);
    assert!(!restored.history().can_undo(), "loading is not undoable");
}

#[test]
fn test_last_writer_wins() {
    let dir = TempDir::new().unwrap();
    let mut store = EditorStore::open(dir.path()).unwrap();

    let mut first = TestHarness::with_document(PROJECTS);
    let mut second = TestHarness::new();
    second.create_folder("Solo", Point2D::new(0.0, 0.0), None);

    first.session.save(&mut store);
    second.session.save(&mut store);

    let mut restored = EditorSession::default();
    restored.load(&store);
    assert_eq!(restored.store().len(), 1);
}

#[test]
fn test_clear_requires_confirmation_and_resets_history() {
    let dir = TempDir::new().unwrap();
    let mut store = EditorStore::open(dir.path()).unwrap();
    let mut harness = TestHarness::with_document(PROJECTS);
    harness.session.apply_intent(EditorIntent::Pan {
        delta: Vector2D::new(5.0, 5.0),
    });
    harness.session.save(&mut store);

    assert!(!harness.session.confirm_clear(&mut store));
    assert_eq!(harness.session.take_notices()[0].level, NoticeLevel::Warning);
    assert!(store.load_nodes().unwrap().is_some());

    harness.session.request_clear();
    harness.session.cancel_clear();
    assert!(!harness.session.confirm_clear(&mut store));

    harness.session.request_clear();
    assert!(harness.session.clear_pending());
    assert!(harness.session.confirm_clear(&mut store));
    assert!(harness.session.store().is_empty());
    assert!(!harness.session.history().can_undo());
    assert_eq!(harness.session.view().transform.offset, Vector2D::zero());
    assert!(store.load_nodes().unwrap().is_none());
    assert!(store.load_view().unwrap().is_none());
}

#[test]
fn test_loading_empty_store_keeps_session() {
    let dir = TempDir::new().unwrap();
    let store = EditorStore::open(dir.path()).unwrap();
    let mut harness = TestHarness::with_document(PROJECTS);
    assert!(!harness.session.load(&store));
    assert_eq!(harness.session.store().len(), 10);
    assert!(harness.session.take_notices().is_empty());
}
