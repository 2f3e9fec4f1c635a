/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bookmark_graph::app::{EditorIntent, EditorSession};
use bookmark_graph::model::graph::NodeKind;
use bookmark_graph::prefs::EditorPreferences;
use euclid::default::Point2D;

use super::harness::{PROJECTS, TestHarness};

fn reading_list(count: usize) -> String {
    let mut doc = String::from("<DL><p>\n<DT><H3>Reading</H3>\n<DL><p>\n");
    for i in 0..count {
        doc.push_str(&format!("<DT><A HREF=\"https://read.example/{i}\">Article {i:02}</A>\n"));
    }
    doc.push_str("</DL><p>\n</DL><p>\n");
    doc
}

/// Folders 200 high fit three rows of three bookmarks.
fn short_folder_session() -> EditorSession {
    let prefs: EditorPreferences = toml::from_str("[layout]\nfolder_height = 200.0\n").unwrap();
    EditorSession::from_prefs(&prefs)
}

#[test]
fn test_twenty_three_bookmarks_paginate_nine_nine_five() {
    let mut session = short_folder_session();
    assert_eq!(session.import_document(&reading_list(23)), 24);

    let mut per_page = [0usize; 3];
    for node in session.store().iter().filter(|n| n.is_bookmark()) {
        per_page[node.page_index.unwrap()] += 1;
    }
    assert_eq!(per_page, [9, 9, 5]);

    let folder = session.store().roots().next().unwrap().id;
    let visible_bookmarks = |s: &EditorSession| {
        s.scene()
            .into_iter()
            .filter(|n| n.kind == NodeKind::Bookmark)
            .map(|n| n.label)
            .collect::<Vec<_>>()
    };

    let first = visible_bookmarks(&session);
    assert_eq!(first.len(), 9);
    assert_eq!(first[0], "Article 00");

    session.apply_intent(EditorIntent::NextPage { folder });
    assert_eq!(visible_bookmarks(&session)[0], "Article 09");
    session.apply_intent(EditorIntent::NextPage { folder });
    assert_eq!(visible_bookmarks(&session).len(), 5);
    session.apply_intent(EditorIntent::PreviousPage { folder });
    assert_eq!(session.current_page(folder), 1);
}

#[test]
fn test_pages_reuse_the_same_slots() {
    let mut session = short_folder_session();
    session.import_document(&reading_list(10));
    let position = |label: &str| session.store().iter().find(|n| n.label == label).unwrap().position;
    assert_eq!(position("Article 00"), position("Article 09"));
}

#[test]
fn test_deleting_bookmarks_clamps_current_page() {
    let mut session = short_folder_session();
    session.import_document(&reading_list(12));
    let folder = session.store().roots().next().unwrap().id;
    session.apply_intent(EditorIntent::NextPage { folder });
    assert_eq!(session.current_page(folder), 1);

    let overflow: Vec<_> = session
        .store()
        .iter()
        .filter(|n| n.page_index == Some(1))
        .map(|n| n.id)
        .collect();
    for node in overflow {
        session.apply_intent(EditorIntent::DeleteNode { node });
    }
    assert_eq!(session.current_page(folder), 0);
}

#[test]
fn test_auto_layout_restores_grid_after_drag() {
    let mut harness = TestHarness::with_document(PROJECTS);
    let keep = harness.id("Keep");
    let laid_out = harness.node("Keep").position;
    let depth = harness.session.history().undo_depth();
    harness.session.apply_intent(EditorIntent::AutoLayout);
    assert_eq!(harness.session.history().undo_depth(), depth, "layout is idempotent");

    harness.session.apply_intents([
        EditorIntent::BeginDrag {
            node: keep,
            pointer: laid_out,
        },
        EditorIntent::DragTo {
            pointer: Point2D::new(-3000.0, 50.0),
        },
        EditorIntent::EndDrag,
    ]);
    assert_eq!(harness.node("Keep").position, Point2D::new(-3000.0, 50.0));

    assert!(harness.session.auto_layout());
    assert_eq!(harness.node("Keep").position, laid_out);
}

#[test]
fn test_nested_folders_sit_below_their_parent() {
    let harness = TestHarness::with_document(PROJECTS);
    let projects = harness.node("Projects").position;
    let rust = harness.node("Rust");
    let asynchronous = harness.node("Async");
    assert_eq!(projects, Point2D::new(0.0, 0.0));
    assert!(rust.position.y > 0.0, "child row is below the parent");
    assert!(asynchronous.position.y > 0.0);
    assert_eq!(rust.parent_id, Some(harness.id("Projects")));
}
