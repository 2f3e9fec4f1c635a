/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Drops onto overlapping folders: the deepest folder wins, then the first
//! in store order.

use bookmark_graph::app::EditorIntent;
use bookmark_graph::input::drop_bookmark;
use bookmark_graph::layout::LayoutMetrics;
use bookmark_graph::model::graph::geometry::AbsolutePositions;
use bookmark_graph::model::graph::{Node, NodeStore};
use euclid::default::{Point2D, Size2D};

use super::harness::{PROJECTS, TestHarness};

fn at(x: f32, y: f32) -> Point2D<f32> {
    Point2D::new(x, y)
}

#[test]
fn test_equal_depth_overlap_picks_first_in_store_order() {
    let m = LayoutMetrics::default();
    let first = Node::folder("first", at(0.0, 0.0), None);
    let second = Node::folder("second", at(100.0, 100.0), None);
    let bookmark = Node::bookmark("b", "https://b", at(2000.0, 0.0), None);
    let (first_id, second_id, bookmark_id) = (first.id, second.id, bookmark.id);

    let store = NodeStore::new(vec![first.clone(), second.clone(), bookmark.clone()]);
    let next = drop_bookmark(&store, &m, bookmark_id, at(150.0, 150.0), |_| true).unwrap();
    assert_eq!(next.get(bookmark_id).unwrap().parent_id, Some(first_id));

    let swapped = NodeStore::new(vec![second, first, bookmark]);
    let next = drop_bookmark(&swapped, &m, bookmark_id, at(150.0, 150.0), |_| true).unwrap();
    assert_eq!(next.get(bookmark_id).unwrap().parent_id, Some(second_id));
}

#[test]
fn test_nested_folder_beats_earlier_shallow_folder() {
    let m = LayoutMetrics::default();
    let shallow = Node::folder("shallow", at(0.0, 0.0), None);
    let outer = Node::folder("outer", at(100.0, 100.0), None);
    let mut inner = Node::folder("inner", at(10.0, 10.0), Some(outer.id));
    inner.size = Some(Size2D::new(100.0, 100.0));
    let bookmark = Node::bookmark("b", "https://b", at(2000.0, 0.0), None);
    let (inner_id, bookmark_id) = (inner.id, bookmark.id);
    let store = NodeStore::new(vec![shallow, outer, inner, bookmark]);

    let next = drop_bookmark(&store, &m, bookmark_id, at(150.0, 150.0), |_| true).unwrap();
    let node = next.get(bookmark_id).unwrap();
    assert_eq!(node.parent_id, Some(inner_id));
    assert_eq!(node.position, at(40.0, 40.0));
    assert_eq!(AbsolutePositions::compute(&next).get(bookmark_id), Some(at(150.0, 150.0)));
}

#[test]
fn test_bounds_are_half_open() {
    let m = LayoutMetrics::default();
    let folder = Node::folder("f", at(0.0, 0.0), None);
    let bookmark = Node::bookmark("b", "https://b", at(2000.0, 0.0), None);
    let (folder_id, bookmark_id) = (folder.id, bookmark.id);
    let store = NodeStore::new(vec![folder, bookmark]);

    let edge = at(m.folder_width, 10.0);
    let outside = drop_bookmark(&store, &m, bookmark_id, edge, |_| true).unwrap();
    assert_eq!(outside.get(bookmark_id).unwrap().parent_id, None);

    let inside = drop_bookmark(&store, &m, bookmark_id, at(0.0, 0.0), |_| true).unwrap();
    assert_eq!(inside.get(bookmark_id).unwrap().parent_id, Some(folder_id));
}

#[test]
fn test_session_drop_moves_bookmark_between_folders() {
    let mut harness = TestHarness::with_document(PROJECTS);
    let kept = harness.id("Kept");
    let projects = harness.id("Projects");
    let positions = AbsolutePositions::compute(harness.session.store());
    let grab = positions.get(kept).unwrap();
    let target = positions.get(projects).unwrap() + euclid::default::Vector2D::new(300.0, 200.0);

    harness.session.apply_intents([
        EditorIntent::BeginDrag {
            node: kept,
            pointer: grab,
        },
        EditorIntent::DragTo { pointer: target },
        EditorIntent::EndDrag,
    ]);

    let node = harness.node("Kept");
    assert_eq!(node.parent_id, Some(projects));
    assert_eq!(node.page_index, None, "page is assigned by the next layout pass");
    assert!(harness.scene_labels().contains(&"Kept".to_string()));
}
