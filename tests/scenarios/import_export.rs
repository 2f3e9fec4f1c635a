/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::HashMap;

use bookmark_graph::app::{EditorSession, NoticeLevel};
use bookmark_graph::model::graph::{Node, NodeId};
use bookmark_graph::services::bookmarks::{decode, encode};
use tempfile::TempDir;

use super::harness::{TestHarness, WORK_DOCS};

/// Sorted `(is_folder, label, url, parent label)` tuples.
fn shape(nodes: &[Node]) -> Vec<(bool, String, Option<String>, Option<String>)> {
    let labels: HashMap<NodeId, &str> = nodes.iter().map(|n| (n.id, n.label.as_str())).collect();
    let mut out: Vec<_> = nodes
        .iter()
        .map(|n| {
            (
                n.is_folder(),
                n.label.clone(),
                n.url.clone(),
                n.parent_id.and_then(|p| labels.get(&p)).map(|l| l.to_string()),
            )
        })
        .collect();
    out.sort();
    out
}

#[test]
fn test_codec_roundtrip_keeps_labels_urls_and_grouping() {
    let first = decode(WORK_DOCS);
    assert_eq!(first.len(), 6);
    let second = decode(&encode(&first));
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn test_session_export_reimports_to_same_shape() {
    let harness = TestHarness::with_document(WORK_DOCS);
    let exported = harness.session.export_visible();
    assert!(exported.starts_with("<!DOCTYPE NETSCAPE-Bookmark-file-1>"));
    assert!(exported.contains("<TITLE>Bookmarks</TITLE>"));
    assert!(exported.contains("std &amp; core"));
    assert!(exported.contains("ADD_DATE=\"1700000001\""));

    let mut again = EditorSession::default();
    again.import_document(&exported);
    let before: Vec<Node> = harness.session.store().iter().cloned().collect();
    let after: Vec<Node> = again.store().iter().cloned().collect();
    assert_eq!(shape(&before), shape(&after));
}

#[test]
fn test_import_replaces_previous_graph() {
    let mut harness = TestHarness::with_document(WORK_DOCS);
    harness.session.import_document(r#"<DL><p><DT><A HREF="https://only.example">Only</A></DL><p>"#);
    assert_eq!(harness.session.store().len(), 1);

    harness.session.undo();
    assert_eq!(harness.session.store().len(), 6);
}

#[test]
fn test_import_lays_out_and_keeps_provenance() {
    let harness = TestHarness::with_document(WORK_DOCS);
    let work = harness.node("Work");
    assert_eq!(work.add_date.as_deref(), Some("1700000000"));
    let docs_rs = harness.node("Docs.rs");
    assert_eq!(docs_rs.page_index, Some(0));
    assert_eq!(docs_rs.parent_id, Some(harness.id("Docs")));
}

#[tokio::test]
async fn test_import_file_reads_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.html");
    tokio::fs::write(&path, WORK_DOCS).await.unwrap();

    let mut session = EditorSession::default();
    assert_eq!(session.import_file(&path).await, 6);
    assert_eq!(session.scene().len(), 6);
}

#[tokio::test]
async fn test_import_missing_file_reports_error() {
    let dir = TempDir::new().unwrap();
    let mut session = EditorSession::default();
    assert_eq!(session.import_file(dir.path().join("absent.html")).await, 0);
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(session.store().is_empty());
}

#[test]
fn test_deeply_nested_document_imports_and_exports() {
    const DEPTH: usize = 5_000;
    let mut doc = String::from("<DL><p>\n");
    for i in 0..DEPTH {
        doc.push_str(&format!("<DT><H3>f{i}</H3>\n<DL><p>\n<DT><A HREF=\"https://x.example/{i}\">x{i}</A>\n"));
    }
    doc.push_str(&"</DL><p>\n".repeat(DEPTH + 1));

    let mut session = EditorSession::default();
    assert_eq!(session.import_document(&doc), 2 * DEPTH);
    let deepest = session.store().iter().find(|n| n.label == format!("f{}", DEPTH - 1)).unwrap();
    assert_eq!(session.store().depth(deepest.id), DEPTH - 1);

    let exported = session.export_visible();
    let again = decode(&exported);
    let before: Vec<Node> = session.store().iter().cloned().collect();
    assert_eq!(shape(&before), shape(&again));
}
