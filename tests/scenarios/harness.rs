/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bookmark_graph::app::{EditorIntent, EditorSession};
use bookmark_graph::model::graph::{Node, NodeId};
use euclid::default::Point2D;

/// Chrome-style export with nested folders.
pub(crate) const WORK_DOCS: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file. -->
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><H3 ADD_DATE="1700000000">Work</H3>
    <DL><p>
        <DT><H3>Docs</H3>
        <DL><p>
            <DT><A HREF="https://docs.rs" ADD_DATE="1700000001">Docs.rs</A>
            <DT><A HREF="https://doc.rust-lang.org/std/">std &amp; core</A>
        </DL><p>
        <DT><A HREF="https://github.com">GitHub</A>
    </DL><p>
    <DT><A HREF="https://news.ycombinator.com">HN</A>
</DL><p>
"#;

/// "Projects" holds eight nodes across three folder levels; "Keep" two more.
pub(crate) const PROJECTS: &str = r#"<DL><p>
<DT><H3>Projects</H3>
<DL><p>
    <DT><A HREF="https://a.example">A</A>
    <DT><H3>Rust</H3>
    <DL><p>
        <DT><A HREF="https://b.example">B</A>
        <DT><A HREF="https://c.example">C</A>
        <DT><H3>Async</H3>
        <DL><p>
            <DT><A HREF="https://d.example">D</A>
            <DT><A HREF="https://e.example">E</A>
        </DL><p>
    </DL><p>
</DL><p>
<DT><H3>Keep</H3>
<DL><p>
    <DT><A HREF="https://keep.example">Kept</A>
</DL><p>
</DL><p>
"#;

pub(crate) struct TestHarness {
    pub(crate) session: EditorSession,
}

impl TestHarness {
    pub(crate) fn new() -> Self {
        Self {
            session: EditorSession::default(),
        }
    }

    pub(crate) fn with_document(document: &str) -> Self {
        let mut harness = Self::new();
        assert!(harness.session.import_document(document) > 0);
        harness.session.take_notices();
        harness
    }

    pub(crate) fn id(&self, label: &str) -> NodeId {
        self.node(label).id
    }

    pub(crate) fn node(&self, label: &str) -> &Node {
        self.session
            .store()
            .iter()
            .find(|n| n.label == label)
            .unwrap_or_else(|| panic!("no node labelled {label}"))
    }

    /// Create a folder through the intent path and return its id.
    pub(crate) fn create_folder(&mut self, label: &str, at: Point2D<f32>, parent: Option<NodeId>) -> NodeId {
        self.session.apply_intent(EditorIntent::CreateFolder {
            label: label.to_string(),
            at,
            parent,
        });
        self.session.selection().primary().unwrap()
    }

    pub(crate) fn scene_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.session.scene().into_iter().map(|n| n.label).collect();
        labels.sort();
        labels
    }
}
