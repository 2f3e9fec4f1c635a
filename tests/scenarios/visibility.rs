/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use bookmark_graph::app::EditorIntent;

use super::harness::TestHarness;

const NESTED: &str = r#"<DL><p>
<DT><H3>Grand</H3>
<DL><p>
    <DT><A HREF="https://grand.example">GrandLeaf</A>
    <DT><H3>Parent</H3>
    <DL><p>
        <DT><H3>Target</H3>
        <DL><p>
            <DT><A HREF="https://target.example/rust">TargetLeaf</A>
        </DL><p>
        <DT><H3>Sibling</H3>
        <DL><p>
            <DT><A HREF="https://sibling.example">SiblingLeaf</A>
        </DL><p>
    </DL><p>
</DL><p>
<DT><A HREF="https://loose.example">Loose</A>
</DL><p>
"#;

fn only_target_active() -> TestHarness {
    let mut harness = TestHarness::with_document(NESTED);
    let target = harness.id("Target");
    harness.session.apply_intents([
        EditorIntent::ClearActiveFolders,
        EditorIntent::SetFolderActive {
            folder: target,
            active: true,
        },
    ]);
    harness
}

#[test]
fn test_nested_folder_reveals_parent_and_grandparent() {
    let harness = only_target_active();
    assert_eq!(
        harness.scene_labels(),
        ["Grand", "GrandLeaf", "Loose", "Parent", "Target", "TargetLeaf"]
    );
}

#[test]
fn test_sibling_needs_independent_activation() {
    let mut harness = only_target_active();
    let sibling = harness.id("Sibling");
    harness.session.apply_intent(EditorIntent::ToggleFolderActive { folder: sibling });
    let labels = harness.scene_labels();
    assert!(labels.contains(&"Sibling".to_string()));
    assert!(labels.contains(&"SiblingLeaf".to_string()));

    harness.session.apply_intent(EditorIntent::ToggleFolderActive { folder: sibling });
    assert!(!harness.scene_labels().contains(&"Sibling".to_string()));
}

#[test]
fn test_search_dims_but_never_hides() {
    let mut harness = only_target_active();
    let shown = harness.scene_labels();
    harness.session.apply_intent(EditorIntent::SetSearchQuery {
        query: "RUST".to_string(),
    });
    assert_eq!(harness.scene_labels(), shown);

    let mut highlighted: Vec<_> = harness
        .session
        .scene()
        .into_iter()
        .filter(|n| !n.dimmed)
        .map(|n| n.label)
        .collect();
    highlighted.sort();
    assert_eq!(highlighted, ["Grand", "Parent", "Target", "TargetLeaf"]);
}

#[test]
fn test_export_follows_visibility() {
    let harness = only_target_active();
    let exported = harness.session.export_visible();
    assert!(exported.contains("TargetLeaf"));
    assert!(exported.contains("GrandLeaf"));
    assert!(!exported.contains("Sibling"));
}

#[test]
fn test_deleting_active_folder_prunes_it() {
    let mut harness = only_target_active();
    let target = harness.id("Target");
    harness.session.apply_intent(EditorIntent::DeleteNode { node: target });
    assert!(harness.session.view().active_folders().is_empty());
    assert_eq!(harness.scene_labels(), ["Loose"]);
}
