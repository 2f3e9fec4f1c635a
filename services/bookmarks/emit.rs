/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Netscape bookmark document writer.

use std::collections::{HashMap, HashSet};

use crate::model::graph::{Node, NodeId, NodeKind};

const PREAMBLE: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
";

const INDENT: &str = "    ";
const MAX_INDENT_DEPTH: usize = 32;

/// Serialize `nodes` as a bookmark document.
///
/// Nesting comes only from `parent_id`; a node whose parent is not in
/// `nodes` is written at top level. Siblings are ordered by vertical, then
/// horizontal position, keeping slice order for ties.
pub fn encode(nodes: &[Node]) -> String {
    let present: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
    let mut levels: HashMap<Option<NodeId>, Vec<&Node>> = HashMap::new();
    for node in nodes {
        let parent = node.parent_id.filter(|p| present.contains(p));
        levels.entry(parent).or_default().push(node);
    }
    for siblings in levels.values_mut() {
        siblings.sort_by(|a, b| {
            a.position
                .y
                .total_cmp(&b.position.y)
                .then_with(|| a.position.x.total_cmp(&b.position.x))
        });
    }

    let mut out = String::from(PREAMBLE);
    out.push_str("<DL><p>\n");
    write_level(&mut out, &levels, None, 1);
    out.push_str("</DL><p>\n");
    out
}

enum Step<'a> {
    Node(&'a Node, usize),
    CloseList(usize),
}

fn write_level(
    out: &mut String,
    levels: &HashMap<Option<NodeId>, Vec<&Node>>,
    parent: Option<NodeId>,
    depth: usize,
) {
    let mut pending: Vec<Step<'_>> = Vec::new();
    push_siblings(&mut pending, levels, parent, depth);

    while let Some(step) = pending.pop() {
        match step {
            Step::CloseList(depth) => out.push_str(&format!("{}</DL><p>\n", indent(depth))),
            Step::Node(node, depth) => match node.kind {
                NodeKind::Folder => {
                    let indent = indent(depth);
                    out.push_str(&format!(
                        "{indent}<DT><H3{}>{}</H3>\n",
                        optional_attr("ADD_DATE", node.add_date.as_deref()),
                        escape(&node.label)
                    ));
                    out.push_str(&format!("{indent}<DL><p>\n"));
                    pending.push(Step::CloseList(depth));
                    push_siblings(&mut pending, levels, Some(node.id), depth + 1);
                },
                NodeKind::Bookmark => {
                    out.push_str(&format!(
                        "{}<DT><A HREF=\"{}\"{}{}>{}</A>\n",
                        indent(depth),
                        escape(node.url.as_deref().unwrap_or_default()),
                        optional_attr("ADD_DATE", node.add_date.as_deref()),
                        optional_attr("ICON", node.icon.as_deref()),
                        escape(&node.label)
                    ));
                },
            },
        }
    }
}

/// Queue the children of `parent` so they pop in sibling order.
fn push_siblings<'a>(
    pending: &mut Vec<Step<'a>>,
    levels: &HashMap<Option<NodeId>, Vec<&'a Node>>,
    parent: Option<NodeId>,
    depth: usize,
) {
    if let Some(siblings) = levels.get(&parent) {
        pending.extend(siblings.iter().rev().map(|&node| Step::Node(node, depth)));
    }
}

/// Indentation stops growing past `MAX_INDENT_DEPTH` levels.
fn indent(depth: usize) -> String {
    INDENT.repeat(depth.min(MAX_INDENT_DEPTH))
}

fn optional_attr(name: &str, value: Option<&str>) -> String {
    value
        .map(|v| format!(" {name}=\"{}\"", escape(v)))
        .unwrap_or_default()
}

/// Escape text for element content and double-quoted attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
