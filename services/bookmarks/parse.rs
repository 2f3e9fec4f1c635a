/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Tolerant reader for Netscape bookmark documents.
//!
//! Browsers emit this format as loose HTML: `<DT>` and `<p>` are never
//! closed and tag case varies. Only four constructs carry meaning:
//! `<DL>`, `</DL>`, `<H3>folder</H3>` and `<A HREF=..>bookmark</A>`.
//! Everything else is skipped.

use std::fmt;

/// One bookmark entry in document order. `parent` indexes an earlier
/// folder entry of the same parse.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    pub parent: Option<usize>,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EntryKind {
    Folder {
        title: String,
        add_date: Option<String>,
    },
    Bookmark {
        title: String,
        href: String,
        icon: Option<String>,
        add_date: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    ListOpen,
    ListClose,
    Folder {
        title: String,
        add_date: Option<String>,
    },
    Link {
        title: String,
        href: String,
        icon: Option<String>,
        add_date: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseError {
    /// No `<DL>` list anywhere in the document.
    NoList,
    /// A `<` at this byte offset never reaches its `>`.
    UnterminatedTag(usize),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoList => write!(f, "document contains no bookmark list"),
            ParseError::UnterminatedTag(at) => write!(f, "unterminated tag at byte {at}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse `document` into a flat entry list, folders before their contents.
///
/// Nesting is tracked with an explicit stack of open lists, so document
/// depth is bounded only by memory.
pub(crate) fn parse(document: &str) -> Result<Vec<Entry>, ParseError> {
    let mut tokens = tokenize(document)?.into_iter().peekable();

    loop {
        match tokens.next() {
            Some(Token::ListOpen) => break,
            Some(_) => continue,
            None => return Err(ParseError::NoList),
        }
    }

    let mut entries = Vec::new();
    // Owning folder of each open list. Once the outermost list closes,
    // remaining content lands at top level.
    let mut open: Vec<Option<usize>> = vec![None];
    while let Some(token) = tokens.next() {
        let parent = open.last().copied().flatten();
        match token {
            Token::ListClose => {
                open.pop();
            },
            // A list without a heading: splice its entries into this level.
            Token::ListOpen => open.push(parent),
            Token::Folder { title, add_date } => {
                entries.push(Entry {
                    parent,
                    kind: EntryKind::Folder { title, add_date },
                });
                if tokens.next_if_eq(&Token::ListOpen).is_some() {
                    open.push(Some(entries.len() - 1));
                }
            },
            Token::Link {
                title,
                href,
                icon,
                add_date,
            } => entries.push(Entry {
                parent,
                kind: EntryKind::Bookmark {
                    title,
                    href,
                    icon,
                    add_date,
                },
            }),
        }
    }
    Ok(entries)
}

fn tokenize(document: &str) -> Result<Vec<Token>, ParseError> {
    // ASCII lowercasing keeps byte offsets aligned with `document`.
    let lower = document.to_ascii_lowercase();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(found) = lower[pos..].find('<') {
        let start = pos + found;
        if lower[start..].starts_with("<!--") {
            pos = lower[start..]
                .find("-->")
                .map_or(lower.len(), |end| start + end + 3);
            continue;
        }

        let end = tag_end(document, start).ok_or(ParseError::UnterminatedTag(start))?;
        let tag = Tag::parse(&document[start + 1..end]);
        pos = end + 1;

        match (tag.closing, tag.name.as_str()) {
            (false, "dl") => tokens.push(Token::ListOpen),
            (true, "dl") => tokens.push(Token::ListClose),
            (false, "h3") => {
                let (title, next) = element_text(document, &lower, pos, "h3");
                pos = next;
                tokens.push(Token::Folder {
                    title,
                    add_date: tag.attr("add_date"),
                });
            },
            (false, "a") => {
                let (title, next) = element_text(document, &lower, pos, "a");
                pos = next;
                let Some(href) = tag.attr("href") else {
                    log::debug!("Skipping anchor without HREF: {title:?}");
                    continue;
                };
                tokens.push(Token::Link {
                    title,
                    href,
                    icon: tag.attr("icon"),
                    add_date: tag.attr("add_date"),
                });
            },
            _ => {},
        }
    }

    Ok(tokens)
}

/// Byte index of the `>` closing the tag opened at `start`, skipping quoted
/// attribute values.
fn tag_end(document: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, ch) in document[start + 1..].char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {},
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(start + 1 + offset),
            (None, _) => {},
        }
    }
    None
}

/// Decoded text up to the matching close tag, and the offset after it.
///
/// A missing close tag ends the text at the next `<`.
fn element_text(document: &str, lower: &str, pos: usize, name: &str) -> (String, usize) {
    let close = format!("</{name}");
    let (text_end, next) = match lower[pos..].find(&close) {
        Some(found) => {
            let close_start = pos + found;
            let after = lower[close_start..]
                .find('>')
                .map_or(lower.len(), |gt| close_start + gt + 1);
            (close_start, after)
        },
        None => {
            let stop = lower[pos..].find('<').map_or(lower.len(), |lt| pos + lt);
            (stop, stop)
        },
    };
    (decode_entities(document[pos..text_end].trim()), next)
}

struct Tag {
    name: String,
    closing: bool,
    attrs: Vec<(String, String)>,
}

impl Tag {
    fn parse(source: &str) -> Self {
        let source = source.trim();
        let (closing, body) = match source.strip_prefix('/') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, source),
        };
        let name_end = body
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(body.len());
        Self {
            name: body[..name_end].to_ascii_lowercase(),
            closing,
            attrs: parse_attrs(&body[name_end..]),
        }
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

fn parse_attrs(source: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = source;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return attrs;
        }

        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let Some(after_eq) = rest.strip_prefix('=') else {
            attrs.push((key, String::new()));
            continue;
        };
        let after_eq = after_eq.trim_start();

        let (raw, remaining) = match after_eq.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &after_eq[1..];
                match body.find(q) {
                    Some(close) => (&body[..close], &body[close + 1..]),
                    None => (body, ""),
                }
            },
            _ => {
                let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                (&after_eq[..end], &after_eq[end..])
            },
        };
        attrs.push((key, decode_entities(raw)));
        rest = remaining;
    }
}

/// Decode the named entities browsers emit plus numeric references.
/// Unknown entities are kept verbatim.
pub(crate) fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let semi = rest
            .char_indices()
            .take(12)
            .find(|&(_, c)| c == ';')
            .map(|(i, _)| i);
        let decoded = semi.and_then(|semi| entity_char(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            },
            None => {
                out.push('&');
                rest = &rest[1..];
            },
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        },
    }
}
