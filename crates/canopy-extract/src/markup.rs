//! Markup (XML) extractor: recursive conversion into the canonical tree.
//!
//! The shape of the output depends on sibling multiplicity and on whether
//! an element has children:
//! - a tag seen once among its siblings maps to the converted child
//!   directly; on the second occurrence the existing entry is promoted
//!   into a sequence and extended in encounter order;
//! - an element with direct text and no children collapses to a scalar of
//!   the trimmed text, not a one-entry mapping;
//! - an element with direct text and children gets a synthetic `#text`
//!   entry after the child entries;
//! - an element with neither collapses to an empty mapping.
//!
//! "Direct text" is only the text between the start tag and the first
//! child element. These rules are load-bearing for downstream comparisons
//! and must not be normalized away.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use canopy_core::{DocFormat, Error, Result, Tree};

pub fn extract(path: &Path) -> Result<Tree> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::extraction(DocFormat::Markup, path, e))?;
    parse_str(&content).map_err(|e| Error::extraction(DocFormat::Markup, path, e))
}

/// Convert a markup document held in memory.
pub fn parse_str(content: &str) -> std::result::Result<Tree, quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    loop {
        match reader.read_event()? {
            Event::Start(_) => return read_element(&mut reader),
            Event::Empty(_) => return Ok(Tree::mapping()),
            Event::Eof => {
                return Err(quick_xml::Error::Io(std::sync::Arc::new(
                    std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no root element"),
                )))
            }
            // Declarations, comments, doctypes, and whitespace before the
            // root element.
            _ => {}
        }
    }
}

/// Read the body of an element whose start tag was just consumed, up to
/// and including its end tag.
fn read_element(reader: &mut Reader<&[u8]>) -> std::result::Result<Tree, quick_xml::Error> {
    let mut children: Vec<(String, Tree)> = Vec::new();
    let mut leading_text = String::new();
    let mut seen_child = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                let child = read_element(reader)?;
                insert_child(&mut children, tag, child);
                seen_child = true;
            }
            Event::Empty(start) => {
                let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                insert_child(&mut children, tag, Tree::mapping());
                seen_child = true;
            }
            Event::Text(text) => {
                if !seen_child {
                    leading_text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if !seen_child {
                    leading_text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(quick_xml::Error::Io(std::sync::Arc::new(
                    std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "unclosed element"),
                )))
            }
            _ => {}
        }
    }

    let text = leading_text.trim();
    if children.is_empty() {
        if text.is_empty() {
            Ok(Tree::Mapping(children))
        } else {
            Ok(Tree::scalar(text))
        }
    } else {
        if !text.is_empty() {
            children.push(("#text".to_string(), Tree::scalar(text)));
        }
        Ok(Tree::Mapping(children))
    }
}

/// Accumulate a converted child under its tag, promoting to a sequence on
/// the second occurrence. A converted child is always a scalar or a
/// mapping, never a bare sequence, so an already-promoted entry can only
/// mean repeated siblings.
fn insert_child(entries: &mut Vec<(String, Tree)>, tag: String, value: Tree) {
    match entries.iter_mut().find(|(k, _)| *k == tag) {
        Some((_, existing)) => match existing {
            Tree::Sequence(items) => items.push(value),
            _ => {
                let first = std::mem::replace(existing, Tree::Sequence(Vec::with_capacity(2)));
                if let Tree::Sequence(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
        },
        None => entries.push((tag, value)),
    }
}
