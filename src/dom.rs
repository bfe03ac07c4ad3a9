//! DOM access helpers and the tag-event stream.
//!
//! Documents are parsed leniently by `dom_query` (unclosed and invalid tags are
//! repaired by the html5ever tree builder). Consumers that need nesting, like
//! the navigation tree builder, read the document as a flat stream of
//! [`TagEvent`]s instead of recursing over nodes.

pub use dom_query::{Document, NodeRef, Selection};
pub use tendril::StrTendril;

use crate::patterns::WHITESPACE_NORMALIZE;

/// One step of a depth-first walk over the document.
#[derive(Clone)]
pub enum TagEvent<'a> {
    /// An element starts. Attributes are read from the node.
    Open(NodeRef<'a>),
    /// Text directly inside the current element.
    Text(StrTendril),
    /// The element opened by the matching `Open` ends.
    Close(NodeRef<'a>),
}

/// Iterator yielding [`TagEvent`]s in document order.
///
/// Uses an explicit stack, so arbitrarily deep markup never recurses.
pub struct TagEvents<'a> {
    stack: Vec<(NodeRef<'a>, bool)>,
}

impl<'a> Iterator for TagEvents<'a> {
    type Item = TagEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, entered) = self.stack.pop()?;

            if entered {
                return Some(TagEvent::Close(node));
            }

            if node.is_text() {
                return Some(TagEvent::Text(node.text()));
            }

            let children = node.children();
            if node.is_element() {
                self.stack.push((node, true));
            }
            for child in children.into_iter().rev() {
                self.stack.push((child, false));
            }

            if node.is_element() {
                return Some(TagEvent::Open(node));
            }
        }
    }
}

/// Walk the whole document as a stream of tag events.
#[must_use]
pub fn tag_events(doc: &Document) -> TagEvents<'_> {
    TagEvents {
        stack: vec![(doc.root(), false)],
    }
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    Selection::from(*node).attr(name).map(|s| s.to_string())
}

/// Combined `class` and `id` values, space separated.
#[must_use]
pub fn class_and_id(node: &NodeRef) -> String {
    let sel = Selection::from(*node);
    let class = sel.attr("class").unwrap_or_default();
    let id = sel.attr("id").unwrap_or_default();
    format!(" {class} {id} ")
}

/// Get all attributes as key-value pairs
#[must_use]
pub fn get_all_attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

// === Text Content ===

/// Collapse whitespace runs and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}

/// Visible text of an element: descendant text with whitespace collapsed.
///
/// Entities are already resolved by the parser.
#[must_use]
pub fn visible_text(node: &NodeRef) -> String {
    collapse_whitespace(&node.text())
}

/// Visible text, falling back to `title` then `aria-label`.
#[must_use]
pub fn element_label(node: &NodeRef) -> String {
    let text = visible_text(node);
    if !text.is_empty() {
        return text;
    }
    ["title", "aria-label"]
        .iter()
        .filter_map(|name| get_attribute(node, name))
        .map(|v| collapse_whitespace(&v))
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Truncate to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
