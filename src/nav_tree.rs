//! Navigation tree building and path labels.
//!
//! Nested `ul`/`ol` lists inside a navigation or breadcrumb container are read
//! from the tag-event stream into a [`NavNode`] tree. Each `li` becomes a node
//! labelled by its anchor text; lists nested in an item become its children.
//! Flattening the tree yields one `[Parent] > [Child]` path label per linked
//! node, plus a [`LeafMap`] that lets flatter extraction strategies upgrade
//! their labels.

use std::collections::HashMap;

use url::Url;

use crate::dom::{self, Document, TagEvent};
use crate::pool::Candidate;
use crate::url_utils;
use crate::Options;

/// Separator between path label segments.
pub const PATH_SEPARATOR: &str = " > ";

/// `(leaf label, absolute url)` to full path label.
pub type LeafMap = HashMap<(String, String), String>;

/// One navigation entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavNode {
    pub label: String,
    pub url: Option<String>,
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Total number of nodes below this one.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// Format label segments as `[a] > [b] > [c]`.
#[must_use]
pub fn format_path_label<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| format!("[{}]", s.as_ref()))
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Whether a label has the bracketed path label shape.
#[must_use]
pub fn is_path_label(label: &str) -> bool {
    label.starts_with('[') && label.ends_with(']')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    None,
    Pushed,
    Suppressed,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    hinted: bool,
    list: bool,
    item: Item,
    anchor: bool,
}

#[derive(Debug, Default)]
struct AnchorBuffer {
    text: String,
    href: Option<String>,
}

/// Stack machine turning tag events into a [`NavNode`] tree.
struct NavTreeBuilder<'o> {
    options: &'o Options,
    /// Open nav nodes; index 0 is the synthetic root.
    nodes: Vec<NavNode>,
    frames: Vec<Frame>,
    hinted_depth: usize,
    tracked_lists: usize,
    suppressed: usize,
    anchor: Option<AnchorBuffer>,
}

impl<'o> NavTreeBuilder<'o> {
    fn new(options: &'o Options) -> Self {
        Self {
            options,
            nodes: vec![NavNode::default()],
            frames: Vec::new(),
            hinted_depth: 0,
            tracked_lists: 0,
            suppressed: 0,
            anchor: None,
        }
    }

    fn item_depth(&self) -> usize {
        self.nodes.len() - 1
    }

    fn open(&mut self, node: &dom::NodeRef) {
        let tag = dom::tag_name(node).unwrap_or_default();

        let hinted = tag == "nav" || self.options.has_nav_hint(&dom::class_and_id(node));
        if hinted {
            self.hinted_depth += 1;
        }

        let list = matches!(tag.as_str(), "ul" | "ol") && self.hinted_depth > 0;
        if list {
            self.tracked_lists += 1;
        }

        let mut item = Item::None;
        if tag == "li" && self.tracked_lists > 0 {
            if self.suppressed == 0 && self.item_depth() < self.options.max_path_depth {
                self.nodes.push(NavNode::default());
                item = Item::Pushed;
            } else {
                self.suppressed += 1;
                item = Item::Suppressed;
            }
        }

        let anchor = tag == "a"
            && self.anchor.is_none()
            && self.suppressed == 0
            && self.item_depth() > 0;
        if anchor {
            self.anchor = Some(AnchorBuffer {
                text: String::new(),
                href: dom::get_attribute(node, "href"),
            });
        }

        self.frames.push(Frame {
            hinted,
            list,
            item,
            anchor,
        });
    }

    fn text(&mut self, text: &str) {
        if let Some(anchor) = self.anchor.as_mut() {
            anchor.text.push_str(text);
        }
    }

    fn close(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        if frame.anchor {
            self.finish_anchor();
        }

        match frame.item {
            Item::Pushed => {
                if self.nodes.len() > 1 {
                    if let Some(done) = self.nodes.pop() {
                        if let Some(parent) = self.nodes.last_mut() {
                            parent.children.push(done);
                        }
                    }
                }
            }
            Item::Suppressed => self.suppressed -= 1,
            Item::None => {}
        }

        if frame.list {
            self.tracked_lists -= 1;
        }
        if frame.hinted {
            self.hinted_depth -= 1;
        }
    }

    fn finish_anchor(&mut self) {
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        let label = dom::collapse_whitespace(&anchor.text);
        if label.is_empty() || self.item_depth() == 0 {
            return;
        }
        if let Some(current) = self.nodes.last_mut() {
            // First anchor of an item names it.
            if current.label.is_empty() {
                current.label = label;
            }
            if current.url.is_none() {
                current.url = anchor.href.filter(|h| !h.trim().is_empty());
            }
        }
    }

    fn finish(mut self) -> NavNode {
        while self.nodes.len() > 1 {
            if let Some(done) = self.nodes.pop() {
                if let Some(parent) = self.nodes.last_mut() {
                    parent.children.push(done);
                }
            }
        }
        self.nodes.pop().unwrap_or_default()
    }
}

/// Build the navigation tree of one document.
///
/// The returned root is synthetic (empty label); top-level menu entries are
/// its children. Hrefs are stored as written in the markup.
#[must_use]
pub fn build_nav_tree(doc: &Document, options: &Options) -> NavNode {
    let mut builder = NavTreeBuilder::new(options);
    for event in dom::tag_events(doc) {
        match event {
            TagEvent::Open(node) => builder.open(&node),
            TagEvent::Text(text) => builder.text(&text),
            TagEvent::Close(_) => builder.close(),
        }
    }
    builder.finish()
}

/// Flatten a navigation tree into path-labelled candidates.
///
/// Every node with a label and a resolvable http(s) URL yields one candidate
/// whose label joins all labelled ancestors and itself. The leaf map records
/// `(node label, absolute url) -> path label` for label upgrades.
#[must_use]
pub fn flatten(root: &NavNode, base: &Url) -> (Vec<Candidate>, LeafMap) {
    let mut candidates = Vec::new();
    let mut leaf_map = LeafMap::new();
    let mut path: Vec<&str> = Vec::new();

    for child in &root.children {
        walk(child, base, &mut path, &mut candidates, &mut leaf_map);
    }
    (candidates, leaf_map)
}

fn walk<'n>(
    node: &'n NavNode,
    base: &Url,
    path: &mut Vec<&'n str>,
    candidates: &mut Vec<Candidate>,
    leaf_map: &mut LeafMap,
) {
    let label = node.label.trim();
    if !label.is_empty() {
        path.push(label);
    }

    if !label.is_empty() {
        let resolved = node
            .url
            .as_deref()
            .and_then(|href| url_utils::resolve_url(href, base));
        if let Some(url) = resolved {
            let path_label = format_path_label(path.as_slice());
            leaf_map
                .entry((label.to_string(), url.clone()))
                .or_insert_with(|| path_label.clone());
            candidates.push(Candidate::new(path_label, url));
        }
    }

    for child in &node.children {
        walk(child, base, path, candidates, leaf_map);
    }

    if !label.is_empty() {
        path.pop();
    }
}
