//! Candidate extraction from one HTML document.
//!
//! Four strategies run in a fixed order and their results are concatenated:
//!
//! - `nav_tree`: nested navigation lists, labelled with full `[a] > [b]` paths
//! - [`anchors`]: every `a[href]`
//! - [`elements`]: the configurable `(element, attribute)` rule table
//! - [`scripts`]: inline handlers calling functions defined in page scripts
//!
//! Labels from the flat strategies are upgraded to the navigation path label
//! when the tree saw the same `(label, url)` pair. URLs are resolved against
//! the document base and duplicates are dropped in first-seen order.

pub mod anchors;
pub mod elements;
pub mod scripts;

use std::collections::HashSet;

use tracing::trace;
use url::Url;

use crate::dom::{self, Document};
use crate::nav_tree::{self, LeafMap};
use crate::pool::Candidate;
use crate::url_utils;
use crate::Options;

/// Extract every `(label, absolute url)` candidate of a document.
///
/// Never fails: malformed markup is repaired by the parser and elements that
/// cannot produce a candidate are skipped individually.
///
/// # Example
///
/// ```rust
/// use menu_label::{extractor::extract_candidates, Options};
/// use url::Url;
///
/// let html = r#"<ul class="gnb"><li><a href="/board">Board</a></li></ul>"#;
/// let url = Url::parse("https://ex.com/").unwrap();
/// let found = extract_candidates(html, &url, &Options::default());
/// assert_eq!(found[0].label, "[Board]");
/// assert_eq!(found[0].url, "https://ex.com/board");
/// ```
#[must_use]
pub fn extract_candidates(html: &str, document_url: &Url, options: &Options) -> Vec<Candidate> {
    let doc = Document::from(html);

    let base_href = doc
        .select("base[href]")
        .nodes()
        .first()
        .and_then(|node| dom::get_attribute(node, "href"));
    let base = url_utils::document_base(document_url, base_href.as_deref());

    let tree = nav_tree::build_nav_tree(&doc, options);
    let (tree_candidates, leaf_map) = nav_tree::flatten(&tree, &base);

    let mut flat = anchors::extract(&doc, &base);
    flat.extend(elements::extract(&doc, &base, options));
    flat.extend(scripts::extract(&doc, &base, options));
    upgrade_labels(&mut flat, &leaf_map);

    let mut seen = HashSet::new();
    let candidates: Vec<Candidate> = tree_candidates
        .into_iter()
        .chain(flat)
        .filter(|c| seen.insert(c.clone()))
        .collect();

    trace!(
        url = %document_url,
        nav_nodes = tree.descendant_count(),
        candidates = candidates.len(),
        "document extracted"
    );
    candidates
}

/// Replace flat labels by the navigation path label of the same link.
fn upgrade_labels(candidates: &mut [Candidate], leaf_map: &LeafMap) {
    if leaf_map.is_empty() {
        return;
    }
    for candidate in candidates {
        let key = (candidate.label.clone(), candidate.url.clone());
        if let Some(path_label) = leaf_map.get(&key) {
            candidate.label.clone_from(path_label);
        }
    }
}

/// Candidate with a whitespace-collapsed label, or `None` when the label is
/// empty or the URL does not resolve to http(s).
pub(crate) fn make_candidate(label: &str, raw_url: &str, base: &Url) -> Option<Candidate> {
    let label = dom::collapse_whitespace(label);
    if label.is_empty() {
        trace!(url = raw_url, "dropped: empty label");
        return None;
    }
    let Some(url) = url_utils::resolve_url(raw_url, base) else {
        trace!(url = raw_url, "dropped: unresolvable url");
        return None;
    };
    Some(Candidate::new(label, url))
}
