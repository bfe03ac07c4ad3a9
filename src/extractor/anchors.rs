//! Plain `a[href]` candidates.

use url::Url;

use super::make_candidate;
use crate::dom::{self, Document};
use crate::pool::Candidate;

/// One candidate per anchor whose href resolves and whose label is non-empty.
///
/// The label is the anchor's visible text, else its `title`, else its
/// `aria-label`.
#[must_use]
pub fn extract(doc: &Document, base: &Url) -> Vec<Candidate> {
    doc.select("a[href]")
        .nodes()
        .iter()
        .filter_map(|node| {
            let href = dom::get_attribute(node, "href")?;
            make_candidate(&dom::element_label(node), &href, base)
        })
        .collect()
}
