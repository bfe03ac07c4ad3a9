//! Candidates from non-anchor elements, driven by the rule table in
//! [`Options::element_rules`].

use tracing::trace;
use url::Url;

use super::{make_candidate, scripts};
use crate::dom::{self, Document, NodeRef, Selection};
use crate::options::{ElementRule, RuleKind};
use crate::patterns::is_url_literal;
use crate::pool::Candidate;
use crate::Options;

/// Apply every matching rule to every element, in document order.
#[must_use]
pub fn extract(doc: &Document, base: &Url, options: &Options) -> Vec<Candidate> {
    let mut out = Vec::new();
    for node in doc.select("*").nodes() {
        let Some(tag) = dom::tag_name(node) else {
            continue;
        };
        for rule in options.element_rules.iter().filter(|r| r.applies_to(&tag)) {
            apply_rule(node, rule, base, options, &mut out);
        }
    }
    out
}

fn apply_rule(
    node: &NodeRef,
    rule: &ElementRule,
    base: &Url,
    options: &Options,
    out: &mut Vec<Candidate>,
) {
    let Some(value) = dom::get_attribute(node, &rule.attribute) else {
        return;
    };
    let value = value.trim();

    match rule.kind {
        RuleKind::Literal => {
            if !is_url_literal(&options.url_literal, value) {
                trace!(attribute = %rule.attribute, value, "dropped: not a url literal");
                return;
            }
            out.extend(make_candidate(&label_of(node, options), value, base));
        }
        RuleKind::InlineScript => {
            if let Some(url) = scripts::sink_url(value, &options.url_literal) {
                out.extend(make_candidate(&label_of(node, options), &url, base));
            }
        }
        RuleKind::SelectOptions => {
            if !value.contains("this.value") {
                return;
            }
            for option in Selection::from(*node).select("option").nodes() {
                let Some(target) = dom::get_attribute(option, "value") else {
                    continue;
                };
                let target = target.trim();
                if is_url_literal(&options.url_literal, target) {
                    out.extend(make_candidate(&label_of(option, options), target, base));
                }
            }
        }
    }
}

fn label_of(node: &NodeRef, options: &Options) -> String {
    dom::truncate_chars(&dom::element_label(node), options.label_max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<Candidate> {
        let base = Url::parse("https://ex.com/").unwrap_or_else(|e| panic!("{e}"));
        extract(&Document::from(html), &base, &Options::default())
    }

    #[test]
    fn data_attributes_are_literals() {
        assert_eq!(
            run(r#"<li data-url="/notice/list">공지</li><div data-route="dashboard">Dash</div>"#),
            vec![Candidate::new("공지", "https://ex.com/notice/list")]
        );
    }

    #[test]
    fn form_action_uses_form_text() {
        let found = run(r#"<form action="/search.do"><button>Search</button></form>"#);
        assert_eq!(found, vec![Candidate::new("Search", "https://ex.com/search.do")]);
    }

    #[test]
    fn button_formaction() {
        let found = run(r#"<form><button formaction="/save">Save</button></form>"#);
        assert_eq!(found, vec![Candidate::new("Save", "https://ex.com/save")]);
    }

    #[test]
    fn onclick_sinks() {
        let found = run(
            r#"<span onclick="location.href='/help/qna'">Q&amp;A</span>
               <span onclick="window.open('https://other.org/pop')">Popup</span>
               <span onclick="alert('hi')">Nope</span>"#,
        );
        assert_eq!(
            found,
            vec![
                Candidate::new("Q&A", "https://ex.com/help/qna"),
                Candidate::new("Popup", "https://other.org/pop"),
            ]
        );
    }

    #[test]
    fn select_options_become_candidates() {
        let found = run(
            r#"<select onchange="location.href=this.value">
                 <option value="">Choose</option>
                 <option value="/site/a">Site A</option>
                 <option value="/site/b">Site B</option>
               </select>"#,
        );
        assert_eq!(
            found,
            vec![
                Candidate::new("Site A", "https://ex.com/site/a"),
                Candidate::new("Site B", "https://ex.com/site/b"),
            ]
        );
    }

    #[test]
    fn select_without_this_value_is_ignored() {
        assert!(run(r#"<select onchange="filter()"><option value="/a">A</option></select>"#).is_empty());
    }

    #[test]
    fn long_labels_are_truncated() {
        let text = "x".repeat(200);
        let found = run(&format!(r#"<div data-href="/long">{text}</div>"#));
        assert_eq!(found[0].label.chars().count(), 80);
    }
}
