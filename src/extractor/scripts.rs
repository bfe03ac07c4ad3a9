//! Candidates from inline handlers that call functions defined in page scripts.
//!
//! `<button onclick="openFaq()">FAQ</button>` says nothing about its target
//! until `openFaq` is looked up in the inline `<script>` blocks. The function
//! body is located by declaration shape, cut out by brace matching and then
//! scanned for a navigation sink or, failing that, the first quoted URL
//! literal.

use std::collections::HashMap;

use regex::Regex;
use tracing::trace;
use url::Url;

use super::make_candidate;
use crate::dom::{self, Document};
use crate::patterns::{is_url_literal, FORM_SUBMIT_SINK, HANDLER_CALL, NAVIGATION_SINK, QUOTED_LITERAL};
use crate::pool::Candidate;
use crate::Options;

/// URL passed to the first navigation sink in `js`.
///
/// Only sink arguments that are URL literals count.
#[must_use]
pub fn sink_url(js: &str, url_literal: &Regex) -> Option<String> {
    [&*NAVIGATION_SINK, &*FORM_SUBMIT_SINK]
        .into_iter()
        .flat_map(|sink| sink.captures_iter(js))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|value| is_url_literal(url_literal, value))
        .map(str::to_string)
}

/// Navigation sink URL of a function body, else its first quoted URL literal.
#[must_use]
pub fn body_url(body: &str, url_literal: &Regex) -> Option<String> {
    sink_url(body, url_literal).or_else(|| {
        QUOTED_LITERAL
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|value| is_url_literal(url_literal, value))
            .map(str::to_string)
    })
}

/// Words that look like calls in handler code but never name a page function.
const NOT_FUNCTIONS: &[&str] = &[
    "catch", "for", "function", "if", "new", "return", "switch", "typeof", "void", "while",
];

/// Names of the plain functions an inline handler calls, in call order.
///
/// Method calls such as `event.preventDefault()` are left out.
pub fn handler_functions(handler: &str) -> impl Iterator<Item = &str> {
    HANDLER_CALL
        .captures_iter(handler)
        .filter_map(|caps| caps.get(1))
        .filter(move |m| !handler[..m.start()].ends_with('.'))
        .map(|m| m.as_str())
        .filter(|name| !NOT_FUNCTIONS.contains(name))
}

/// Body of the first definition of `name` found in `scripts`.
///
/// Recognizes `function name(…) {`, `name = function(…) {` and
/// `const|let|var name = (…) => {`. The body runs to the matching closing
/// brace, or to the end of the script when braces never balance.
#[must_use]
pub fn find_function_body<'s>(scripts: &'s [String], name: &str) -> Option<&'s str> {
    let declarations = declaration_patterns(name);
    scripts.iter().find_map(|script| {
        declarations
            .iter()
            .filter_map(|re| re.find(script))
            .min_by_key(regex::Match::start)
            .map(|m| block_body(&script[m.end()..]))
    })
}

fn declaration_patterns(name: &str) -> Vec<Regex> {
    let name = regex::escape(name);
    [
        format!(r"\bfunction\s+{name}\s*\([^)]*\)\s*\{{"),
        format!(r"(?:^|[^\w$]){name}\s*=\s*function\s*\([^)]*\)\s*\{{"),
        format!(r"\b(?:const|let|var)\s+{name}\s*=\s*(?:async\s*)?\([^)]*\)\s*=>\s*\{{"),
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}

/// Scanner state inside a function body.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Text up to the brace closing an already opened block.
///
/// Braces and quotes inside string literals and comments are ignored.
fn block_body(after_open: &str) -> &str {
    let mut depth = 1usize;
    let mut state = Scan::Code;
    let mut escaped = false;
    let mut prev = '\0';

    for (idx, ch) in after_open.char_indices() {
        match state {
            Scan::Quoted(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    state = Scan::Code;
                }
            }
            Scan::LineComment => {
                if ch == '\n' {
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if prev == '*' && ch == '/' {
                    state = Scan::Code;
                    prev = '\0';
                    continue;
                }
            }
            Scan::Code => match ch {
                '/' if prev == '/' => {
                    state = Scan::LineComment;
                    prev = '\0';
                    continue;
                }
                '*' if prev == '/' => {
                    state = Scan::BlockComment;
                    prev = '\0';
                    continue;
                }
                '\'' | '"' | '`' => state = Scan::Quoted(ch),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return &after_open[..idx];
                    }
                }
                _ => {}
            },
        }
        prev = ch;
    }
    after_open
}

/// One candidate per element whose inline handler calls a page function that
/// navigates somewhere.
///
/// Handlers are every `on*` attribute plus `javascript:` hrefs. Lookups are
/// cached per function name.
#[must_use]
pub fn extract(doc: &Document, base: &Url, options: &Options) -> Vec<Candidate> {
    let scripts: Vec<String> = doc
        .select("script")
        .nodes()
        .iter()
        .map(|node| node.text().to_string())
        .filter(|text| !text.trim().is_empty())
        .collect();
    if scripts.is_empty() {
        return Vec::new();
    }

    let mut resolved: HashMap<String, Option<String>> = HashMap::new();
    let mut out = Vec::new();

    for node in doc.select("*").nodes() {
        for (name, value) in dom::get_all_attributes(node) {
            let is_handler = name.starts_with("on")
                || (name == "href" && value.trim_start().to_ascii_lowercase().starts_with("javascript:"));
            if !is_handler {
                continue;
            }
            let url = handler_functions(&value).find_map(|function| {
                resolved
                    .entry(function.to_string())
                    .or_insert_with(|| {
                        let url = find_function_body(&scripts, function)
                            .and_then(|body| body_url(body, &options.url_literal));
                        if url.is_none() {
                            trace!(function, "handler target not found");
                        }
                        url
                    })
                    .clone()
            });

            if let Some(url) = url {
                let label = dom::truncate_chars(&dom::element_label(node), options.label_max_chars);
                out.extend(make_candidate(&label, &url, base));
            }
        }
    }
    out
}
