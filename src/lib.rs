//! # menu-label
//!
//! Recovers the human-readable menu label of a URL from captured web traffic.
//!
//! Every HTML response in a batch of captured HTTP sessions is mined for
//! `(label, url)` candidates: navigation menus (kept with their full
//! `[Parent] > [Child]` path), plain links, interactive elements carrying URLs
//! in attributes, and inline handlers that navigate via page scripts. The
//! candidates are pooled per host. A query URL is then scored against the
//! pool of its host (and its referer's host) and the best label is returned
//! when it clears a confidence threshold.
//!
//! ## Quick Start
//!
//! ```rust
//! use menu_label::{best_menu_for_url, build_candidate_pool, Session};
//!
//! let session = Session::new(
//!     "GET /board/list.do HTTP/1.1\r\nHost: example.com\r\n\r\n",
//!     "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\r\n\
//!      <ul class=\"gnb\"><li><a href=\"/board/list.do\">Board</a>\
//!      <ul><li><a href=\"/board/notice.do\">Notice</a></li></ul></li></ul>",
//! );
//!
//! let pool = build_candidate_pool(&[session], None, 200);
//! let result = best_menu_for_url("https://example.com/board/notice.do", &pool, None, 58.0);
//! assert_eq!(result.label.as_deref(), Some("[Board] > [Notice]"));
//! ```
//!
//! ## Pipeline
//!
//! - [`http`]: session parsing and document URL reconstruction
//! - [`encoding`]: body decoding (header charset, meta charset, fallbacks)
//! - [`extractor`]: the four candidate strategies over one document
//! - [`pool`]: host-partitioned candidate pool and its builder
//! - [`scoring`] and [`matcher`]: URL similarity and best-label lookup

mod error;
mod options;

/// Compiled regex patterns.
pub mod patterns;

/// DOM helpers over `dom_query` and the tag-event stream.
pub mod dom;

/// URL resolution and host keys.
pub mod url_utils;

/// Character encoding detection and decoding of response bodies.
pub mod encoding;

/// Captured HTTP sessions.
pub mod http;

/// Navigation tree building and path labels.
pub mod nav_tree;

/// Candidate extraction strategies.
pub mod extractor;

/// Candidate pool and pool building.
pub mod pool;

/// URL similarity scoring.
pub mod scoring;

/// Best-label lookup.
pub mod matcher;

use std::borrow::Borrow;

// Public API - re-exports
pub use error::{Error, Result};
pub use http::Session;
pub use matcher::{MatchResult, Matcher};
pub use options::{default_element_rules, ElementRule, Options, RuleKind, ScoringWeights};
pub use pool::{BuildReport, Candidate, CandidatePool, PoolBuilder, SessionOutcome, SkipReason};

/// Builds the candidate pool from captured sessions with default options.
///
/// Sessions whose response is not HTML, or that cannot be processed, are
/// skipped; use [`PoolBuilder`] to see why. `progress` receives
/// `(processed, total)` after the first session, every `progress_every`-th
/// session and the last one. `sessions` may yield owned or borrowed
/// sessions and is consumed lazily.
///
/// # Example
///
/// ```rust
/// use menu_label::{build_candidate_pool, Session};
///
/// let json = Session::new(
///     "GET /api HTTP/1.1\r\nHost: ex.com\r\n\r\n",
///     "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{}",
/// );
/// let mut calls = Vec::new();
/// let pool = build_candidate_pool(&[json], Some(&mut |i, n| calls.push((i, n))), 10);
/// assert!(pool.is_empty());
/// assert_eq!(calls, [(1, 1)]);
/// ```
#[must_use]
pub fn build_candidate_pool<I, S>(
    sessions: I,
    progress: Option<&mut dyn FnMut(usize, usize)>,
    progress_every: usize,
) -> CandidatePool
where
    I: IntoIterator<Item = S>,
    S: Borrow<Session>,
{
    let options = Options {
        progress_every,
        ..Options::default()
    };
    PoolBuilder::new(&options).build(sessions, progress).0
}

/// Finds the best menu label for `url` with default scoring options.
///
/// Candidates come from the pool bucket of the URL's host, plus the bucket of
/// `referer_url`'s host when it differs. The label and matched URL are only
/// returned when the best score is at least `threshold`; the score is
/// returned either way.
#[must_use]
pub fn best_menu_for_url(
    url: &str,
    pool: &CandidatePool,
    referer_url: Option<&str>,
    threshold: f64,
) -> MatchResult {
    let options = Options::default();
    Matcher::new(pool, &options).best_with_threshold(url, referer_url, threshold)
}
