//! Best-label lookup for a URL against a built [`CandidatePool`].

use tracing::trace;

use crate::pool::{Candidate, CandidatePool};
use crate::scoring;
use crate::url_utils;
use crate::Options;

/// Outcome of a lookup.
///
/// `score` is always the best score seen. `label` and `matched_url` are only
/// set when that score reached the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub label: Option<String>,
    pub score: f64,
    pub matched_url: Option<String>,
}

impl MatchResult {
    /// No candidate scored above zero.
    #[must_use]
    pub fn none() -> Self {
        Self {
            label: None,
            score: 0.0,
            matched_url: None,
        }
    }

    /// Whether a label was confirmed.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.label.is_some()
    }
}

/// Scores a query URL against the pool candidates of its host.
pub struct Matcher<'a> {
    pool: &'a CandidatePool,
    options: &'a Options,
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub fn new(pool: &'a CandidatePool, options: &'a Options) -> Self {
        Self { pool, options }
    }

    /// Candidates considered for `url`: its own host's, then the referer's
    /// host's when that is a different host.
    #[must_use]
    pub fn candidates_for(&self, url: &str, referer: Option<&str>) -> Vec<&'a Candidate> {
        let key = url_utils::hostkey(url);
        let mut out: Vec<&Candidate> = self.pool.get(&key).iter().collect();

        if let Some(referer) = referer.map(str::trim).filter(|r| !r.is_empty()) {
            let referer_key = url_utils::hostkey(referer);
            if referer_key != key {
                out.extend(self.pool.get(&referer_key));
            }
        }
        out
    }

    /// Best label for `url` using the configured threshold.
    #[must_use]
    pub fn best(&self, url: &str, referer: Option<&str>) -> MatchResult {
        self.best_with_threshold(url, referer, self.options.threshold)
    }

    /// Best label for `url`; confirmed only when the best score reaches
    /// `threshold`.
    ///
    /// The first candidate with the highest score wins.
    #[must_use]
    pub fn best_with_threshold(&self, url: &str, referer: Option<&str>, threshold: f64) -> MatchResult {
        let url = url.trim();
        if url.is_empty() {
            return MatchResult::none();
        }

        let mut best: Option<(&Candidate, f64)> = None;
        for candidate in self.candidates_for(url, referer) {
            let score = scoring::score(url, &candidate.url, &candidate.label, self.options).total;
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((candidate, score));
            }
        }

        let Some((candidate, score)) = best else {
            trace!(url, "no scoring candidate");
            return MatchResult::none();
        };

        if score >= threshold {
            MatchResult {
                label: Some(candidate.label.clone()),
                score,
                matched_url: Some(candidate.url.clone()),
            }
        } else {
            trace!(url, score, threshold, "best candidate below threshold");
            MatchResult {
                label: None,
                score,
                matched_url: None,
            }
        }
    }
}
