//! Candidate pool: deduplicated `(label, url)` pairs partitioned by host key.
//!
//! The pool is built once per batch of captured sessions by [`PoolBuilder`]
//! and is read-only afterwards. Within a host, candidates keep their insertion
//! order so that ties during matching resolve to the earliest entry.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::encoding;
use crate::error::{Error, Result};
use crate::extractor;
use crate::http::{self, Session};
use crate::url_utils;
use crate::Options;

/// A label believed to name the page at `url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub url: String,
}

impl Candidate {
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct HostBucket {
    items: Vec<Candidate>,
    seen: HashSet<Candidate>,
}

/// Host key to ordered, unique candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    hosts: BTreeMap<String, HostBucket>,
}

impl CandidatePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under an explicit host key. Returns false for a duplicate pair.
    pub fn insert(&mut self, host_key: &str, candidate: Candidate) -> bool {
        let bucket = self.hosts.entry(host_key.to_string()).or_default();
        if bucket.seen.contains(&candidate) {
            return false;
        }
        bucket.seen.insert(candidate.clone());
        bucket.items.push(candidate);
        true
    }

    /// Insert under the host key of the candidate's own URL.
    pub fn insert_candidate(&mut self, candidate: Candidate) -> bool {
        let key = url_utils::hostkey(&candidate.url);
        self.insert(&key, candidate)
    }

    /// Candidates for a host key, in insertion order.
    #[must_use]
    pub fn get(&self, host_key: &str) -> &[Candidate] {
        self.hosts
            .get(host_key)
            .map_or(&[][..], |bucket| bucket.items.as_slice())
    }

    #[must_use]
    pub fn contains(&self, host_key: &str, candidate: &Candidate) -> bool {
        self.hosts
            .get(host_key)
            .is_some_and(|bucket| bucket.seen.contains(candidate))
    }

    /// Host keys in sorted order.
    pub fn host_keys(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Total number of candidates across all hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.values().map(|b| b.items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the pool in which every URL keeps only its longest label.
    ///
    /// Label length is counted in characters; on equal length the earlier
    /// label stays. Surviving entries keep their original relative order.
    #[must_use]
    pub fn prefer_longest_labels(&self) -> Self {
        let mut out = Self::new();
        for (host, bucket) in &self.hosts {
            let mut best: HashMap<&str, &Candidate> = HashMap::new();
            for candidate in &bucket.items {
                best.entry(candidate.url.as_str())
                    .and_modify(|current| {
                        if candidate.label.chars().count() > current.label.chars().count() {
                            *current = candidate;
                        }
                    })
                    .or_insert(candidate);
            }
            for candidate in &bucket.items {
                if best
                    .get(candidate.url.as_str())
                    .is_some_and(|kept| std::ptr::eq(*kept, candidate))
                {
                    out.insert(host, candidate.clone());
                }
            }
        }
        out
    }

    /// Serialize as `{ "host": [["label", "url"], ...], ... }`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if JSON encoding fails.
    pub fn to_json(&self) -> Result<String> {
        let raw: BTreeMap<&str, Vec<(&str, &str)>> = self
            .hosts
            .iter()
            .map(|(host, bucket)| {
                let pairs = bucket
                    .items
                    .iter()
                    .map(|c| (c.label.as_str(), c.url.as_str()))
                    .collect();
                (host.as_str(), pairs)
            })
            .collect();
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    /// Load a pool previously written by [`CandidatePool::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<(String, String)>> = serde_json::from_str(json)?;
        let mut pool = Self::new();
        for (host, pairs) in raw {
            for (label, url) in pairs {
                pool.insert(&host, Candidate::new(label, url));
            }
        }
        Ok(pool)
    }
}

/// Why a session contributed nothing to the pool.
#[derive(Debug)]
pub enum SkipReason {
    /// Response is not HTML/XHTML.
    NotHtml,
    /// The document yielded no candidates.
    NoCandidates,
    /// Processing failed.
    Failed(Error),
}

/// Result of processing one session.
#[derive(Debug)]
pub enum SessionOutcome {
    Indexed {
        /// Candidates extracted from the document.
        extracted: usize,
        /// Of those, how many were new to the pool.
        added: usize,
    },
    Skipped(SkipReason),
}

/// Per-session outcomes of one build, in session order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<SessionOutcome>,
}

impl BuildReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn indexed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SessionOutcome::Indexed { .. }))
            .count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.total() - self.indexed()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SessionOutcome::Skipped(SkipReason::Failed(_))))
            .count()
    }
}

/// Progress callback: `(processed, total)`.
///
/// `total` is 0 while the session count is unknown.
pub type ProgressFn<'p> = &'p mut dyn FnMut(usize, usize);

/// Builds a [`CandidatePool`] from captured sessions.
pub struct PoolBuilder<'o> {
    options: &'o Options,
    total: Option<usize>,
}

impl<'o> PoolBuilder<'o> {
    #[must_use]
    pub fn new(options: &'o Options) -> Self {
        Self { options, total: None }
    }

    /// Session count reported to progress callbacks, for iterators that cannot
    /// tell their exact length.
    #[must_use]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Process every session in order and collect the pool plus a report.
    ///
    /// Sessions are consumed one at a time, so a reader can stream them
    /// without holding the whole capture in memory. `progress` fires for the
    /// first session, every `progress_every`-th session and the last one. It
    /// never affects the result.
    #[must_use]
    pub fn build<I, S>(&self, sessions: I, mut progress: Option<ProgressFn<'_>>) -> (CandidatePool, BuildReport)
    where
        I: IntoIterator<Item = S>,
        S: Borrow<Session>,
    {
        let sessions = sessions.into_iter();
        let total = self.total.or(match sessions.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower),
            _ => None,
        });
        let every = self.options.progress_every.max(1);

        let mut pool = CandidatePool::new();
        let mut report = BuildReport::default();
        let mut reported = 0;

        for (index, session) in sessions.enumerate() {
            let processed = index + 1;
            let outcome = match self.session_candidates(session.borrow()) {
                Ok(Some(candidates)) if candidates.is_empty() => {
                    SessionOutcome::Skipped(SkipReason::NoCandidates)
                }
                Ok(Some(candidates)) => {
                    let extracted = candidates.len();
                    let added = candidates
                        .into_iter()
                        .filter(|c| pool.insert_candidate(c.clone()))
                        .count();
                    SessionOutcome::Indexed { extracted, added }
                }
                Ok(None) => SessionOutcome::Skipped(SkipReason::NotHtml),
                Err(err) => {
                    debug!(session = processed, error = %err, "session skipped");
                    SessionOutcome::Skipped(SkipReason::Failed(err))
                }
            };
            report.outcomes.push(outcome);

            if let Some(callback) = progress.as_mut() {
                if processed == 1 || processed % every == 0 || Some(processed) == total {
                    callback(processed, total.unwrap_or(0));
                    reported = processed;
                }
            }
        }

        let processed = report.total();
        if let Some(callback) = progress.as_mut() {
            if processed > reported {
                callback(processed, processed);
            }
        }

        info!(
            sessions = processed,
            indexed = report.indexed(),
            failed = report.failed(),
            candidates = pool.len(),
            "candidate pool built"
        );
        (pool, report)
    }

    /// Candidates of one session, or `None` when the response is not HTML.
    fn session_candidates(&self, session: &Session) -> Result<Option<Vec<Candidate>>> {
        let (response, body) = http::parse_response(&session.response)?;
        if !response.is_html() {
            return Ok(None);
        }

        let (request, _) = http::parse_request(&session.request)?;
        let document_url = request.document_url()?;
        let base = url_utils::parse_url(&document_url).ok_or(Error::InvalidUrl(document_url))?;

        let html = encoding::decode_body(body, response.charset().as_deref());
        Ok(Some(extractor::extract_candidates(&html, &base, self.options)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_pairs_are_ignored() {
        let mut pool = CandidatePool::new();
        assert!(pool.insert("ex.com", Candidate::new("A", "https://ex.com/a")));
        assert!(!pool.insert("ex.com", Candidate::new("A", "https://ex.com/a")));
        assert!(pool.insert("ex.com", Candidate::new("B", "https://ex.com/a")));
        assert_eq!(pool.get("ex.com").len(), 2);
    }

    #[test]
    fn insert_candidate_uses_url_host_key() {
        let mut pool = CandidatePool::new();
        pool.insert_candidate(Candidate::new("A", "https://Ex.com:443/a"));
        assert_eq!(pool.get("ex.com").len(), 1);
        assert!(pool.get("other.com").is_empty());
    }

    #[test]
    fn longest_label_pass_keeps_one_label_per_url() {
        let mut pool = CandidatePool::new();
        pool.insert("h", Candidate::new("FAQ", "https://h/faq"));
        pool.insert("h", Candidate::new("Home", "https://h/"));
        pool.insert("h", Candidate::new("[Help] > [FAQ]", "https://h/faq"));

        let longest = pool.prefer_longest_labels();
        assert_eq!(
            longest.get("h"),
            &[
                Candidate::new("Home", "https://h/"),
                Candidate::new("[Help] > [FAQ]", "https://h/faq"),
            ]
        );
        // the original pool is untouched
        assert_eq!(pool.get("h").len(), 3);
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let mut pool = CandidatePool::new();
        pool.insert("ex.com", Candidate::new("B", "https://ex.com/b"));
        pool.insert("ex.com", Candidate::new("A", "https://ex.com/a"));

        let json = pool.to_json().expect("serializes");
        assert!(json.contains(r#""ex.com""#));
        let back = CandidatePool::from_json(&json).expect("parses");
        assert_eq!(back, pool);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            CandidatePool::from_json("{not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn report_counts_outcomes() {
        let report = BuildReport {
            outcomes: vec![
                SessionOutcome::Indexed { extracted: 3, added: 2 },
                SessionOutcome::Skipped(SkipReason::NotHtml),
                SessionOutcome::Skipped(SkipReason::Failed(Error::MissingHost)),
            ],
        };
        assert_eq!(report.total(), 3);
        assert_eq!(report.indexed(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failed(), 1);
    }
}
