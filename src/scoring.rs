//! URL similarity scoring.
//!
//! A candidate URL is compared to the query URL on four weighted factors:
//!
//! 1. Jaccard similarity of the normalized path segment sets
//! 2. Equality of the last normalized segments
//! 3. One normalized segment sequence being a suffix of the other
//! 4. Character sequence ratio of the raw paths (Ratcliff/Obershelp)
//!
//! Path labels whose last bracket segment overlaps the query's last segment
//! get a small bonus. The total is clamped to `[0, 100]`.

use std::collections::HashSet;

use crate::nav_tree::is_path_label;
use crate::patterns::{BRACKET_SEGMENT, DATE_SEGMENT, HEX_SEGMENT, NUMERIC_SEGMENT, UUID_SEGMENT};
use crate::url_utils;
use crate::Options;

/// Placeholder replacing identifier-like path segments.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Weighted factor contributions of one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub jaccard: f64,
    pub last_segment: f64,
    pub suffix: f64,
    pub sequence: f64,
    pub label_bonus: f64,
    /// Sum of the factors, clamped to `[0, 100]`.
    pub total: f64,
}

impl ScoreBreakdown {
    /// All factors zero.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            jaccard: 0.0,
            last_segment: 0.0,
            suffix: 0.0,
            sequence: 0.0,
            label_bonus: 0.0,
            total: 0.0,
        }
    }

    fn finish(mut self) -> Self {
        let sum = self.jaccard + self.last_segment + self.suffix + self.sequence + self.label_bonus;
        self.total = sum.clamp(0.0, 100.0);
        self
    }
}

/// Normalize one path segment for comparison.
///
/// Lowercases, strips a known extension from the final segment and replaces
/// numeric, UUID, long hex and date-like segments with [`ID_PLACEHOLDER`].
#[must_use]
pub fn normalize_segment(segment: &str, is_last: bool, options: &Options) -> String {
    let mut seg = segment.to_lowercase();

    if is_last {
        if let Some((stem, ext)) = seg.rsplit_once('.') {
            if !stem.is_empty() && options.strip_extensions.iter().any(|e| e == ext) {
                seg = stem.to_string();
            }
        }
    }

    let is_id = NUMERIC_SEGMENT.is_match(&seg)
        || UUID_SEGMENT.is_match(&seg)
        || HEX_SEGMENT.is_match(&seg)
        || DATE_SEGMENT.is_match(&seg);
    if is_id {
        ID_PLACEHOLDER.to_string()
    } else {
        seg
    }
}

/// Normalized, non-empty path segments of a URL.
///
/// # Examples
///
/// ```
/// use menu_label::{scoring::path_segments, Options};
///
/// let segs = path_segments("https://ex.com/Board/2024-05/123/view.do?x=1", &Options::default());
/// assert_eq!(segs, ["board", "{id}", "{id}", "view"]);
/// ```
#[must_use]
pub fn path_segments(url: &str, options: &Options) -> Vec<String> {
    let path = url_utils::url_path(url);
    let raw: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let last = raw.len().saturating_sub(1);
    raw.iter()
        .enumerate()
        .map(|(i, seg)| normalize_segment(seg, i == last, options))
        .collect()
}

/// Jaccard similarity of two segment sets. Two empty sets score 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&String> = a.iter().collect();
    let b: HashSet<&String> = b.iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Whether one non-empty sequence ends with the other.
#[must_use]
pub fn is_suffix_either_way(a: &[String], b: &[String]) -> bool {
    !a.is_empty() && !b.is_empty() && (a.ends_with(b) || b.ends_with(a))
}

/// Ratcliff/Obershelp similarity: `2 * matches / (len(a) + len(b))`.
///
/// Matches are found by taking the longest common substring, then recursing
/// on the unmatched text to its left and right. Two empty strings score 1.
///
/// # Examples
///
/// ```
/// use menu_label::scoring::sequence_ratio;
///
/// assert_eq!(sequence_ratio("abcd", "abcd"), 1.0);
/// assert_eq!(sequence_ratio("abcd", "bcde"), 0.75);
/// assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut matched = 0usize;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(&a, &b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }
    2.0 * matched as f64 / total as f64
}

/// Longest common run of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Ties go to the earliest start in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let mut best = (a_lo, b_lo, 0);
    // run lengths ending at (i - 1, j - 1), one row at a time
    let mut prev = vec![0usize; b_hi - b_lo + 1];
    let mut row = vec![0usize; b_hi - b_lo + 1];
    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            let k = j - b_lo + 1;
            row[k] = if a[i] == b[j] { prev[k - 1] + 1 } else { 0 };
            if row[k] > best.2 {
                best = (i + 1 - row[k], j + 1 - row[k], row[k]);
            }
        }
        std::mem::swap(&mut prev, &mut row);
    }
    best
}

/// Last bracket segment of a path label, lowercased.
fn last_label_segment(label: &str) -> Option<String> {
    BRACKET_SEGMENT
        .captures_iter(label)
        .filter_map(|caps| caps.get(1))
        .last()
        .map(|m| m.as_str().trim().to_lowercase())
}

/// Score how well `candidate_url` (labelled `label`) matches `query_url`.
///
/// Identical URLs score 100. Otherwise the weighted factors are summed; the
/// label bonus only applies to path labels.
#[must_use]
pub fn score(query_url: &str, candidate_url: &str, label: &str, options: &Options) -> ScoreBreakdown {
    let w = &options.weights;
    let mut out = ScoreBreakdown::zero();

    if query_url == candidate_url {
        out.total = 100.0;
        return out;
    }

    let q = path_segments(query_url, options);
    let c = path_segments(candidate_url, options);
    if q.is_empty() && c.is_empty() {
        return out;
    }

    out.jaccard = jaccard(&q, &c) * w.jaccard;
    if q.last().is_some_and(|last| c.last() == Some(last)) {
        out.last_segment = w.last_segment;
    }
    if is_suffix_either_way(&q, &c) {
        out.suffix = w.suffix;
    }
    out.sequence = sequence_ratio(
        &url_utils::url_path(query_url),
        &url_utils::url_path(candidate_url),
    ) * w.sequence;

    if is_path_label(label) {
        let raw_last = url_utils::last_path_segment(query_url);
        let query_last = urlencoding::decode(&raw_last)
            .map_or_else(|_| raw_last.to_lowercase(), |decoded| decoded.to_lowercase());
        let overlaps = last_label_segment(label).is_some_and(|seg| {
            !seg.is_empty()
                && !query_last.is_empty()
                && (seg.contains(&query_last) || query_last.contains(&seg))
        });
        if overlaps {
            out.label_bonus = w.label_bonus;
        }
    }

    out.finish()
}
