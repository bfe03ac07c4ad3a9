//! Compiled regex patterns shared across the engine.
//!
//! All patterns are compiled once at first use via `LazyLock`. Anything a caller
//! may want to tune (the URL-literal pattern, hint keywords, extension list) is
//! copied into [`crate::Options`] instead of being read from here directly.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches runs of whitespace for label normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Extracts the text of each `[segment]` in a path label.
pub static BRACKET_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]").expect("BRACKET_SEGMENT regex")
});

// =============================================================================
// URL Literal Patterns
// =============================================================================

/// The shared URL-literal pattern: absolute, scheme-relative, root-relative,
/// `./` and `../` relative, or query-only.
///
/// A value counts as a URL literal only when this pattern covers it entirely
/// (see [`is_url_literal`]).
pub static URL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:(?:https?:)?//[^'"\s]+|/[^'"\s]+|\./[^'"\s]+|\.\./[^'"\s]+|\?[^'"\s]+)"#,
    )
    .expect("URL_LITERAL regex")
});

/// Single- or double-quoted string literal without whitespace.
pub static QUOTED_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']([^"'\s]+)["']"#).expect("QUOTED_LITERAL regex")
});

// =============================================================================
// Inline Script Patterns
// =============================================================================

/// Script navigation sinks taking a quoted URL: `location.href = '…'`,
/// `location.assign('…')`, `document.location = '…'`, `window.open('…')`,
/// `router.push('…')`, `navigate('…')`, `go('…')`.
pub static NAVIGATION_SINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:\blocation\.(?:href|assign|replace)\s*(?:=|\()\s*|\bdocument\.location\s*=\s*|\bwindow\.open\s*\(\s*|(?:\brouter\.push|\bnavigate|\bgo)\s*\(\s*)["']([^"']+)["']"#,
    )
    .expect("NAVIGATION_SINK regex")
});

/// `form.action = '…'; … form.submit()` pairs.
pub static FORM_SUBMIT_SINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\.action\s*=\s*["']([^"']+)["']\s*;[^;]*?\.submit\s*\("#)
        .expect("FORM_SUBMIT_SINK regex")
});

/// Any call site in an inline event handler, e.g. `openFaq(1)` in
/// `event.preventDefault(); openFaq(1);`. Callers filter method calls.
pub static HANDLER_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*\(").expect("HANDLER_CALL regex")
});

// =============================================================================
// Path Segment Patterns
// =============================================================================

/// Purely numeric segment.
pub static NUMERIC_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+$").expect("NUMERIC_SEGMENT regex")
});

/// Canonical UUID segment.
pub static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("UUID_SEGMENT regex")
});

/// Long hexadecimal token (hashes, object ids).
pub static HEX_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8,}$").expect("HEX_SEGMENT regex")
});

/// Date-like segment: `2024`-`05`(-`17`) with optional `-` or `/` separators.
pub static DATE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}[-/]?\d{2}(?:[-/]?\d{2})?$").expect("DATE_SEGMENT regex")
});

// =============================================================================
// HTTP Header Patterns
// =============================================================================

/// `charset=` parameter inside a Content-Type header value.
pub static CHARSET_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([A-Za-z0-9._:-]+)"#).expect("CHARSET_PARAM regex")
});

/// Returns true when `pattern` matches the whole of `value`.
#[must_use]
pub fn is_url_literal(pattern: &Regex, value: &str) -> bool {
    pattern
        .find(value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len())
}
