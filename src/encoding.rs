//! Character encoding detection and decoding of response bodies.
//!
//! The declared charset (Content-Type header, then `<meta>` declaration) is
//! tried first. When it is missing, unknown, or the bytes are not valid in it,
//! a fixed chain is tried: UTF-8, EUC-KR, and finally windows-1252, which maps
//! every byte and therefore never fails.
//!
//! Captured bodies are often cut short, so an encoding also counts as a match
//! when it only fails on a truncated trailing character, or on a handful of
//! malformed sequences. Those are dropped from the text.

use encoding_rs::{Encoding, EUC_KR, UTF_8, WINDOWS_1252};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::patterns::CHARSET_PARAM;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Extract the `charset=` parameter from a Content-Type header value.
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    CHARSET_PARAM
        .captures(content_type)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Detect a charset declared in the document's own `<meta>` tags.
///
/// Only examines the first 1024 bytes.
#[must_use]
pub fn detect_meta_encoding(html: &[u8]) -> Option<&'static Encoding> {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    extract_charset(&head_str)
        .or_else(|| extract_content_type_charset(&head_str))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
}

fn extract_charset(html: &str) -> Option<String> {
    CHARSET_META_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_content_type_charset(html: &str) -> Option<String> {
    CONTENT_TYPE_CHARSET_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode bytes strictly; `None` when the bytes are malformed for `encoding`.
fn decode_strict(body: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(std::borrow::Cow::into_owned)
}

/// Longest byte sequence of a single character in the chain's multi-byte encodings.
const MAX_CHAR_BYTES: usize = 4;

/// One malformed sequence is tolerated per this many body bytes (at least one).
const BYTES_PER_TOLERATED_ERROR: usize = 1000;

/// Strict decode, retried without up to three trailing bytes of a cut-off
/// character.
fn decode_truncated(body: &[u8], encoding: &'static Encoding) -> Option<String> {
    (0..MAX_CHAR_BYTES)
        .take_while(|&cut| cut < body.len() || cut == 0)
        .find_map(|cut| decode_strict(&body[..body.len() - cut], encoding))
}

/// Replacing decode that drops malformed sequences, accepted only when they
/// are rare.
fn decode_lossy(body: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (decoded, _) = encoding.decode_without_bom_handling(body);
    let malformed = decoded.chars().filter(|&c| c == char::REPLACEMENT_CHARACTER).count();
    if malformed > (body.len() / BYTES_PER_TOLERATED_ERROR).max(1) {
        return None;
    }
    debug!(encoding = encoding.name(), malformed, "dropped malformed sequences");
    Some(decoded.chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect())
}

/// Decode a response body to text, best effort.
///
/// `declared` is the charset label from the response headers, if any.
/// Never fails: the final windows-1252 step accepts any byte sequence.
///
/// # Examples
///
/// ```
/// use menu_label::encoding::decode_body;
///
/// assert_eq!(decode_body("메뉴".as_bytes(), Some("utf-8")), "메뉴");
/// // EUC-KR bytes for "메뉴" without any declaration
/// assert_eq!(decode_body(b"\xB8\xDE\xB4\xBA", None), "메뉴");
/// ```
#[must_use]
pub fn decode_body(body: &[u8], declared: Option<&str>) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(body) {
        if let Some(text) = decode_strict(&body[bom_len..], encoding) {
            return text;
        }
    }

    let declared_encoding = declared
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .or_else(|| detect_meta_encoding(body));

    let chain: Vec<&'static Encoding> = declared_encoding.into_iter().chain([UTF_8, EUC_KR]).collect();
    if let Some(text) = chain.iter().find_map(|&encoding| decode_truncated(body, encoding)) {
        return text;
    }
    if let Some(text) = chain.iter().find_map(|&encoding| decode_lossy(body, encoding)) {
        return text;
    }

    let (decoded, _, _) = WINDOWS_1252.decode(body);
    decoded.into_owned()
}
