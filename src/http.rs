//! Captured HTTP sessions and lightweight request/response head parsing.
//!
//! Only what the engine needs is parsed: the request line, headers, the split
//! between head and body, and the Content-Type of the response.

use crate::encoding;
use crate::error::{Error, Result};

/// One captured request/response exchange, as raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Raw request: request line, headers, blank line, body.
    pub request: Vec<u8>,
    /// Raw response: status line, headers, blank line, body.
    pub response: Vec<u8>,
}

impl Session {
    #[must_use]
    pub fn new(request: impl Into<Vec<u8>>, response: impl Into<Vec<u8>>) -> Self {
        Self {
            request: request.into(),
            response: response.into(),
        }
    }
}

/// Ordered header list with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// First value for `name`, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let mut headers = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }
        Self(headers)
    }
}

/// Parsed request line and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub target: String,
    pub headers: Headers,
}

impl RequestHead {
    /// The URL the response document was retrieved from.
    ///
    /// An absolute request target is used as-is. Otherwise the URL is rebuilt
    /// from the Host header, taking the scheme from Referer/Origin when those
    /// are http(s), else `https`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHost`] for `CONNECT` tunnels and when the target
    /// is relative and no Host header is present.
    pub fn document_url(&self) -> Result<String> {
        if self.method.eq_ignore_ascii_case("CONNECT") {
            return Err(Error::MissingHost);
        }
        let target = self.target.trim();
        if starts_with_http(target) {
            return Ok(target.to_string());
        }

        let host = self
            .headers
            .get("Host")
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(Error::MissingHost)?;

        let scheme = self
            .headers
            .get("Referer")
            .or_else(|| self.headers.get("Origin"))
            .filter(|r| starts_with_http(r))
            .and_then(|r| r.split_once(':'))
            .map_or("https", |(scheme, _)| scheme);

        let path = if target.starts_with('/') { target } else { "/" };
        Ok(format!("{}://{host}{path}", scheme.to_ascii_lowercase()))
    }
}

/// Parsed response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status_line: String,
    pub headers: Headers,
}

impl ResponseHead {
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.headers.get("Content-Type").unwrap_or_default()
    }

    /// Whether the body is an HTML or XHTML document.
    #[must_use]
    pub fn is_html(&self) -> bool {
        is_html_content_type(self.content_type())
    }

    /// Declared charset label, lowercased.
    #[must_use]
    pub fn charset(&self) -> Option<String> {
        encoding::charset_from_content_type(self.content_type())
    }
}

/// Whether a Content-Type value denotes HTML or XHTML.
#[must_use]
pub fn is_html_content_type(content_type: &str) -> bool {
    let ctype = content_type.to_ascii_lowercase();
    ctype.contains("text/html") || ctype.contains("application/xhtml+xml")
}

fn starts_with_http(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Split a raw HTTP message into head and body.
///
/// Splits on the first `\r\n\r\n`, falling back to `\n\n`. A message without
/// a blank line is all head.
#[must_use]
pub fn split_message(data: &[u8]) -> (&[u8], &[u8]) {
    for sep in [&b"\r\n\r\n"[..], &b"\n\n"[..]] {
        if let Some(pos) = data.windows(sep.len()).position(|w| w == sep) {
            return (&data[..pos], &data[pos + sep.len()..]);
        }
    }
    (data, &[])
}

/// Parse a raw request into its head and body.
///
/// # Errors
///
/// Returns [`Error::MalformedMessage`] when there is no request line with a
/// method and target.
pub fn parse_request(data: &[u8]) -> Result<(RequestHead, &[u8])> {
    let (head, body) = split_message(data);
    let text = String::from_utf8_lossy(head);
    let mut lines = text.lines();

    let request_line = lines
        .next()
        .ok_or_else(|| Error::MalformedMessage("empty request".to_string()))?;
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return Err(Error::MalformedMessage(format!(
            "bad request line: {request_line:?}"
        )));
    };

    let head = RequestHead {
        method: method.to_string(),
        target: target.to_string(),
        headers: Headers::parse(lines),
    };
    Ok((head, body))
}

/// Parse a raw response into its head and body.
///
/// # Errors
///
/// Returns [`Error::MalformedMessage`] for an empty response.
pub fn parse_response(data: &[u8]) -> Result<(ResponseHead, &[u8])> {
    if data.is_empty() {
        return Err(Error::MalformedMessage("empty response".to_string()));
    }
    let (head, body) = split_message(data);
    let text = String::from_utf8_lossy(head);
    let mut lines = text.lines();
    let status_line = lines.next().unwrap_or_default().trim().to_string();

    let head = ResponseHead {
        status_line,
        headers: Headers::parse(lines),
    };
    Ok((head, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &[u8] =
        b"GET /board/list.do?page=2 HTTP/1.1\r\nHost: Example.com\r\nReferer: http://example.com/\r\n\r\n";

    #[test]
    fn parses_request_line_and_headers() {
        let (head, body) = parse_request(REQUEST).expect("request parses");
        assert_eq!(head.method, "GET");
        assert_eq!(head.target, "/board/list.do?page=2");
        assert_eq!(head.headers.get("host"), Some("Example.com"));
        assert!(body.is_empty());
    }

    #[test]
    fn document_url_uses_referer_scheme() {
        let (head, _) = parse_request(REQUEST).expect("request parses");
        assert_eq!(
            head.document_url().expect("url"),
            "http://Example.com/board/list.do?page=2"
        );
    }

    #[test]
    fn document_url_defaults_to_https() {
        let (head, _) = parse_request(b"GET /a HTTP/1.1\r\nHost: ex.com\r\n\r\n").expect("parses");
        assert_eq!(head.document_url().expect("url"), "https://ex.com/a");
    }

    #[test]
    fn absolute_target_is_kept() {
        let (head, _) =
            parse_request(b"GET http://proxy.test/x HTTP/1.1\r\n\r\n").expect("parses");
        assert_eq!(head.document_url().expect("url"), "http://proxy.test/x");
    }

    #[test]
    fn missing_host_is_an_error() {
        let (head, _) = parse_request(b"GET /a HTTP/1.1\r\n\r\n").expect("parses");
        assert!(matches!(head.document_url(), Err(Error::MissingHost)));
    }

    #[test]
    fn connect_tunnels_have_no_document() {
        let (head, _) =
            parse_request(b"CONNECT ex.com:443 HTTP/1.1\r\nHost: ex.com:443\r\n\r\n").expect("parses");
        assert!(matches!(head.document_url(), Err(Error::MissingHost)));
    }

    #[test]
    fn bad_request_line_is_malformed() {
        assert!(matches!(parse_request(b"\r\n\r\n"), Err(Error::MalformedMessage(_))));
        assert!(matches!(parse_request(b""), Err(Error::MalformedMessage(_))));
    }

    #[test]
    fn response_split_on_bare_newlines() {
        let raw = b"HTTP/1.1 200 OK\nContent-Type: text/html; charset=UTF-8\n\n<html></html>";
        let (head, body) = parse_response(raw).expect("parses");
        assert!(head.is_html());
        assert_eq!(head.charset().as_deref(), Some("utf-8"));
        assert_eq!(body, b"<html></html>");
    }

    #[test]
    fn xhtml_counts_as_html() {
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type(""));
    }
}
