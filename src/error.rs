//! Error types for menu-label.
//!
//! Most failures inside the engine are recovered locally (decoding falls back,
//! malformed elements are skipped). The variants here are the ones that cost a
//! whole session or a pool import/export.

/// Error type for session processing and pool serialization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The captured HTTP message has no usable head.
    #[error("Malformed HTTP message: {0}")]
    MalformedMessage(String),

    /// Neither a Host header nor an absolute request target is available.
    #[error("Request has no Host header and no absolute target")]
    MissingHost,

    /// A document base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Candidate pool JSON import or export failed.
    #[error("Pool serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for menu-label operations.
pub type Result<T> = std::result::Result<T, Error>;
