//! Oracle client error types.

/// Errors from the journey oracle.
///
/// Every variant means the oracle could not be used for this request. None
/// of them say anything about whether a connection exists, so callers should
/// treat them all as retryable.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The oracle answered with a non-success status
    #[error("oracle returned {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Client could not be constructed or used
    #[error("oracle client misconfigured: {0}")]
    Setup(String),
}
