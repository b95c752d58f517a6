//! Error types for the fetch module

use thiserror::Error;

/// Error type for a single GET request
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a status outside 200..300
    #[error("HTTP {status}: {reason}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Reason phrase for the status
        reason: String,
    },

    /// Transport-level failure (connect, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
