//! Error types for the pagefind-prep crate

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;

/// Result type for crawl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole crawl run
///
/// Failures tied to a single page never surface as this type; the crawler
/// records them in the report and moves on.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The index document could not be fetched
    #[error("Index fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The index document parsed but does not have the expected shape
    #[error("Unexpected index format: {0}")]
    UnexpectedIndex(String),

    /// Filesystem error outside of per-page writes
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
