//! # pagefind-prep - Page fetcher and annotator for Pagefind
//!
//! This crate prepares a live site for indexing with the Pagefind static
//! search tool. It reads the site's JSON page index, fetches every listed
//! page, rewrites each page's `<head>` with the metadata Pagefind looks for,
//! and writes the result into a local directory ready for the indexer.
//!
//! ## Features
//!
//! - JSON configuration with required and optional fields
//! - Sequential, throttled fetching with per-page failure isolation
//! - Skip patterns for path prefixes that should never be fetched
//! - Sortable last-modified meta, filter facets and canonical URL annotation
//! - Pluggable HTTP layer for testing
//! - Summary of successful, skipped and failed pages
//!
//! ## Example
//!
//! ```rust,no_run
//! use pagefind_prep::config::CrawlConfig;
//! use pagefind_prep::crawler::{CrawlReport, Crawler};
//! use pagefind_prep::fetch::HttpFetcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CrawlConfig::load("fetch-pages.json")?;
//!     let fetcher = HttpFetcher::new(&config)?;
//!
//!     let mut report = CrawlReport::new();
//!     Crawler::new(fetcher, config).run(&mut report).await?;
//!
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

mod error;

pub mod annotate;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod index;

pub use error::Error;

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::config::CrawlConfig;
    pub use crate::crawler::{CrawlReport, CrawlStatus, Crawler};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::fetch::{HttpFetcher, PageFetcher};
}
