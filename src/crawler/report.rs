//! Per-page outcomes and the end-of-run summary

use std::fmt;

/// Outcome of processing one index entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlStatus {
    /// Fetched, annotated and written
    Success,
    /// Matched a skip pattern; never fetched
    Skipped,
    /// Failed with the given message
    Error(String),
}

impl CrawlStatus {
    /// Lowercase status name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Skipped => "skipped",
            Self::Error(_) => "error",
        }
    }

    /// Error message, for failed pages
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result recorded for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub page_path: String,
    pub status: CrawlStatus,
}

/// Ordered results of a crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    results: Vec<CrawlResult>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outcome for a page
    pub fn record(&mut self, page_path: impl Into<String>, status: CrawlStatus) {
        self.results.push(CrawlResult {
            page_path: page_path.into(),
            status,
        });
    }

    /// Results in index order
    pub fn results(&self) -> &[CrawlResult] {
        &self.results
    }

    pub fn summary(&self) -> CrawlSummary {
        let mut summary = CrawlSummary {
            total: self.results.len(),
            ..Default::default()
        };
        for result in &self.results {
            match result.status {
                CrawlStatus::Success => summary.successful += 1,
                CrawlStatus::Skipped => summary.skipped += 1,
                CrawlStatus::Error(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Counts derived from a [`CrawlReport`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub total: usize,
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fetch Summary:")?;
        writeln!(f, "  Total pages: {}", self.total)?;
        writeln!(f, "  Successful: {}", self.successful)?;
        writeln!(f, "  Skipped: {}", self.skipped)?;
        write!(f, "  Failed: {}", self.failed)
    }
}
