//! # Page Crawler Module
//!
//! Walks the site's page index one entry at a time: skip, fetch, annotate,
//! write. Every entry produces exactly one [`CrawlResult`], in index order.
//!
//! ## Key Components
//!
//! - `Crawler`: Drives a run over any [`PageFetcher`]
//! - `CrawlReport`: Caller-owned accumulator of per-page outcomes
//! - `CrawlEvent`: Optional progress feed for front ends
//! - `OutputDir`: Where annotated pages land
//!
//! ## Failure model
//!
//! Failing to fetch or parse the index, or to create the output directory,
//! aborts the run with an [`Error`]. Anything that goes wrong with a single
//! page is recorded as [`CrawlStatus::Error`] and the run carries on.
//!
//! Pages are processed strictly sequentially. After each successfully written
//! page (except the last entry) the crawler sleeps for the configured delay.

mod report;
pub mod storage;

pub use report::{CrawlReport, CrawlResult, CrawlStatus, CrawlSummary};
pub use storage::{OutputDir, output_file_name};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, info_span, instrument, Instrument};

use crate::annotate::{annotate, iso_timestamp};
use crate::config::CrawlConfig;
use crate::error::Result;
use crate::fetch::{FetchError, PageFetcher};
use crate::index::{PageDescriptor, fetch_index};

/// Progress notifications emitted during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// The index was loaded and the output directory is ready
    Started { total: usize },

    /// One index entry has been handled
    PageDone {
        position: usize,
        total: usize,
        path: String,
        status: CrawlStatus,
    },
}

/// Why a single page failed
#[derive(Debug, Error)]
enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("missing or unreadable lastModified")]
    MissingTimestamp,

    #[error("lastModified {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("failed to write {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Sequential crawler over the pages listed in a site index
#[derive(Debug)]
pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
    events: Option<mpsc::Sender<CrawlEvent>>,
}

impl<F: PageFetcher> Crawler<F> {
    /// Create a crawler for `config` that fetches through `fetcher`
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            config,
            events: None,
        }
    }

    /// Send progress events to `sender` while running
    pub fn with_events(mut self, sender: mpsc::Sender<CrawlEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Run the crawl, appending one result per index entry to `report`
    ///
    /// Returns an error only for failures that abort the whole run; in that
    /// case `report` holds whatever was recorded before the abort.
    #[instrument(skip_all, fields(index_url = %self.config.index_url))]
    pub async fn run(&self, report: &mut CrawlReport) -> Result<()> {
        let pages = fetch_index(&self.fetcher, &self.config.index_url).await?;

        let output = OutputDir::create(&self.config.output_dir).await?;
        info!("Created output directory: {}", output.root().display());

        let total = pages.len();
        self.emit(CrawlEvent::Started { total }).await;

        for (i, page) in pages.iter().enumerate() {
            let position = i + 1;

            let status = if self.config.is_skipped(&page.path) {
                info!("Skipping page: {}", page.path);
                CrawlStatus::Skipped
            } else {
                let progress = position as f64 / total as f64 * 100.0;
                info!("[{}/{}] ({:.1}%) Fetching: {}", position, total, progress, page.path);

                let span = info_span!("process_page", path = %page.path);
                match self.process_page(&output, page).instrument(span).await {
                    Ok(()) => CrawlStatus::Success,
                    Err(e) => {
                        error!("Error fetching {}: {}", page.path, e);
                        CrawlStatus::Error(e.to_string())
                    }
                }
            };

            let throttle = status == CrawlStatus::Success && position < total;

            report.record(page.path.clone(), status.clone());
            self.emit(CrawlEvent::PageDone {
                position,
                total,
                path: page.path.clone(),
                status,
            })
            .await;

            if throttle && self.config.delay_ms > 0 {
                tokio::time::sleep(self.config.delay()).await;
            }
        }

        Ok(())
    }

    async fn process_page(
        &self,
        output: &OutputDir,
        page: &PageDescriptor,
    ) -> std::result::Result<(), PageError> {
        let seconds = page.last_modified.ok_or(PageError::MissingTimestamp)?;
        let last_modified = page
            .last_modified_utc()
            .ok_or(PageError::InvalidTimestamp(seconds))?;

        let html = self.fetcher.fetch(&self.config.page_url(&page.path)).await?;
        let annotated = annotate(&html, &page.path, last_modified, &self.config);

        output
            .write_page(&page.path, &annotated)
            .await
            .map_err(|source| PageError::Write {
                file: output_file_name(&page.path),
                source,
            })?;

        info!(
            "Saved: {} (last modified: {})",
            output_file_name(&page.path),
            iso_timestamp(last_modified)
        );
        Ok(())
    }

    async fn emit(&self, event: CrawlEvent) {
        if let Some(sender) = &self.events {
            if sender.send(event).await.is_err() {
                debug!("Progress receiver dropped");
            }
        }
    }
}
