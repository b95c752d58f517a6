//! # fetch-pages
//!
//! Command-line front end for the pagefind-prep crawler. Reads a JSON
//! configuration, fetches every page in the site's query index, annotates
//! the HTML for Pagefind and writes it to the configured output directory.
//!
//! Exits with status 0 when the run completes, whether or not individual
//! pages failed, and with status 1 on configuration or index errors.

mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagefind_prep::config::{CrawlConfig, DEFAULT_CONFIG_FILE};
use pagefind_prep::crawler::{CrawlEvent, CrawlReport, CrawlStatus, Crawler};
use pagefind_prep::fetch::HttpFetcher;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch a site's pages and annotate them for Pagefind", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Don't draw a progress bar
    #[arg(long)]
    no_progress: bool,

    /// Export tracing spans over OTLP/HTTP
    #[arg(long)]
    otlp: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(cli.otlp)?;

    let config = CrawlConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    let fetcher = HttpFetcher::new(&config)?;

    let mut crawler = Crawler::new(fetcher, config);
    let progress = if cli.no_progress {
        None
    } else {
        let (sender, receiver) = mpsc::channel(100);
        crawler = crawler.with_events(sender);
        Some(spawn_progress(receiver)?)
    };

    let mut report = CrawlReport::new();
    let outcome = crawler.run(&mut report).await;

    // Dropping the crawler closes the event channel so the progress task ends
    drop(crawler);
    if let Some(handle) = progress {
        if let Err(e) = handle.await {
            tracing::warn!("Progress task failed: {}", e);
        }
    }

    println!("\n{}", report.summary());
    outcome?;

    Ok(())
}

/// Render crawl events as a progress bar on stderr
fn spawn_progress(mut receiver: mpsc::Receiver<CrawlEvent>) -> anyhow::Result<JoinHandle<()>> {
    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );
    progress_bar.set_message("Loading index...");

    Ok(tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            match event {
                CrawlEvent::Started { total } => progress_bar.set_length(total as u64),
                CrawlEvent::PageDone { path, status, .. } => {
                    progress_bar.inc(1);
                    // failures are already logged by the crawler
                    let verb = match status {
                        CrawlStatus::Success => "Saved",
                        CrawlStatus::Skipped => "Skipped",
                        CrawlStatus::Error(_) => "Failed",
                    };
                    progress_bar.set_message(format!("{} {}", verb, path));
                }
            }
        }
        progress_bar.finish_with_message("Done");
    }))
}
