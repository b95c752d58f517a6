//! HTML annotation for the Pagefind indexer
//!
//! Pages are patched as text rather than parsed: every rewrite targets the
//! first match of a fixed tag shape, which keeps the rest of the document
//! byte-for-byte intact. Pages with several canonical links or several meta
//! tags sharing a name only have the first one touched.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::{Captures, NoExpand, Regex};
use tracing::{debug, warn};

use crate::config::CrawlConfig;

const HEAD_END: &str = "</head>";

static LAST_MODIFIED_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta name="last-modified" content="[^"]*"(?: data-pagefind-sort="[^"]*")?>"#)
        .expect("Invalid last-modified meta regex")
});

static CANONICAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link rel="canonical" href="[^"]*"(?: data-pagefind-meta="[^"]*")?>"#)
        .expect("Invalid canonical link regex")
});

/// Format a timestamp the way the indexer's date sort expects,
/// e.g. `2023-11-14T22:13:20.000Z`
pub fn iso_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Annotate a fetched page for indexing
///
/// # Arguments
///
/// * `html` - Raw page HTML
/// * `page_path` - Site-relative path the page was fetched from
/// * `last_modified` - Modification time from the index
/// * `config` - Crawl configuration (base URL and filter names)
///
/// # Returns
///
/// The HTML with a sortable last-modified meta tag, filter-annotated meta
/// tags, and a canonical link carrying the page URL.
pub fn annotate(
    html: &str,
    page_path: &str,
    last_modified: DateTime<Utc>,
    config: &CrawlConfig,
) -> String {
    let mut html = set_last_modified(html, last_modified);
    for filter in &config.filters {
        html = mark_filter(&html, filter);
    }
    set_canonical(&html, &config.page_url(page_path))
}

/// Splice ` {tag}\n` in front of the first `</head>`, if there is one
fn insert_before_head_end(html: &str, tag: &str) -> Option<String> {
    let at = html.find(HEAD_END)?;
    let mut out = String::with_capacity(html.len() + tag.len() + 2);
    out.push_str(&html[..at]);
    out.push(' ');
    out.push_str(tag);
    out.push('\n');
    out.push_str(&html[at..]);
    Some(out)
}

fn set_last_modified(html: &str, last_modified: DateTime<Utc>) -> String {
    let tag = format!(
        r#"<meta name="last-modified" content="{}" data-pagefind-sort="date[content]">"#,
        iso_timestamp(last_modified)
    );

    if LAST_MODIFIED_META.is_match(html) {
        return LAST_MODIFIED_META.replace(html, NoExpand(&tag)).into_owned();
    }

    insert_before_head_end(html, &tag).unwrap_or_else(|| {
        debug!("No </head> found, last-modified meta omitted");
        html.to_string()
    })
}

fn mark_filter(html: &str, filter: &str) -> String {
    let pattern = format!(
        r#"<meta name="{}" content="([^"]*)"(?: data-pagefind-filter="[^"]*")?>"#,
        regex::escape(filter)
    );
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Failed to build pattern for filter '{}': {}", filter, e);
            return html.to_string();
        }
    };

    re.replace(html, |caps: &Captures| {
        format!(
            r#"<meta name="{filter}" content="{}" data-pagefind-filter="{filter}[content]">"#,
            &caps[1]
        )
    })
    .into_owned()
}

fn set_canonical(html: &str, canonical_url: &str) -> String {
    let tag = format!(r#"<link rel="canonical" href="{canonical_url}" data-pagefind-meta="url[href]">"#);

    if CANONICAL_LINK.is_match(html) {
        return CANONICAL_LINK.replace(html, NoExpand(&tag)).into_owned();
    }

    insert_before_head_end(html, &tag).unwrap_or_else(|| html.to_string())
}
