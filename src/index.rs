//! Page index retrieval
//!
//! The index is a JSON document of the form
//! `{ "data": [ { "path": "/x", "lastModified": 1700000000, ... } ] }` and is
//! the complete work list for a crawl run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::fetch::PageFetcher;

/// One page listed in the index
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    /// Site-relative path of the page, starting with `/`
    pub path: String,

    /// Last modification time in unix seconds; `None` when absent or unreadable
    #[serde(default, deserialize_with = "unix_seconds")]
    pub last_modified: Option<i64>,
}

impl PageDescriptor {
    /// Last modification time as a UTC timestamp, if present and in range
    pub fn last_modified_utc(&self) -> Option<DateTime<Utc>> {
        self.last_modified
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Accepts both `1700000000` and `"1700000000"`; fractions are truncated.
/// Anything else reads as `None` so one bad entry only fails its own page.
fn unix_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    };
    Ok(seconds)
}

/// Parse an index document body into its page descriptors
pub fn parse_index(body: &str) -> Result<Vec<PageDescriptor>> {
    let mut document: Value = serde_json::from_str(body)?;

    let data = match document.get_mut("data").map(Value::take) {
        Some(data @ Value::Array(_)) => data,
        Some(_) => {
            return Err(Error::UnexpectedIndex(
                "`data` is not an array".to_string(),
            ));
        }
        None => return Err(Error::UnexpectedIndex("missing `data` field".to_string())),
    };

    Ok(serde_json::from_value(data)?)
}

/// Fetch and parse the index at `url`
#[instrument(skip(fetcher))]
pub async fn fetch_index<F: PageFetcher>(fetcher: &F, url: &str) -> Result<Vec<PageDescriptor>> {
    let body = fetcher.fetch(url).await?;
    let pages = parse_index(&body)?;
    info!("Found {} pages to process", pages.len());
    Ok(pages)
}
