//! # Crawl Configuration Module
//!
//! Loads the JSON file that drives a crawl run. The file names the site to
//! fetch from, where its page index lives, where annotated pages go, and a
//! few knobs for filtering and politeness.
//!
//! ## Key Components
//!
//! - `CrawlConfig`: The validated, immutable configuration
//! - `CrawlConfigBuilder`: Builder for constructing a config in code
//! - `ConfigError`: Everything that can go wrong while loading
//!
//! `baseUrl`, `indexUrl` and `outputDir` are required and never defaulted.
//! `filters`, `skipPatterns`, `delay` and `timeout` may be left out.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// File name used when no configuration path is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "fetch-pages.json";

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or has a field of the wrong type
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required field is absent or empty
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A URL field is not an absolute URL
    #[error("invalid URL in `{field}`: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration as it appears on disk, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    base_url: Option<String>,
    index_url: Option<String>,
    output_dir: Option<String>,
    filters: Option<Vec<String>>,
    skip_patterns: Option<Vec<String>>,
    delay: Option<f64>,
    timeout: Option<u64>,
}

/// Configuration for a crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Origin prepended to every page path, without a trailing slash
    pub base_url: String,

    /// Absolute URL of the JSON page index
    pub index_url: String,

    /// Directory annotated pages are written to
    pub output_dir: PathBuf,

    /// Meta tag names to mark as Pagefind filters
    pub filters: Vec<String>,

    /// Path prefixes that are never fetched
    pub skip_patterns: Vec<String>,

    /// Pause in milliseconds after each fetched page
    pub delay_ms: u64,

    /// Per-request timeout in milliseconds; `None` waits forever
    pub timeout_ms: Option<u64>,
}

impl CrawlConfig {
    /// Create a new builder with the three required fields
    pub fn builder(
        base_url: impl Into<String>,
        index_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> CrawlConfigBuilder {
        CrawlConfigBuilder::new(base_url, index_url, output_dir)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let base_url = required(raw.base_url, "baseUrl")?;
        let index_url = required(raw.index_url, "indexUrl")?;
        let output_dir = required(raw.output_dir, "outputDir")?;

        check_url(&base_url, "baseUrl")?;
        check_url(&index_url, "indexUrl")?;

        Ok(Self {
            base_url,
            index_url,
            output_dir: PathBuf::from(output_dir),
            filters: raw.filters.unwrap_or_default(),
            skip_patterns: raw.skip_patterns.unwrap_or_default(),
            // negative delays mean no delay; fractional milliseconds are dropped
            delay_ms: raw.delay.map_or(0, |ms| ms.max(0.0) as u64),
            timeout_ms: raw.timeout,
        })
    }

    /// Get the inter-page delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Get the request timeout as a Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Whether a page path falls under one of the skip prefixes
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_patterns
            .iter()
            .any(|pattern| path.starts_with(pattern.as_str()))
    }

    /// Full URL of a page on the configured site
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField(field)),
    }
}

fn check_url(value: &str, field: &'static str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl { field, source })
}

/// Builder for CrawlConfig
#[derive(Debug)]
pub struct CrawlConfigBuilder {
    config: CrawlConfig,
}

impl CrawlConfigBuilder {
    /// Create a new builder with the required fields and empty optional ones
    pub fn new(
        base_url: impl Into<String>,
        index_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config: CrawlConfig {
                base_url: base_url.into(),
                index_url: index_url.into(),
                output_dir: output_dir.into(),
                filters: Vec::new(),
                skip_patterns: Vec::new(),
                delay_ms: 0,
                timeout_ms: None,
            },
        }
    }

    /// Set the meta tag names to annotate as filters
    pub fn filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filters = filters.into_iter().map(Into::into).collect();
        self
    }

    /// Set the path prefixes to skip
    pub fn skip_patterns<I, S>(mut self, skip_patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.skip_patterns = skip_patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the delay in milliseconds between fetched pages
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Set the per-request timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = Some(timeout_ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = CrawlConfig::from_json(
            r#"{
                "baseUrl": "https://docs.example.com",
                "indexUrl": "https://docs.example.com/query-index.json",
                "outputDir": "./pages",
                "filters": ["category", "product"],
                "skipPatterns": ["/about/release-notes"],
                "delay": 100,
                "timeout": 10000
            }"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://docs.example.com");
        assert_eq!(config.output_dir, PathBuf::from("./pages"));
        assert_eq!(config.filters, vec!["category", "product"]);
        assert_eq!(config.skip_patterns, vec!["/about/release-notes"]);
        assert_eq!(config.delay(), Duration::from_millis(100));
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let config = CrawlConfig::from_json(
            r#"{"baseUrl": "https://a.test", "indexUrl": "https://a.test/i.json", "outputDir": "out"}"#,
        )
        .unwrap();

        assert!(config.filters.is_empty());
        assert!(config.skip_patterns.is_empty());
        assert_eq!(config.delay_ms, 0);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_missing_required_fields() {
        let cases = [
            (r#"{"indexUrl": "https://a.test/i.json", "outputDir": "out"}"#, "baseUrl"),
            (r#"{"baseUrl": "https://a.test", "outputDir": "out"}"#, "indexUrl"),
            (r#"{"baseUrl": "https://a.test", "indexUrl": "https://a.test/i.json"}"#, "outputDir"),
            (
                r#"{"baseUrl": "", "indexUrl": "https://a.test/i.json", "outputDir": "out"}"#,
                "baseUrl",
            ),
        ];

        for (json, field) in cases {
            match CrawlConfig::from_json(json) {
                Err(ConfigError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("expected missing {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_json() {
        let result = CrawlConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));

        let result = CrawlConfig::from_json(
            r#"{"baseUrl": "https://a.test", "indexUrl": "https://a.test/i.json", "outputDir": "out", "delay": "soon"}"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_fractional_and_negative_delays() {
        let config = CrawlConfig::from_json(
            r#"{"baseUrl": "https://a.test", "indexUrl": "https://a.test/i.json", "outputDir": "out", "delay": 100.5}"#,
        )
        .unwrap();
        assert_eq!(config.delay_ms, 100);

        let config = CrawlConfig::from_json(
            r#"{"baseUrl": "https://a.test", "indexUrl": "https://a.test/i.json", "outputDir": "out", "delay": -5}"#,
        )
        .unwrap();
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn test_relative_index_url_rejected() {
        let result = CrawlConfig::from_json(
            r#"{"baseUrl": "https://a.test", "indexUrl": "/query-index.json", "outputDir": "out"}"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidUrl {
                field: "indexUrl",
                ..
            })
        ));
    }

    #[test]
    fn test_load_unreadable_file() {
        let result = CrawlConfig::load("/definitely/not/here/fetch-pages.json");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_skip_and_page_url() {
        let config = CrawlConfig::builder("https://a.test", "https://a.test/i.json", "out")
            .skip_patterns(["/drafts", "/about/release-notes"])
            .build();

        assert!(config.is_skipped("/drafts/wip"));
        assert!(config.is_skipped("/about/release-notes"));
        assert!(!config.is_skipped("/about"));
        assert_eq!(config.page_url("/guides/start"), "https://a.test/guides/start");
    }
}
