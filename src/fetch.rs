//! HTTP fetching for the crawler
//!
//! Every network read in a crawl run goes through [`PageFetcher`], so the
//! crawler can be driven by [`MockFetcher`] in tests and by [`HttpFetcher`]
//! for real.

mod error;
mod mock;

pub use error::FetchError;
pub use mock::MockFetcher;

use std::future::Future;

use reqwest::{Client as ReqwestClient, redirect};
use tracing::{debug, instrument};

use crate::config::CrawlConfig;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("pagefind-prep/", env!("CARGO_PKG_VERSION"));

/// Something that can GET a URL and hand back the body as text
pub trait PageFetcher {
    /// Fetch `url`, resolving with the body when the status is 2xx
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: ReqwestClient,
}

impl HttpFetcher {
    /// Create a fetcher using the timeout from the crawl configuration
    ///
    /// Redirects are never followed: a 3xx answer is reported as a failed
    /// fetch like any other non-2xx status.
    pub fn new(config: &CrawlConfig) -> Result<Self, FetchError> {
        let mut builder = ReqwestClient::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Sending GET request to {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> HttpFetcher {
        let config = CrawlConfig::builder("http://localhost", "http://localhost/i.json", "out")
            .timeout_ms(5_000)
            .build();
        HttpFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/guides/start")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><head></head><body>hi</body></html>")
            .expect(1)
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/guides/start", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "<html><head></head><body>hi</body></html>");

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("nope")
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_does_not_follow_redirects() {
        let mut server = Server::new_async().await;
        let redirect = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let target = server
            .mock("GET", "/new")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/old", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 301, .. }));

        redirect.assert_async().await;
        target.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // Nothing listens on port 9 of localhost in the test environment
        let err = fetcher().fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
