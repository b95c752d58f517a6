//! # Mock Fetcher for Testing
//!
//! Provides a `MockFetcher` that implements the `PageFetcher` trait for use in
//! tests. Bodies and failures are registered per URL, and every requested URL
//! is recorded so tests can check which pages were actually hit.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::{FetchError, PageFetcher};

#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Failure(String),
}

/// A mock fetcher for testing purposes.
/// URLs without a registered response answer with a 404.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Creates a mock with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `body` and a 200 status.
    pub async fn respond(&self, url: impl Into<String>, body: impl Into<String>) {
        self.responses
            .lock()
            .await
            .insert(url.into(), MockResponse::Body(body.into()));
    }

    /// Fail every fetch of `url` with `message`.
    pub async fn fail(&self, url: impl Into<String>, message: impl Into<String>) {
        self.responses
            .lock()
            .await
            .insert(url.into(), MockResponse::Failure(message.into()));
    }

    /// URLs requested so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().await.push(url.to_string());

        let response = {
            let guard = self.responses.lock().await;
            guard.get(url).cloned()
        };
        match response {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Failure(message)) => Err(FetchError::Other(message)),
            None => Err(FetchError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            }),
        }
    }
}
