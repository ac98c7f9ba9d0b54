//! HTTP fetching used by every crawler and extractor.
//!
//! All page downloads go through the [`Fetch`] trait so the crawl logic can be
//! exercised against in-memory pages. The production implementation,
//! [`HttpFetcher`], sends a fixed `User-Agent` header, applies a per-request
//! timeout, and treats any non-2xx status as an error.

use crate::error::{AppError, ScrapeError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// User agent sent with every request unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Per-request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can download a page body as text.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, ScrapeError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory fetcher serving canned pages and counting every call.
    ///
    /// URLs without a canned page answer with a 404 status error.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for StaticFetcher {
        async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScrapeError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;

    #[test]
    fn test_http_fetcher_builds_with_defaults() {
        assert!(HttpFetcher::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn test_http_fetcher_rejects_invalid_user_agent() {
        let result = HttpFetcher::new("bad\nagent", DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }

    #[tokio::test]
    async fn test_static_fetcher_counts_misses() {
        let fetcher = StaticFetcher::new().with_page("https://a.test/", "<p>x</p>");
        assert!(fetcher.get_text("https://a.test/").await.is_ok());
        let err = fetcher.get_text("https://a.test/missing").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
        assert_eq!(fetcher.calls(), 2);
    }
}
