use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};

/// Source of page HTML for the fan-out.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// HTTP client that always identifies itself as a desktop browser; the
/// search provider blocks default client user agents.
#[derive(Debug, Clone)]
pub struct WebClient {
    client: Client,
    page_timeout: Duration,
}

impl WebClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| ScrapeError::Config(format!("invalid user agent {:?}", config.user_agent)))?,
        );

        Ok(Self {
            client: Client::builder()
                .default_headers(headers)
                .build()
                .map_err(ScrapeError::ClientBuild)?,
            page_timeout: config.page_timeout,
        })
    }

    /// Single GET; non-2xx statuses are errors. `timeout` of `None` keeps the
    /// client default.
    pub async fn get_text(&self, url: &str, timeout: Option<Duration>) -> Result<String> {
        tracing::debug!(url, ?timeout, "fetching");

        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let res = request
            .send()
            .await
            .map_err(|e| ScrapeError::network(url, e))?;

        if !res.status().is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: res.status(),
            });
        }

        res.text().await.map_err(|e| ScrapeError::network(url, e))
    }
}

#[async_trait]
impl PageFetcher for WebClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url, Some(self.page_timeout)).await
    }
}
