//! Direct HTTP fetch with a desktop browser identity

use super::PageSource;
use crate::config::FastFetchConfig;
use crate::error::{FetchError, Result};
use crate::types::RawDocument;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Fetches raw HTML with a single GET; no retries
#[derive(Debug, Clone)]
pub struct FastFetcher {
    client: Client,
    config: FastFetchConfig,
}

impl FastFetcher {
    /// Build a fetcher and its HTTP client
    pub fn new(config: FastFetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the fetcher configuration
    pub fn config(&self) -> &FastFetchConfig {
        &self.config
    }

    /// GET `url` and return its body; non-2xx statuses are errors
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_html(&self, url: &Url) -> Result<RawDocument> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| self.classify(e))?;

        debug!(
            status = status.as_u16(),
            final_url = %final_url,
            bytes = html.len(),
            "Fast fetch complete"
        );

        Ok(RawDocument::new(html, final_url))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl PageSource for FastFetcher {
    fn name(&self) -> &'static str {
        "fast"
    }

    async fn fetch(&self, url: &Url) -> Result<RawDocument> {
        self.fetch_html(url).await
    }
}
