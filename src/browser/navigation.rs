//! Page navigation functionality
//!
//! Navigation is issued with `Page.navigate` and then polled for document
//! readiness, so callers stop at DOMContentLoaded instead of waiting for the
//! full load event.

use crate::error::{Error, NavigationError, Result};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::Page;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Interval between readiness and selector polls
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for page navigation
#[derive(Debug, Clone)]
pub struct NavigationOptions {
    /// Timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}

impl NavigationOptions {
    /// Options with the given timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

/// Whether a `document.readyState` value means DOMContentLoaded has fired
pub fn is_dom_ready(ready_state: &str) -> bool {
    ready_state == "interactive" || ready_state == "complete"
}

/// Result of a navigation operation
#[derive(Debug)]
pub struct NavigationResult {
    /// Final URL after any redirects
    pub final_url: String,
    /// Navigation duration in milliseconds
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize)]
struct DocumentState {
    #[serde(rename = "readyState")]
    ready_state: String,
    href: String,
}

/// Page navigator
pub struct PageNavigator;

impl PageNavigator {
    /// Navigate to a URL and wait for DOMContentLoaded.
    ///
    /// The whole operation, including readiness polling, is bounded by
    /// `options.timeout_ms`.
    #[instrument(skip(page, options))]
    pub async fn goto(
        page: &Page,
        url: &str,
        options: &NavigationOptions,
    ) -> Result<NavigationResult> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(NavigationError::InvalidUrl(format!(
                "URL must start with http:// or https://: {}",
                url
            ))
            .into());
        }

        info!("Navigating to: {}", url);
        let start = Instant::now();
        let timeout = Duration::from_millis(options.timeout_ms);

        let final_url = tokio::time::timeout(timeout, Self::navigate_once(page, url))
            .await
            .map_err(|_| NavigationError::Timeout(options.timeout_ms))??;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!("Navigation complete: {} -> {} in {}ms", url, final_url, duration_ms);

        Ok(NavigationResult {
            final_url,
            duration_ms,
        })
    }

    /// Perform a single navigation and wait for readiness
    async fn navigate_once(page: &Page, url: &str) -> Result<String> {
        let response = page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;

        if let Some(ref error_text) = response.result.error_text {
            return Err(NavigationError::LoadFailed(error_text.clone()).into());
        }

        Self::wait_for_ready(page).await
    }

    /// Poll the navigated document until DOMContentLoaded has fired.
    ///
    /// Returns the document URL. Evaluation errors while the old document is
    /// being torn down are treated as "not ready yet".
    async fn wait_for_ready(page: &Page) -> Result<String> {
        loop {
            let state = page
                .evaluate("({ readyState: document.readyState, href: location.href })")
                .await
                .ok()
                .and_then(|v| v.into_value::<DocumentState>().ok());

            if let Some(state) = state {
                if state.href != "about:blank" && is_dom_ready(&state.ready_state) {
                    return Ok(state.href);
                }
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait for an element matching `selector` to appear
    #[instrument(skip(page))]
    pub async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        loop {
            if page.find_element(selector).await.is_ok() {
                debug!("Selector appeared: {}", selector);
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(NavigationError::SelectorTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }
                .into());
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Serialized DOM of the current document
    pub async fn content(page: &Page) -> Result<String> {
        page.content()
            .await
            .map_err(|e| Error::cdp(format!("Failed to read page content: {}", e)))
    }
}
