//! Headless-browser page source
//!
//! Every call launches its own browser, loads the page with stealth patches,
//! applies the site wait rules and the settle delay, and returns the rendered
//! DOM. The browser is closed before the call returns, whatever the outcome.

use super::controller::BrowserController;
use super::navigation::{NavigationOptions, PageNavigator};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::fetch::PageSource;
use crate::types::RawDocument;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Renders pages in a fresh headless browser
#[derive(Debug, Clone, Default)]
pub struct RenderFetcher {
    config: RenderConfig,
}

impl RenderFetcher {
    /// Create a render fetcher
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Get the render configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Launch a browser, render `url`, and close the browser
    #[instrument(skip(self), fields(url = %url))]
    pub async fn render(&self, url: &Url) -> Result<RawDocument> {
        let controller = BrowserController::launch(self.config.browser.clone()).await?;

        let outcome = self.load(&controller, url).await;

        if let Err(e) = controller.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }

        outcome
    }

    async fn load(&self, controller: &BrowserController, url: &Url) -> Result<RawDocument> {
        let page = controller.new_page().await?;

        let options = NavigationOptions::with_timeout(self.config.navigation_timeout);
        let navigation = PageNavigator::goto(&page, url.as_str(), &options).await?;

        if let Some(rule) = self.config.site_rules.find(url) {
            info!(rule = %rule.name, selector = %rule.selector, "Waiting for site content marker");
            if let Err(e) = PageNavigator::wait_for_selector(&page, &rule.selector, rule.timeout).await
            {
                warn!("{}; continuing with current content", e);
            }
        }

        tokio::time::sleep(self.config.settle_delay).await;

        let html = PageNavigator::content(&page).await?;
        let final_url = Url::parse(&navigation.final_url).unwrap_or_else(|_| url.clone());

        debug!(
            final_url = %final_url,
            bytes = html.len(),
            navigation_ms = navigation.duration_ms,
            "Render complete"
        );

        Ok(RawDocument::new(html, final_url))
    }
}

#[async_trait]
impl PageSource for RenderFetcher {
    fn name(&self) -> &'static str {
        "render"
    }

    async fn fetch(&self, url: &Url) -> Result<RawDocument> {
        self.render(url).await
    }
}
