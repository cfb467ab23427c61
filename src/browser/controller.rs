//! Browser lifecycle management
//!
//! This module handles browser launch, page creation and shutdown. A
//! controller owns exactly one Chromium process; dropping it without calling
//! [`BrowserController::close`] still kills the process.

use crate::config::DESKTOP_USER_AGENT;
use crate::error::{BrowserError, Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Arguments that mask the most common automation signals
pub const STEALTH_ARGS: [&str; 3] = [
    "--disable-blink-features=AutomationControlled",
    "--no-sandbox",
    "--disable-setuid-sandbox",
];

static LIVE_BROWSERS: AtomicUsize = AtomicUsize::new(0);

/// Number of controllers launched and not yet closed or dropped
pub fn live_browsers() -> usize {
    LIVE_BROWSERS.load(Ordering::SeqCst)
}

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Viewport width (default: 1280)
    pub width: u32,
    /// Viewport height (default: 720)
    pub height: u32,
    /// Device pixel ratio (default: 2.0)
    pub device_scale_factor: f64,
    /// User agent string (default: desktop Chrome)
    pub user_agent: Option<String>,
    /// Launch timeout in milliseconds (default: 20000)
    pub launch_timeout_ms: u64,
    /// Path to Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
    /// Enable stealth mode (default: true)
    pub stealth: bool,
    /// Additional Chrome arguments
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1280,
            height: 720,
            device_scale_factor: 2.0,
            user_agent: Some(DESKTOP_USER_AGENT.to_string()),
            launch_timeout_ms: 20000,
            chrome_path: None,
            stealth: true,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Create a new config builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }

    /// Full Chrome argument list for this configuration
    pub fn launch_args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        if self.stealth {
            args.extend(STEALTH_ARGS.iter().map(|a| a.to_string()));
        }
        if let Some(ref ua) = self.user_agent {
            args.push(format!("--user-agent={}", ua));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set viewport dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Set device pixel ratio
    pub fn device_scale_factor(mut self, factor: f64) -> Self {
        self.config.device_scale_factor = factor;
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = Some(ua.into());
        self
    }

    /// Set launch timeout
    pub fn launch_timeout_ms(mut self, ms: u64) -> Self {
        self.config.launch_timeout_ms = ms;
        self
    }

    /// Set Chrome path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Enable/disable stealth mode
    pub fn stealth(mut self, stealth: bool) -> Self {
        self.config.stealth = stealth;
        self
    }

    /// Add extra Chrome argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

/// One launched browser process and its CDP event loop
pub struct BrowserController {
    browser: Browser,
    handler: Option<JoinHandle<()>>,
    config: BrowserConfig,
}

impl BrowserController {
    /// Launch a browser with the given config
    #[instrument(skip(config))]
    pub async fn launch(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser with config: headless={}, stealth={}",
            config.headless, config.stealth
        );

        let mut builder = CdpBrowserConfig::builder()
            .viewport(Viewport {
                width: config.width,
                height: config.height,
                device_scale_factor: Some(config.device_scale_factor),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .window_size(config.width, config.height);

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        for arg in config.launch_args() {
            builder = builder.arg(arg);
        }

        let cdp_config = builder.build().map_err(BrowserError::ConfigError)?;

        let launch = Browser::launch(cdp_config);
        let (browser, mut handler) =
            tokio::time::timeout(Duration::from_millis(config.launch_timeout_ms), launch)
                .await
                .map_err(|_| BrowserError::Timeout(config.launch_timeout_ms))?
                .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            let events = drive_events(&mut handler).await;
            debug!("Browser handler finished after {} events", events);
        });

        LIVE_BROWSERS.fetch_add(1, Ordering::SeqCst);
        info!("Browser launched successfully");

        Ok(Self {
            browser,
            handler: Some(handler_task),
            config,
        })
    }

    /// Open a blank page with stealth patches applied
    #[instrument(skip(self))]
    pub async fn new_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        if self.config.stealth {
            super::stealth::StealthMode::apply(&page, self.config.user_agent.as_deref()).await?;
        }

        debug!("Created new page");
        Ok(page)
    }

    /// Get the browser configuration
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Close the browser and wait for the process and event loop to finish
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<()> {
        info!("Closing browser");

        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()));

        // Reap the child even if the close command failed
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser process: {}", e);
        }

        if let Some(handler) = self.handler.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handler).await;
        }

        closed?;
        info!("Browser closed");
        Ok(())
    }
}

/// Poll the CDP event stream until the connection ends.
///
/// Per-message errors are logged and skipped.
async fn drive_events<S, E>(events: &mut S) -> usize
where
    S: Stream<Item = std::result::Result<(), E>> + Unpin,
    E: std::fmt::Display,
{
    let mut count = 0;
    while let Some(event) = events.next().await {
        count += 1;
        if let Err(e) = event {
            debug!("Browser handler event error: {}", e);
        }
    }
    count
}

impl Drop for BrowserController {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            warn!("Browser controller dropped without close; killing browser");
            handler.abort();
            // Browser's own Drop kills the child process
        }
        LIVE_BROWSERS.fetch_sub(1, Ordering::SeqCst);
    }
}
