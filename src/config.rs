//! Configuration for the extraction pipeline and the HTTP server
//!
//! Pipeline thresholds and timeouts live in [`ExtractorConfig`] and are
//! passed into the orchestrator. Server settings come from the environment
//! via [`ServerConfig::from_env`].
//!
//! # Environment Variables
//!
//! - `RSVP_HOST`: bind address (default: `127.0.0.1`)
//! - `RSVP_PORT`: listen port (default: `8000`)
//! - `RSVP_CORS_ORIGINS`: comma-separated allowed origins
//!   (default: `http://localhost:3000`)
//! - `RSVP_CHROME_PATH`: Chrome/Chromium executable (default: auto-detect)
//! - `RSVP_MIN_TEXT_LENGTH`: fast-path quality gate (default: 500)

use crate::browser::{BrowserConfig, SiteRules};
use crate::error::{Error, Result};
use std::env;
use std::time::Duration;
use tracing::debug;

/// Desktop Chrome identity used by both fetch paths
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Minimum fast-path text length, in characters
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 500;

/// Default fast fetch timeout (10 seconds)
pub const DEFAULT_FAST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default navigation timeout (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default settle delay after navigation (2 seconds)
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Default allowed CORS origin (the reader frontend in development)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Fast-path HTTP settings
#[derive(Debug, Clone)]
pub struct FastFetchConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Maximum redirects followed
    pub max_redirects: usize,
}

impl Default for FastFetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FAST_TIMEOUT,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            max_redirects: 10,
        }
    }
}

/// Render-path settings
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Browser launch configuration
    pub browser: BrowserConfig,
    /// Bound on navigation until the DOM is parsed
    pub navigation_timeout: Duration,
    /// Fixed wait after navigation for late content
    pub settle_delay: Duration,
    /// Per-site content marker waits
    pub site_rules: SiteRules,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            site_rules: SiteRules::builtin(),
        }
    }
}

/// Settings consumed by the extraction orchestrator
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Fast-path quality gate, in characters
    pub min_text_length: usize,
    /// Fast fetcher settings
    pub fast: FastFetchConfig,
    /// Render fetcher settings
    pub render: RenderConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            fast: FastFetchConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fast-path quality gate
    pub fn with_min_text_length(mut self, chars: usize) -> Self {
        self.min_text_length = chars;
        self
    }

    /// Set the fast fetch timeout
    pub fn with_fast_timeout(mut self, timeout: Duration) -> Self {
        self.fast.timeout = timeout;
        self
    }

    /// Set the navigation timeout
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.render.navigation_timeout = timeout;
        self
    }

    /// Set the settle delay
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.render.settle_delay = delay;
        self
    }

    /// Replace the browser configuration
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.render.browser = browser;
        self
    }

    /// Replace the site rule table
    pub fn with_site_rules(mut self, rules: SiteRules) -> Self {
        self.render.site_rules = rules;
        self
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    /// Chrome/Chromium executable
    pub chrome_path: Option<String>,
    /// Quality gate override
    pub min_text_length: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            chrome_path: None,
            min_text_length: None,
        }
    }
}

impl ServerConfig {
    /// Load settings from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("RSVP_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("RSVP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::config(format!("RSVP_PORT must be a port number: {}", e)))?,
            None => defaults.port,
        };

        let cors_origins = match lookup("RSVP_CORS_ORIGINS") {
            Some(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(|o| o.trim_end_matches('/').to_string())
                    .collect();
                if origins.is_empty() {
                    return Err(Error::config("RSVP_CORS_ORIGINS contains no origins"));
                }
                origins
            }
            None => defaults.cors_origins,
        };

        let chrome_path = lookup("RSVP_CHROME_PATH").filter(|p| !p.trim().is_empty());

        let min_text_length = match lookup("RSVP_MIN_TEXT_LENGTH") {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|e| {
                Error::config(format!("RSVP_MIN_TEXT_LENGTH must be a number: {}", e))
            })?),
            None => None,
        };

        let config = Self {
            host,
            port,
            cors_origins,
            chrome_path,
            min_text_length,
        };
        debug!(?config, "Loaded server configuration");
        Ok(config)
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pipeline configuration derived from these settings
    pub fn extractor_config(&self) -> ExtractorConfig {
        let mut config = ExtractorConfig::default();
        if let Some(min) = self.min_text_length {
            config.min_text_length = min;
        }
        if let Some(ref path) = self.chrome_path {
            config.render.browser.chrome_path = Some(path.clone());
        }
        config
    }
}
