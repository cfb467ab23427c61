//! CORS (Cross-Origin Resource Sharing) configuration
//!
//! The reader frontend calls the API from the browser, so the server answers
//! preflights for an explicit list of origins only.
//!
//! # Policy
//!
//! - **Allowed Origins**: exact matches from [`CorsConfig::allowed_origins`]
//!   (default: `http://localhost:3000`)
//! - **Allowed Methods**: GET, POST, OPTIONS (preflight)
//! - **Allowed Headers**: Content-Type, Authorization
//! - **Credentials**: allowed
//! - **Max Age**: 3600 seconds (1 hour) for preflight caching
//!
//! # Example
//!
//! ```rust,ignore
//! use rsvp_extract::cors::{cors_layer, CorsConfig};
//! use axum::Router;
//!
//! let app = Router::new()
//!     .route("/extract", post(extract_handler))
//!     .layer(cors_layer(&CorsConfig::default())?);
//! ```

use crate::config::DEFAULT_CORS_ORIGIN;
use crate::error::{Error, Result};
use http::{header::HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::debug;

/// Allowed request headers
pub const ALLOWED_HEADERS: [http::header::HeaderName; 2] =
    [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];

/// Allowed methods
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Default max age for preflight cache (1 hour)
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// CORS configuration options.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API, compared exactly
    pub allowed_origins: Vec<String>,
    /// Whether to allow credentials (cookies, auth headers)
    pub allow_credentials: bool,
    /// Maximum age for preflight cache in seconds
    pub max_age_secs: u64,
    /// Allowed HTTP methods
    pub allowed_methods: Vec<Method>,
    /// Allowed request headers
    pub allowed_headers: Vec<http::header::HeaderName>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            allow_credentials: true,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            allowed_methods: ALLOWED_METHODS.to_vec(),
            allowed_headers: ALLOWED_HEADERS.to_vec(),
        }
    }
}

impl CorsConfig {
    /// Create a new CORS configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed origin list.
    pub fn with_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }
}

/// Creates the CORS layer for `config`.
///
/// Fails with [`Error::Config`] if an origin is not a valid header value.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            let normalized = normalize_origin(origin);
            debug!("CORS allows origin {}", normalized);
            HeaderValue::from_str(&normalized)
                .map_err(|_| Error::config(format!("invalid CORS origin: {:?}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(config.allowed_methods.clone())
        .allow_headers(config.allowed_headers.clone())
        .max_age(Duration::from_secs(config.max_age_secs));

    if config.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    Ok(layer)
}

/// Origins are sent without a trailing slash; configured values may carry one.
fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_config_default() {
        let config = CorsConfig::default();
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert!(config.allow_credentials);
        assert_eq!(config.max_age_secs, DEFAULT_MAX_AGE_SECS);
        assert_eq!(config.allowed_methods.len(), 3);
    }

    #[test]
    fn test_with_origins_replaces_default() {
        let config =
            CorsConfig::new().with_origins(["https://reader.example", "http://localhost:5173"]);
        assert_eq!(
            config.allowed_origins,
            vec!["https://reader.example", "http://localhost:5173"]
        );
        assert!(config.allow_credentials);
    }

    #[test]
    fn test_normalize_origin() {
        assert_eq!(
            normalize_origin("https://reader.example/"),
            "https://reader.example"
        );
        assert_eq!(
            normalize_origin(" http://localhost:3000 "),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_cors_layer_creation() {
        let layer = cors_layer(&CorsConfig::default()).unwrap();
        let _ = format!("{:?}", layer);
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let config = CorsConfig::new().with_origins(["http://bad\norigin"]);
        assert!(matches!(cors_layer(&config), Err(Error::Config(_))));
    }
}
