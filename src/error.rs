//! Error types for rsvp-extract
//!
//! Each stage of the pipeline has its own error enum; [`Error`] wraps them so
//! the orchestrator can decide per path whether a failure is recoverable.

use thiserror::Error;

/// The main error type for extraction operations
#[derive(Error, Debug)]
pub enum Error {
    /// Fast-path HTTP errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Readability / text normalization errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Fast-path fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Connection, DNS or TLS failure
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its time budget
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Response body could not be read or decoded
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Content parsing errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// The readability extractor rejected the document
    #[error("Readability extraction failed: {0}")]
    Readability(String),

    /// The document URL handed to the extractor was unusable
    #[error("Invalid document URL: {0}")]
    InvalidDocumentUrl(String),
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    /// Timeout waiting for browser
    #[error("Browser operation timed out after {0}ms")]
    Timeout(u64),
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Navigation timeout
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),

    /// Content marker never appeared
    #[error("Timed out after {timeout_ms}ms waiting for selector {selector}")]
    SelectorTimeout {
        /// CSS selector that was awaited
        selector: String,
        /// Wait budget in milliseconds
        timeout_ms: u64,
    },
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error from a string
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if err.is_body() || err.is_decode() {
            FetchError::Body(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
