//! rsvp-extract - Article extraction service for a speed-reading frontend
//!
//! Given a URL, this crate returns the article's title and plain text. Most
//! pages are handled by a cheap HTTP fetch; pages that come back too short
//! (client-rendered apps, bot walls) are loaded in a stealth-configured
//! headless Chromium instead.
//!
//! # Features
//!
//! - **Fast path**: `reqwest` fetch with a desktop Chrome identity
//! - **Render path**: headless browser via ChromiumOxide (CDP), with stealth
//!   patches and per-site content waits
//! - **Content Extraction**: readability pass and paragraph-preserving text
//! - **HTTP API**: `POST /extract`, `GET /health`, `GET /status`
//!
//! # Architecture
//!
//! ```text
//! URL ──▶ Extractor ──▶ FastFetcher ──▶ ContentExtractor ──▶ quality gate
//!             │                                                  │
//!             │                                   short / failed │
//!             ▼                                                  ▼
//!      ExtractionResult ◀── ContentExtractor ◀── RenderFetcher (CDP)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rsvp_extract::{ExtractorConfig, Extractor};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = Extractor::from_config(ExtractorConfig::default())?;
//!     let url = Url::parse("https://example.com/article")?;
//!
//!     let result = extractor.run(&url).await;
//!     println!("{} ({} chars via {})", result.title.unwrap_or_default(), result.length, result.method);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod config;
pub mod cors;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod handlers;
pub mod orchestrator;
pub mod server;
pub mod types;

// Re-exports for convenience
pub use browser::{BrowserConfig, BrowserController, RenderFetcher};
pub use config::{ExtractorConfig, ServerConfig};
pub use error::{Error, Result};
pub use extraction::ContentExtractor;
pub use fetch::{FastFetcher, PageSource};
pub use orchestrator::{Extract, Extractor};
pub use types::{ExtractionMethod, ExtractionRequest, ExtractionResult, ParsedContent, RawDocument};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
