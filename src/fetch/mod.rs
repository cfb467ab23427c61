//! Page sources
//!
//! A [`PageSource`] turns a URL into a [`RawDocument`]. The orchestrator is
//! generic over its two sources, the direct HTTP [`FastFetcher`] and the
//! headless-browser [`RenderFetcher`](crate::browser::RenderFetcher).

pub mod fast;

pub use fast::FastFetcher;

use crate::error::Result;
use crate::types::RawDocument;
use async_trait::async_trait;
use url::Url;

/// Something that can produce the HTML of a page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Fetch the page at `url`
    async fn fetch(&self, url: &Url) -> Result<RawDocument>;
}
