//! Extraction orchestrator
//!
//! Drives one URL through the two-path pipeline:
//!
//! ```text
//! START -> FastAttempt -> AcceptFast
//!                      -> RenderAttempt -> AcceptRender
//!                                       -> Failed
//! ```
//!
//! The fast path fetches static HTML over plain HTTP. Its result is accepted
//! only if the extracted text reaches `min_text_length` characters; any
//! fast-path error or a short result moves on to the render path. The render
//! path result is accepted as-is, and any render-path error ends the run in
//! `Failed`. Every run produces an [`ExtractionResult`].

use crate::browser::RenderFetcher;
use crate::config::ExtractorConfig;
use crate::error::{Error, Result};
use crate::extraction::ContentExtractor;
use crate::fetch::{FastFetcher, PageSource};
use crate::types::{ExtractionMethod, ExtractionResult, ParsedContent};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Anything that turns a URL into an [`ExtractionResult`]
///
/// Object safe, so the server can hold an `Arc<dyn Extract>`.
#[async_trait]
pub trait Extract: Send + Sync {
    /// Extract the article at `url`; never fails at the call level
    async fn extract(&self, url: &Url) -> ExtractionResult;
}

/// Outcome of one fetch-and-parse attempt
#[derive(Debug)]
enum Attempt {
    /// Parsed content was produced
    Content(ParsedContent),
    /// The attempt failed but another path may still succeed
    Recoverable(Error),
    /// The attempt failed and no path remains
    Fatal(Error),
}

/// Position in the extraction state machine
#[derive(Debug)]
enum ExtractionState {
    FastAttempt,
    RenderAttempt,
    AcceptFast(ParsedContent),
    AcceptRender(ParsedContent),
    Failed(Error),
}

/// Two-path article extractor
pub struct Extractor<F = FastFetcher, R = RenderFetcher> {
    fast: F,
    render: R,
    min_text_length: usize,
}

impl Extractor {
    /// Build the production extractor from a configuration
    pub fn from_config(config: ExtractorConfig) -> Result<Self> {
        let fast = FastFetcher::new(config.fast)?;
        let render = RenderFetcher::new(config.render);
        Ok(Self::new(fast, render, config.min_text_length))
    }
}

impl<F, R> Extractor<F, R>
where
    F: PageSource,
    R: PageSource,
{
    /// Create an extractor from two page sources
    pub fn new(fast: F, render: R, min_text_length: usize) -> Self {
        Self {
            fast,
            render,
            min_text_length,
        }
    }

    /// Fast-path quality gate, in characters
    pub fn min_text_length(&self) -> usize {
        self.min_text_length
    }

    /// Run the state machine for `url`
    #[instrument(skip(self), fields(url = %url))]
    pub async fn run(&self, url: &Url) -> ExtractionResult {
        let started = Instant::now();
        let mut state = ExtractionState::FastAttempt;

        loop {
            state = match state {
                ExtractionState::FastAttempt => match self.fast_attempt(url).await {
                    Attempt::Content(content) if self.passes_gate(&content) => {
                        ExtractionState::AcceptFast(content)
                    }
                    Attempt::Content(content) => {
                        info!(
                            length = content.length(),
                            min = self.min_text_length,
                            "Fast path content too short, falling back to {}",
                            self.render.name()
                        );
                        ExtractionState::RenderAttempt
                    }
                    Attempt::Recoverable(e) => {
                        warn!("Fast path failed: {}", e);
                        info!("Falling back to {}", self.render.name());
                        ExtractionState::RenderAttempt
                    }
                    Attempt::Fatal(e) => ExtractionState::Failed(e),
                },
                ExtractionState::RenderAttempt => match self.render_attempt(url).await {
                    Attempt::Content(content) => ExtractionState::AcceptRender(content),
                    Attempt::Recoverable(e) | Attempt::Fatal(e) => ExtractionState::Failed(e),
                },
                ExtractionState::AcceptFast(content) => {
                    info!(
                        length = content.length(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Accepted fast path result"
                    );
                    return ExtractionResult::accepted(url, ExtractionMethod::Fast, content);
                }
                ExtractionState::AcceptRender(content) => {
                    info!(
                        length = content.length(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Accepted render path result"
                    );
                    return ExtractionResult::accepted(url, ExtractionMethod::Render, content);
                }
                ExtractionState::Failed(e) => {
                    error!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Extraction failed: {}", e
                    );
                    return ExtractionResult::failed(url, e.to_string());
                }
            };
        }
    }

    fn passes_gate(&self, content: &ParsedContent) -> bool {
        content.length() >= self.min_text_length
    }

    async fn fast_attempt(&self, url: &Url) -> Attempt {
        debug!("Trying {} path", self.fast.name());
        match fetch_and_parse(&self.fast, url).await {
            Ok(content) => Attempt::Content(content),
            Err(e) => Attempt::Recoverable(e),
        }
    }

    async fn render_attempt(&self, url: &Url) -> Attempt {
        debug!("Trying {} path", self.render.name());
        match fetch_and_parse(&self.render, url).await {
            Ok(content) => Attempt::Content(content),
            Err(e) => Attempt::Fatal(e),
        }
    }
}

async fn fetch_and_parse<S: PageSource + ?Sized>(source: &S, url: &Url) -> Result<ParsedContent> {
    let document = source.fetch(url).await?;
    ContentExtractor::parse(&document)
}

#[async_trait]
impl<F, R> Extract for Extractor<F, R>
where
    F: PageSource,
    R: PageSource,
{
    async fn extract(&self, url: &Url) -> ExtractionResult {
        self.run(url).await
    }
}
