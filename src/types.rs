//! Request, document and result types shared by the pipeline stages

use serde::{Deserialize, Serialize};
use url::Url;

/// A single extraction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Absolute URL of the page to extract
    pub url: Url,
}

impl ExtractionRequest {
    /// Parse and validate a request URL.
    ///
    /// Only absolute `http` and `https` URLs are accepted.
    pub fn parse(input: &str) -> std::result::Result<Self, String> {
        let url = Url::parse(input.trim()).map_err(|e| format!("{}: {}", e, input))?;
        let request = Self { url };
        request.validate()?;
        Ok(request)
    }

    /// Check that the URL can be fetched by both paths
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self.url.scheme() {
            "http" | "https" => {}
            other => return Err(format!("unsupported URL scheme: {}", other)),
        }
        if self.url.host_str().map_or(true, str::is_empty) {
            return Err(format!("URL has no host: {}", self.url));
        }
        Ok(())
    }
}

/// Raw HTML as produced by one of the fetchers
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Page HTML
    pub html: String,
    /// URL the HTML was fetched from (after redirects when known)
    pub url: Url,
}

impl RawDocument {
    /// Create a new document
    pub fn new(html: impl Into<String>, url: Url) -> Self {
        Self {
            html: html.into(),
            url,
        }
    }
}

/// Article content derived from a [`RawDocument`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedContent {
    /// Best-guess article title
    pub title: Option<String>,
    /// Plain text, paragraphs separated by a blank line
    pub text: String,
    /// Simplified HTML of the article body
    pub html_fragment: String,
    /// Author line, when the extractor found one
    pub byline: Option<String>,
    /// Publisher / site name, when the extractor found one
    pub site_name: Option<String>,
    /// Short summary, when the extractor found one
    pub excerpt: Option<String>,
}

impl ParsedContent {
    /// Character count of the text
    pub fn length(&self) -> usize {
        self.text.chars().count()
    }
}

/// Which path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Direct HTTP fetch passed the quality gate
    Fast,
    /// Headless browser render
    Render,
    /// Both paths were exhausted
    Failed,
}

impl ExtractionMethod {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Fast => "fast",
            ExtractionMethod::Render => "render",
            ExtractionMethod::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outward-facing extraction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Requested URL
    pub url: String,
    /// Article title
    pub title: Option<String>,
    /// Article text
    pub text: Option<String>,
    /// Author line
    pub byline: Option<String>,
    /// Publisher / site name
    pub site_name: Option<String>,
    /// Character count of `text`
    pub length: usize,
    /// Short summary
    pub excerpt: Option<String>,
    /// Path that produced the result
    pub method: ExtractionMethod,
    /// Failure message when `method` is `failed`
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Build a successful result from parsed content.
    ///
    /// `method` must be [`ExtractionMethod::Fast`] or [`ExtractionMethod::Render`].
    pub fn accepted(url: &Url, method: ExtractionMethod, content: ParsedContent) -> Self {
        debug_assert_ne!(method, ExtractionMethod::Failed);
        let length = content.length();
        Self {
            url: url.to_string(),
            title: content.title,
            text: Some(content.text),
            byline: content.byline,
            site_name: content.site_name,
            length,
            excerpt: content.excerpt,
            method,
            error: None,
        }
    }

    /// Build a failure result carrying only the URL and the message
    pub fn failed(url: &Url, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            title: None,
            text: None,
            byline: None,
            site_name: None,
            length: 0,
            excerpt: None,
            method: ExtractionMethod::Failed,
            error: Some(error.into()),
        }
    }

    /// Whether the result carries content
    pub fn is_success(&self) -> bool {
        self.method != ExtractionMethod::Failed
    }
}
