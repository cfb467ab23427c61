//! Readability pass over raw HTML
//!
//! Boilerplate removal is delegated to `dom_smoothie`, a port of Mozilla's
//! Readability. This module only adapts its input and output.

use crate::error::ParseError;
use dom_smoothie::Readability;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Output of the readability pass
#[derive(Debug, Clone, Default)]
pub struct ReadableArticle {
    /// Article title as detected by readability
    pub title: String,
    /// Simplified HTML of the article body
    pub content_html: String,
    /// Author line
    pub byline: Option<String>,
    /// Publisher / site name
    pub site_name: Option<String>,
    /// Short summary
    pub excerpt: Option<String>,
}

/// Runs readability over a document
pub struct ReadabilityExtractor;

impl ReadabilityExtractor {
    /// Isolate the article in `html`.
    ///
    /// `url` is used to resolve relative links in the output fragment.
    /// A document with no recognisable article yields an empty body that
    /// keeps only the `<title>`.
    pub fn extract(html: &str, url: &Url) -> Result<ReadableArticle, ParseError> {
        if url.cannot_be_a_base() {
            return Err(ParseError::InvalidDocumentUrl(url.to_string()));
        }

        let mut reader = Readability::new(html, Some(url.as_str()), None)
            .map_err(|e| ParseError::Readability(e.to_string()))?;
        let article = match reader.parse() {
            Ok(article) => article,
            Err(e) => {
                debug!("No article found in {}: {}", url, e);
                return Ok(ReadableArticle {
                    title: document_title(html),
                    ..Default::default()
                });
            }
        };

        Ok(ReadableArticle {
            title: article.title,
            content_html: article.content.to_string(),
            byline: article.byline,
            site_name: article.site_name,
            excerpt: article.excerpt,
        })
    }
}

fn document_title(html: &str) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    Html::parse_document(html)
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
