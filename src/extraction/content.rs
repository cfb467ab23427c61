//! Main content extraction
//!
//! This module turns a fetched document into [`ParsedContent`]: title and
//! metadata from the readability pass, plain text from the normalizer.

use super::readability::ReadabilityExtractor;
use super::text::TextNormalizer;
use crate::error::Result;
use crate::types::{ParsedContent, RawDocument};
use tracing::{debug, instrument};

/// Content extraction functionality
pub struct ContentExtractor;

impl ContentExtractor {
    /// Extract the article of a fetched document
    #[instrument(skip(document), fields(url = %document.url, bytes = document.html.len()))]
    pub fn parse(document: &RawDocument) -> Result<ParsedContent> {
        let article = ReadabilityExtractor::extract(&document.html, &document.url)?;
        let text = TextNormalizer::to_text(&article.content_html);

        let content = ParsedContent {
            title: non_empty(Some(article.title)),
            text,
            html_fragment: article.content_html,
            byline: non_empty(article.byline),
            site_name: non_empty(article.site_name),
            excerpt: non_empty(article.excerpt),
        };

        debug!(
            "Extracted {} chars, title={:?}",
            content.length(),
            content.title
        );

        Ok(content)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn document(html: &str) -> RawDocument {
        RawDocument::new(html, Url::parse("https://example.com/story").unwrap())
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  A  ".to_string())), Some("A".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_parse_keeps_paragraph_boundaries() {
        let para_a = "The first paragraph of the story talks about rivers, bridges, and the people who cross them every morning on the way to work.";
        let para_b = "The second paragraph continues with the evening commute, the traffic, the weather, and the long light over the water at dusk.";
        let html = format!(
            "<html><head><title>Rivers</title></head><body><article><p>{}</p><p>{}</p></article></body></html>",
            para_a, para_b
        );

        let content = ContentExtractor::parse(&document(&html)).unwrap();
        assert!(content.text.contains(para_a));
        assert!(content.text.contains(para_b));
        assert!(content.text.contains(&format!("{}\n\n{}", para_a, para_b)));
        assert_eq!(content.length(), content.text.chars().count());
        assert!(content.html_fragment.contains("<p>"));
    }
}
