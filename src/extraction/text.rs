//! HTML fragment to plain text
//!
//! Every text node becomes one chunk; chunks are trimmed, empty ones
//! dropped, and the rest joined with a blank line so paragraph boundaries
//! survive for the reader.

use scraper::{Html, Node};

/// Separator placed between text chunks
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Elements whose text is never part of the article
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Converts simplified article HTML to plain text
pub struct TextNormalizer;

impl TextNormalizer {
    /// Plain text of `fragment`, chunks separated by [`PARAGRAPH_SEPARATOR`]
    pub fn to_text(fragment: &str) -> String {
        Self::chunks(fragment).join(PARAGRAPH_SEPARATOR)
    }

    /// Trimmed, non-empty text nodes of `fragment` in document order
    pub fn chunks(fragment: &str) -> Vec<String> {
        let document = Html::parse_fragment(fragment);

        document
            .tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Text(text) => {
                    let skipped = node.ancestors().any(|ancestor| {
                        ancestor
                            .value()
                            .as_element()
                            .map_or(false, |el| SKIPPED_ELEMENTS.contains(&el.name()))
                    });
                    if skipped {
                        None
                    } else {
                        Some(text.trim())
                    }
                }
                _ => None,
            })
            .filter(|chunk| !chunk.is_empty())
            .map(str::to_string)
            .collect()
    }
}
