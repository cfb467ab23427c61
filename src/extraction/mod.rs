//! Content extraction module
//!
//! Turns raw HTML into article text: the readability pass isolates the
//! article body, the normalizer flattens it to paragraph-separated text.

pub mod content;
pub mod readability;
pub mod text;

pub use content::ContentExtractor;
pub use readability::ReadabilityExtractor;
pub use text::{TextNormalizer, PARAGRAPH_SEPARATOR};
