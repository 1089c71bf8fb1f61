//! Verification code extraction from message text.

mod extractor;
pub(crate) mod rules;

pub use extractor::TieredCodeExtractor;

use crate::models::code::{ExtractedCode, ExtractionContext};

/// Trait for code extractors.
pub trait CodeExtractor {
    /// Extract the most likely code from one message.
    fn extract(&self, context: &ExtractionContext) -> Option<ExtractedCode>;
}
