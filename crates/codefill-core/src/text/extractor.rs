//! Tiered code extractor combining the callout, numeric and alphanumeric rules.

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::code::{ExtractedCode, ExtractionContext};
use crate::models::config::ExtractionConfig;

use super::CodeExtractor;
use super::rules::{AlphanumericRule, CalloutRule, KeywordGate, NoiseFilter, NumericRule, TierRule};

/// Extractor that tries each tier in descending confidence.
///
/// A hit in an earlier tier is final; later tiers never override it.
pub struct TieredCodeExtractor {
    callout: CalloutRule,
    numeric: NumericRule,
    alphanumeric: AlphanumericRule,
}

impl TieredCodeExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            callout: CalloutRule::new(),
            numeric: NumericRule::new(NoiseFilter::new(config)),
            alphanumeric: AlphanumericRule::new(KeywordGate::from_config(config)),
        }
    }

    /// Extract from a raw subject and plain-text body.
    pub fn extract_text(
        &self,
        subject: &str,
        body: &str,
    ) -> Result<Option<ExtractedCode>, ExtractionError> {
        let context = ExtractionContext::new(subject, body)?;
        Ok(self.extract(&context))
    }

    fn tiers(&self) -> [&dyn TierRule; 3] {
        [&self.callout, &self.numeric, &self.alphanumeric]
    }
}

impl Default for TieredCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeExtractor for TieredCodeExtractor {
    fn extract(&self, context: &ExtractionContext) -> Option<ExtractedCode> {
        let text = context.combined_text();

        for rule in self.tiers() {
            if let Some(candidate) = rule.extract(text) {
                debug!(
                    tier = rule.tier().as_str(),
                    offset = candidate.offset,
                    "Extracted code candidate"
                );
                return Some(ExtractedCode::new(candidate.value, candidate.tier));
            }
        }

        debug!("No code found in {} characters of text", text.len());
        None
    }
}
