//! Tier B: standalone runs of 4 to 8 digits.

use tracing::trace;

use super::noise::NoiseFilter;
use super::patterns::DIGIT_RUN;
use super::{CodeCandidate, TierRule};
use crate::models::code::CodeTier;

/// Length classes in order of preference.
const PREFERRED_LENGTHS: [usize; 3] = [6, 4, 8];

/// Standalone numeric rule.
pub struct NumericRule {
    noise: NoiseFilter,
}

impl NumericRule {
    pub fn new(noise: NoiseFilter) -> Self {
        Self { noise }
    }

    /// Pick the winner among surviving candidates.
    ///
    /// Six digits beat four, four beat eight, and anything else falls back
    /// to the first survivor. Within a class the leftmost one wins.
    pub fn select(candidates: Vec<CodeCandidate>) -> Option<CodeCandidate> {
        PREFERRED_LENGTHS
            .iter()
            .find_map(|&len| candidates.iter().find(|c| c.len() == len).cloned())
            .or_else(|| candidates.into_iter().next())
    }
}

impl Default for NumericRule {
    fn default() -> Self {
        Self::new(NoiseFilter::default())
    }
}

/// A run counts as standalone when neither neighbour is a letter or digit.
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_none_or(|c| !c.is_alphanumeric()) && after.is_none_or(|c| !c.is_alphanumeric())
}

impl TierRule for NumericRule {
    fn tier(&self) -> CodeTier {
        CodeTier::Numeric
    }

    fn extract(&self, text: &str) -> Option<CodeCandidate> {
        Self::select(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<CodeCandidate> {
        DIGIT_RUN
            .find_iter(text)
            .filter(|m| (4..=8).contains(&m.len()))
            .filter(|m| {
                let standalone = is_standalone(text, m.start(), m.end());
                if !standalone {
                    trace!(value = m.as_str(), "skipped digits inside a word");
                }
                standalone
            })
            .filter(|m| !self.noise.rejects(text, m.start(), m.end()))
            .map(|m| CodeCandidate::new(m.as_str(), CodeTier::Numeric, m.start()))
            .collect()
    }
}
