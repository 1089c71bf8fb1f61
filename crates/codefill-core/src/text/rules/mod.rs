//! Tiered rules for pulling a verification code out of message text.

pub mod alphanumeric;
pub mod callout;
pub mod noise;
pub mod numeric;
pub mod patterns;

pub use alphanumeric::AlphanumericRule;
pub use callout::CalloutRule;
pub use noise::{KeywordGate, NoiseFilter};
pub use numeric::NumericRule;

use crate::models::code::CodeTier;

/// One extraction tier.
pub trait TierRule {
    /// The tier this rule implements.
    fn tier(&self) -> CodeTier;

    /// The candidate this tier settles on, if any.
    fn extract(&self, text: &str) -> Option<CodeCandidate>;

    /// Every candidate this tier accepts, in scan order.
    fn extract_all(&self, text: &str) -> Vec<CodeCandidate>;
}

/// A code match produced by one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCandidate {
    /// Matched code.
    pub value: String,
    /// Tier that produced the match.
    pub tier: CodeTier,
    /// Byte offset in the combined text.
    pub offset: usize,
}

impl CodeCandidate {
    pub fn new(value: impl Into<String>, tier: CodeTier, offset: usize) -> Self {
        Self {
            value: value.into(),
            tier,
            offset,
        }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }
}
