//! Tier C: mixed letter-and-digit tokens, only in messages about codes.

use tracing::trace;

use super::noise::KeywordGate;
use super::patterns::ALNUM_TOKEN;
use super::{CodeCandidate, TierRule};
use crate::models::code::CodeTier;

/// Alphanumeric rule gated on code keywords.
pub struct AlphanumericRule {
    gate: KeywordGate,
}

impl AlphanumericRule {
    pub fn new(gate: KeywordGate) -> Self {
        Self { gate }
    }
}

impl Default for AlphanumericRule {
    fn default() -> Self {
        Self::new(KeywordGate::default())
    }
}

fn is_mixed(token: &str) -> bool {
    token.bytes().any(|b| b.is_ascii_alphabetic()) && token.bytes().any(|b| b.is_ascii_digit())
}

impl TierRule for AlphanumericRule {
    fn tier(&self) -> CodeTier {
        CodeTier::Alphanumeric
    }

    fn extract(&self, text: &str) -> Option<CodeCandidate> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<CodeCandidate> {
        if !self.gate.is_open(text) {
            trace!("no code keyword, alphanumeric scan skipped");
            return Vec::new();
        }

        ALNUM_TOKEN
            .find_iter(text)
            .filter(|m| is_mixed(m.as_str()))
            .map(|m| CodeCandidate::new(m.as_str(), CodeTier::Alphanumeric, m.start()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_token_with_keyword() {
        let rule = AlphanumericRule::default();
        let found = rule.extract("Your login pin: see below. X9Y8Z7W6").unwrap();
        assert_eq!(found.value, "X9Y8Z7W6");
        assert_eq!(found.tier, CodeTier::Alphanumeric);
    }

    #[test]
    fn test_gate_closed_without_keyword() {
        let rule = AlphanumericRule::default();
        assert!(rule.extract("Your reference is A1B2C3").is_none());
    }

    #[test]
    fn test_pure_tokens_skipped() {
        let rule = AlphanumericRule::default();
        let found = rule
            .extract("Confirm account BANANAS 123456 then QW12ER")
            .unwrap();
        assert_eq!(found.value, "QW12ER");
    }

    #[test]
    fn test_long_tokens_skipped() {
        let rule = AlphanumericRule::default();
        assert!(rule.extract("verify token ABC123DEF456").is_none());
    }
}
