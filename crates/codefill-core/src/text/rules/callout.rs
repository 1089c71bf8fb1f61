//! Tier A: codes stated outright ("your code is 482913").

use super::patterns::CALLOUT_TEMPLATES;
use super::{CodeCandidate, TierRule};
use crate::models::code::CodeTier;

/// Explicit callout rule.
///
/// Templates are tried in order and the first template with an acceptable
/// capture wins. A capture must contain a digit, so plain words that happen
/// to follow "code is" are skipped.
pub struct CalloutRule;

impl CalloutRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalloutRule {
    fn default() -> Self {
        Self::new()
    }
}

fn has_digit(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
}

impl TierRule for CalloutRule {
    fn tier(&self) -> CodeTier {
        CodeTier::Callout
    }

    fn extract(&self, text: &str) -> Option<CodeCandidate> {
        CALLOUT_TEMPLATES.iter().find_map(|template| {
            template
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .find(|m| has_digit(m.as_str()))
                .map(|m| CodeCandidate::new(m.as_str(), CodeTier::Callout, m.start()))
        })
    }

    fn extract_all(&self, text: &str) -> Vec<CodeCandidate> {
        CALLOUT_TEMPLATES
            .iter()
            .flat_map(|template| template.captures_iter(text))
            .filter_map(|caps| caps.get(1))
            .filter(|m| has_digit(m.as_str()))
            .map(|m| CodeCandidate::new(m.as_str(), CodeTier::Callout, m.start()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_code_is() {
        let rule = CalloutRule::new();
        let found = rule
            .extract("Your verification code is: 482913. Meeting scheduled for 2024.")
            .unwrap();
        assert_eq!(found.value, "482913");
        assert_eq!(found.tier, CodeTier::Callout);
    }

    #[test]
    fn test_skips_words_after_code_is() {
        let rule = CalloutRule::new();
        let found = rule
            .extract("Your code is valid for 10 minutes. Code: 5512")
            .unwrap();
        assert_eq!(found.value, "5512");
    }

    #[test]
    fn test_template_order_beats_position() {
        let rule = CalloutRule::new();
        let text = "771203 is your code. Login code: 118822";
        assert_eq!(rule.extract(text).unwrap().value, "118822");

        let all: Vec<String> = rule.extract_all(text).into_iter().map(|c| c.value).collect();
        assert_eq!(all, vec!["118822", "771203"]);
    }

    #[test]
    fn test_no_callout() {
        let rule = CalloutRule::new();
        assert!(rule.extract("Meeting moved to 14:30 tomorrow").is_none());
    }
}
