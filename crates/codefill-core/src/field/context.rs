//! Tier 3: a small empty input on a page whose text asks for a code.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::FieldRule;
use super::visibility::is_visible;
use crate::models::config::ClassifierConfig;
use crate::models::field::{CandidateField, FieldTier};
use crate::models::page::ElementSnapshot;

lazy_static! {
    // Phrases that signal the page is waiting for a code.
    static ref CODE_PROMPTS: Vec<Regex> = vec![
        Regex::new(
            r"(?i)\b(?:enter|type|input|provide)\s+(?:the\s+|your\s+|a\s+)?(?:\d+[- ]digit\s+)?(?:verification\s+|security\s+|confirmation\s+|one[- ]time\s+|login\s+|authentication\s+|access\s+)?(?:code|pin|passcode)\b"
        ).unwrap(),
        Regex::new(
            r"(?i)\bwe(?:\s+have|(?:'|\x{2019})ve|\s+just)?\s+(?:sent|texted|emailed)\s+(?:you\s+)?(?:a|an|the|your)\s+(?:[\w-]+\s+)?(?:code|pin|passcode)\b"
        ).unwrap(),
        Regex::new(r"(?i)\bone[- ]time\s+(?:password|passcode|code|pin)\b").unwrap(),
        Regex::new(r"(?i)\b(?:two|multi)[- ]factor\b|\b2fa\b|\bmfa\b").unwrap(),
        Regex::new(r"(?i)\b(?:verification|security|authentication)\s+code\b").unwrap(),
    ];
}

/// Input types considered for the contextual fallback.
const SHORT_FORM_TYPES: &[&str] = &["text", "number", "tel"];

/// Whether the page text asks for a code.
pub fn page_requests_code(visible_text: &str) -> bool {
    CODE_PROMPTS.iter().any(|prompt| prompt.is_match(visible_text))
}

/// Contextual fallback rule.
///
/// Any one of the size signals is enough, which trades precision for
/// recall on pages with other short numeric inputs.
pub struct ContextRule {
    max_length: u32,
    max_size: u32,
    max_width: f64,
}

impl ContextRule {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            max_length: config.max_field_length,
            max_size: config.max_field_size,
            max_width: config.max_field_width,
        }
    }

    fn is_short_form(element: &ElementSnapshot) -> bool {
        element.is_input()
            && element
                .input_type()
                .is_none_or(|t| SHORT_FORM_TYPES.contains(&t.as_str()))
    }

    fn is_small(&self, element: &ElementSnapshot) -> bool {
        element.max_length().is_some_and(|len| len <= self.max_length)
            || element.size().is_some_and(|size| size <= self.max_size)
            || element.rect.width < self.max_width
    }
}

impl Default for ContextRule {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl FieldRule for ContextRule {
    fn tier(&self) -> FieldTier {
        FieldTier::Contextual
    }

    fn detect(&self, elements: &[&ElementSnapshot], visible_text: &str) -> Option<CandidateField> {
        if !page_requests_code(visible_text) {
            trace!("page text does not ask for a code");
            return None;
        }

        elements
            .iter()
            .find(|e| {
                Self::is_short_form(e)
                    && is_visible(e)
                    && e.value.trim().is_empty()
                    && self.is_small(e)
            })
            .map(|e| CandidateField::single(e.handle))
    }
}
