//! Noise filter: rejects numbers that read as years or money rather than codes.

use tracing::trace;

use super::patterns::{CURRENCY_CODE, CURRENCY_SYMBOL, DECIMAL_SUFFIX};
use crate::models::config::ExtractionConfig;

/// Case-insensitive matcher for code-related keywords.
///
/// By default a keyword matches anywhere, so "passcode" opens the gate on
/// "code". With word-start matching "pin" no longer matches "shopping",
/// while "confirm" still matches "confirmation".
#[derive(Debug, Clone)]
pub struct KeywordGate {
    keywords: Vec<String>,
    word_start: bool,
}

impl KeywordGate {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            word_start: false,
        }
    }

    /// Build the gate an extraction config describes.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(&config.code_keywords).with_word_start(config.keywords_at_word_start)
    }

    /// Only accept keywords that begin a word.
    pub fn with_word_start(mut self, word_start: bool) -> Self {
        self.word_start = word_start;
        self
    }

    /// Whether any keyword occurs in `text`.
    pub fn is_open(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.keywords.iter().any(|keyword| {
            haystack.match_indices(keyword.as_str()).any(|(pos, _)| {
                !self.word_start
                    || haystack[..pos]
                        .chars()
                        .next_back()
                        .is_none_or(|c| !c.is_alphanumeric())
            })
        })
    }
}

impl Default for KeywordGate {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

/// Year and money disambiguation shared by the numeric tier.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    year_range: (u32, u32),
    window: usize,
    keywords: KeywordGate,
}

impl NoiseFilter {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            year_range: (config.year_min, config.year_max),
            window: config.currency_window,
            keywords: KeywordGate::from_config(config),
        }
    }

    /// A four-digit value inside the configured year range.
    pub fn is_year_like(&self, value: &str) -> bool {
        value.len() == 4
            && value
                .parse::<u32>()
                .is_ok_and(|n| n >= self.year_range.0 && n <= self.year_range.1)
    }

    /// A year-like value in a message that never mentions codes.
    pub fn rejects_year(&self, value: &str, text: &str) -> bool {
        self.is_year_like(value) && !self.keywords.is_open(text)
    }

    /// Whether the number at `text[start..end]` is part of a monetary amount.
    ///
    /// Looks for a currency symbol or code in the characters just before the
    /// number, and a two-decimal suffix just after it. Currency codes are
    /// matched against the whole prefix so that word boundaries are real
    /// ones, then kept only if they lie inside the window.
    pub fn is_money(&self, text: &str, start: usize, end: usize) -> bool {
        let prefix = &text[..start];
        let window_start = prefix
            .char_indices()
            .rev()
            .take(self.window)
            .last()
            .map_or(start, |(i, _)| i);

        let symbol_before = CURRENCY_SYMBOL.is_match(&prefix[window_start..]);
        let code_before = CURRENCY_CODE
            .find_iter(prefix)
            .any(|m| m.start() >= window_start);

        let after: String = text[end..].chars().take(self.window).collect();

        symbol_before || code_before || DECIMAL_SUFFIX.is_match(&after)
    }

    /// Apply every rule to one candidate.
    pub fn rejects(&self, text: &str, start: usize, end: usize) -> bool {
        let value = &text[start..end];

        if self.rejects_year(value, text) {
            trace!(value, "rejected year-like number");
            return true;
        }
        if self.is_money(text, start, end) {
            trace!(value, "rejected monetary amount");
            return true;
        }
        false
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, needle: &str) -> (usize, usize) {
        let start = text.find(needle).unwrap();
        (start, start + needle.len())
    }

    #[test]
    fn test_keyword_gate_matches_anywhere() {
        let gate = KeywordGate::default();
        assert!(gate.is_open("Please CONFIRM your email"));
        assert!(gate.is_open("Your one-time PASSCODE"));
        assert!(gate.is_open("unconfirmed sign-in"));
        assert!(gate.is_open("shopping list"));
        assert!(!gate.is_open("Reminder: event in 2025"));
    }

    #[test]
    fn test_keyword_gate_word_start() {
        let gate = KeywordGate::default().with_word_start(true);
        assert!(gate.is_open("confirmation pending"));
        assert!(gate.is_open("your PIN"));
        assert!(!gate.is_open("shopping list"));
        assert!(!gate.is_open("Your passcode"));
    }

    #[test]
    fn test_year_rejected_without_keyword() {
        let filter = NoiseFilter::default();
        assert!(filter.rejects_year("2025", "Reminder: event in 2025"));
        assert!(!filter.rejects_year("2024", "Your code 2024 confirms the order"));
        assert!(!filter.rejects_year("2024", "Your passcode 2024 expires soon"));
        assert!(!filter.rejects_year("2100", "Reminder: 2100"));
        assert!(!filter.rejects_year("1899", "Reminder: 1899"));
    }

    #[test]
    fn test_currency_prefix() {
        let filter = NoiseFilter::default();

        let text = "Total: $ 1500 due";
        let (s, e) = span(text, "1500");
        assert!(filter.is_money(text, s, e));

        let text = "Pay USD 4500 now";
        let (s, e) = span(text, "4500");
        assert!(filter.is_money(text, s, e));

        let text = "Your code: 4500";
        let (s, e) = span(text, "4500");
        assert!(!filter.is_money(text, s, e));
    }

    #[test]
    fn test_decimal_suffix() {
        let filter = NoiseFilter::default();

        let text = "Balance 1234.56 remaining";
        let (s, e) = span(text, "1234");
        assert!(filter.is_money(text, s, e));

        let text = "Order 123456. Thanks";
        let (s, e) = span(text, "123456");
        assert!(!filter.is_money(text, s, e));
    }

    #[test]
    fn test_currency_code_inside_a_word() {
        let filter = NoiseFilter::default();

        for text in ["Fraud: 482913", "Amateur: 482913", "Refs: 482913"] {
            let (s, e) = span(text, "482913");
            assert!(!filter.is_money(text, s, e), "{text}");
        }

        let text = "Paid in AUD: 4500";
        let (s, e) = span(text, "4500");
        assert!(filter.is_money(text, s, e));
    }

    #[test]
    fn test_currency_outside_window_is_ignored() {
        let filter = NoiseFilter::default();
        let text = "$ paid, ref 904512";
        let (s, e) = span(text, "904512");
        assert!(!filter.is_money(text, s, e));
    }
}
