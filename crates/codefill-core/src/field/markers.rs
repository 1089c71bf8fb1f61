//! Tier 1: inputs explicitly marked as code fields.

use super::FieldRule;
use super::visibility::is_visible;
use crate::models::field::{CandidateField, FieldTier};
use crate::models::page::ElementSnapshot;

/// Attributes searched for vocabulary words, in priority order.
const MARKER_ATTRIBUTES: &[&str] = &[
    "name",
    "id",
    "class",
    "aria-label",
    "placeholder",
    "data-testid",
    "data-test-id",
];

/// One attribute test.
#[derive(Debug, Clone, PartialEq)]
enum MarkerPredicate<'a> {
    /// `autocomplete="one-time-code"`.
    OneTimeCode,
    /// Case-insensitive substring `word` in attribute `attr`.
    Contains { attr: &'static str, word: &'a str },
}

impl MarkerPredicate<'_> {
    fn matches(&self, element: &ElementSnapshot) -> bool {
        match self {
            MarkerPredicate::OneTimeCode => element.attr("autocomplete").is_some_and(|hint| {
                hint.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("one-time-code"))
            }),
            MarkerPredicate::Contains { attr, word } => element
                .attr(attr)
                .is_some_and(|value| value.to_lowercase().contains(word)),
        }
    }
}

/// Explicit marker rule.
///
/// Predicates are evaluated one at a time over the whole page; the first
/// visible element satisfying the current predicate wins outright.
pub struct MarkerRule {
    vocabulary: Vec<String>,
}

impl MarkerRule {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            vocabulary: vocabulary
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    fn predicates(&self) -> impl Iterator<Item = MarkerPredicate<'_>> {
        std::iter::once(MarkerPredicate::OneTimeCode).chain(self.vocabulary.iter().flat_map(
            |word| {
                MARKER_ATTRIBUTES
                    .iter()
                    .map(move |&attr| MarkerPredicate::Contains {
                        attr,
                        word: word.as_str(),
                    })
            },
        ))
    }
}

impl FieldRule for MarkerRule {
    fn tier(&self) -> FieldTier {
        FieldTier::Marker
    }

    fn detect(&self, elements: &[&ElementSnapshot], _visible_text: &str) -> Option<CandidateField> {
        self.predicates().find_map(|predicate| {
            elements
                .iter()
                .find(|e| e.is_text_capable() && is_visible(e) && predicate.matches(e))
                .map(|e| CandidateField::single(e.handle))
        })
    }
}
