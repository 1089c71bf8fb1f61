//! Detected code-entry targets.

use serde::{Deserialize, Serialize};

use super::page::ElementHandle;

/// Smallest number of boxes a segmented field may have.
pub const MIN_SEGMENTS: usize = 4;

/// Largest number of boxes a segmented field may have.
pub const MAX_SEGMENTS: usize = 8;

/// A fillable code-entry target found on a page.
///
/// Handles refer to the snapshot the field was detected in and must be
/// discarded once the page navigates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateField {
    /// One input that takes the whole code.
    Single { handle: ElementHandle },
    /// One input per code character, in document order.
    Segmented { handles: Vec<ElementHandle> },
}

impl CandidateField {
    pub fn single(handle: ElementHandle) -> Self {
        CandidateField::Single { handle }
    }

    /// Build a segmented field, refusing groups outside 4..=8 boxes.
    pub fn segmented(handles: Vec<ElementHandle>) -> Option<Self> {
        (MIN_SEGMENTS..=MAX_SEGMENTS)
            .contains(&handles.len())
            .then_some(CandidateField::Segmented { handles })
    }

    /// Handles in fill order.
    pub fn handles(&self) -> &[ElementHandle] {
        match self {
            CandidateField::Single { handle } => std::slice::from_ref(handle),
            CandidateField::Segmented { handles } => handles,
        }
    }

    pub fn is_segmented(&self) -> bool {
        matches!(self, CandidateField::Segmented { .. })
    }
}

/// Classifier tier that produced a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTier {
    /// Explicit autocomplete hint or code-like attribute.
    Marker,
    /// Group of single-character boxes.
    Segmented,
    /// Small empty input on a page that talks about codes.
    Contextual,
}

impl FieldTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldTier::Marker => "marker",
            FieldTier::Segmented => "segmented",
            FieldTier::Contextual => "contextual",
        }
    }
}

/// A field together with the tier that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub field: CandidateField,
    pub tier: FieldTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(n: u64) -> Vec<ElementHandle> {
        (0..n).map(ElementHandle).collect()
    }

    #[test]
    fn test_segmented_bounds() {
        assert!(CandidateField::segmented(handles(3)).is_none());
        assert!(CandidateField::segmented(handles(4)).is_some());
        assert!(CandidateField::segmented(handles(8)).is_some());
        assert!(CandidateField::segmented(handles(9)).is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let field = CandidateField::single(ElementHandle(5));
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "single", "handle": 5}));
    }
}
