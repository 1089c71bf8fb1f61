//! Code-entry field classification over page snapshots.

mod classifier;
pub mod context;
pub mod markers;
pub mod segmented;
pub mod visibility;

pub use classifier::FieldClassifier;
pub use context::{ContextRule, page_requests_code};
pub use markers::MarkerRule;
pub use segmented::SegmentedRule;
pub use visibility::is_visible;

use crate::models::field::{CandidateField, FieldTier};
use crate::models::page::ElementSnapshot;

/// One classification tier.
pub trait FieldRule {
    /// The tier this rule implements.
    fn tier(&self) -> FieldTier;

    /// Look for a field among attached elements in scan order.
    fn detect(&self, elements: &[&ElementSnapshot], visible_text: &str) -> Option<CandidateField>;
}
