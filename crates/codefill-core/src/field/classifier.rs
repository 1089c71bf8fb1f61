//! Field classifier running the marker, segmented and contextual tiers in order.

use tracing::debug;

use crate::error::SnapshotError;
use crate::models::config::ClassifierConfig;
use crate::models::field::{CandidateField, Detection};
use crate::models::page::{ElementSnapshot, PageSnapshot};

use super::FieldRule;
use super::context::ContextRule;
use super::markers::MarkerRule;
use super::segmented::SegmentedRule;

/// Classifier for code-entry fields on a page snapshot.
pub struct FieldClassifier {
    markers: MarkerRule,
    segmented: SegmentedRule,
    context: ContextRule,
}

impl FieldClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }

    /// Create a classifier from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            markers: MarkerRule::new(&config.marker_vocabulary),
            segmented: SegmentedRule::new(config.segment_min, config.segment_max),
            context: ContextRule::new(config),
        }
    }

    fn tiers(&self) -> [&dyn FieldRule; 3] {
        [&self.markers, &self.segmented, &self.context]
    }

    /// Find the best code field and the tier that found it.
    ///
    /// Returns `Ok(None)` when the page has no code field. Detached nodes
    /// are skipped rather than failing the scan.
    pub fn detect(&self, page: &PageSnapshot) -> Result<Option<Detection>, SnapshotError> {
        page.validate()?;

        let elements: Vec<&ElementSnapshot> = page.attached().collect();
        let skipped = page.elements.len() - elements.len();
        if skipped > 0 {
            debug!(skipped, "Skipping detached elements");
        }

        for rule in self.tiers() {
            if let Some(field) = rule.detect(&elements, &page.visible_text) {
                debug!(
                    tier = rule.tier().as_str(),
                    handles = field.handles().len(),
                    "Detected code field"
                );
                return Ok(Some(Detection {
                    field,
                    tier: rule.tier(),
                }));
            }
        }

        debug!("No code field among {} elements", elements.len());
        Ok(None)
    }

    /// Find the best code field.
    pub fn classify(&self, page: &PageSnapshot) -> Result<Option<CandidateField>, SnapshotError> {
        Ok(self.detect(page)?.map(|detection| detection.field))
    }
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new()
    }
}
