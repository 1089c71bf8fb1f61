//! Tier 2: groups of single-character boxes sharing a parent.

use tracing::trace;

use super::FieldRule;
use super::visibility::is_visible;
use crate::models::field::{CandidateField, FieldTier};
use crate::models::page::{ElementHandle, ElementSnapshot};

/// Segmented group rule.
///
/// Members are kept in document scan order, which can differ from the
/// visual order when a container reorders its children with CSS.
pub struct SegmentedRule {
    min: usize,
    max: usize,
}

impl SegmentedRule {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Single-character boxes grouped by parent, groups ordered by first member.
    fn groups(elements: &[&ElementSnapshot]) -> Vec<(Option<ElementHandle>, Vec<ElementHandle>)> {
        let mut groups: Vec<(Option<ElementHandle>, Vec<ElementHandle>)> = Vec::new();

        for element in elements {
            if !(element.is_text_capable() && element.max_length() == Some(1) && is_visible(element)) {
                continue;
            }
            match groups.iter_mut().find(|(parent, _)| *parent == element.parent) {
                Some((_, members)) => members.push(element.handle),
                None => groups.push((element.parent, vec![element.handle])),
            }
        }

        groups
    }
}

impl FieldRule for SegmentedRule {
    fn tier(&self) -> FieldTier {
        FieldTier::Segmented
    }

    fn detect(&self, elements: &[&ElementSnapshot], _visible_text: &str) -> Option<CandidateField> {
        Self::groups(elements)
            .into_iter()
            .filter(|(parent, members)| {
                let fits = (self.min..=self.max).contains(&members.len());
                if !fits {
                    trace!(
                        parent = ?parent,
                        size = members.len(),
                        "single-character group out of range"
                    );
                }
                fits
            })
            .find_map(|(_, members)| CandidateField::segmented(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::{MAX_SEGMENTS, MIN_SEGMENTS};

    fn boxes(parent: u64, first: u64, count: u64) -> Vec<ElementSnapshot> {
        (first..first + count)
            .map(|h| {
                ElementSnapshot::new(h, "input")
                    .with_parent(parent)
                    .with_attr("maxlength", "1")
                    .with_rect(40.0, 40.0)
            })
            .collect()
    }

    fn detect(elements: &[ElementSnapshot]) -> Option<CandidateField> {
        let refs: Vec<&ElementSnapshot> = elements.iter().collect();
        SegmentedRule::new(MIN_SEGMENTS, MAX_SEGMENTS).detect(&refs, "")
    }

    #[test]
    fn test_six_boxes() {
        let field = detect(&boxes(100, 1, 6)).unwrap();
        let handles: Vec<u64> = field.handles().iter().map(|h| h.0).collect();
        assert_eq!(handles, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_out_of_range_groups() {
        assert!(detect(&boxes(100, 1, 3)).is_none());
        assert!(detect(&boxes(100, 1, 9)).is_none());
    }

    #[test]
    fn test_first_fitting_group_wins() {
        let mut elements = boxes(100, 1, 3);
        elements.extend(boxes(200, 10, 4));
        elements.extend(boxes(300, 20, 6));

        let field = detect(&elements).unwrap();
        assert_eq!(field.handles().len(), 4);
        assert_eq!(field.handles()[0], ElementHandle(10));
    }

    #[test]
    fn test_interleaved_groups_keep_scan_order() {
        let mut elements = Vec::new();
        for i in 0..4 {
            elements.extend(boxes(100, i * 2, 1));
            elements.extend(boxes(200, i * 2 + 1, 1));
        }
        let field = detect(&elements).unwrap();
        let handles: Vec<u64> = field.handles().iter().map(|h| h.0).collect();
        assert_eq!(handles, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_invisible_boxes_do_not_count() {
        let mut elements = boxes(100, 1, 4);
        elements[0].rect.width = 0.0;
        assert!(detect(&elements).is_none());
    }

    #[test]
    fn test_wider_boxes_ignored() {
        let mut elements = boxes(100, 1, 6);
        for e in &mut elements {
            e.attributes.insert("maxlength".to_string(), "2".to_string());
        }
        assert!(detect(&elements).is_none());
    }
}
