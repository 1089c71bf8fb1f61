//! Per-page session state owned by the orchestrator.
//!
//! Results carry the epoch of the scan that produced them, so a scan that
//! finishes after a navigation is recognised as stale and dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::field::CandidateField;

/// Outcome of feeding a scan result into the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new field appeared, or the field changed.
    Detected { field: CandidateField },
    /// Same field as the previous scan.
    Unchanged,
    /// The previously detected field is gone.
    Lost,
    /// Still nothing to fill.
    Idle,
    /// The result belongs to a page that has since been left.
    Stale,
}

/// State of the page currently being watched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    page_url: Option<String>,
    epoch: u64,
    last_detected: Option<CandidateField>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching a new page, forgetting everything about the old one.
    ///
    /// Returns the epoch to tag scans of the new page with.
    pub fn navigate(&mut self, url: impl Into<String>) -> u64 {
        self.epoch += 1;
        self.page_url = Some(url.into());
        self.last_detected = None;
        debug!(epoch = self.epoch, url = ?self.page_url, "Session reset");
        self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    pub fn last_detected(&self) -> Option<&CandidateField> {
        self.last_detected.as_ref()
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        epoch == self.epoch
    }

    /// Record the result of a scan started at `epoch`.
    pub fn observe(&mut self, epoch: u64, detected: Option<CandidateField>) -> SessionEvent {
        if !self.is_current(epoch) {
            debug!(epoch, current = self.epoch, "Dropping stale scan result");
            return SessionEvent::Stale;
        }

        match (self.last_detected.take(), detected) {
            (Some(previous), Some(field)) if previous == field => {
                self.last_detected = Some(previous);
                SessionEvent::Unchanged
            }
            (_, Some(field)) => {
                self.last_detected = Some(field.clone());
                SessionEvent::Detected { field }
            }
            (Some(_), None) => SessionEvent::Lost,
            (None, None) => SessionEvent::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::ElementHandle;

    fn field(h: u64) -> CandidateField {
        CandidateField::single(ElementHandle(h))
    }

    #[test]
    fn test_redundant_detections_suppressed() {
        let mut session = Session::new();
        let epoch = session.navigate("https://example.com/login");

        assert_eq!(session.observe(epoch, None), SessionEvent::Idle);
        assert_eq!(
            session.observe(epoch, Some(field(1))),
            SessionEvent::Detected { field: field(1) }
        );
        assert_eq!(session.observe(epoch, Some(field(1))), SessionEvent::Unchanged);
        assert_eq!(
            session.observe(epoch, Some(field(2))),
            SessionEvent::Detected { field: field(2) }
        );
        assert_eq!(session.observe(epoch, None), SessionEvent::Lost);
        assert_eq!(session.last_detected(), None);
    }

    #[test]
    fn test_navigation_resets_and_invalidates() {
        let mut session = Session::new();
        let first = session.navigate("https://example.com/a");
        session.observe(first, Some(field(1)));

        let second = session.navigate("https://example.com/b");
        assert_eq!(session.last_detected(), None);
        assert_eq!(session.page_url(), Some("https://example.com/b"));
        assert_eq!(session.observe(first, Some(field(1))), SessionEvent::Stale);
        assert_eq!(
            session.observe(second, Some(field(1))),
            SessionEvent::Detected { field: field(1) }
        );
    }
}
