//! Core library for verification-code autofill.
//!
//! This crate provides:
//! - Page field classification (explicit markers, segmented boxes, contextual fallback)
//! - Code extraction from message text (callouts, standalone numbers, mixed tokens)
//! - Mail source helpers, autofill planning and per-page session state
//! - A typed request/response dispatcher for cross-context messaging

pub mod error;
pub mod field;
pub mod fill;
pub mod mail;
pub mod models;
pub mod protocol;
pub mod session;
pub mod text;

pub use error::{CodefillError, ExtractionError, Result, SnapshotError};
pub use field::FieldClassifier;
pub use fill::{FillEvent, FillPlan, FillStep};
pub use mail::{MailMatch, MailMessage, first_code, html_to_text, order_newest_first};
pub use models::{
    CandidateField, CodeTier, CodefillConfig, Detection, ElementHandle, ElementSnapshot,
    ExtractedCode, ExtractionContext, FieldTier, PageSnapshot,
};
pub use protocol::{Engine, Request, Response};
pub use session::{Session, SessionEvent};
pub use text::{CodeExtractor, TieredCodeExtractor};
