//! Data models shared by the classifier and the extractor.

pub mod code;
pub mod config;
pub mod field;
pub mod page;

pub use code::{CodeTier, ExtractedCode, ExtractionContext};
pub use config::{ClassifierConfig, CodefillConfig, ExtractionConfig, MailConfig};
pub use field::{CandidateField, Detection, FieldTier};
pub use page::{ComputedStyle, ElementHandle, ElementSnapshot, PageSnapshot, Rect};
