//! Error types for the codefill-core library.

use thiserror::Error;

use crate::models::page::ElementHandle;

/// Main error type for the codefill library.
#[derive(Error, Debug)]
pub enum CodefillError {
    /// Page snapshot error.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Code extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised for page snapshots that cannot be classified at all.
///
/// A snapshot with no code field is not an error; these only cover input
/// that is structurally unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Two elements share the same handle.
    #[error("duplicate element handle: {0}")]
    DuplicateHandle(ElementHandle),

    /// The snapshot document could not be decoded.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

/// Errors related to code extraction input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Both subject and body are empty.
    #[error("message has neither subject nor body text")]
    EmptyInput,
}

/// Result type for the codefill library.
pub type Result<T> = std::result::Result<T, CodefillError>;
