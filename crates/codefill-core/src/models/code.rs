//! Extraction input and output types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// One message to mine for a code.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionContext {
    subject: String,
    body: String,
    combined: String,
}

impl ExtractionContext {
    /// Bundle a subject and a plain-text body.
    ///
    /// Fails only when both are blank.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Result<Self, ExtractionError> {
        let subject = subject.into();
        let body = body.into();

        if subject.trim().is_empty() && body.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let combined = format!("{} {}", subject, body);
        Ok(Self {
            subject,
            body,
            combined,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Subject and body joined by a single space.
    pub fn combined_text(&self) -> &str {
        &self.combined
    }
}

/// Extractor tier that produced a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeTier {
    /// "Your code is ..." style phrasing.
    Callout,
    /// Bare run of digits.
    Numeric,
    /// Mixed letters and digits, keyword gated.
    Alphanumeric,
}

impl CodeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeTier::Callout => "callout",
            CodeTier::Numeric => "numeric",
            CodeTier::Alphanumeric => "alphanumeric",
        }
    }
}

impl fmt::Display for CodeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The code chosen for a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCode {
    pub code: String,
    pub tier: CodeTier,
}

impl ExtractedCode {
    pub fn new(code: impl Into<String>, tier: CodeTier) -> Self {
        Self {
            code: code.into(),
            tier,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ExtractedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
