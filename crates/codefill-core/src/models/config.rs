//! Configuration structures for the classifier and extractor.

use serde::{Deserialize, Serialize};

use super::field::{MAX_SEGMENTS, MIN_SEGMENTS};
use crate::error::{CodefillError, Result};

/// Main configuration for codefill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodefillConfig {
    /// Page field classifier configuration.
    pub classifier: ClassifierConfig,

    /// Email code extraction configuration.
    pub extraction: ExtractionConfig,

    /// Mail source handling.
    pub mail: MailConfig,
}

/// Field classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Attribute substrings that mark a code field, in priority order.
    pub marker_vocabulary: Vec<String>,

    /// Fewest single-character boxes accepted as a segmented field.
    pub segment_min: usize,

    /// Most single-character boxes accepted as a segmented field.
    pub segment_max: usize,

    /// Largest declared `maxlength` for a contextual match.
    pub max_field_length: u32,

    /// Largest declared `size` for a contextual match.
    pub max_field_size: u32,

    /// Rendered width (exclusive) below which a contextual input counts as small.
    pub max_field_width: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            marker_vocabulary: ["otp", "code", "verify", "token", "2fa", "mfa", "pin", "verification"]
                .into_iter()
                .map(String::from)
                .collect(),
            segment_min: MIN_SEGMENTS,
            segment_max: MAX_SEGMENTS,
            max_field_length: 8,
            max_field_size: 8,
            max_field_width: 300.0,
        }
    }
}

/// Email code extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Words signalling that a message is about a code.
    pub code_keywords: Vec<String>,

    /// Match keywords only where they begin a word, so "pin" stays out of
    /// "shopping". Off by default, which lets "passcode" count as "code".
    pub keywords_at_word_start: bool,

    /// First year of the range treated as "looks like a year".
    pub year_min: u32,

    /// Last year of the range treated as "looks like a year".
    pub year_max: u32,

    /// Characters inspected on each side of a number for money markers.
    pub currency_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            code_keywords: ["code", "verify", "verification", "confirm", "otp", "pin"]
                .into_iter()
                .map(String::from)
                .collect(),
            keywords_at_word_start: false,
            year_min: 1900,
            year_max: 2099,
            currency_window: 5,
        }
    }
}

/// Mail source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Strip markup from HTML bodies before extraction.
    pub strip_html: bool,

    /// How many recent messages a lookup consults.
    pub max_messages: usize,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            strip_html: true,
            max_messages: 10,
        }
    }
}

impl CodefillConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that every range in the configuration is non-empty.
    pub fn validate(&self) -> Result<()> {
        let classifier = &self.classifier;
        if classifier.segment_min > classifier.segment_max {
            return Err(CodefillError::Config(format!(
                "classifier.segment_min {} exceeds segment_max {}",
                classifier.segment_min, classifier.segment_max
            )));
        }

        let extraction = &self.extraction;
        if extraction.year_min > extraction.year_max {
            return Err(CodefillError::Config(format!(
                "extraction.year_min {} exceeds year_max {}",
                extraction.year_min, extraction.year_max
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CodefillConfig =
            serde_json::from_str(r#"{"extraction": {"year_max": 2050}}"#).unwrap();

        assert_eq!(config.extraction.year_max, 2050);
        assert_eq!(config.extraction.year_min, 1900);
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.classifier.marker_vocabulary[0], "otp");
        assert!(!config.extraction.keywords_at_word_start);
    }

    #[test]
    fn test_file_round_trip_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codefill.json");

        let mut config = CodefillConfig::default();
        config.extraction.keywords_at_word_start = true;
        config.save(&path).unwrap();
        assert_eq!(CodefillConfig::from_file(&path).unwrap(), config);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CodefillConfig::from_file(&path),
            Err(CodefillError::Json(_))
        ));

        std::fs::write(&path, r#"{"extraction": {"year_min": 2100, "year_max": 2000}}"#).unwrap();
        assert!(matches!(
            CodefillConfig::from_file(&path),
            Err(CodefillError::Config(_))
        ));

        assert!(matches!(
            CodefillConfig::from_file(&dir.path().join("missing.json")),
            Err(CodefillError::Io(_))
        ));
    }
}
