//! # Text Segmentation Configuration
use crate::regex::BYTE_LEVEL_WORD_PATTERN;
use serde::{Deserialize, Serialize};

/// Word Split + Special Words Segmentor Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Regex pattern for word splitting.
    pub pattern: String,

    /// Special token strings, matched before word splitting.
    pub specials: Vec<String>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self::from_pattern(BYTE_LEVEL_WORD_PATTERN)
    }
}

impl SegmentationConfig {
    /// Create a new text segmentor configuration with the given word pattern.
    ///
    /// Will contain an empty list of specials.
    pub fn from_pattern<P: Into<String>>(pattern: P) -> Self {
        Self {
            pattern: pattern.into(),
            specials: Vec::new(),
        }
    }

    /// Set the split pattern for the text segmentor configuration.
    pub fn with_pattern<P: Into<String>>(
        self,
        pattern: P,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Replace the special token strings.
    pub fn with_specials<W, S>(
        self,
        specials: W,
    ) -> Self
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let specials = specials
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        Self { specials, ..self }
    }

    /// Get the word pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the special token strings.
    pub fn specials(&self) -> &[String] {
        &self.specials
    }
}
