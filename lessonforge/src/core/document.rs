//! Source document input and the pre-pipeline structural floor.

use crate::errors::LessonError;
use serde::{Deserialize, Serialize};

/// Optional metadata attached to a source document by the upstream extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title, if detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Origin URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Origin domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Suitability hints supplied by the upstream content extractor.
///
/// Hints are trusted for tier suggestion only; the structural floor is
/// re-checked locally before any text-service call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuitabilityHints {
    /// Extractor-reported word count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Detected language of the source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    /// Detected content category (news, science, opinion, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// An immutable source document, owned by the caller and read-only to the
/// pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// The cleaned source text.
    pub text: String,
    /// Document metadata.
    #[serde(default)]
    pub metadata: DocumentMetadata,
    /// Upstream suitability hints.
    #[serde(default)]
    pub hints: SuitabilityHints,
}

impl SourceDocument {
    /// Minimum word count accepted by the structural floor.
    pub const MIN_WORDS: usize = 150;
    /// Minimum sentence count accepted by the structural floor.
    pub const MIN_SENTENCES: usize = 8;

    /// Creates a new source document from raw text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: DocumentMetadata::default(),
            hints: SuitabilityHints::default(),
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Sets the origin URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.metadata.url = Some(url.into());
        self
    }

    /// Sets the suitability hints.
    #[must_use]
    pub fn with_hints(mut self, hints: SuitabilityHints) -> Self {
        self.hints = hints;
        self
    }

    /// Counts whitespace-separated words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Counts sentence terminators as a cheap sentence estimate.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.text
            .split(['.', '!', '?'])
            .filter(|s| s.split_whitespace().count() >= 2)
            .count()
    }

    /// Checks the structural floor.
    ///
    /// Rejecting unusable input here avoids wasting any text-service calls.
    ///
    /// # Errors
    ///
    /// Returns [`LessonError::ContentInsufficient`] when the document is too
    /// short to generate a lesson from.
    pub fn check_floor(&self) -> Result<(), LessonError> {
        let words = self.word_count();
        if words < Self::MIN_WORDS {
            return Err(LessonError::content_insufficient(format!(
                "document has {words} words, minimum is {}",
                Self::MIN_WORDS
            )));
        }
        let sentences = self.sentence_count();
        if sentences < Self::MIN_SENTENCES {
            return Err(LessonError::content_insufficient(format!(
                "document has {sentences} sentences, minimum is {}",
                Self::MIN_SENTENCES
            )));
        }
        Ok(())
    }
}
