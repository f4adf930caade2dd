//! Lesson kinds and the assembled lesson artifact.

use crate::core::section::{SectionKind, SectionResult};
use crate::core::tier::ProficiencyTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of lesson artifact being generated.
///
/// The kind selects which practice sections are planned; the progress
/// denominator is recomputed from that plan, never from a global constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    /// Reading plus open discussion.
    Discussion,
    /// Reading plus both dialogue variants.
    Dialogue,
    /// Reading plus a grammar focus.
    Grammar,
    /// Reading plus pronunciation practice.
    Pronunciation,
    /// Everything.
    Comprehensive,
}

impl LessonKind {
    /// Returns the stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discussion => "discussion",
            Self::Dialogue => "dialogue",
            Self::Grammar => "grammar",
            Self::Pronunciation => "pronunciation",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The assembled lesson: section results plus run metadata.
///
/// This is the only record the downstream renderer sees; it is emitted on
/// the `complete` event and never emitted partially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonArtifact {
    /// Unique id of the generation run.
    pub run_id: String,
    /// The lesson kind that was planned.
    pub kind: LessonKind,
    /// The proficiency tier the lesson is calibrated to.
    pub tier: ProficiencyTier,
    /// The language the lesson teaches.
    pub target_language: String,
    /// Title of the source document, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    /// Section results in generation order.
    pub sections: Vec<SectionResult>,
}

impl LessonArtifact {
    /// Looks up a section result by kind.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&SectionResult> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Mean quality score across sections, 0 when empty.
    #[must_use]
    pub fn overall_quality(&self) -> u32 {
        if self.sections.is_empty() {
            return 0;
        }
        let sum: u32 = self.sections.iter().map(|s| s.quality_score).sum();
        sum / self.sections.len() as u32
    }
}
