//! Core data model: tiers, documents, sections, and lesson artifacts.

pub mod artifact;
pub mod document;
pub mod section;
pub mod tier;

pub use artifact::{LessonArtifact, LessonKind};
pub use document::{DocumentMetadata, SourceDocument, SuitabilityHints};
pub use section::{
    DialogueLine, GrammarItem, PronunciationWord, QaItem, SectionContent, SectionKind,
    SectionResult, VocabularyItem,
};
pub use tier::{ProficiencyTier, TierProfile};
