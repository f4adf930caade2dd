//! Section kinds, structured section content, and section results.

use crate::core::tier::ProficiencyTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of section kinds a lesson can contain.
///
/// Dispatch over section kind is an exhaustive `match` everywhere, so adding
/// a kind fails to compile until every handler table is extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Prior-knowledge activation questions asked before reading.
    OpeningQuestions,
    /// Key vocabulary with meanings and tier-calibrated example sentences.
    Vocabulary,
    /// The main reading passage derived from the source material.
    ReadingPassage,
    /// Comprehension questions about the passage.
    Comprehension,
    /// Open discussion questions.
    Discussion,
    /// Dialogue with gapped lines for fill-in practice.
    DialogueFillIn,
    /// Ungapped dialogue used for listening/reading comprehension.
    DialogueComprehension,
    /// Grammar focus with practice items.
    Grammar,
    /// Pronunciation target words and tongue twisters.
    Pronunciation,
    /// Closing reflection prompts.
    ClosingReflection,
}

impl SectionKind {
    /// All section kinds, in canonical lesson order.
    #[must_use]
    pub const fn all() -> [Self; 10] {
        [
            Self::OpeningQuestions,
            Self::Vocabulary,
            Self::ReadingPassage,
            Self::Comprehension,
            Self::Discussion,
            Self::DialogueFillIn,
            Self::DialogueComprehension,
            Self::Grammar,
            Self::Pronunciation,
            Self::ClosingReflection,
        ]
    }

    /// Returns the stable snake_case name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpeningQuestions => "opening_questions",
            Self::Vocabulary => "vocabulary",
            Self::ReadingPassage => "reading_passage",
            Self::Comprehension => "comprehension",
            Self::Discussion => "discussion",
            Self::DialogueFillIn => "dialogue_fill_in",
            Self::DialogueComprehension => "dialogue_comprehension",
            Self::Grammar => "grammar",
            Self::Pronunciation => "pronunciation",
            Self::ClosingReflection => "closing_reflection",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One vocabulary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyItem {
    /// The target word.
    pub word: String,
    /// A learner-level meaning.
    pub meaning: String,
    /// Example sentences; count is fixed per tier.
    pub examples: Vec<String>,
}

/// A question with an optional model answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaItem {
    /// The question text.
    pub question: String,
    /// The expected answer, when the section provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// One line of a dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueLine {
    /// The speaker name.
    pub speaker: String,
    /// The spoken text; gapped lines contain a `____` placeholder.
    pub text: String,
    /// The word removed from a gapped line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_answer: Option<String>,
}

/// One grammar practice item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarItem {
    /// The practice prompt (transformation, gap, or reorder task).
    pub prompt: String,
    /// The expected answer.
    pub answer: String,
}

/// One pronunciation target word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PronunciationWord {
    /// The target word.
    pub word: String,
    /// IPA transcription, when the model provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa: Option<String>,
    /// A short articulation tip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

/// Structured content, one variant per section kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionContent {
    /// A flat list of questions or prompts (opening, discussion, closing).
    Questions {
        /// The question texts.
        items: Vec<String>,
    },
    /// Vocabulary entries.
    Vocabulary {
        /// The vocabulary items.
        items: Vec<VocabularyItem>,
    },
    /// The reading passage.
    Passage {
        /// Passage paragraphs in order.
        paragraphs: Vec<String>,
    },
    /// Comprehension question/answer pairs.
    Comprehension {
        /// The QA pairs.
        items: Vec<QaItem>,
    },
    /// A dialogue, optionally gapped.
    Dialogue {
        /// The dialogue lines in order.
        lines: Vec<DialogueLine>,
        /// Whether lines carry fill-in gaps.
        gapped: bool,
    },
    /// A grammar focus block.
    Grammar {
        /// The grammar point being practiced.
        focus: String,
        /// A learner-level explanation.
        explanation: String,
        /// Practice items.
        practice: Vec<GrammarItem>,
    },
    /// Pronunciation practice material.
    Pronunciation {
        /// Target words.
        words: Vec<PronunciationWord>,
        /// Tongue twisters built from target sounds.
        tongue_twisters: Vec<String>,
    },
}

impl SectionContent {
    /// Collects every piece of learner-visible text in this section.
    ///
    /// Validators run their linguistic checks over this flattened view.
    #[must_use]
    pub fn text_blocks(&self) -> Vec<&str> {
        match self {
            Self::Questions { items } => items.iter().map(String::as_str).collect(),
            Self::Vocabulary { items } => items
                .iter()
                .flat_map(|i| {
                    std::iter::once(i.meaning.as_str())
                        .chain(i.examples.iter().map(String::as_str))
                })
                .collect(),
            Self::Passage { paragraphs } => paragraphs.iter().map(String::as_str).collect(),
            Self::Comprehension { items } => items
                .iter()
                .flat_map(|i| {
                    std::iter::once(i.question.as_str()).chain(i.answer.as_deref())
                })
                .collect(),
            Self::Dialogue { lines, .. } => lines.iter().map(|l| l.text.as_str()).collect(),
            Self::Grammar {
                explanation,
                practice,
                ..
            } => std::iter::once(explanation.as_str())
                .chain(practice.iter().map(|p| p.prompt.as_str()))
                .collect(),
            Self::Pronunciation {
                tongue_twisters, ..
            } => tongue_twisters.iter().map(String::as_str).collect(),
        }
    }
}

/// The accepted output of one section's generate/validate cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResult {
    /// The section kind.
    pub kind: SectionKind,
    /// The validated (or degraded-accepted) content.
    pub content: SectionContent,
    /// Number of generation attempts consumed (bounded by the controller).
    pub attempts: u32,
    /// Quality score in 0..=100; degraded acceptance docks points.
    pub quality_score: u32,
    /// Non-blocking diagnostics carried forward for logging and display.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SectionResult {
    /// Returns the vocabulary word list when this is a vocabulary result.
    ///
    /// Later sections (dialogue, passage) read this to reinforce the same
    /// words instead of introducing new ones.
    #[must_use]
    pub fn vocabulary_words(&self) -> Vec<&str> {
        match &self.content {
            SectionContent::Vocabulary { items } => {
                items.iter().map(|i| i.word.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Expected example count for a vocabulary item at the given tier.
#[must_use]
pub fn expected_examples(tier: ProficiencyTier) -> usize {
    tier.profile().examples_per_word
}
