//! Section generators: tier-aware prompt construction plus response parsing.
//!
//! One generator per [`SectionKind`], dispatched through an exhaustive match
//! in [`generator_for`]. Generators never fabricate placeholder content: an
//! adapter failure propagates as a typed error so that everything in a
//! lesson is traceable to the source material or fails visibly.

pub mod parse;
pub mod prompts;

mod dialogue;
mod discussion;
mod opening;
mod passage;
mod practice;
mod vocabulary;

pub use dialogue::{DialogueGenerator, DIALOGUE_MIN_LINES, DIALOGUE_TARGET_LINES};
pub use discussion::{ClosingGenerator, DiscussionGenerator, CLOSING_MIN, DISCUSSION_QUESTION_COUNT};
pub use opening::{OpeningGenerator, OPENING_QUESTION_COUNT};
pub use passage::{ComprehensionGenerator, PassageGenerator, COMPREHENSION_MIN};
pub use practice::{
    GrammarGenerator, PronunciationGenerator, GRAMMAR_MIN_ITEMS, PRONUNCIATION_MIN_WORDS,
    TWISTER_MIN,
};
pub use vocabulary::{VocabularyGenerator, VOCABULARY_TARGET};

use crate::adapter::BudgetedInvoker;
use crate::context::GenerationContext;
use crate::core::{SectionContent, SectionKind, SectionResult};
use crate::errors::LessonError;
use async_trait::async_trait;

/// Read-only input to a generator attempt.
#[derive(Debug)]
pub struct GeneratorInput<'a> {
    /// The shared generation context.
    pub ctx: &'a GenerationContext,
    /// Results of sections generated earlier in the plan.
    pub prior: &'a [SectionResult],
    /// Blocking issues from a rejected attempt, empty on the first try.
    pub revision_notes: &'a [String],
}

impl<'a> GeneratorInput<'a> {
    /// The word list the section should reinforce: the accepted vocabulary
    /// section's words when available, the ranked context vocabulary
    /// otherwise.
    #[must_use]
    pub fn reinforcement_words(&self) -> Vec<&'a str> {
        for result in self.prior {
            if result.kind == SectionKind::Vocabulary {
                let words = result.vocabulary_words();
                if !words.is_empty() {
                    return words;
                }
            }
        }
        self.ctx
            .ranked_vocabulary
            .iter()
            .map(String::as_str)
            .collect()
    }
}

/// A section generator: builds a prompt, calls the service, parses the
/// response into an unvalidated structured record.
#[async_trait]
pub trait SectionGenerator: Send + Sync {
    /// The section kind this generator produces.
    fn kind(&self) -> SectionKind;

    /// Runs one generation attempt.
    ///
    /// # Errors
    ///
    /// Propagates adapter failures as [`LessonError`]; never substitutes
    /// canned content.
    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError>;
}

/// Output token budget for one section, in service units.
#[must_use]
pub const fn output_budget(kind: SectionKind) -> u32 {
    match kind {
        SectionKind::OpeningQuestions | SectionKind::ClosingReflection => 150,
        SectionKind::Discussion => 250,
        SectionKind::Comprehension | SectionKind::Pronunciation => 400,
        SectionKind::Grammar => 500,
        SectionKind::ReadingPassage => 600,
        SectionKind::Vocabulary
        | SectionKind::DialogueFillIn
        | SectionKind::DialogueComprehension => 700,
    }
}

/// Constructs the generator for a section kind.
///
/// The match is exhaustive: a new [`SectionKind`] will not compile until it
/// has a generator.
#[must_use]
pub fn generator_for(kind: SectionKind, invoker: BudgetedInvoker) -> Box<dyn SectionGenerator> {
    match kind {
        SectionKind::OpeningQuestions => Box::new(OpeningGenerator::new(invoker)),
        SectionKind::Vocabulary => Box::new(VocabularyGenerator::new(invoker)),
        SectionKind::ReadingPassage => Box::new(PassageGenerator::new(invoker)),
        SectionKind::Comprehension => Box::new(ComprehensionGenerator::new(invoker)),
        SectionKind::Discussion => Box::new(DiscussionGenerator::new(invoker)),
        SectionKind::DialogueFillIn => Box::new(DialogueGenerator::gapped(invoker)),
        SectionKind::DialogueComprehension => Box::new(DialogueGenerator::plain(invoker)),
        SectionKind::Grammar => Box::new(GrammarGenerator::new(invoker)),
        SectionKind::Pronunciation => Box::new(PronunciationGenerator::new(invoker)),
        SectionKind::ClosingReflection => Box::new(ClosingGenerator::new(invoker)),
    }
}
