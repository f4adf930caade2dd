//! Opening questions: prior-knowledge activation before reading.

use super::parse::clean_lines;
use super::prompts::PromptBuilder;
use super::{output_budget, GeneratorInput, SectionGenerator};
use crate::adapter::BudgetedInvoker;
use crate::core::{SectionContent, SectionKind};
use crate::errors::LessonError;
use async_trait::async_trait;

/// Number of opening questions a lesson always has.
pub const OPENING_QUESTION_COUNT: usize = 3;

/// Generates the opening questions section.
///
/// Opening questions probe what the learner already knows about the topic.
/// They must not assume familiarity with the source document, so the prompt
/// forbids naming its specific people, places, or events; the matching
/// validator rejects leakage that slips through.
#[derive(Debug)]
pub struct OpeningGenerator {
    invoker: BudgetedInvoker,
}

impl OpeningGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl SectionGenerator for OpeningGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::OpeningQuestions
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let style = input.ctx.tier.profile().question_style;
        let prompt = PromptBuilder::new(input.ctx)
            .task(format!(
                "write exactly 3 opening questions about the general topic, as {style}, \
                 one per line"
            ))
            .line(
                "The learner has not read the material yet. Ask about their own \
                 experience of the topic. Never mention specific names, places, \
                 events, numbers, or outcomes from the material.",
            )
            .revision_notes(input.revision_notes)
            .build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        let items: Vec<String> = clean_lines(&raw)
            .into_iter()
            .filter(|l| l.ends_with('?'))
            .collect();

        Ok(SectionContent::Questions { items })
    }
}
