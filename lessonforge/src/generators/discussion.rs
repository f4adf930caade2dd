//! Discussion questions and closing reflection sections.

use super::parse::clean_lines;
use super::prompts::PromptBuilder;
use super::{output_budget, GeneratorInput, SectionGenerator};
use crate::adapter::BudgetedInvoker;
use crate::core::{SectionContent, SectionKind};
use crate::errors::LessonError;
use async_trait::async_trait;

/// Number of discussion questions a lesson always has.
pub const DISCUSSION_QUESTION_COUNT: usize = 5;

/// Minimum closing reflection prompts.
pub const CLOSING_MIN: usize = 2;

/// Generates the open discussion section.
#[derive(Debug)]
pub struct DiscussionGenerator {
    invoker: BudgetedInvoker,
}

impl DiscussionGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl SectionGenerator for DiscussionGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Discussion
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let style = input.ctx.tier.profile().question_style;
        let prompt = PromptBuilder::new(input.ctx)
            .task(format!(
                "write exactly 5 discussion questions about the themes, as {style}, one per line"
            ))
            .line("Questions should invite personal responses, not factual recall.")
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

/// Generates the closing reflection section.
#[derive(Debug)]
pub struct ClosingGenerator {
    invoker: BudgetedInvoker,
}

impl ClosingGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl SectionGenerator for ClosingGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::ClosingReflection
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let prompt = PromptBuilder::new(input.ctx)
            .task("write 3 closing reflection prompts about what the learner practiced, one per line")
            .line("Prompts should look back at the lesson, not introduce new material.")
            .revision_notes(input.revision_notes)
            .build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        Ok(SectionContent::Questions {
            items: clean_lines(&raw),
        })
    }
}
