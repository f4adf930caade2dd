//! Reading passage and comprehension sections.

use super::parse::{clean_lines, paragraphs};
use super::prompts::PromptBuilder;
use super::{output_budget, GeneratorInput, SectionGenerator};
use crate::adapter::BudgetedInvoker;
use crate::core::{QaItem, SectionContent, SectionKind};
use crate::errors::LessonError;
use async_trait::async_trait;

/// Minimum comprehension questions a lesson carries.
pub const COMPREHENSION_MIN: usize = 3;

/// Generates the main reading passage.
///
/// The passage retells the source material at the learner's level and
/// reinforces the shared vocabulary; the validator checks that enough of
/// those words actually appear.
#[derive(Debug)]
pub struct PassageGenerator {
    invoker: BudgetedInvoker,
}

impl PassageGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl SectionGenerator for PassageGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::ReadingPassage
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let words = input.reinforcement_words().join(", ");
        let prompt = PromptBuilder::new(input.ctx)
            .task("write a reading passage of two or three short paragraphs retelling the material")
            .line(format!(
                "Use at least 3 of these words exactly as written: {words}."
            ))
            .line("Separate paragraphs with a blank line.")
            .revision_notes(input.revision_notes)
            .build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        Ok(SectionContent::Passage {
            paragraphs: paragraphs(&raw),
        })
    }
}

/// Generates comprehension questions about the passage.
#[derive(Debug)]
pub struct ComprehensionGenerator {
    invoker: BudgetedInvoker,
}

impl ComprehensionGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }

    fn passage_text(input: &GeneratorInput<'_>) -> String {
        for result in input.prior {
            if result.kind == SectionKind::ReadingPassage {
                if let SectionContent::Passage { paragraphs } = &result.content {
                    return paragraphs.join("\n\n");
                }
            }
        }
        input.ctx.content_summary.clone()
    }
}

#[async_trait]
impl SectionGenerator for ComprehensionGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Comprehension
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let passage = Self::passage_text(input);
        let prompt = PromptBuilder::new(input.ctx)
            .task("write 4 comprehension questions about the passage below, with answers")
            .line("Format each pair as 'Q: question' on one line and 'A: answer' on the next.")
            .line(format!("Passage:\n{passage}"))
            .revision_notes(input.revision_notes)
            .build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        Ok(SectionContent::Comprehension {
            items: parse_qa(&raw),
        })
    }
}

/// Parses alternating `Q:` / `A:` lines into QA pairs.
fn parse_qa(raw: &str) -> Vec<QaItem> {
    let mut items: Vec<QaItem> = Vec::new();
    for line in clean_lines(raw) {
        if let Some(question) = line.strip_prefix("Q:") {
            items.push(QaItem {
                question: question.trim().to_string(),
                answer: None,
            });
        } else if let Some(answer) = line.strip_prefix("A:") {
            if let Some(item) = items.last_mut() {
                if item.answer.is_none() {
                    item.answer = Some(answer.trim().to_string());
                }
            }
        }
    }
    items.retain(|i| !i.question.is_empty());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProficiencyTier;
    use crate::generators::test_support::context;
    use crate::testing::MockTextService;
    use std::sync::Arc;

    #[test]
    fn test_parse_qa_pairs() {
        let raw = "Q: What do people want?\nA: Clean air.\nQ: Why?\nA: Health.";
        let items = parse_qa(raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question, "What do people want?");
        assert_eq!(items[0].answer.as_deref(), Some("Clean air."));
    }

    #[test]
    fn test_parse_qa_tolerates_missing_answer() {
        let items = parse_qa("Q: Unanswered question?");
        assert_eq!(items.len(), 1);
        assert!(items[0].answer.is_none());
    }

    #[tokio::test]
    async fn test_passage_prompt_carries_reinforcement_words() {
        let mock = Arc::new(MockTextService::new());
        mock.push_ok("First paragraph about transport.\n\nSecond paragraph about energy.");
        let generator = PassageGenerator::new(BudgetedInvoker::new(mock.clone()));
        let ctx = context(ProficiencyTier::Intermediate);
        let input = GeneratorInput {
            ctx: &ctx,
            prior: &[],
            revision_notes: &[],
        };

        let content = generator.generate(&input).await.unwrap();
        match content {
            SectionContent::Passage { paragraphs } => assert_eq!(paragraphs.len(), 2),
            other => panic!("unexpected content: {other:?}"),
        }
        let prompt = mock.recorded_prompts().remove(0);
        assert!(prompt.contains("exactly as written: climate, energy"));
    }
}
