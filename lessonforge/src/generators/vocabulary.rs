//! Vocabulary section: key words with meanings and tier-calibrated examples.

use super::prompts::PromptBuilder;
use super::{output_budget, GeneratorInput, SectionGenerator};
use crate::adapter::BudgetedInvoker;
use crate::core::{SectionContent, SectionKind, VocabularyItem};
use crate::errors::LessonError;
use async_trait::async_trait;

/// How many vocabulary entries a lesson targets.
pub const VOCABULARY_TARGET: usize = 8;

/// Generates the vocabulary section.
#[derive(Debug)]
pub struct VocabularyGenerator {
    invoker: BudgetedInvoker,
}

impl VocabularyGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl SectionGenerator for VocabularyGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Vocabulary
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let per_word = input.ctx.tier.profile().examples_per_word;
        let prompt = PromptBuilder::new(input.ctx)
            .task(format!(
                "produce vocabulary entries for {VOCABULARY_TARGET} of the key vocabulary words"
            ))
            .line(format!(
                "Format each entry as 'word | short meaning' on its own line, followed by \
                 exactly {per_word} example sentences, each on its own line starting with '- '."
            ))
            .revision_notes(input.revision_notes)
            .build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        Ok(SectionContent::Vocabulary {
            items: parse_entries(&raw),
        })
    }
}

/// Parses `word | meaning` header lines with `- example` continuation lines.
fn parse_entries(raw: &str) -> Vec<VocabularyItem> {
    let mut items: Vec<VocabularyItem> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("```") {
            continue;
        }
        if let Some(example) = line.strip_prefix("- ") {
            if let Some(item) = items.last_mut() {
                item.examples.push(example.trim().to_string());
            }
            continue;
        }
        if let Some((word, meaning)) = super::parse::split_pair(line, '|') {
            items.push(VocabularyItem {
                word: word.to_lowercase(),
                meaning,
                examples: Vec::new(),
            });
        }
    }
    items
}
