//! Grammar focus and pronunciation practice sections.

use super::parse::{clean_lines, strip_list_marker};
use super::prompts::PromptBuilder;
use super::{output_budget, GeneratorInput, SectionGenerator};
use crate::adapter::BudgetedInvoker;
use crate::core::{GrammarItem, PronunciationWord, SectionContent, SectionKind};
use crate::errors::LessonError;
use async_trait::async_trait;

/// Minimum grammar practice items.
pub const GRAMMAR_MIN_ITEMS: usize = 5;

/// Minimum pronunciation target words.
pub const PRONUNCIATION_MIN_WORDS: usize = 5;

/// Minimum tongue twisters.
pub const TWISTER_MIN: usize = 2;

/// Generates the grammar focus section.
#[derive(Debug)]
pub struct GrammarGenerator {
    invoker: BudgetedInvoker,
}

impl GrammarGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl SectionGenerator for GrammarGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Grammar
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let ceiling = input.ctx.tier.profile().grammar_ceiling;
        let prompt = PromptBuilder::new(input.ctx)
            .task(format!(
                "create a grammar focus block for one grammar point within this ceiling: {ceiling}"
            ))
            .line("Start with 'Focus: point' and 'Explanation: one or two sentences'.")
            .line(format!(
                "Then give at least {GRAMMAR_MIN_ITEMS} numbered practice items, \
                 each as 'prompt -> answer' on its own line."
            ))
            .revision_notes(input.revision_notes)
            .build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        Ok(parse_grammar(&raw))
    }
}

fn parse_grammar(raw: &str) -> SectionContent {
    let mut focus = String::new();
    let mut explanation = String::new();
    let mut practice = Vec::new();

    for line in raw.lines() {
        let line = strip_list_marker(line);
        if line.is_empty() || line.starts_with("```") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("Focus:") {
            focus = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Explanation:") {
            explanation = rest.trim().to_string();
        } else if let Some((prompt, answer)) = line.split_once("->") {
            let prompt = prompt.trim();
            let answer = answer.trim();
            if !prompt.is_empty() && !answer.is_empty() {
                practice.push(GrammarItem {
                    prompt: prompt.to_string(),
                    answer: answer.to_string(),
                });
            }
        }
    }

    SectionContent::Grammar {
        focus,
        explanation,
        practice,
    }
}

/// Generates the pronunciation practice section.
#[derive(Debug)]
pub struct PronunciationGenerator {
    invoker: BudgetedInvoker,
}

impl PronunciationGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl SectionGenerator for PronunciationGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Pronunciation
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let words = input.reinforcement_words().join(", ");
        let prompt = PromptBuilder::new(input.ctx)
            .task(format!(
                "create pronunciation practice from these words: {words}"
            ))
            .line(format!(
                "Give at least {PRONUNCIATION_MIN_WORDS} lines formatted as \
                 'word | IPA | short tip'."
            ))
            .line(format!(
                "Then give at least {TWISTER_MIN} tongue twisters, each on a line \
                 starting with 'Twister: '."
            ))
            .revision_notes(input.revision_notes)
            .build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        Ok(parse_pronunciation(&raw))
    }
}

fn parse_pronunciation(raw: &str) -> SectionContent {
    let mut words = Vec::new();
    let mut tongue_twisters = Vec::new();

    for line in clean_lines(raw) {
        if let Some(twister) = line.strip_prefix("Twister:") {
            let twister = twister.trim();
            if !twister.is_empty() {
                tongue_twisters.push(twister.to_string());
            }
            continue;
        }
        let mut parts = line.splitn(3, '|').map(str::trim);
        if let Some(word) = parts.next() {
            if word.is_empty() || word.contains(' ') {
                continue;
            }
            words.push(PronunciationWord {
                word: word.to_lowercase(),
                ipa: parts.next().filter(|s| !s.is_empty()).map(ToString::to_string),
                tip: parts.next().filter(|s| !s.is_empty()).map(ToString::to_string),
            });
        }
    }

    SectionContent::Pronunciation {
        words,
        tongue_twisters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProficiencyTier;
    use crate::generators::test_support::context;
    use crate::testing::FixtureTextService;
    use std::sync::Arc;

    #[test]
    fn test_parse_grammar_block() {
        let raw = "Focus: past simple\n\
                   Explanation: We use it for finished actions.\n\
                   1. She ___ (go) home. -> went\n\
                   2. They ___ (see) it. -> saw";
        match parse_grammar(raw) {
            SectionContent::Grammar {
                focus,
                explanation,
                practice,
            } => {
                assert_eq!(focus, "past simple");
                assert!(explanation.starts_with("We use"));
                assert_eq!(practice.len(), 2);
                assert_eq!(practice[1].answer, "saw");
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn test_parse_pronunciation_words_and_twisters() {
        let raw = "climate | /ˈklaɪmət/ | stress the first syllable\n\
                   energy | | three syllables\n\
                   Twister: six slick streets.\n\
                   not a word line at all";
        match parse_pronunciation(raw) {
            SectionContent::Pronunciation {
                words,
                tongue_twisters,
            } => {
                assert_eq!(words.len(), 2);
                assert_eq!(words[0].ipa.as_deref(), Some("/ˈklaɪmət/"));
                assert!(words[1].ipa.is_none());
                assert_eq!(tongue_twisters, vec!["six slick streets."]);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_grammar_fixture_meets_floors() {
        let service = Arc::new(FixtureTextService::new(ProficiencyTier::Beginner));
        let generator = GrammarGenerator::new(BudgetedInvoker::new(service));
        let ctx = context(ProficiencyTier::Beginner);
        let input = GeneratorInput {
            ctx: &ctx,
            prior: &[],
            revision_notes: &[],
        };

        match generator.generate(&input).await.unwrap() {
            SectionContent::Grammar { practice, .. } => {
                assert!(practice.len() >= GRAMMAR_MIN_ITEMS);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }
}
