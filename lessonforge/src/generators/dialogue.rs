//! Dialogue sections: gapped fill-in practice and plain comprehension.

use super::parse::{split_pair, strip_list_marker};
use super::prompts::PromptBuilder;
use super::{output_budget, GeneratorInput, SectionGenerator};
use crate::adapter::BudgetedInvoker;
use crate::core::{DialogueLine, SectionContent, SectionKind};
use crate::errors::LessonError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

/// Minimum dialogue lines for either variant.
pub const DIALOGUE_MIN_LINES: usize = 12;

/// Target dialogue lines requested from the model.
pub const DIALOGUE_TARGET_LINES: usize = 14;

/// Generates either dialogue variant, selected at construction.
#[derive(Debug)]
pub struct DialogueGenerator {
    invoker: BudgetedInvoker,
    gapped: bool,
}

impl DialogueGenerator {
    /// Creates the fill-in variant generator.
    #[must_use]
    pub fn gapped(invoker: BudgetedInvoker) -> Self {
        Self {
            invoker,
            gapped: true,
        }
    }

    /// Creates the plain comprehension variant generator.
    #[must_use]
    pub fn plain(invoker: BudgetedInvoker) -> Self {
        Self {
            invoker,
            gapped: false,
        }
    }
}

#[async_trait]
impl SectionGenerator for DialogueGenerator {
    fn kind(&self) -> SectionKind {
        if self.gapped {
            SectionKind::DialogueFillIn
        } else {
            SectionKind::DialogueComprehension
        }
    }

    async fn generate(&self, input: &GeneratorInput<'_>) -> Result<SectionContent, LessonError> {
        let words = input.reinforcement_words().join(", ");
        let variant = if self.gapped {
            "a gapped dialogue for fill-in practice"
        } else {
            "a natural dialogue for comprehension"
        };
        let mut builder = PromptBuilder::new(input.ctx)
            .task(format!(
                "write {variant} between two speakers about the themes, with at least \
                 {DIALOGUE_MIN_LINES} lines, aiming for {DIALOGUE_TARGET_LINES}"
            ))
            .line("Format every line as 'Speaker: sentence'.")
            .line(format!(
                "Use at least 3 of these words exactly as written: {words}."
            ));
        if self.gapped {
            builder = builder.line(
                "Replace one word in some lines with ____ and append the removed \
                 word as '(answer: word)' at the end of that line.",
            );
        }
        let prompt = builder.revision_notes(input.revision_notes).build();

        let raw = self
            .invoker
            .invoke(&prompt, output_budget(self.kind()))
            .await?;

        Ok(SectionContent::Dialogue {
            lines: parse_dialogue(&raw),
            gapped: self.gapped,
        })
    }
}

/// Parses `Speaker: text` lines, lifting `(answer: word)` suffixes into
/// [`DialogueLine::gap_answer`].
fn parse_dialogue(raw: &str) -> Vec<DialogueLine> {
    let mut lines = Vec::new();
    for line in raw.lines() {
        let line = strip_list_marker(line);
        if line.is_empty() || line.starts_with("```") {
            continue;
        }
        let Some((speaker, text)) = split_pair(line, ':') else {
            continue;
        };
        // Speaker labels are short; a long "left side" is prose with a colon.
        if speaker.split_whitespace().count() > 3 {
            continue;
        }
        let (text, gap_answer) = extract_gap_answer(&text);
        lines.push(DialogueLine {
            speaker,
            text,
            gap_answer,
        });
    }
    lines
}

fn gap_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        // Case-insensitive on the original string; match offsets stay valid
        // char boundaries regardless of what case folding would do.
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(?i)\(answer:\s*([^)]*)\)").unwrap()
    })
}

fn extract_gap_answer(text: &str) -> (String, Option<String>) {
    if let Some(caps) = gap_marker().captures_iter(text).last() {
        if let (Some(whole), Some(answer)) = (caps.get(0), caps.get(1)) {
            let answer = answer.as_str().trim();
            if !answer.is_empty() {
                let stripped = format!(
                    "{}{}",
                    text[..whole.start()].trim_end(),
                    &text[whole.end()..]
                );
                return (stripped.trim().to_string(), Some(answer.to_string()));
            }
        }
    }
    (text.trim().to_string(), None)
}
