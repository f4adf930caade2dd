//! Tier-aware prompt construction shared by all section generators.

use crate::context::GenerationContext;

/// Builds a section prompt from the shared context, the tier constraint
/// table, a task description, and optional revision notes from a rejected
/// attempt.
#[derive(Debug)]
pub struct PromptBuilder {
    preamble: String,
    task: String,
    extra: Vec<String>,
    revision_notes: Vec<String>,
}

impl PromptBuilder {
    /// Starts a prompt for the given shared context.
    #[must_use]
    pub fn new(ctx: &GenerationContext) -> Self {
        let profile = ctx.tier.profile();
        let (min_words, max_words) = profile.sentence_words;
        let preamble = format!(
            "You are writing lesson material in {language} for a {tier} learner.\n\
             Keep sentences between {min_words} and {max_words} words.\n\
             Grammar ceiling: {ceiling}.\n\
             Material summary: {summary}\n\
             Key vocabulary: {vocabulary}\n\
             Themes: {themes}",
            language = ctx.target_language,
            tier = ctx.tier,
            ceiling = profile.grammar_ceiling,
            summary = ctx.content_summary,
            vocabulary = ctx.ranked_vocabulary.join(", "),
            themes = ctx.main_themes.join(", "),
        );
        Self {
            preamble,
            task: String::new(),
            extra: Vec::new(),
            revision_notes: Vec::new(),
        }
    }

    /// Sets the task body.
    #[must_use]
    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    /// Appends an extra instruction line.
    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.extra.push(line.into());
        self
    }

    /// Attaches the blocking issues from a rejected attempt as explicit
    /// negative constraints.
    #[must_use]
    pub fn revision_notes(mut self, notes: &[String]) -> Self {
        self.revision_notes.extend_from_slice(notes);
        self
    }

    /// Renders the final prompt.
    #[must_use]
    pub fn build(self) -> String {
        let mut out = self.preamble;
        out.push_str("\n\nTask: ");
        out.push_str(&self.task);
        for line in &self.extra {
            out.push('\n');
            out.push_str(line);
        }
        if !self.revision_notes.is_empty() {
            out.push_str("\n\nThe previous attempt was rejected. Avoid these problems:");
            for note in &self.revision_notes {
                out.push_str("\n- ");
                out.push_str(note);
            }
        }
        out.push_str("\n\nReturn only the requested content, no commentary.");
        out
    }
}
