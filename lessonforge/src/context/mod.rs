//! Shared generation context, built once per artifact.
//!
//! The context bundles a compact summary, a ranked vocabulary list, and the
//! main themes of the source document so that section generators never need
//! the full source text in their prompts. It is immutable after
//! construction and shared read-only behind an `Arc`.

use crate::adapter::BudgetedInvoker;
use crate::core::{ProficiencyTier, SourceDocument};
use crate::generators::parse::clean_lines;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The once-computed bundle every section generator reads.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// The tier the lesson is calibrated to.
    pub tier: ProficiencyTier,
    /// The language being taught.
    pub target_language: String,
    /// Compact summary of the source material.
    pub content_summary: String,
    /// Vocabulary ranked by teaching relevance, most relevant first.
    pub ranked_vocabulary: Vec<String>,
    /// Broad themes of the material.
    pub main_themes: Vec<String>,
}

/// Builds a [`GenerationContext`] with up to three text-service calls.
///
/// Unlike section content, the context is advisory scaffolding rather than
/// user-facing output, so a failed call degrades to a local heuristic
/// instead of aborting the run. This is the only component with fallback
/// behavior.
pub struct ContextBuilder {
    invoker: BudgetedInvoker,
}

/// Budget for each context-derivation call.
const CONTEXT_BUDGET: u32 = 300;

/// Number of vocabulary words kept in the ranking.
const VOCABULARY_SIZE: usize = 10;

/// Number of themes kept.
const THEME_COUNT: usize = 3;

impl ContextBuilder {
    /// Creates a builder over the given invoker.
    #[must_use]
    pub fn new(invoker: BudgetedInvoker) -> Self {
        Self { invoker }
    }

    /// Derives the shared context for one run.
    pub async fn build(
        &self,
        document: &SourceDocument,
        tier: ProficiencyTier,
        target_language: &str,
    ) -> GenerationContext {
        let excerpt = excerpt(&document.text, 4000);

        let content_summary = match self.summarize(&excerpt).await {
            Some(summary) => summary,
            None => {
                warn!("summary call failed, using truncation fallback");
                heuristic_summary(&document.text)
            }
        };

        let ranked_vocabulary = match self.rank_vocabulary(&excerpt).await {
            Some(words) if !words.is_empty() => words,
            _ => {
                warn!("vocabulary ranking failed, using frequency fallback");
                heuristic_keywords(&document.text, VOCABULARY_SIZE)
            }
        };

        let main_themes = match self.extract_themes(&content_summary).await {
            Some(themes) if !themes.is_empty() => themes,
            _ => {
                warn!("theme extraction failed, deriving themes from keywords");
                ranked_vocabulary.iter().take(THEME_COUNT).cloned().collect()
            }
        };

        debug!(
            vocabulary = ranked_vocabulary.len(),
            themes = main_themes.len(),
            "generation context ready"
        );

        GenerationContext {
            tier,
            target_language: target_language.to_string(),
            content_summary,
            ranked_vocabulary,
            main_themes,
        }
    }

    async fn summarize(&self, excerpt: &str) -> Option<String> {
        let prompt = format!(
            "Summarize the source material below in two or three plain sentences.\n\n{excerpt}"
        );
        let text = self.invoker.invoke(&prompt, CONTEXT_BUDGET).await.ok()?;
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    async fn rank_vocabulary(&self, excerpt: &str) -> Option<Vec<String>> {
        let prompt = format!(
            "Rank the most teaching-relevant vocabulary in the source material below. \
             List the top {VOCABULARY_SIZE} single words, one per line, most useful first.\n\n{excerpt}"
        );
        let text = self.invoker.invoke(&prompt, CONTEXT_BUDGET).await.ok()?;
        let words: Vec<String> = clean_lines(&text)
            .into_iter()
            .filter_map(|line| {
                line.split_whitespace()
                    .next()
                    .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase())
            })
            .filter(|w| !w.is_empty())
            .take(VOCABULARY_SIZE)
            .collect();
        Some(words)
    }

    async fn extract_themes(&self, summary: &str) -> Option<Vec<String>> {
        let prompt = format!(
            "List the main themes of this material as {THEME_COUNT} short phrases, \
             one per line.\n\n{summary}"
        );
        let text = self.invoker.invoke(&prompt, CONTEXT_BUDGET).await.ok()?;
        let themes: Vec<String> = clean_lines(&text)
            .into_iter()
            .map(|l| l.to_lowercase())
            .take(THEME_COUNT)
            .collect();
        Some(themes)
    }
}

/// Takes the first `max_chars` of text, cut at a word boundary.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }
    let mut end = max_chars;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    let cut = &text[..end];
    match cut.rfind(char::is_whitespace) {
        Some(pos) => cut[..pos].to_string(),
        None => cut.to_string(),
    }
}

/// Naive truncation summary: the first few sentences of the document.
fn heuristic_summary(text: &str) -> String {
    let mut out = String::new();
    for sentence in text.split_inclusive(['.', '!', '?']) {
        out.push_str(sentence);
        if out.split_whitespace().count() >= 40 {
            break;
        }
    }
    let trimmed = out.trim();
    if trimmed.is_empty() {
        excerpt(text, 240)
    } else {
        trimmed.to_string()
    }
}

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "of", "in", "on", "at", "to", "for", "with", "from",
    "by", "is", "are", "was", "were", "be", "been", "being", "it", "its", "this", "that",
    "these", "those", "they", "them", "their", "we", "our", "you", "your", "he", "she", "his",
    "her", "has", "have", "had", "will", "would", "can", "could", "not", "no", "as", "if",
    "than", "then", "there", "here", "about", "into", "over", "also", "more", "most", "some",
    "such", "when", "which", "who", "what", "how", "why", "all", "one", "two", "do", "does",
    "did", "so", "up", "out", "new", "said", "says", "very",
];

/// Frequency-based keyword pull used when the ranking call fails.
fn heuristic_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for raw in text.split_whitespace() {
        let word = raw
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if word.len() < 4 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Highest frequency first; ties break alphabetically for determinism.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(w, _)| w).collect()
}
