//! Section validators: structural counts, tier fit, leakage, vocabulary
//! integration.
//!
//! Checks run in a fixed order per section and fold into one
//! [`ValidationOutcome`]. Issues block acceptance; warnings are logged and
//! carried on the result only.

pub mod leakage;
pub mod structure;
pub mod tier_fit;
pub mod vocabulary;

use crate::context::GenerationContext;
use crate::core::{SectionContent, SectionKind, SectionResult, SourceDocument};
use std::sync::Arc;
use tracing::debug;

/// The outcome of validating one generation attempt.
///
/// Produced once per attempt and not retained beyond the controller's
/// decision and logging.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ValidationOutcome {
    /// Whether the attempt may be accepted as-is.
    pub is_valid: bool,
    /// Blocking defects.
    pub issues: Vec<String>,
    /// Non-blocking diagnostics.
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn pass() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Builds an outcome from collected issues and warnings.
    #[must_use]
    pub fn from_checks(issues: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
            warnings,
        }
    }

    fn absorb(&mut self, issues: Vec<String>, warnings: Vec<String>) {
        self.issues.extend(issues);
        self.warnings.extend(warnings);
        self.is_valid = self.issues.is_empty();
    }
}

/// Validates section content against the shared context and the source
/// document's entity list.
pub struct SectionValidator {
    ctx: Arc<GenerationContext>,
    source_entities: Vec<String>,
}

impl SectionValidator {
    /// Creates a validator for one run, extracting source entities once.
    #[must_use]
    pub fn new(ctx: Arc<GenerationContext>, document: &SourceDocument) -> Self {
        Self {
            ctx,
            source_entities: leakage::extract_entities(&document.text),
        }
    }

    /// Runs all applicable checks for the section, in order.
    ///
    /// `prior` carries the results accepted so far; the vocabulary
    /// integration check counts words from the accepted vocabulary section
    /// as shared, since reinforcing prompts ask for those words.
    #[must_use]
    pub fn validate(
        &self,
        kind: SectionKind,
        content: &SectionContent,
        prior: &[SectionResult],
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::pass();

        let (issues, warnings) = structure::check_structure(kind, content, self.ctx.tier);
        outcome.absorb(issues, warnings);

        let blocks = content.text_blocks();
        let (issues, warnings) = tier_fit::check_tier_fit(&blocks, self.ctx.tier);
        outcome.absorb(issues, warnings);

        if kind == SectionKind::OpeningQuestions {
            if let SectionContent::Questions { items } = content {
                outcome.absorb(leakage::check_leakage(items, &self.source_entities), Vec::new());
            }
        }

        if matches!(
            kind,
            SectionKind::ReadingPassage
                | SectionKind::DialogueFillIn
                | SectionKind::DialogueComprehension
        ) {
            outcome.absorb(
                vocabulary::check_integration(&blocks, &self.shared_vocabulary(prior)),
                Vec::new(),
            );
        }

        debug!(
            section = %kind,
            valid = outcome.is_valid,
            issues = outcome.issues.len(),
            warnings = outcome.warnings.len(),
            "section validated"
        );
        outcome
    }

    /// The ranked vocabulary plus any words the accepted vocabulary section
    /// chose beyond it.
    fn shared_vocabulary(&self, prior: &[SectionResult]) -> Vec<String> {
        let mut vocabulary = self.ctx.ranked_vocabulary.clone();
        for result in prior {
            for word in result.vocabulary_words() {
                if !vocabulary.iter().any(|v| v.eq_ignore_ascii_case(word)) {
                    vocabulary.push(word.to_string());
                }
            }
        }
        vocabulary
    }
}
