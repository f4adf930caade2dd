//! Bounded generate/validate/regenerate state machine for one section.
//!
//! `Generate -> Validate -> {Accept | Regenerate | Degrade | Fail}` with a
//! single max-attempts constant. Between attempts the prompt is narrowed
//! with the detected issues as explicit negative constraints.

use crate::context::GenerationContext;
use crate::core::{SectionKind, SectionResult};
use crate::errors::LessonError;
use crate::generators::{GeneratorInput, SectionGenerator};
use crate::validators::SectionValidator;
use tracing::{info, warn};

/// Maximum generation attempts per section.
pub const MAX_ATTEMPTS: u32 = 2;

/// Quality points docked per blocking issue on a degraded acceptance.
const ISSUE_PENALTY: u32 = 15;

/// Quality points docked per warning.
const WARNING_PENALTY: u32 = 5;

/// What happens when a section fails validation on its final attempt.
///
/// The asymmetry is a quality-over-completeness policy: sections whose
/// partial content would be actively misleading fail the whole artifact,
/// while sections where partial content still teaches something are
/// accepted with their issues demoted to warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the artifact; there is no safe degraded form of this section.
    FailArtifact,
    /// Accept the final attempt, demoting issues to warnings.
    AcceptDegraded,
}

impl FailurePolicy {
    /// The policy for a section kind.
    #[must_use]
    pub const fn for_kind(kind: SectionKind) -> Self {
        match kind {
            SectionKind::DialogueFillIn
            | SectionKind::DialogueComprehension
            | SectionKind::Grammar
            | SectionKind::Pronunciation => Self::FailArtifact,
            SectionKind::OpeningQuestions
            | SectionKind::Vocabulary
            | SectionKind::ReadingPassage
            | SectionKind::Comprehension
            | SectionKind::Discussion
            | SectionKind::ClosingReflection => Self::AcceptDegraded,
        }
    }
}

/// Runs the bounded retry loop for one section.
pub struct RegenerationController {
    generator: Box<dyn SectionGenerator>,
}

impl RegenerationController {
    /// Creates a controller around one section generator.
    #[must_use]
    pub fn new(generator: Box<dyn SectionGenerator>) -> Self {
        Self { generator }
    }

    /// The section kind this controller produces.
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        self.generator.kind()
    }

    /// Drives the state machine to an accepted result or a terminal error.
    ///
    /// # Errors
    ///
    /// Propagates adapter failures unchanged; returns
    /// [`LessonError::Validation`] when the final attempt fails and the
    /// section's policy is [`FailurePolicy::FailArtifact`].
    pub async fn run(
        &self,
        ctx: &GenerationContext,
        prior: &[SectionResult],
        validator: &SectionValidator,
    ) -> Result<SectionResult, LessonError> {
        let kind = self.generator.kind();
        let mut revision_notes: Vec<String> = Vec::new();

        for attempt in 1..=MAX_ATTEMPTS {
            let input = GeneratorInput {
                ctx,
                prior,
                revision_notes: &revision_notes,
            };
            let content = self.generator.generate(&input).await?;
            let outcome = validator.validate(kind, &content, prior);

            if outcome.is_valid {
                let quality = score(0, outcome.warnings.len());
                info!(section = %kind, attempt, quality, "section accepted");
                return Ok(SectionResult {
                    kind,
                    content,
                    attempts: attempt,
                    quality_score: quality,
                    warnings: outcome.warnings,
                });
            }

            if attempt < MAX_ATTEMPTS {
                warn!(
                    section = %kind,
                    attempt,
                    issues = ?outcome.issues,
                    "section rejected, narrowing prompt and regenerating"
                );
                revision_notes = outcome.issues;
                continue;
            }

            return match FailurePolicy::for_kind(kind) {
                FailurePolicy::FailArtifact => {
                    warn!(section = %kind, issues = ?outcome.issues, "section failed terminally");
                    Err(LessonError::validation(kind.as_str(), outcome.issues))
                }
                FailurePolicy::AcceptDegraded => {
                    let quality = score(outcome.issues.len(), outcome.warnings.len());
                    warn!(
                        section = %kind,
                        quality,
                        demoted = outcome.issues.len(),
                        "accepting degraded section"
                    );
                    let mut warnings = outcome.issues;
                    warnings.extend(outcome.warnings);
                    Ok(SectionResult {
                        kind,
                        content,
                        attempts: attempt,
                        quality_score: quality,
                        warnings,
                    })
                }
            };
        }

        // MAX_ATTEMPTS >= 1, so the loop always returns.
        Err(LessonError::Internal(format!(
            "regeneration loop for '{kind}' exited without a decision"
        )))
    }
}

fn score(issues: usize, warnings: usize) -> u32 {
    100u32
        .saturating_sub(issues as u32 * ISSUE_PENALTY)
        .saturating_sub(warnings as u32 * WARNING_PENALTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::BudgetedInvoker;
    use crate::core::{ProficiencyTier, SourceDocument};
    use crate::generators::generator_for;
    use crate::generators::test_support::context;
    use crate::testing::MockTextService;
    use std::sync::Arc;

    fn setup(
        tier: ProficiencyTier,
    ) -> (Arc<MockTextService>, GenerationContext, SectionValidator) {
        let mock = Arc::new(MockTextService::new());
        let ctx = context(tier);
        let validator = SectionValidator::new(
            Arc::new(ctx.clone()),
            &SourceDocument::new("Plain source text about towns and buses."),
        );
        (mock, ctx, validator)
    }

    fn controller(kind: SectionKind, mock: &Arc<MockTextService>) -> RegenerationController {
        RegenerationController::new(generator_for(kind, BudgetedInvoker::new(mock.clone())))
    }

    const GOOD_OPENING: &str =
        "Do you ride buses often?\nIs your town quiet?\nDo you like clean air?";

    #[tokio::test]
    async fn test_accept_on_first_attempt() {
        let (mock, ctx, validator) = setup(ProficiencyTier::Beginner);
        mock.push_ok(GOOD_OPENING);
        let controller = controller(SectionKind::OpeningQuestions, &mock);

        let result = controller.run(&ctx, &[], &validator).await.unwrap();
        assert_eq!(result.attempts, 1);
        assert_eq!(result.quality_score, 100);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_second_attempt_carries_revision_notes() {
        let (mock, ctx, validator) = setup(ProficiencyTier::Beginner);
        // First attempt: only two questions, rejected on count.
        mock.push_ok("Do you ride buses often?\nIs your town quiet?");
        mock.push_ok(GOOD_OPENING);
        let controller = controller(SectionKind::OpeningQuestions, &mock);

        let result = controller.run(&ctx, &[], &validator).await.unwrap();
        assert_eq!(result.attempts, 2);

        let prompts = mock.recorded_prompts();
        assert_eq!(prompts.len(), 2);
        assert!(!prompts[0].contains("previous attempt"));
        assert!(prompts[1].contains("previous attempt was rejected"));
        assert!(prompts[1].contains("expected exactly 3"));
    }

    #[tokio::test]
    async fn test_dialogue_failing_twice_fails_artifact() {
        let (mock, ctx, validator) = setup(ProficiencyTier::Intermediate);
        // Both attempts produce a dialogue far below the line floor.
        let short = "Ana: Hello there friend.\nBen: Hello to you.";
        mock.push_ok(short);
        mock.push_ok(short);
        let controller = controller(SectionKind::DialogueComprehension, &mock);

        let err = controller.run(&ctx, &[], &validator).await.unwrap_err();
        match err {
            LessonError::Validation { section, issues } => {
                assert_eq!(section, "dialogue_comprehension");
                assert!(issues.iter().any(|i| i.contains("minimum is 12")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_opening_failing_twice_degrades() {
        let (mock, ctx, validator) = setup(ProficiencyTier::Beginner);
        mock.push_ok("Do you ride buses often?");
        mock.push_ok("Do you ride buses often?");
        let controller = controller(SectionKind::OpeningQuestions, &mock);

        let result = controller.run(&ctx, &[], &validator).await.unwrap();
        assert_eq!(result.attempts, MAX_ATTEMPTS);
        assert!(result.quality_score < 100);
        // The blocking issue was demoted to a warning.
        assert!(result.warnings.iter().any(|w| w.contains("expected exactly 3")));
    }

    #[tokio::test]
    async fn test_adapter_failure_propagates_without_retry() {
        let (mock, ctx, validator) = setup(ProficiencyTier::Beginner);
        mock.push_err(crate::adapter::AdapterError::QuotaExceeded("cap".to_string()));
        let controller = controller(SectionKind::OpeningQuestions, &mock);

        let err = controller.run(&ctx, &[], &validator).await.unwrap_err();
        assert_eq!(err.kind(), "service_unavailable");
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(
            FailurePolicy::for_kind(SectionKind::DialogueFillIn),
            FailurePolicy::FailArtifact
        );
        assert_eq!(
            FailurePolicy::for_kind(SectionKind::Grammar),
            FailurePolicy::FailArtifact
        );
        assert_eq!(
            FailurePolicy::for_kind(SectionKind::Discussion),
            FailurePolicy::AcceptDegraded
        );
    }
}
