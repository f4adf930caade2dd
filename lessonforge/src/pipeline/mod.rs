//! The orchestrator: walks a lesson plan section by section.
//!
//! One logical thread of control per artifact. Sections run sequentially
//! because later prompts read earlier results and the remote service is
//! rate-limited per caller; independent requests may run concurrently with
//! no shared mutable state.

pub mod cancel;
pub mod plan;

pub use cancel::CancellationToken;
pub use plan::{LessonPlan, SectionSpec};

use crate::adapter::{BudgetedInvoker, TextService};
use crate::context::ContextBuilder;
use crate::core::{LessonArtifact, LessonKind, ProficiencyTier, SectionResult, SourceDocument};
use crate::errors::LessonError;
use crate::events::{EventSink, LessonEvent, NoOpEventSink};
use crate::progress::{
    FaultIsolatingObserver, PhaseWeights, ProgressAggregator, ProgressObserver, ProgressUpdate,
};
use crate::regen::RegenerationController;
use crate::validators::SectionValidator;
use std::sync::Arc;
use tracing::{error, info};

/// Everything one generation run needs. Threaded through by value; the
/// pipeline holds no global state.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The source material the lesson is built from.
    pub document: SourceDocument,
    /// The proficiency tier to calibrate to.
    pub tier: ProficiencyTier,
    /// Which practice sections to plan.
    pub kind: LessonKind,
    /// The language being taught.
    pub target_language: String,
}

impl GenerationRequest {
    /// Creates a request teaching English by default.
    #[must_use]
    pub fn new(document: SourceDocument, tier: ProficiencyTier, kind: LessonKind) -> Self {
        Self {
            document,
            tier,
            kind,
            target_language: "English".to_string(),
        }
    }

    /// Overrides the target language.
    #[must_use]
    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }
}

/// Drives one artifact generation end to end.
pub struct PipelineOrchestrator {
    invoker: BudgetedInvoker,
    weights: PhaseWeights,
    observer: FaultIsolatingObserver,
    sink: Arc<dyn EventSink>,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator over the given text service.
    #[must_use]
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self {
            invoker: BudgetedInvoker::new(service),
            weights: PhaseWeights::default(),
            observer: FaultIsolatingObserver::noop(),
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Overrides the progress weights.
    #[must_use]
    pub fn with_weights(mut self, weights: PhaseWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Registers a progress observer. Its failures are isolated.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = FaultIsolatingObserver::new(observer);
        self
    }

    /// Registers an event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Generates one lesson artifact.
    ///
    /// Exactly one terminal event is emitted: `Complete` with the artifact,
    /// or `Error` carrying the last observed progress state. Partial
    /// artifacts are never emitted as complete.
    ///
    /// # Errors
    ///
    /// Any [`LessonError`] that aborted the run; the same failure is also
    /// reported on the event sink.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        token: &CancellationToken,
    ) -> Result<LessonArtifact, LessonError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let plan = LessonPlan::for_kind(request.kind);
        let mut aggregator = ProgressAggregator::new(plan.kinds(), self.weights.clone());
        let mut last_state = ProgressUpdate {
            step: "starting".to_string(),
            progress: 0,
            phase: "init".to_string(),
            section: None,
        };

        info!(
            run_id = %run_id,
            kind = %request.kind,
            tier = %request.tier,
            sections = plan.len(),
            "starting lesson generation"
        );

        match self
            .generate(request, token, &plan, &mut aggregator, &mut last_state, &run_id)
            .await
        {
            Ok(artifact) => {
                info!(run_id = %run_id, quality = artifact.overall_quality(), "lesson generated");
                self.sink.emit(LessonEvent::complete(artifact.clone()));
                Ok(artifact)
            }
            Err(err) => {
                error!(
                    run_id = %run_id,
                    kind = err.kind(),
                    phase = %last_state.phase,
                    progress = last_state.progress,
                    "lesson generation failed"
                );
                self.sink.emit(LessonEvent::error(&err, last_state));
                Err(err)
            }
        }
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        token: &CancellationToken,
        plan: &LessonPlan,
        aggregator: &mut ProgressAggregator,
        last_state: &mut ProgressUpdate,
        run_id: &str,
    ) -> Result<LessonArtifact, LessonError> {
        request.document.check_floor()?;
        token.check()?;

        self.publish(aggregator.init(), last_state);
        let ctx = Arc::new(
            ContextBuilder::new(self.invoker.clone())
                .build(&request.document, request.tier, &request.target_language)
                .await,
        );
        let validator = SectionValidator::new(ctx.clone(), &request.document);

        let mut results: Vec<SectionResult> = Vec::with_capacity(plan.len());
        for section in plan.sections() {
            token.check()?;
            self.publish(aggregator.section_started(section.kind), last_state);

            let controller = RegenerationController::new(crate::generators::generator_for(
                section.kind,
                self.invoker.clone(),
            ));
            let result = controller.run(&ctx, &results, &validator).await?;
            results.push(result);

            self.publish(aggregator.section_completed(section.kind), last_state);
        }

        token.check()?;
        self.publish(aggregator.saving(), last_state);

        Ok(LessonArtifact {
            run_id: run_id.to_string(),
            kind: request.kind,
            tier: request.tier,
            target_language: request.target_language.clone(),
            source_title: request.document.metadata.title.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sections: results,
        })
    }

    /// Delivers one update to the observer and the sink, then retains it as
    /// the last known state for error reporting.
    fn publish(&self, update: ProgressUpdate, last_state: &mut ProgressUpdate) {
        self.observer.notify(&update);
        self.sink.emit(LessonEvent::progress(&update));
        *last_state = update;
    }
}

#[cfg(test)]
mod integration_tests;
