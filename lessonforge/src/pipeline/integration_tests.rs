//! End-to-end orchestrator tests over the fixture text service.

use super::*;
use crate::adapter::{AdapterError, InvokeOptions};
use crate::core::SectionContent;
use crate::core::SectionKind;
use crate::events::CollectingEventSink;
use crate::testing::FixtureTextService;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A source document comfortably above the suitability floor, with no
/// named entities for opening questions to leak.
fn sample_document() -> SourceDocument {
    let paragraph = "The town has many old buses. People ride them to work every day. \
                     The air near the main road is not clean. Some families want to walk \
                     more and drive less. The schools teach children about saving energy. \
                     Shops now sell lamps that use less power. A new bus line opens next \
                     year. Many people hope the streets will be quieter then. ";
    SourceDocument::new(paragraph.repeat(5))
}

fn orchestrator(
    service: Arc<dyn TextService>,
) -> (PipelineOrchestrator, Arc<CollectingEventSink>) {
    let sink = Arc::new(CollectingEventSink::new());
    let orchestrator = PipelineOrchestrator::new(service).with_sink(sink.clone());
    (orchestrator, sink)
}

fn progress_values(events: &[LessonEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            LessonEvent::Progress { progress, .. } | LessonEvent::Complete { progress, .. } => {
                Some(*progress)
            }
            LessonEvent::Error { .. } => None,
        })
        .collect()
}

#[tokio::test]
async fn test_happy_path_discussion_lesson() {
    crate::testing::init_test_logging();
    let service = Arc::new(FixtureTextService::new(ProficiencyTier::Intermediate));
    let (orchestrator, sink) = orchestrator(service);
    let request = GenerationRequest::new(
        sample_document(),
        ProficiencyTier::Intermediate,
        LessonKind::Discussion,
    );

    let artifact = orchestrator
        .run(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(artifact.sections.len(), 6);
    match &artifact.section(SectionKind::OpeningQuestions).unwrap().content {
        SectionContent::Questions { items } => assert_eq!(items.len(), 3),
        other => panic!("unexpected content: {other:?}"),
    }
    match &artifact.section(SectionKind::Discussion).unwrap().content {
        SectionContent::Questions { items } => assert_eq!(items.len(), 5),
        other => panic!("unexpected content: {other:?}"),
    }
    assert!(artifact.section(SectionKind::ReadingPassage).is_some());
    assert!(artifact.overall_quality() > 0);

    let events = sink.events();
    assert!(matches!(
        events.last(),
        Some(LessonEvent::Complete { progress: 100, .. })
    ));
}

#[tokio::test]
async fn test_progress_is_monotone_and_ends_at_100() {
    let service = Arc::new(FixtureTextService::new(ProficiencyTier::Elementary));
    let (orchestrator, sink) = orchestrator(service);
    let request = GenerationRequest::new(
        sample_document(),
        ProficiencyTier::Elementary,
        LessonKind::Comprehensive,
    );

    orchestrator
        .run(&request, &CancellationToken::new())
        .await
        .unwrap();

    let values = progress_values(&sink.events());
    assert!(values.len() > 10);
    assert!(values.windows(2).all(|w| w[0] <= w[1]), "values: {values:?}");
    assert_eq!(values.last(), Some(&100));
}

/// Fails the first call with a truncation signal, then delegates. The
/// budget backoff should absorb the failure without surfacing it.
struct TruncateOnce {
    inner: FixtureTextService,
    tripped: AtomicBool,
}

#[async_trait]
impl TextService for TruncateOnce {
    async fn invoke(&self, prompt: &str, options: InvokeOptions) -> Result<String, AdapterError> {
        if self
            .tripped
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return Err(AdapterError::TruncatedNoContent);
        }
        self.inner.invoke(prompt, options).await
    }
}

#[tokio::test]
async fn test_truncation_is_recovered_by_backoff() {
    let service = Arc::new(TruncateOnce {
        inner: FixtureTextService::new(ProficiencyTier::Intermediate),
        tripped: AtomicBool::new(false),
    });
    let (orchestrator, sink) = orchestrator(service);
    let request = GenerationRequest::new(
        sample_document(),
        ProficiencyTier::Intermediate,
        LessonKind::Grammar,
    );

    let artifact = orchestrator
        .run(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(artifact.section(SectionKind::Grammar).is_some());
    assert!(matches!(
        sink.events().last(),
        Some(LessonEvent::Complete { .. })
    ));
}

/// Delegates to the fixture except for gapped-dialogue prompts, which get
/// a dialogue far below the line floor.
struct BrokenDialogue {
    inner: FixtureTextService,
}

#[async_trait]
impl TextService for BrokenDialogue {
    async fn invoke(&self, prompt: &str, options: InvokeOptions) -> Result<String, AdapterError> {
        if prompt.contains("gapped dialogue") {
            return Ok("Ana: I like the ____ here. (answer: transport)\n\
                       Ben: Me too, it helps."
                .to_string());
        }
        self.inner.invoke(prompt, options).await
    }
}

#[tokio::test]
async fn test_unrecoverable_dialogue_fails_artifact_with_progress_state() {
    let service = Arc::new(BrokenDialogue {
        inner: FixtureTextService::new(ProficiencyTier::Intermediate),
    });
    let (orchestrator, sink) = orchestrator(service);
    let request = GenerationRequest::new(
        sample_document(),
        ProficiencyTier::Intermediate,
        LessonKind::Dialogue,
    );

    let err = orchestrator
        .run(&request, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation_failure");

    let events = sink.events();
    match events.last() {
        Some(LessonEvent::Error {
            error,
            progress_state,
        }) => {
            assert_eq!(error.kind, "validation_failure");
            assert!(!error.error_id.is_empty());
            assert_eq!(progress_state.phase, "dialogue_fill_in");
            assert_eq!(
                progress_state.section.as_deref(),
                Some("dialogue_fill_in")
            );
            assert!(progress_state.progress > 0);
        }
        other => panic!("expected terminal error event, got {other:?}"),
    }
    assert!(!events
        .iter()
        .any(|e| matches!(e, LessonEvent::Complete { .. })));
}

#[tokio::test]
async fn test_panicking_observer_does_not_abort_generation() {
    let service = Arc::new(FixtureTextService::new(ProficiencyTier::Intermediate));
    let sink = Arc::new(CollectingEventSink::new());
    let orchestrator = PipelineOrchestrator::new(service)
        .with_sink(sink.clone())
        .with_observer(Box::new(|_: &ProgressUpdate| {
            panic!("observer exploded");
        }));
    let request = GenerationRequest::new(
        sample_document(),
        ProficiencyTier::Intermediate,
        LessonKind::Discussion,
    );

    let artifact = orchestrator
        .run(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(artifact.sections.len(), 6);
    assert!(matches!(
        sink.events().last(),
        Some(LessonEvent::Complete { .. })
    ));
}

#[tokio::test]
async fn test_document_below_floor_is_rejected_before_any_call() {
    let service = Arc::new(FixtureTextService::new(ProficiencyTier::Beginner));
    let calls = service.clone();
    let (orchestrator, sink) = orchestrator(service);
    let request = GenerationRequest::new(
        SourceDocument::new("Far too short. Nothing to teach from here."),
        ProficiencyTier::Beginner,
        LessonKind::Discussion,
    );

    let err = orchestrator
        .run(&request, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "content_insufficient");
    assert_eq!(calls.call_count(), 0);

    match sink.events().last() {
        Some(LessonEvent::Error { progress_state, .. }) => {
            assert_eq!(progress_state.phase, "init");
            assert_eq!(progress_state.progress, 0);
        }
        other => panic!("expected terminal error event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_stops_between_sections() {
    let service = Arc::new(FixtureTextService::new(ProficiencyTier::Intermediate));
    let (orchestrator, sink) = orchestrator(service);
    let request = GenerationRequest::new(
        sample_document(),
        ProficiencyTier::Intermediate,
        LessonKind::Discussion,
    );
    let token = CancellationToken::new();
    token.cancel("caller went away");

    let err = orchestrator.run(&request, &token).await.unwrap_err();
    assert_eq!(err.kind(), "cancelled");
    assert!(matches!(
        sink.events().last(),
        Some(LessonEvent::Error { .. })
    ));
}

#[tokio::test]
async fn test_dialogue_lesson_reinforces_vocabulary_words() {
    let service = Arc::new(FixtureTextService::new(ProficiencyTier::UpperIntermediate));
    let (orchestrator, _sink) = orchestrator(service);
    let request = GenerationRequest::new(
        sample_document(),
        ProficiencyTier::UpperIntermediate,
        LessonKind::Dialogue,
    );

    let artifact = orchestrator
        .run(&request, &CancellationToken::new())
        .await
        .unwrap();

    let vocabulary = artifact
        .section(SectionKind::Vocabulary)
        .unwrap()
        .vocabulary_words();
    let dialogue = artifact.section(SectionKind::DialogueFillIn).unwrap();
    let text = dialogue.content.text_blocks().join(" ").to_lowercase();
    let reinforced = vocabulary
        .iter()
        .filter(|w| text.contains(&w.to_lowercase()))
        .count();
    assert!(reinforced >= 3, "only {reinforced} words reinforced");
}
