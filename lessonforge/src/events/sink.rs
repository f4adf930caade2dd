//! Event delivery backends.
//!
//! Sinks must never block or abort generation. The channel sink is bounded
//! and drops on a full queue rather than applying backpressure to the
//! pipeline.

use crate::events::LessonEvent;
use parking_lot::Mutex;
use tracing::{info, warn};

/// Receives lesson events as they are produced.
pub trait EventSink: Send + Sync {
    /// Delivers one event. Must not block.
    fn emit(&self, event: LessonEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event: LessonEvent) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventSink;

impl EventSink for LoggingEventSink {
    fn emit(&self, event: LessonEvent) {
        match &event {
            LessonEvent::Progress {
                step,
                progress,
                phase,
                ..
            } => info!(%step, progress, %phase, "progress"),
            LessonEvent::Complete { artifact, .. } => {
                info!(run_id = %artifact.run_id, kind = %artifact.kind, "lesson complete");
            }
            LessonEvent::Error {
                error,
                progress_state,
            } => warn!(
                kind = %error.kind,
                message = %error.message,
                error_id = %error.error_id,
                phase = %progress_state.phase,
                progress = progress_state.progress,
                "lesson failed"
            ),
        }
    }
}

/// Buffers every event in memory. Test support.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<LessonEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<LessonEvent> {
        self.events.lock().clone()
    }

    /// Drains and returns everything emitted so far.
    #[must_use]
    pub fn take(&self) -> Vec<LessonEvent> {
        std::mem::take(&mut self.events.lock())
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: LessonEvent) {
        self.events.lock().push(event);
    }
}

/// Forwards events over a bounded channel.
///
/// A slow or absent consumer loses events; generation is never held up.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: tokio::sync::mpsc::Sender<LessonEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and its receiving half with the given capacity.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, tokio::sync::mpsc::Receiver<LessonEvent>) {
        let (tx, rx) = tokio::sync::mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: LessonEvent) {
        if let Err(dropped) = self.tx.try_send(event) {
            warn!(
                reason = %match &dropped {
                    tokio::sync::mpsc::error::TrySendError::Full(_) => "queue full",
                    tokio::sync::mpsc::error::TrySendError::Closed(_) => "receiver gone",
                },
                "dropping lesson event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressUpdate;

    fn progress_event(progress: u8) -> LessonEvent {
        LessonEvent::progress(&ProgressUpdate {
            step: "step".to_string(),
            progress,
            phase: "init".to_string(),
            section: None,
        })
    }

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingEventSink::new();
        sink.emit(progress_event(3));
        sink.emit(progress_event(40));
        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert!(sink.events().is_empty());
        match &events[0] {
            LessonEvent::Progress { progress, .. } => assert_eq!(*progress, 3),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelEventSink::bounded(4);
        sink.emit(progress_event(10));
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, LessonEvent::Progress { progress: 10, .. }));
    }

    #[tokio::test]
    async fn test_full_channel_drops_instead_of_blocking() {
        let (sink, mut rx) = ChannelEventSink::bounded(1);
        sink.emit(progress_event(10));
        sink.emit(progress_event(20)); // dropped, queue full

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, LessonEvent::Progress { progress: 10, .. }));
        assert!(rx.try_recv().is_err());
    }
}
