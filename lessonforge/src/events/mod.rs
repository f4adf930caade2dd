//! The event stream consumers see: progress, completion, terminal error.
//!
//! Every error event carries the most recent progress state observed before
//! the failure. Consumers rely on this to say where generation died, not
//! just that it died.

pub mod sink;

pub use sink::{ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::core::LessonArtifact;
use crate::errors::{new_error_id, LessonError};
use crate::progress::ProgressUpdate;
use serde::Serialize;

/// The error payload attached to terminal error events.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Stable error category name.
    pub kind: String,
    /// Human-readable description.
    pub message: String,
    /// Correlation id for support and log lookup.
    pub error_id: String,
}

impl ErrorReport {
    /// Builds a report from a pipeline error, minting a fresh id.
    #[must_use]
    pub fn from_error(error: &LessonError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
            error_id: new_error_id(),
        }
    }
}

/// One discrete event in an artifact generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonEvent {
    /// A transient progress snapshot.
    Progress {
        /// Description of the current step.
        step: String,
        /// Overall percentage.
        progress: u8,
        /// `"init"`, a section kind name, or `"save"`.
        phase: String,
        /// The section in progress, when applicable.
        #[serde(skip_serializing_if = "Option::is_none")]
        section: Option<String>,
    },
    /// Terminal success with the fully assembled artifact.
    Complete {
        /// Description of the final step.
        step: String,
        /// Always 100.
        progress: u8,
        /// The assembled, fully validated artifact.
        artifact: LessonArtifact,
    },
    /// Terminal failure with the last known progress state.
    Error {
        /// What failed.
        error: ErrorReport,
        /// Where generation stood when it failed.
        progress_state: ProgressUpdate,
    },
}

impl LessonEvent {
    /// Wraps a progress update as an event.
    #[must_use]
    pub fn progress(update: &ProgressUpdate) -> Self {
        Self::Progress {
            step: update.step.clone(),
            progress: update.progress,
            phase: update.phase.clone(),
            section: update.section.clone(),
        }
    }

    /// The terminal success event.
    #[must_use]
    pub fn complete(artifact: LessonArtifact) -> Self {
        Self::Complete {
            step: "lesson complete".to_string(),
            progress: 100,
            artifact,
        }
    }

    /// The terminal failure event.
    #[must_use]
    pub fn error(error: &LessonError, progress_state: ProgressUpdate) -> Self {
        Self::Error {
            error: ErrorReport::from_error(error),
            progress_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_progress_event_wire_shape() {
        let update = ProgressUpdate {
            step: "generating vocabulary".to_string(),
            progress: 23,
            phase: "vocabulary".to_string(),
            section: Some("vocabulary".to_string()),
        };
        let json = serde_json::to_value(LessonEvent::progress(&update)).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["progress"], 23);
        assert_eq!(json["section"], "vocabulary");
    }

    #[test]
    fn test_error_event_carries_progress_state() {
        let err = LessonError::content_insufficient("too short");
        let state = ProgressUpdate {
            step: "generating grammar".to_string(),
            progress: 61,
            phase: "grammar".to_string(),
            section: Some("grammar".to_string()),
        };
        let json = serde_json::to_value(LessonEvent::error(&err, state)).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["error"]["kind"], "content_insufficient");
        assert_eq!(json["progress_state"]["phase"], "grammar");
        assert_eq!(json["progress_state"]["progress"], 61);
        assert!(json["error"]["error_id"].as_str().is_some_and(|s| !s.is_empty()));
    }
}
