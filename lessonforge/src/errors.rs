//! Error types for lesson generation.
//!
//! The taxonomy distinguishes failures that abort the whole artifact
//! (insufficient source, exhausted validation, unavailable service) from
//! failures that are contained inside a single component (token-limit
//! backoff, observer callbacks).

use thiserror::Error;

/// The main error type for lesson generation.
#[derive(Debug, Clone, Error)]
pub enum LessonError {
    /// The source document fails the structural floor. Reported before any
    /// text-service call is made.
    #[error("Source content insufficient: {reason}")]
    ContentInsufficient {
        /// Why the document was rejected.
        reason: String,
    },

    /// A section failed validation on every permitted attempt and its
    /// failure policy does not allow degraded acceptance.
    #[error("Validation failed for section '{section}': {}", issues.join("; "))]
    Validation {
        /// The section that failed.
        section: String,
        /// The blocking issues from the final attempt.
        issues: Vec<String>,
    },

    /// The text service kept truncating even after the full budget backoff.
    #[error("Token budget exhausted after backoff")]
    TokenLimit,

    /// The text service is unavailable for the current section. Quota and
    /// network failures are not retried within a single request.
    #[error("Text service unavailable ({kind}): {message}")]
    ServiceUnavailable {
        /// Whether this was a quota or a network failure.
        kind: ServiceFailureKind,
        /// The underlying service message.
        message: String,
    },

    /// Generation was cancelled cooperatively.
    #[error("Generation cancelled: {0}")]
    Cancelled(String),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The flavor of a service-unavailable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFailureKind {
    /// The caller's quota was exceeded.
    Quota,
    /// A transport-level failure occurred.
    Network,
}

impl std::fmt::Display for ServiceFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quota => write!(f, "quota"),
            Self::Network => write!(f, "network"),
        }
    }
}

impl LessonError {
    /// Returns the stable machine-readable kind carried on error events.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ContentInsufficient { .. } => "content_insufficient",
            Self::Validation { .. } => "validation_failure",
            Self::TokenLimit => "token_limit_exceeded",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::Cancelled(_) => "cancelled",
            Self::Internal(_) => "internal",
        }
    }

    /// Creates a content-insufficient error.
    #[must_use]
    pub fn content_insufficient(reason: impl Into<String>) -> Self {
        Self::ContentInsufficient {
            reason: reason.into(),
        }
    }

    /// Creates a validation error for a section.
    #[must_use]
    pub fn validation(section: impl Into<String>, issues: Vec<String>) -> Self {
        Self::Validation {
            section: section.into(),
            issues,
        }
    }
}

/// Generates a fresh opaque error id for an error event.
#[must_use]
pub fn new_error_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
