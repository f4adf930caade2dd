//! Cooperative cancellation for one generation run.

use crate::errors::LessonError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// A token checked at every suspension point of the pipeline.
///
/// Cancellation is idempotent; only the first reason is kept.
#[derive(Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
    reason: RwLock<Option<String>>,
}

impl CancellationToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation with a reason. First reason wins.
    pub fn cancel(&self, reason: impl Into<String>) {
        if self
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            *self.reason.write() = Some(reason.into());
        }
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.reason.read().clone()
    }

    /// Returns an error when cancellation has been requested.
    ///
    /// # Errors
    ///
    /// [`LessonError::Cancelled`] carrying the recorded reason.
    pub fn check(&self) -> Result<(), LessonError> {
        if self.is_cancelled() {
            let reason = self
                .reason()
                .unwrap_or_else(|| "cancelled".to_string());
            Err(LessonError::Cancelled(reason))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_default_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_cancel_is_idempotent_first_reason_wins() {
        let token = CancellationToken::new();
        token.cancel("user closed the tab");
        token.cancel("second reason");
        assert_eq!(token.reason(), Some("user closed the tab".to_string()));
    }

    #[test]
    fn test_check_surfaces_cancelled_error() {
        let token = CancellationToken::new();
        token.cancel("shutdown");
        let err = token.check().unwrap_err();
        assert_eq!(err.kind(), "cancelled");
    }
}
