//! Budget-aware invocation with bounded truncation backoff.

use super::{AdapterError, InvokeOptions, TextService};
use crate::errors::{LessonError, ServiceFailureKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Wraps a [`TextService`] with the three-step truncation backoff.
///
/// When the service signals [`AdapterError::TruncatedNoContent`], the call is
/// retried with the budget halved (floored at [`Self::MIN_BUDGET`]), then
/// once more with no explicit budget at all. Quota and network failures are
/// surfaced immediately; retrying them within a single request is futile.
#[derive(Clone)]
pub struct BudgetedInvoker {
    service: Arc<dyn TextService>,
}

impl BudgetedInvoker {
    /// Floor for the halved budget step.
    pub const MIN_BUDGET: u32 = 20;

    /// Creates an invoker over the given service.
    #[must_use]
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }

    /// Invokes the service with the requested budget, backing off on
    /// truncation.
    ///
    /// # Errors
    ///
    /// - [`LessonError::TokenLimit`] when all three backoff steps truncate.
    /// - [`LessonError::ServiceUnavailable`] on quota or network failure.
    pub async fn invoke(&self, prompt: &str, budget: u32) -> Result<String, LessonError> {
        let steps = [
            InvokeOptions::with_budget(budget),
            InvokeOptions::with_budget((budget / 2).max(Self::MIN_BUDGET)),
            InvokeOptions::service_default(),
        ];

        for (step, options) in steps.iter().enumerate() {
            match self.service.invoke(prompt, *options).await {
                Ok(text) => {
                    debug!(step, budget = ?options.max_output_units, "text service call succeeded");
                    return Ok(text);
                }
                Err(AdapterError::TruncatedNoContent) => {
                    warn!(
                        step,
                        budget = ?options.max_output_units,
                        "text service truncated with no content, backing off"
                    );
                }
                Err(e) => return Err(Self::fatal(e)),
            }
        }

        Err(LessonError::TokenLimit)
    }

    fn fatal(err: AdapterError) -> LessonError {
        match err {
            AdapterError::QuotaExceeded(message) => LessonError::ServiceUnavailable {
                kind: ServiceFailureKind::Quota,
                message,
            },
            AdapterError::NetworkError(message) => LessonError::ServiceUnavailable {
                kind: ServiceFailureKind::Network,
                message,
            },
            // Only reachable through fatal paths; truncation is handled above.
            AdapterError::TruncatedNoContent => LessonError::TokenLimit,
        }
    }
}

impl std::fmt::Debug for BudgetedInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetedInvoker").finish_non_exhaustive()
    }
}
