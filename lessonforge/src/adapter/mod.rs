//! Generative text service adapter.
//!
//! The pipeline consumes the remote model behind [`TextService`]: a prompt
//! and a token budget in, plain text or a typed failure out. Nothing here
//! assumes any structure in the returned text; parsing is the generators'
//! problem.

mod budget;

pub use budget::BudgetedInvoker;

use async_trait::async_trait;
use thiserror::Error;

/// Options for a single text-service invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Output token budget. `None` lets the service apply its default.
    pub max_output_units: Option<u32>,
}

impl InvokeOptions {
    /// Options with an explicit output budget.
    #[must_use]
    pub const fn with_budget(units: u32) -> Self {
        Self {
            max_output_units: Some(units),
        }
    }

    /// Options with the service-default budget.
    #[must_use]
    pub const fn service_default() -> Self {
        Self {
            max_output_units: None,
        }
    }
}

/// Typed failures a text-service call can surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The response was truncated and carried no usable content. Retryable
    /// with a smaller budget.
    #[error("response truncated with no usable content")]
    TruncatedNoContent,

    /// The caller's quota is exhausted. Not retryable within one request.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// A transport-level failure. Not retryable within one request.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// An unreliable, rate-limited remote text generation service.
#[async_trait]
pub trait TextService: Send + Sync {
    /// Generates text for a prompt under the given options.
    ///
    /// # Errors
    ///
    /// Returns a typed [`AdapterError`] on failure.
    async fn invoke(&self, prompt: &str, options: InvokeOptions) -> Result<String, AdapterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_options_constructors() {
        assert_eq!(InvokeOptions::with_budget(60).max_output_units, Some(60));
        assert_eq!(InvokeOptions::service_default().max_output_units, None);
    }

    #[test]
    fn test_adapter_error_display() {
        assert_eq!(
            AdapterError::TruncatedNoContent.to_string(),
            "response truncated with no usable content"
        );
        assert!(AdapterError::QuotaExceeded("daily cap".to_string())
            .to_string()
            .contains("daily cap"));
    }
}
