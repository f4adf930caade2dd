//! Fault isolation between generation and whoever watches it.
//!
//! UI and transport callbacks are outside this crate's control. A panic in
//! one must never abort content generation, so every invocation goes
//! through a wrapper that catches, logs, and swallows.

use crate::progress::ProgressUpdate;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Receives progress updates as they are produced.
pub trait ProgressObserver: Send + Sync {
    /// Called once per update, in emission order.
    fn on_update(&self, update: &ProgressUpdate);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressUpdate) + Send + Sync,
{
    fn on_update(&self, update: &ProgressUpdate) {
        self(update);
    }
}

/// Wraps an optional observer so its failures cannot propagate.
pub struct FaultIsolatingObserver {
    inner: Option<Box<dyn ProgressObserver>>,
}

impl FaultIsolatingObserver {
    /// Wraps a registered observer.
    #[must_use]
    pub fn new(observer: Box<dyn ProgressObserver>) -> Self {
        Self {
            inner: Some(observer),
        }
    }

    /// A wrapper with no observer; notification is a no-op.
    #[must_use]
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Delivers an update, containing any panic the observer raises.
    pub fn notify(&self, update: &ProgressUpdate) {
        let Some(observer) = &self.inner else {
            return;
        };
        let delivery = catch_unwind(AssertUnwindSafe(|| observer.on_update(update)));
        if delivery.is_err() {
            warn!(
                step = %update.step,
                progress = update.progress,
                phase = %update.phase,
                "progress observer panicked; continuing generation"
            );
        }
    }
}

impl Default for FaultIsolatingObserver {
    fn default() -> Self {
        Self::noop()
    }
}
