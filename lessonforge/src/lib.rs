//! # Lessonforge
//!
//! A progressive, validated lesson-generation pipeline over an unreliable
//! generative text service.
//!
//! Lessonforge turns one source document into a structured language lesson:
//!
//! - **Shared context**: one summary/vocabulary/theme bundle built up front
//! - **Tier calibration**: five ordered proficiency tiers drive sentence
//!   bands, example counts, and permitted grammar per section
//! - **Validate and regenerate**: every section passes strict validators,
//!   with one bounded retry narrowed by the detected issues
//! - **Weighted progress**: monotone percentages with fault-isolated
//!   observers, so a broken UI callback never aborts generation
//! - **Event stream**: progress, completion, and error events where every
//!   error carries the last known progress state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lessonforge::prelude::*;
//!
//! let orchestrator = PipelineOrchestrator::new(service)
//!     .with_sink(Arc::new(LoggingEventSink));
//!
//! let request = GenerationRequest::new(
//!     SourceDocument::new(text),
//!     ProficiencyTier::Intermediate,
//!     LessonKind::Discussion,
//! );
//! let artifact = orchestrator.run(&request, &CancellationToken::new()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

pub mod adapter;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod generators;
pub mod pipeline;
pub mod progress;
pub mod regen;
pub mod testing;
pub mod validators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapter::{AdapterError, BudgetedInvoker, InvokeOptions, TextService};
    pub use crate::context::{ContextBuilder, GenerationContext};
    pub use crate::core::{
        LessonArtifact, LessonKind, ProficiencyTier, SectionContent, SectionKind, SectionResult,
        SourceDocument,
    };
    pub use crate::errors::LessonError;
    pub use crate::events::{
        ChannelEventSink, CollectingEventSink, EventSink, LessonEvent, LoggingEventSink,
        NoOpEventSink,
    };
    pub use crate::pipeline::{
        CancellationToken, GenerationRequest, LessonPlan, PipelineOrchestrator,
    };
    pub use crate::progress::{
        FaultIsolatingObserver, PhaseWeights, ProgressAggregator, ProgressObserver,
        ProgressUpdate,
    };
    pub use crate::regen::{FailurePolicy, RegenerationController};
    pub use crate::validators::{SectionValidator, ValidationOutcome};
}
