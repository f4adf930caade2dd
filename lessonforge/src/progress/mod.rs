//! Weighted, monotone progress aggregation.
//!
//! The aggregator converts section lifecycle signals into a non-decreasing
//! percentage. The denominator is recomputed per request from the planned
//! section list, never a global constant, because artifact kinds plan
//! different section sets.

pub mod observer;

pub use observer::{FaultIsolatingObserver, ProgressObserver};

use crate::core::SectionKind;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Percentage reported once the shared context is being built.
const INIT_PROGRESS: u8 = 3;

/// Section work is mapped into this band.
const SECTION_BAND: (f64, f64) = (5.0, 95.0);

/// Percentage reported while the artifact is being assembled.
const SAVE_PROGRESS: u8 = 98;

/// Fraction of a section's weight credited while it is in progress.
const PARTIAL_CREDIT: f64 = 0.5;

/// One transient snapshot of where generation stands.
///
/// The last update observed is the only state a caller needs to retain;
/// terminal error events carry it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    /// Human-readable description of the current step.
    pub step: String,
    /// Overall percentage, non-decreasing within one run.
    pub progress: u8,
    /// `"init"`, a section kind name, or `"save"`.
    pub phase: String,
    /// The section being worked on, when the phase is a section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Relative weights per section kind. Configuration, not runtime state.
///
/// Weights need not sum to any particular total; the aggregator normalizes
/// against the planned list.
#[derive(Debug, Clone)]
pub struct PhaseWeights {
    weights: HashMap<SectionKind, f64>,
}

impl Default for PhaseWeights {
    fn default() -> Self {
        let mut weights = HashMap::new();
        for kind in SectionKind::all() {
            weights.insert(kind, 1.0);
        }
        // The passage and the dialogues dominate wall-clock time.
        weights.insert(SectionKind::ReadingPassage, 2.0);
        weights.insert(SectionKind::DialogueFillIn, 1.5);
        weights.insert(SectionKind::DialogueComprehension, 1.5);
        Self { weights }
    }
}

impl PhaseWeights {
    /// Overrides the weight for one section kind. Non-positive values are
    /// ignored.
    #[must_use]
    pub fn with_weight(mut self, kind: SectionKind, weight: f64) -> Self {
        if weight > 0.0 {
            self.weights.insert(kind, weight);
        }
        self
    }

    /// The weight for a section kind, defaulting to 1.0.
    #[must_use]
    pub fn weight(&self, kind: SectionKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(1.0)
    }
}

/// Tracks completed sections for one artifact run and produces updates.
#[derive(Debug)]
pub struct ProgressAggregator {
    weights: PhaseWeights,
    planned: Vec<SectionKind>,
    completed: HashSet<SectionKind>,
    high_water: u8,
}

impl ProgressAggregator {
    /// Creates an aggregator for the given planned section list.
    #[must_use]
    pub fn new(planned: Vec<SectionKind>, weights: PhaseWeights) -> Self {
        Self {
            weights,
            planned,
            completed: HashSet::new(),
            high_water: 0,
        }
    }

    /// Update for the context-building phase.
    pub fn init(&mut self) -> ProgressUpdate {
        let progress = self.clamp(INIT_PROGRESS);
        ProgressUpdate {
            step: "building shared context".to_string(),
            progress,
            phase: "init".to_string(),
            section: None,
        }
    }

    /// Update for a section that has started generating.
    ///
    /// The section earns half its weight while in progress, so the reported
    /// percentage moves between the previous and next completion points.
    pub fn section_started(&mut self, kind: SectionKind) -> ProgressUpdate {
        let partial = self.weights.weight(kind) * PARTIAL_CREDIT;
        let progress = self.clamp(self.percentage(partial));
        ProgressUpdate {
            step: format!("generating {kind}"),
            progress,
            phase: kind.as_str().to_string(),
            section: Some(kind.as_str().to_string()),
        }
    }

    /// Update for a completed section. Duplicate signals do not double-count.
    pub fn section_completed(&mut self, kind: SectionKind) -> ProgressUpdate {
        self.completed.insert(kind);
        let progress = self.clamp(self.percentage(0.0));
        ProgressUpdate {
            step: format!("completed {kind}"),
            progress,
            phase: kind.as_str().to_string(),
            section: Some(kind.as_str().to_string()),
        }
    }

    /// Update for artifact assembly, just short of completion.
    pub fn saving(&mut self) -> ProgressUpdate {
        let progress = self.clamp(SAVE_PROGRESS);
        ProgressUpdate {
            step: "assembling artifact".to_string(),
            progress,
            phase: "save".to_string(),
            section: None,
        }
    }

    /// The highest percentage emitted so far.
    #[must_use]
    pub fn high_water(&self) -> u8 {
        self.high_water
    }

    /// Maps completed weight plus extra credit into the section band.
    fn percentage(&self, extra: f64) -> u8 {
        let total: f64 = self
            .planned
            .iter()
            .map(|&kind| self.weights.weight(kind))
            .sum();
        if total <= 0.0 {
            return SECTION_BAND.0 as u8;
        }
        let done: f64 = self
            .completed
            .iter()
            .map(|&kind| self.weights.weight(kind))
            .sum();
        let fraction = ((done + extra) / total).clamp(0.0, 1.0);
        let (lo, hi) = SECTION_BAND;
        (lo + fraction * (hi - lo)).round() as u8
    }

    /// Enforces monotonicity with a high-water mark.
    fn clamp(&mut self, progress: u8) -> u8 {
        self.high_water = self.high_water.max(progress.min(100));
        self.high_water
    }
}
