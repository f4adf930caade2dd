//! Proficiency tiers and the per-tier complexity profile.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of five ordered proficiency levels.
///
/// The derived `Ord` is load-bearing: every "at or below tier X" rule in the
/// validators compares tiers ordinally, never by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyTier {
    /// T1.
    Beginner,
    /// T2.
    Elementary,
    /// T3.
    Intermediate,
    /// T4.
    UpperIntermediate,
    /// T5.
    Advanced,
}

impl ProficiencyTier {
    /// All tiers in ascending order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Beginner,
            Self::Elementary,
            Self::Intermediate,
            Self::UpperIntermediate,
            Self::Advanced,
        ]
    }

    /// Returns the stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Elementary => "elementary",
            Self::Intermediate => "intermediate",
            Self::UpperIntermediate => "upper_intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Returns the complexity profile for this tier.
    #[must_use]
    pub const fn profile(self) -> TierProfile {
        match self {
            Self::Beginner => TierProfile {
                sentence_words: (5, 8),
                examples_per_word: 5,
                question_style: "simple yes/no questions",
                grammar_ceiling: "present simple and past simple only",
                permitted_tenses: &["present simple", "past simple"],
            },
            Self::Elementary => TierProfile {
                sentence_words: (8, 12),
                examples_per_word: 5,
                question_style: "short opinion questions",
                grammar_ceiling: "present simple, past simple, and simple future",
                permitted_tenses: &["present simple", "past simple", "simple future"],
            },
            Self::Intermediate => TierProfile {
                sentence_words: (10, 15),
                examples_per_word: 4,
                question_style: "opinion and comparison questions",
                grammar_ceiling: "up to present perfect and first conditional",
                permitted_tenses: &[
                    "present simple",
                    "past simple",
                    "simple future",
                    "present perfect",
                    "first conditional",
                ],
            },
            Self::UpperIntermediate => TierProfile {
                sentence_words: (12, 18),
                examples_per_word: 3,
                question_style: "analytical questions",
                grammar_ceiling: "up to passive voice and complex conditionals",
                permitted_tenses: &[
                    "all standard tenses",
                    "passive voice",
                    "second and third conditionals",
                ],
            },
            Self::Advanced => TierProfile {
                sentence_words: (15, 20),
                examples_per_word: 2,
                question_style: "evaluative and abstract questions",
                grammar_ceiling: "full range including subjunctive, cleft sentences, ellipsis",
                permitted_tenses: &[
                    "all tenses and aspects",
                    "subjunctive",
                    "cleft sentences",
                    "ellipsis",
                ],
            },
        }
    }
}

impl fmt::Display for ProficiencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The explicit complexity constraints applied at one tier.
///
/// Every generator reads this table when building its prompt, and the
/// matching validator reads it again when checking the response.
#[derive(Debug, Clone, Copy)]
pub struct TierProfile {
    /// Target sentence-length band, in words (min, max).
    pub sentence_words: (usize, usize),
    /// Exact number of example sentences per vocabulary word.
    pub examples_per_word: usize,
    /// Register of discussion questions at this tier.
    pub question_style: &'static str,
    /// Human-readable grammar ceiling, embedded verbatim into prompts.
    pub grammar_ceiling: &'static str,
    /// Tenses and constructions the model may use.
    pub permitted_tenses: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_totally_ordered() {
        let tiers = ProficiencyTier::all();
        for pair in tiers.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(ProficiencyTier::Beginner < ProficiencyTier::Advanced);
    }

    #[test]
    fn test_examples_per_word_descend_with_tier() {
        let counts: Vec<usize> = ProficiencyTier::all()
            .iter()
            .map(|t| t.profile().examples_per_word)
            .collect();
        assert_eq!(counts, vec![5, 5, 4, 3, 2]);
    }

    #[test]
    fn test_sentence_bands_widen_with_tier() {
        assert_eq!(ProficiencyTier::Beginner.profile().sentence_words, (5, 8));
        assert_eq!(ProficiencyTier::Advanced.profile().sentence_words, (15, 20));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ProficiencyTier::UpperIntermediate).unwrap();
        assert_eq!(json, r#""upper_intermediate""#);
        let back: ProficiencyTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProficiencyTier::UpperIntermediate);
    }
}
