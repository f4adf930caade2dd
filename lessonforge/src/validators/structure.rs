//! Structural count checks against the fixed section targets.

use crate::core::section::expected_examples;
use crate::core::{ProficiencyTier, SectionContent, SectionKind};
use crate::generators::{
    CLOSING_MIN, COMPREHENSION_MIN, DIALOGUE_MIN_LINES, DIALOGUE_TARGET_LINES,
    DISCUSSION_QUESTION_COUNT, GRAMMAR_MIN_ITEMS, OPENING_QUESTION_COUNT,
    PRONUNCIATION_MIN_WORDS, TWISTER_MIN,
};

/// Minimum vocabulary entries.
pub const VOCABULARY_MIN_ITEMS: usize = 5;

/// Checks the structural contract for one section.
///
/// Returns blocking issues and non-blocking warnings. A content variant that
/// does not match the section kind is always a blocking issue.
pub fn check_structure(
    kind: SectionKind,
    content: &SectionContent,
    tier: ProficiencyTier,
) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    match (kind, content) {
        (SectionKind::OpeningQuestions, SectionContent::Questions { items }) => {
            if items.len() != OPENING_QUESTION_COUNT {
                issues.push(format!(
                    "expected exactly {OPENING_QUESTION_COUNT} opening questions, got {}",
                    items.len()
                ));
            }
        }
        (SectionKind::Discussion, SectionContent::Questions { items }) => {
            if items.len() != DISCUSSION_QUESTION_COUNT {
                issues.push(format!(
                    "expected exactly {DISCUSSION_QUESTION_COUNT} discussion questions, got {}",
                    items.len()
                ));
            }
        }
        (SectionKind::ClosingReflection, SectionContent::Questions { items }) => {
            if items.len() < CLOSING_MIN {
                issues.push(format!(
                    "expected at least {CLOSING_MIN} reflection prompts, got {}",
                    items.len()
                ));
            }
        }
        (SectionKind::Vocabulary, SectionContent::Vocabulary { items }) => {
            if items.len() < VOCABULARY_MIN_ITEMS {
                issues.push(format!(
                    "expected at least {VOCABULARY_MIN_ITEMS} vocabulary entries, got {}",
                    items.len()
                ));
            }
            let expected = expected_examples(tier);
            for item in items {
                if item.examples.len() != expected {
                    issues.push(format!(
                        "word '{}' has {} examples, tier requires exactly {expected}",
                        item.word,
                        item.examples.len()
                    ));
                }
                if item.meaning.is_empty() {
                    warnings.push(format!("word '{}' has no meaning", item.word));
                }
            }
        }
        (SectionKind::ReadingPassage, SectionContent::Passage { paragraphs }) => {
            if paragraphs.is_empty() {
                issues.push("passage is empty".to_string());
            } else if paragraphs.len() == 1 {
                warnings.push("passage has a single paragraph".to_string());
            }
        }
        (SectionKind::Comprehension, SectionContent::Comprehension { items }) => {
            if items.len() < COMPREHENSION_MIN {
                issues.push(format!(
                    "expected at least {COMPREHENSION_MIN} comprehension questions, got {}",
                    items.len()
                ));
            }
            for item in items {
                if item.answer.is_none() {
                    warnings.push(format!("question '{}' has no answer", item.question));
                }
            }
        }
        (
            SectionKind::DialogueFillIn | SectionKind::DialogueComprehension,
            SectionContent::Dialogue { lines, gapped },
        ) => {
            if lines.len() < DIALOGUE_MIN_LINES {
                issues.push(format!(
                    "dialogue has {} lines, minimum is {DIALOGUE_MIN_LINES}",
                    lines.len()
                ));
            } else if lines.len() < DIALOGUE_TARGET_LINES {
                warnings.push(format!(
                    "dialogue has {} lines, below the target of {DIALOGUE_TARGET_LINES}",
                    lines.len()
                ));
            }
            let gaps = lines.iter().filter(|l| l.text.contains("____")).count();
            let answered = lines.iter().filter(|l| l.gap_answer.is_some()).count();
            if kind == SectionKind::DialogueFillIn {
                if gaps == 0 {
                    issues.push("fill-in dialogue has no gaps".to_string());
                } else if answered < gaps {
                    issues.push(format!("{} gaps are missing answers", gaps - answered));
                }
            } else if *gapped || gaps > 0 {
                warnings.push("comprehension dialogue contains gaps".to_string());
            }
        }
        (
            SectionKind::Grammar,
            SectionContent::Grammar {
                focus,
                explanation,
                practice,
            },
        ) => {
            if focus.is_empty() {
                issues.push("grammar focus is missing".to_string());
            }
            if explanation.is_empty() {
                issues.push("grammar explanation is missing".to_string());
            }
            if practice.len() < GRAMMAR_MIN_ITEMS {
                issues.push(format!(
                    "expected at least {GRAMMAR_MIN_ITEMS} practice items, got {}",
                    practice.len()
                ));
            }
        }
        (
            SectionKind::Pronunciation,
            SectionContent::Pronunciation {
                words,
                tongue_twisters,
            },
        ) => {
            if words.len() < PRONUNCIATION_MIN_WORDS {
                issues.push(format!(
                    "expected at least {PRONUNCIATION_MIN_WORDS} target words, got {}",
                    words.len()
                ));
            }
            if tongue_twisters.len() < TWISTER_MIN {
                issues.push(format!(
                    "expected at least {TWISTER_MIN} tongue twisters, got {}",
                    tongue_twisters.len()
                ));
            }
            if words.iter().any(|w| w.ipa.is_none()) {
                warnings.push("some target words have no IPA transcription".to_string());
            }
        }
        (kind, _) => {
            issues.push(format!("content shape does not match section '{kind}'"));
        }
    }

    (issues, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DialogueLine, VocabularyItem};

    fn questions(n: usize) -> SectionContent {
        SectionContent::Questions {
            items: (0..n).map(|i| format!("Question {i}?")).collect(),
        }
    }

    #[test]
    fn test_opening_count_is_exact() {
        let (issues, _) = check_structure(
            SectionKind::OpeningQuestions,
            &questions(3),
            ProficiencyTier::Beginner,
        );
        assert!(issues.is_empty());

        let (issues, _) = check_structure(
            SectionKind::OpeningQuestions,
            &questions(4),
            ProficiencyTier::Beginner,
        );
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_discussion_count_is_exact() {
        let (issues, _) = check_structure(
            SectionKind::Discussion,
            &questions(5),
            ProficiencyTier::Advanced,
        );
        assert!(issues.is_empty());

        let (issues, _) = check_structure(
            SectionKind::Discussion,
            &questions(4),
            ProficiencyTier::Advanced,
        );
        assert!(!issues.is_empty());
    }

    #[test]
    fn test_vocabulary_example_counts_per_tier() {
        let content = SectionContent::Vocabulary {
            items: (0..6)
                .map(|i| VocabularyItem {
                    word: format!("word{i}"),
                    meaning: "a meaning".to_string(),
                    examples: vec!["Example.".to_string(); 3],
                })
                .collect(),
        };
        // Three examples is exact at upper-intermediate but wrong at beginner.
        let (issues, _) =
            check_structure(SectionKind::Vocabulary, &content, ProficiencyTier::UpperIntermediate);
        assert!(issues.is_empty());

        let (issues, _) =
            check_structure(SectionKind::Vocabulary, &content, ProficiencyTier::Beginner);
        assert_eq!(issues.len(), 6);
    }

    fn dialogue(lines: usize, gaps: bool) -> SectionContent {
        SectionContent::Dialogue {
            lines: (0..lines)
                .map(|i| DialogueLine {
                    speaker: "Ana".to_string(),
                    text: if gaps && i == 0 {
                        "A ____ line.".to_string()
                    } else {
                        "A plain line.".to_string()
                    },
                    gap_answer: (gaps && i == 0).then(|| "gap".to_string()),
                })
                .collect(),
            gapped: gaps,
        }
    }

    #[test]
    fn test_dialogue_line_floor_and_target() {
        let (issues, _) = check_structure(
            SectionKind::DialogueFillIn,
            &dialogue(11, true),
            ProficiencyTier::Intermediate,
        );
        assert!(!issues.is_empty());

        let (issues, warnings) = check_structure(
            SectionKind::DialogueFillIn,
            &dialogue(12, true),
            ProficiencyTier::Intermediate,
        );
        assert!(issues.is_empty());
        assert!(warnings.iter().any(|w| w.contains("below the target")));

        let (issues, warnings) = check_structure(
            SectionKind::DialogueFillIn,
            &dialogue(14, true),
            ProficiencyTier::Intermediate,
        );
        assert!(issues.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_fill_in_requires_gaps() {
        let (issues, _) = check_structure(
            SectionKind::DialogueFillIn,
            &dialogue(14, false),
            ProficiencyTier::Intermediate,
        );
        assert!(issues.iter().any(|i| i.contains("no gaps")));
    }

    #[test]
    fn test_shape_mismatch_is_blocking() {
        let (issues, _) = check_structure(
            SectionKind::Grammar,
            &questions(5),
            ProficiencyTier::Intermediate,
        );
        assert!(issues[0].contains("content shape"));
    }
}
