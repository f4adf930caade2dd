//! Static section plans per lesson kind.
//!
//! Plans are declared in dependency order, so the orchestrator can walk
//! them front to back. Later sections read earlier `SectionResult`s (a
//! dialogue reinforces the vocabulary section's words), which is why
//! sections of one artifact never run in parallel.

use crate::core::{LessonKind, SectionKind};

/// One planned section and the sections it reads from.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    /// The section to generate.
    pub kind: SectionKind,
    /// Sections whose accepted results feed this one's prompt.
    pub depends_on: &'static [SectionKind],
}

const fn spec(kind: SectionKind, depends_on: &'static [SectionKind]) -> SectionSpec {
    SectionSpec { kind, depends_on }
}

const OPENING: SectionSpec = spec(SectionKind::OpeningQuestions, &[]);
const VOCABULARY: SectionSpec = spec(SectionKind::Vocabulary, &[]);
const PASSAGE: SectionSpec = spec(SectionKind::ReadingPassage, &[SectionKind::Vocabulary]);
const COMPREHENSION: SectionSpec =
    spec(SectionKind::Comprehension, &[SectionKind::ReadingPassage]);
const DISCUSSION: SectionSpec = spec(SectionKind::Discussion, &[SectionKind::ReadingPassage]);
const DIALOGUE_FILL_IN: SectionSpec =
    spec(SectionKind::DialogueFillIn, &[SectionKind::Vocabulary]);
const DIALOGUE_COMPREHENSION: SectionSpec =
    spec(SectionKind::DialogueComprehension, &[SectionKind::Vocabulary]);
const GRAMMAR: SectionSpec = spec(SectionKind::Grammar, &[SectionKind::ReadingPassage]);
const PRONUNCIATION: SectionSpec =
    spec(SectionKind::Pronunciation, &[SectionKind::Vocabulary]);
const CLOSING: SectionSpec = spec(SectionKind::ClosingReflection, &[]);

/// The ordered section list for one artifact.
#[derive(Debug, Clone)]
pub struct LessonPlan {
    sections: Vec<SectionSpec>,
}

impl LessonPlan {
    /// The plan for a lesson kind.
    ///
    /// Every plan shares the same spine (opening, vocabulary, passage,
    /// comprehension), adds the kind-specific sections, and closes with a
    /// reflection.
    #[must_use]
    pub fn for_kind(kind: LessonKind) -> Self {
        let mut sections = vec![OPENING, VOCABULARY, PASSAGE, COMPREHENSION];
        match kind {
            LessonKind::Discussion => sections.push(DISCUSSION),
            LessonKind::Dialogue => {
                sections.push(DIALOGUE_FILL_IN);
                sections.push(DIALOGUE_COMPREHENSION);
            }
            LessonKind::Grammar => sections.push(GRAMMAR),
            LessonKind::Pronunciation => sections.push(PRONUNCIATION),
            LessonKind::Comprehensive => {
                sections.push(DISCUSSION);
                sections.push(DIALOGUE_FILL_IN);
                sections.push(DIALOGUE_COMPREHENSION);
                sections.push(GRAMMAR);
                sections.push(PRONUNCIATION);
            }
        }
        sections.push(CLOSING);
        Self { sections }
    }

    /// The planned sections in execution order.
    #[must_use]
    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    /// The planned section kinds in execution order.
    #[must_use]
    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    /// Number of planned sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the plan is empty. Never true for a built plan.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discussion_plan_shape() {
        let plan = LessonPlan::for_kind(LessonKind::Discussion);
        assert_eq!(
            plan.kinds(),
            vec![
                SectionKind::OpeningQuestions,
                SectionKind::Vocabulary,
                SectionKind::ReadingPassage,
                SectionKind::Comprehension,
                SectionKind::Discussion,
                SectionKind::ClosingReflection,
            ]
        );
    }

    #[test]
    fn test_dialogue_plan_includes_both_variants() {
        let kinds = LessonPlan::for_kind(LessonKind::Dialogue).kinds();
        assert!(kinds.contains(&SectionKind::DialogueFillIn));
        assert!(kinds.contains(&SectionKind::DialogueComprehension));
        assert!(!kinds.contains(&SectionKind::Grammar));
    }

    #[test]
    fn test_comprehensive_plan_covers_every_kind() {
        let kinds = LessonPlan::for_kind(LessonKind::Comprehensive).kinds();
        for kind in SectionKind::all() {
            assert!(kinds.contains(&kind), "missing {kind}");
        }
        assert_eq!(kinds.len(), 10);
    }

    #[test]
    fn test_dependencies_precede_dependents_in_every_plan() {
        for lesson_kind in [
            LessonKind::Discussion,
            LessonKind::Dialogue,
            LessonKind::Grammar,
            LessonKind::Pronunciation,
            LessonKind::Comprehensive,
        ] {
            let plan = LessonPlan::for_kind(lesson_kind);
            let kinds = plan.kinds();
            for (index, section) in plan.sections().iter().enumerate() {
                for dep in section.depends_on {
                    let dep_index = kinds.iter().position(|k| k == dep);
                    assert!(
                        dep_index.is_some_and(|d| d < index),
                        "{dep} must precede {} in the {lesson_kind} plan",
                        section.kind
                    );
                }
            }
        }
    }

    #[test]
    fn test_closing_is_always_last() {
        for lesson_kind in [
            LessonKind::Discussion,
            LessonKind::Dialogue,
            LessonKind::Grammar,
            LessonKind::Pronunciation,
            LessonKind::Comprehensive,
        ] {
            let kinds = LessonPlan::for_kind(lesson_kind).kinds();
            assert_eq!(kinds.last(), Some(&SectionKind::ClosingReflection));
        }
    }
}
