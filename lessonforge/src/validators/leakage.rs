//! Content-assumption leakage detection for opening questions.
//!
//! Opening questions activate prior knowledge, so they must not assume the
//! learner has read the source: a question naming a person, place, event,
//! or year from the document is a defect, not a nice touch.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn entity_patterns() -> &'static (Regex, Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        // Multiword capitalized runs are proper names wherever they appear.
        #[allow(clippy::unwrap_used)]
        let multiword = Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)+\b").unwrap();
        // Single capitalized words count only after a non-terminal character,
        // so sentence-initial words are not mistaken for names.
        #[allow(clippy::unwrap_used)]
        let midsentence = Regex::new(r"[a-z,;] ([A-Z][a-z]{2,})\b").unwrap();
        #[allow(clippy::unwrap_used)]
        let year = Regex::new(r"\b(1[89]\d{2}|20\d{2})\b").unwrap();
        (multiword, midsentence, year)
    })
}

/// Extracts source-specific terms: proper names and years.
#[must_use]
pub fn extract_entities(text: &str) -> Vec<String> {
    let (multiword, midsentence, year) = entity_patterns();
    let mut entities: BTreeSet<String> = BTreeSet::new();

    for m in multiword.find_iter(text) {
        entities.insert(m.as_str().to_string());
    }
    for caps in midsentence.captures_iter(text) {
        if let Some(word) = caps.get(1) {
            entities.insert(word.as_str().to_string());
        }
    }
    for m in year.find_iter(text) {
        entities.insert(m.as_str().to_string());
    }

    entities.into_iter().collect()
}

/// Flags opening questions that quote a source entity verbatim.
#[must_use]
pub fn check_leakage(questions: &[String], source_entities: &[String]) -> Vec<String> {
    let mut issues = Vec::new();
    for question in questions {
        let lower = question.to_lowercase();
        for entity in source_entities {
            if contains_term(&lower, &entity.to_lowercase()) {
                issues.push(format!(
                    "opening question assumes source knowledge: references '{entity}'"
                ));
            }
        }
    }
    issues
}

/// Case-folded whole-term containment.
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
