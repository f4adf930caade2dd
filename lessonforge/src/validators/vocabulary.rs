//! Shared-vocabulary integration checks.

use std::collections::BTreeSet;

/// Minimum shared vocabulary items that must appear verbatim in sections
/// expected to reinforce them (reading passage, both dialogues).
pub const MIN_INTEGRATED: usize = 3;

/// Counts which ranked vocabulary words appear verbatim in the text blocks.
#[must_use]
pub fn integrated_words<'a>(blocks: &[&str], vocabulary: &'a [String]) -> Vec<&'a str> {
    let tokens: BTreeSet<String> = blocks
        .iter()
        .flat_map(|b| b.split_whitespace())
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    vocabulary
        .iter()
        .filter(|word| tokens.contains(&word.to_lowercase()))
        .map(String::as_str)
        .collect()
}

/// Checks that a reinforcing section integrates enough shared vocabulary.
#[must_use]
pub fn check_integration(blocks: &[&str], vocabulary: &[String]) -> Vec<String> {
    if vocabulary.is_empty() {
        return Vec::new();
    }
    let required = MIN_INTEGRATED.min(vocabulary.len());
    let found = integrated_words(blocks, vocabulary);
    if found.len() < required {
        vec![format!(
            "only {} of the shared vocabulary words appear, expected at least {required}",
            found.len()
        )]
    } else {
        Vec::new()
    }
}
