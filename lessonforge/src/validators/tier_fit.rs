//! Tier-fit checks: above-tier constructions and under-complexity.

use crate::core::ProficiencyTier;
use regex::Regex;
use std::sync::OnceLock;

/// A grammatical construction and the lowest tier permitted to use it.
struct TierMarker {
    pattern: Regex,
    min_tier: ProficiencyTier,
    label: &'static str,
}

fn markers() -> &'static [TierMarker] {
    static MARKERS: OnceLock<Vec<TierMarker>> = OnceLock::new();
    MARKERS.get_or_init(|| {
        let table: [(&str, ProficiencyTier, &str); 8] = [
            (
                r"(?i)\bhave been \w+ing\b",
                ProficiencyTier::UpperIntermediate,
                "present perfect continuous",
            ),
            (
                r"(?i)\bhad been \w+ing\b",
                ProficiencyTier::UpperIntermediate,
                "past perfect continuous",
            ),
            (
                r"(?i)\b(is|are|was|were) being \w+ed\b",
                ProficiencyTier::UpperIntermediate,
                "passive progressive",
            ),
            (
                r"(?i)\bwould have \w+(ed|en)\b",
                ProficiencyTier::UpperIntermediate,
                "conditional perfect",
            ),
            (
                r"(?i)\bif \w+ (were|had)\b",
                ProficiencyTier::UpperIntermediate,
                "unreal conditional",
            ),
            (
                r"(?i)\bwere it not for\b",
                ProficiencyTier::Advanced,
                "inverted conditional",
            ),
            (
                r"(?i)\bit (is|was) \w+ (who|that)\b",
                ProficiencyTier::Advanced,
                "cleft sentence",
            ),
            (
                r"(?i)\bnot only\b.*\bbut also\b",
                ProficiencyTier::Advanced,
                "correlative emphasis",
            ),
        ];
        table
            .into_iter()
            .filter_map(|(pattern, min_tier, label)| {
                Regex::new(pattern).ok().map(|pattern| TierMarker {
                    pattern,
                    min_tier,
                    label,
                })
            })
            .collect()
    })
}

/// Checks the learner-visible text of a section against the requested tier.
///
/// Constructions characteristic of a higher tier are blocking issues;
/// under-complexity at the top tiers is a warning only.
pub fn check_tier_fit(blocks: &[&str], tier: ProficiencyTier) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    for marker in markers() {
        if marker.min_tier > tier && blocks.iter().any(|b| marker.pattern.is_match(b)) {
            issues.push(format!(
                "uses {}, which is above the {tier} tier",
                marker.label
            ));
        }
    }

    if let Some(avg) = average_sentence_words(blocks) {
        let (min_words, max_words) = tier.profile().sentence_words;
        if tier <= ProficiencyTier::Elementary && avg > max_words as f64 * 1.5 {
            issues.push(format!(
                "average sentence length {avg:.0} words is far above the {min_words}-{max_words} band"
            ));
        } else if avg > max_words as f64 {
            warnings.push(format!(
                "average sentence length {avg:.0} words exceeds the {min_words}-{max_words} band"
            ));
        } else if tier >= ProficiencyTier::UpperIntermediate && avg < min_words as f64 {
            warnings.push(format!(
                "average sentence length {avg:.0} words is below the {min_words}-{max_words} band \
                 expected at this tier"
            ));
        }
    }

    (issues, warnings)
}

/// Mean words per sentence across all blocks; `None` when there is no text.
fn average_sentence_words(blocks: &[&str]) -> Option<f64> {
    let mut sentences = 0usize;
    let mut words = 0usize;
    for block in blocks {
        for sentence in block.split(['.', '!', '?']) {
            let count = sentence.split_whitespace().count();
            if count > 0 {
                sentences += 1;
                words += count;
            }
        }
    }
    (sentences > 0).then(|| words as f64 / sentences as f64)
}
