//! Tolerant line-oriented parsing of model responses.
//!
//! Responses arrive with unpredictable decoration: markdown fences, bullet
//! markers, numbering, stray blank lines. These helpers normalize that noise
//! so per-kind parsers can work on clean lines. They never invent content;
//! an empty response stays empty and the validator deals with it.

/// Splits a response into trimmed, non-empty lines with list markers and
/// markdown fences removed.
#[must_use]
pub fn clean_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("```"))
        .map(strip_list_marker)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Removes a leading bullet or numbering marker from one line.
#[must_use]
pub fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim();
        }
    }
    // Numbered markers: "1." / "12)" / "3 -"
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && digits <= 2 {
        let rest = &line[digits..];
        for marker in [". ", ") ", " - "] {
            if let Some(stripped) = rest.strip_prefix(marker) {
                return stripped.trim();
            }
        }
        if let Some(stripped) = rest.strip_prefix('.') {
            return stripped.trim();
        }
    }
    line
}

/// Splits `left <sep> right` into a trimmed pair, if the separator occurs.
#[must_use]
pub fn split_pair(line: &str, sep: char) -> Option<(String, String)> {
    let (left, right) = line.split_once(sep)?;
    let left = left.trim();
    let right = right.trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left.to_string(), right.to_string()))
}

/// Splits a response into paragraphs on blank lines, joining wrapped lines.
#[must_use]
pub fn paragraphs(raw: &str) -> Vec<String> {
    raw.split("\n\n")
        .map(|block| {
            block
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with("```"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_lines_strips_noise() {
        let raw = "```\n1. First question?\n\n- Second question?\n* Third?\n```";
        assert_eq!(
            clean_lines(raw),
            vec!["First question?", "Second question?", "Third?"]
        );
    }

    #[test]
    fn test_strip_list_marker_variants() {
        assert_eq!(strip_list_marker("1. item"), "item");
        assert_eq!(strip_list_marker("12) item"), "item");
        assert_eq!(strip_list_marker("- item"), "item");
        assert_eq!(strip_list_marker("plain"), "plain");
        // A leading number without a marker is content, not numbering.
        assert_eq!(strip_list_marker("2 cats sat"), "2 cats sat");
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(
            split_pair("word | a meaning", '|'),
            Some(("word".to_string(), "a meaning".to_string()))
        );
        assert_eq!(split_pair("no separator", '|'), None);
        assert_eq!(split_pair("| empty left", '|'), None);
    }

    #[test]
    fn test_paragraphs_join_wrapped_lines() {
        let raw = "First line\ncontinues here.\n\nSecond paragraph.";
        assert_eq!(
            paragraphs(raw),
            vec!["First line continues here.", "Second paragraph."]
        );
    }
}
