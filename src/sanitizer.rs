//! Turns free-form model output into a file name token.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SanitizeError;

pub const MIN_LENGTH: usize = 3;
pub const MAX_LENGTH: usize = 50;
pub const FALLBACK_PREFIX: &str = "image_";

static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").unwrap());

/// Cleans `raw` into a lowercase `[a-z0-9_-]` token of 3 to 50 characters.
///
/// Line breaks separate words like any other whitespace. Results shorter
/// than [`MIN_LENGTH`] get [`FALLBACK_PREFIX`]; an empty result is an error
/// so callers never write a blank file name.
pub fn sanitize(raw: &str) -> Result<String, SanitizeError> {
    let single_line = LINE_BREAKS.replace_all(raw, " ").to_lowercase();
    let kept = DISALLOWED.replace_all(&single_line, "");
    let cleaned = WHITESPACE.replace_all(kept.trim(), "_").to_string();

    if cleaned.is_empty() {
        return Err(SanitizeError::EmptyResult);
    }

    let padded = if cleaned.len() < MIN_LENGTH {
        format!("{}{}", FALLBACK_PREFIX, cleaned)
    } else {
        cleaned
    };

    // Only ASCII survives DISALLOWED, so byte truncation is safe.
    Ok(padded[..padded.len().min(MAX_LENGTH)].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_becomes_snake_case() {
        assert_eq!(sanitize("A Red Sports Car!!\n").unwrap(), "a_red_sports_car");
    }

    #[test]
    fn test_short_output_gets_fallback_prefix() {
        assert_eq!(sanitize("ok").unwrap(), "image_ok");
        assert_eq!(sanitize("  X ").unwrap(), "image_x");
    }

    #[test]
    fn test_line_breaks_separate_words() {
        assert_eq!(sanitize("golden\nretriever\r\npuppy").unwrap(), "golden_retriever_puppy");
    }

    #[test]
    fn test_punctuation_and_non_ascii_are_dropped() {
        assert_eq!(sanitize("\"Café\" at dusk.").unwrap(), "caf_at_dusk");
        assert_eq!(sanitize("snow-capped mountain_range").unwrap(), "snow-capped_mountain_range");
    }

    #[test]
    fn test_empty_after_cleaning_is_an_error() {
        assert_eq!(sanitize(""), Err(SanitizeError::EmptyResult));
        assert_eq!(sanitize("!!! ...\n"), Err(SanitizeError::EmptyResult));
    }

    #[test]
    fn test_long_output_is_truncated() {
        let raw = "word ".repeat(40);
        let result = sanitize(&raw).unwrap();
        assert_eq!(result.len(), MAX_LENGTH);
        assert!(result.starts_with("word_word_"));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "A Red Sports Car!!\n",
            "ok",
            "a",
            "  Two   spaces\tand\ttabs  ",
            "UPPER-case_Mixed 123",
            "émoji 🚗 car",
            "x".repeat(80).as_str(),
            "ab cd",
            "image_",
            "__--__",
        ]
        .map(str::to_string);

        for raw in samples {
            let once = sanitize(&raw).unwrap();
            let twice = sanitize(&once).unwrap();
            assert_eq!(once, twice, "sanitize not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_output_has_no_path_separators() {
        let result = sanitize("../../etc/passwd or C:\\Windows").unwrap();
        assert!(!result.contains('/') && !result.contains('\\'));
    }
}
