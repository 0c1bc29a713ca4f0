//! Sentence-level cleanup for voice transcripts
//!
//! Speech-to-text output tends to repeat itself and carry uneven
//! whitespace. The transcript is normalized, split into sentences and
//! deduplicated before it reaches the summarization stage.

use std::collections::HashSet;

use regex::Regex;

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentences at `.`, `!` or `?` followed by whitespace.
///
/// The terminator stays with its sentence. Runs of terminators
/// (`"Wait..."`) are kept intact because only the last one is followed
/// by whitespace. Text without a final terminator keeps its tail as the
/// last sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let boundary = Regex::new(r"[.!?]\s+").expect("Invalid regex");

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(&normalized) {
        // Terminators are single-byte ASCII, so this lands on a char boundary.
        let end = m.start() + 1;
        let sentence = normalized[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = m.end();
    }

    let tail = normalized[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Drop exact duplicate sentences, keeping the first occurrence.
pub fn dedupe_sentences(sentences: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    sentences
        .into_iter()
        .filter(|sentence| seen.insert(sentence.clone()))
        .collect()
}

/// Normalize, split and dedupe a raw transcript.
pub fn prepare_sentences(text: &str) -> Vec<String> {
    dedupe_sentences(split_sentences(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\t b\n\nc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   \n\t "), "");
    }

    #[test]
    fn test_split_basic() {
        let sentences = split_sentences("First point. Second point! Third point?");
        assert_eq!(
            sentences,
            vec!["First point.", "Second point!", "Third point?"]
        );
    }

    #[test]
    fn test_split_keeps_ellipsis() {
        let sentences = split_sentences("Hello... World.");
        assert_eq!(sentences, vec!["Hello...", "World."]);
    }

    #[test]
    fn test_split_without_final_terminator() {
        let sentences = split_sentences("Complete sentence. trailing fragment");
        assert_eq!(sentences, vec!["Complete sentence.", "trailing fragment"]);
    }

    #[test]
    fn test_split_empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n  ").is_empty());
    }

    #[test]
    fn test_split_multibyte_text() {
        let sentences = split_sentences("Pythagore dit a² + b² = c². C'est élégant!");
        assert_eq!(
            sentences,
            vec!["Pythagore dit a² + b² = c².", "C'est élégant!"]
        );
    }

    #[test]
    fn test_dedupe_preserves_first_occurrence() {
        let sentences = vec![
            "A.".to_string(),
            "B.".to_string(),
            "A.".to_string(),
            "C.".to_string(),
            "B.".to_string(),
        ];
        assert_eq!(dedupe_sentences(sentences), vec!["A.", "B.", "C."]);
    }

    #[test]
    fn test_prepare_sentences() {
        let transcript = "Cells have membranes.  Cells have membranes. Energy comes  from ATP.";
        let sentences = prepare_sentences(transcript);
        assert_eq!(
            sentences,
            vec!["Cells have membranes.", "Energy comes from ATP."]
        );
    }
}
