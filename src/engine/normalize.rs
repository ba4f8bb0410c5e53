//! Text normalization shared by every downstream rule.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Canonical lowercase form of a piece of captured text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedText {
    /// Lowercase tokens in input order
    pub tokens: Vec<String>,
    /// Tokens joined by single spaces
    pub lowered: String,
}

impl NormalizedText {
    /// Token index where `phrase` (space separated words) starts, if present.
    pub fn find_phrase(&self, phrase: &str) -> Option<usize> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.is_empty() || words.len() > self.tokens.len() {
            return None;
        }
        self.tokens
            .windows(words.len())
            .position(|window| window.iter().zip(&words).all(|(t, w)| t == w))
    }

    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.find_phrase(phrase).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Characters kept inside tokens because dates and times use them.
fn is_date_punct(c: char) -> bool {
    matches!(c, ':' | '/' | '-')
}

/// Lowercase, strip punctuation (except `:`, `/`, `-`) and collapse whitespace.
///
/// Apostrophes are dropped without splitting, so "don't" becomes "dont".
/// Date punctuation is trimmed from token edges ("urgent:" -> "urgent").
/// Fails only on empty or whitespace-only input.
pub fn normalize(text: &str) -> Result<NormalizedText> {
    if text.trim().is_empty() {
        return Err(Error::invalid_input("text", text));
    }

    let mut cleaned = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || is_date_punct(c) {
            cleaned.push(c);
        } else if c == '\'' || c == '\u{2019}' {
            continue;
        } else {
            cleaned.push(' ');
        }
    }

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .map(|t| t.trim_matches(is_date_punct))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let lowered = tokens.join(" ");

    Ok(NormalizedText { tokens, lowered })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        let n = normalize("Urgent: Call   client, tomorrow at 2pm!").unwrap();
        assert_eq!(
            n.tokens,
            vec!["urgent", "call", "client", "tomorrow", "at", "2pm"]
        );
        assert_eq!(n.lowered, "urgent call client tomorrow at 2pm");
    }

    #[test]
    fn test_normalize_keeps_date_punctuation() {
        let n = normalize("Due 2025-07-10 at 14:30, see 7/10").unwrap();
        assert_eq!(n.tokens, vec!["due", "2025-07-10", "at", "14:30", "see", "7/10"]);
    }

    #[test]
    fn test_normalize_joins_apostrophes() {
        let n = normalize("Don't forget").unwrap();
        assert_eq!(n.tokens, vec!["dont", "forget"]);
    }

    #[test]
    fn test_normalize_rejects_blank() {
        assert!(matches!(normalize(""), Err(Error::InvalidInput { .. })));
        assert!(matches!(normalize(" \t\n "), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_normalize_punctuation_only_is_empty_not_error() {
        let n = normalize("!!! ...").unwrap();
        assert!(n.is_empty());
        assert_eq!(n.lowered, "");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let a = normalize("Review the Q3 report").unwrap();
        let b = normalize("Review the Q3 report").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_find_phrase() {
        let n = normalize("this is high priority work").unwrap();
        assert_eq!(n.find_phrase("high priority"), Some(2));
        assert!(!n.contains_phrase("low priority"));
        assert!(!n.contains_phrase(""));
    }
}
