//! Context interpretation for long-form entries (emails, chats, notes).
//!
//! Produces keywords, urgency indicators, a lexicon sentiment score and
//! deadline mentions. All heuristics are deterministic lookups:
//! - **Keywords**: top-N non-stopword tokens by frequency, ties by first occurrence
//! - **Urgency**: every phrase from the urgency list found in the text,
//!   ordered by first appearance
//! - **Sentiment**: `(positive - negative) / (positive + negative)`, 0 when
//!   no sentiment-bearing token is present

use crate::engine::extract::{Extractor, ExtractedAttributes, date_spans, suggest_title};
use crate::engine::normalize::normalize;
use crate::engine::vocab;
use crate::models::{ContextDerived, ContextEntry, PartialTask, TaskSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Thresholds for context interpretation.
pub mod thresholds {
    /// Default number of keywords kept per entry.
    pub const DEFAULT_KEYWORD_LIMIT: usize = 8;

    /// Longest title produced for a suggested task (characters).
    pub const MAX_SUGGESTED_TITLE_LENGTH: usize = 80;
}

/// Context interpreter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    pub keyword_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            keyword_limit: thresholds::DEFAULT_KEYWORD_LIMIT,
        }
    }
}

/// Interprets context entries into [`ContextDerived`] snapshots.
#[derive(Debug, Clone, Default)]
pub struct ContextInterpreter {
    config: InterpreterConfig,
}

impl ContextInterpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// Derive keywords, urgency indicators, sentiment and deadline mentions.
    ///
    /// An entry without any usable text yields an empty, neutral snapshot.
    pub fn interpret(&self, entry: &ContextEntry) -> ContextDerived {
        let Ok(normalized) = normalize(&entry.content) else {
            return ContextDerived::default();
        };

        let derived = ContextDerived {
            keywords: top_keywords(&normalized.tokens, self.config.keyword_limit),
            urgency_indicators: urgency_indicators(&entry.content),
            sentiment_score: sentiment_score(&normalized.tokens),
            deadline_mentions: deadline_mentions(&normalized.tokens, entry.timestamp),
        };

        tracing::debug!(
            entry = %entry.id,
            keywords = derived.keywords.len(),
            urgency = derived.urgency_indicators.len(),
            sentiment = derived.sentiment_score,
            "interpreted context entry"
        );
        derived
    }
}

/// Interpret with the default keyword limit.
pub fn interpret(entry: &ContextEntry) -> ContextDerived {
    ContextInterpreter::default().interpret(entry)
}

/// Derived values for an entry, using its cached snapshot when present.
pub fn derived_or_interpret(entry: &ContextEntry) -> ContextDerived {
    entry.derived.clone().unwrap_or_else(|| interpret(entry))
}

fn top_keywords(tokens: &[String], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, token) in tokens.iter().enumerate() {
        if vocab::STOPWORDS.contains(&token.as_str())
            || token.chars().count() < 2
            || !token.chars().any(char::is_alphabetic)
        {
            continue;
        }
        counts.entry(token.as_str()).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(token, _, _)| token.to_string())
        .collect()
}

/// Lowercase with straight apostrophes and single spaces.
fn fold_text(content: &str) -> String {
    content
        .to_lowercase()
        .replace('\u{2019}', "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte offset of the first occurrence of `phrase` not glued to other letters.
fn find_bounded(haystack: &str, phrase: &str) -> Option<usize> {
    let is_word = |c: char| c.is_alphanumeric();
    haystack.match_indices(phrase).map(|(i, _)| i).find(|&i| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + phrase.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

fn urgency_indicators(content: &str) -> Vec<String> {
    let folded = fold_text(content);
    let mut found: Vec<(usize, &str)> = vocab::URGENCY_PHRASES
        .iter()
        .filter_map(|phrase| find_bounded(&folded, phrase).map(|pos| (pos, *phrase)))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, p)| p.to_string()).collect()
}

fn sentiment_score(tokens: &[String]) -> f64 {
    let positive = tokens
        .iter()
        .filter(|t| vocab::POSITIVE_WORDS.contains(&t.as_str()))
        .count();
    let negative = tokens
        .iter()
        .filter(|t| vocab::NEGATIVE_WORDS.contains(&t.as_str()))
        .count();
    let total = positive + negative;
    if total == 0 {
        return 0.0;
    }
    ((positive as f64 - negative as f64) / total as f64).clamp(-1.0, 1.0)
}

fn deadline_mentions(tokens: &[String], reference_time: DateTime<Utc>) -> Vec<String> {
    let mut mentions: Vec<String> = Vec::new();
    let mut push = |m: String| {
        if !mentions.contains(&m) {
            mentions.push(m);
        }
    };

    let spans = date_spans(tokens, reference_time);
    let mut span_iter = spans.iter().peekable();
    let mut i = 0;
    while i < tokens.len() {
        if let Some(span) = span_iter.next_if(|s| s.start == i) {
            push(span.term.clone());
            i += span.len;
            continue;
        }
        let rest = &tokens[i..];
        let phrase = [
            &["end", "of", "day"][..],
            &["end", "of", "the", "week"][..],
            &["end", "of", "week"][..],
            &["this", "week"][..],
        ]
        .into_iter()
        .find(|p| {
            rest.len() >= p.len() && rest.iter().zip(p.iter()).all(|(t, w)| t.as_str() == *w)
        });
        match phrase {
            Some(p) => {
                push(p.join(" "));
                i += p.len();
            }
            None => {
                if matches!(tokens[i].as_str(), "eod" | "weekend") {
                    push(tokens[i].clone());
                }
                i += 1;
            }
        }
    }
    mentions
}

/// A task candidate found in a context entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTask {
    pub title: String,
    /// The sentence the suggestion came from
    pub description: String,
    pub attributes: ExtractedAttributes,
}

impl SuggestedTask {
    /// Caller overrides for assembling this suggestion into a task.
    pub fn to_partial(&self) -> PartialTask {
        PartialTask {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            source: Some(TaskSource::Extracted),
            ..Default::default()
        }
    }
}

/// Split an entry into sentences and keep the actionable ones.
///
/// A sentence is actionable when it contains an urgency phrase, an action
/// verb, or a request marker ("need to", "please", "can you", ...). Dates are
/// resolved against `reference_time`.
pub fn suggest_tasks(
    entry: &ContextEntry,
    reference_time: DateTime<Utc>,
    extractor: &dyn Extractor,
) -> Vec<SuggestedTask> {
    entry
        .content
        .split(['.', '!', '?', ';', '\n'])
        .map(str::trim)
        .filter_map(|sentence| {
            let normalized = normalize(sentence).ok()?;
            if normalized.is_empty() || !is_actionable(sentence, &normalized.tokens) {
                return None;
            }
            let attributes = extractor.extract(&normalized, reference_time);
            let title = truncate_title(&suggest_title(sentence, sentence));
            Some(SuggestedTask {
                title,
                description: sentence.to_string(),
                attributes,
            })
        })
        .collect()
}

fn is_actionable(sentence: &str, tokens: &[String]) -> bool {
    let markers = ["need to", "needs to", "please", "can you", "remember to", "todo", "to do"];
    let folded = fold_text(sentence);
    !urgency_indicators(sentence).is_empty()
        || tokens
            .iter()
            .any(|t| vocab::ACTION_VERBS.contains(&t.as_str()))
        || markers.iter().any(|m| find_bounded(&folded, m).is_some())
}

fn truncate_title(title: &str) -> String {
    let max = thresholds::MAX_SUGGESTED_TITLE_LENGTH;
    if title.chars().count() <= max {
        return title.to_string();
    }
    let mut out = String::new();
    for word in title.split_whitespace() {
        if out.chars().count() + word.chars().count() + 1 > max {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() {
        out = title.chars().take(max).collect();
    }
    out
}
