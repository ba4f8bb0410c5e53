//! Attribute extraction from normalized text.
//!
//! Each attribute has its own rule; rules never fail and never influence
//! each other. Within a rule the first match wins:
//! - **Priority**: urgent phrases, then high, then low
//! - **Category**: first token (in text order) found in the category table
//! - **Due date**: first relative term, weekday or ISO date, plus the last
//!   time-of-day token; end of day (23:59) when no time is given
//! - **Tags**: every token in the tag vocabulary
//! - **Duration**: first token with a duration hint, else the optional default
//!
//! The [`Extractor`] trait is the seam for alternative implementations
//! (e.g. a model-backed extractor); [`RuleExtractor`] is the deterministic one.

use crate::engine::normalize::{NormalizedText, normalize};
use crate::engine::vocab::{self, CategoryTable};
use crate::models::{Priority, TaskSource};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static MERIDIEM_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?(am|pm)$").expect("meridiem time pattern is valid")
});

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?::(\d{2}))?$").expect("clock pattern is valid"));

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("ISO date pattern is valid")
});

/// Candidate task attributes inferred from text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<u32>,

    /// One human-readable line per rule that fired
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Anything that can produce attributes from normalized text.
pub trait Extractor {
    fn extract(
        &self,
        normalized: &NormalizedText,
        reference_time: DateTime<Utc>,
    ) -> ExtractedAttributes;
}

/// Settings for the rule-based extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub categories: CategoryTable,
    /// Estimate emitted when no duration keyword matched; `None` leaves it unset
    pub default_duration: Option<u32>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            categories: CategoryTable::default(),
            default_duration: None,
        }
    }
}

/// Deterministic keyword/pattern extractor.
#[derive(Debug, Clone, Default)]
pub struct RuleExtractor {
    config: ExtractorConfig,
}

impl RuleExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl Extractor for RuleExtractor {
    fn extract(
        &self,
        normalized: &NormalizedText,
        reference_time: DateTime<Utc>,
    ) -> ExtractedAttributes {
        let mut attrs = ExtractedAttributes::default();

        if let Some((priority, phrase)) = extract_priority(normalized) {
            attrs.reasons.push(format!(
                "priority {} (matched \"{}\")",
                priority.as_str(),
                phrase
            ));
            attrs.priority = Some(priority);
        }

        if let Some((category, keyword)) = extract_category(normalized, &self.config.categories)
        {
            attrs
                .reasons
                .push(format!("category {} (keyword \"{}\")", category, keyword));
            attrs.category = Some(category);
        }

        if let Some((due, term)) = extract_due_date(&normalized.tokens, reference_time) {
            attrs.reasons.push(format!(
                "due {} (from \"{}\")",
                due.format("%Y-%m-%d %H:%M"),
                term
            ));
            attrs.due_date = Some(due);
        }

        attrs.tags = extract_tags(normalized);

        match extract_duration(normalized) {
            Some((minutes, keyword)) => {
                attrs.reasons.push(format!(
                    "estimate {} min (keyword \"{}\")",
                    minutes, keyword
                ));
                attrs.estimated_duration_minutes = Some(minutes);
            }
            None => {
                if let Some(minutes) = self.config.default_duration {
                    attrs
                        .reasons
                        .push(format!("estimate {} min (default)", minutes));
                    attrs.estimated_duration_minutes = Some(minutes);
                }
            }
        }

        tracing::debug!(
            tokens = normalized.tokens.len(),
            rules = attrs.reasons.len(),
            "extracted attributes"
        );
        attrs
    }
}

/// Caller-supplied attributes (for example from a remote model) behind the
/// same contract. The text is ignored.
#[derive(Debug, Clone, Default)]
pub struct PreExtracted(pub ExtractedAttributes);

impl Extractor for PreExtracted {
    fn extract(
        &self,
        _normalized: &NormalizedText,
        _reference_time: DateTime<Utc>,
    ) -> ExtractedAttributes {
        self.0.clone()
    }
}

/// Extract with the built-in tables and no default estimate.
pub fn extract(normalized: &NormalizedText, reference_time: DateTime<Utc>) -> ExtractedAttributes {
    RuleExtractor::default().extract(normalized, reference_time)
}

fn extract_priority(normalized: &NormalizedText) -> Option<(Priority, &'static str)> {
    let rules: [(Priority, &[&'static str]); 3] = [
        (Priority::Urgent, vocab::URGENT_PHRASES),
        (Priority::High, vocab::HIGH_PHRASES),
        (Priority::Low, vocab::LOW_PHRASES),
    ];
    rules.iter().find_map(|(priority, phrases)| {
        phrases
            .iter()
            .find(|p| normalized.contains_phrase(p))
            .map(|p| (*priority, *p))
    })
}

fn extract_category(
    normalized: &NormalizedText,
    table: &CategoryTable,
) -> Option<(String, String)> {
    normalized.tokens.iter().find_map(|token| {
        table
            .category_for(token)
            .map(|category| (category.to_string(), token.clone()))
    })
}

fn extract_tags(normalized: &NormalizedText) -> BTreeSet<String> {
    normalized
        .tokens
        .iter()
        .filter(|t| vocab::TAG_VOCABULARY.contains(&t.as_str()))
        .cloned()
        .collect()
}

fn extract_duration(normalized: &NormalizedText) -> Option<(u32, String)> {
    normalized.tokens.iter().find_map(|token| {
        vocab::DURATION_HINTS
            .iter()
            .find(|(keyword, _)| *keyword == token.as_str())
            .map(|(_, minutes)| (*minutes, token.clone()))
    })
}

/// A date expression found in a token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DateSpan {
    pub start: usize,
    pub len: usize,
    pub date: NaiveDate,
    pub term: String,
}

/// A time-of-day expression found in a token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeSpan {
    pub start: usize,
    pub len: usize,
    pub hour: u32,
    pub minute: u32,
}

/// Every date expression in `tokens`, in order.
///
/// Weekdays resolve to the next occurrence strictly after the reference day;
/// "next week" is seven days after it and "in 3 days" three days after it.
pub(crate) fn date_spans(tokens: &[String], reference_time: DateTime<Utc>) -> Vec<DateSpan> {
    let today = reference_time.date_naive();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();
        let next = tokens.get(i + 1).map(String::as_str);

        let found = if token == "next" && next == Some("week") {
            Some((2, today + Duration::days(7), "next week".to_string()))
        } else if let Some(day) = next.filter(|_| token == "next").and_then(vocab::weekday) {
            let term = format!("next {}", next.unwrap_or_default());
            Some((2, next_weekday(today, day), term))
        } else if let Some((date, term)) = in_days(today, &tokens[i..]) {
            Some((3, date, term))
        } else if let Some((_, offset)) = vocab::RELATIVE_DAYS.iter().find(|(w, _)| *w == token) {
            Some((1, today + Duration::days(*offset), token.to_string()))
        } else if let Some(day) = vocab::weekday(token) {
            Some((1, next_weekday(today, day), token.to_string()))
        } else {
            parse_iso_date(token).map(|date| (1, date, token.to_string()))
        };

        match found {
            Some((len, date, term)) => {
                spans.push(DateSpan {
                    start: i,
                    len,
                    date,
                    term,
                });
                i += len;
            }
            None => i += 1,
        }
    }

    spans
}

/// Every time-of-day expression in `tokens`, in order.
///
/// Accepts `2pm`, `2:30pm`, `2 pm` and `noon`.
pub(crate) fn time_spans(tokens: &[String]) -> Vec<TimeSpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();
        let next = tokens.get(i + 1).map(String::as_str);

        let found = if token == "noon" {
            Some((1, 12, 0))
        } else if let Some(caps) = MERIDIEM_TIME.captures(token) {
            to_24h(&caps[1], caps.get(2).map(|m| m.as_str()), &caps[3]).map(|(h, m)| (1, h, m))
        } else if let (Some(caps), Some(meridiem @ ("am" | "pm"))) =
            (CLOCK_TIME.captures(token), next)
        {
            to_24h(&caps[1], caps.get(2).map(|m| m.as_str()), meridiem).map(|(h, m)| (2, h, m))
        } else {
            None
        };

        match found {
            Some((len, hour, minute)) => {
                spans.push(TimeSpan {
                    start: i,
                    len,
                    hour,
                    minute,
                });
                i += len;
            }
            None => i += 1,
        }
    }

    spans
}

fn to_24h(hour: &str, minute: Option<&str>, meridiem: &str) -> Option<(u32, u32)> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = match minute {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let hour = match (meridiem, hour) {
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        (_, h) => h + 12,
    };
    Some((hour, minute))
}

/// "in <n> day(s)" at the head of `tokens`.
fn in_days(today: NaiveDate, tokens: &[String]) -> Option<(NaiveDate, String)> {
    let [first, count, unit, ..] = tokens else {
        return None;
    };
    if first != "in" || !matches!(unit.as_str(), "day" | "days") {
        return None;
    }
    let n: u64 = count.parse().ok()?;
    let date = today.checked_add_days(Days::new(n))?;
    Some((date, format!("in {} {}", count, unit)))
}

fn parse_iso_date(token: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(token)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}

/// Next occurrence of `day` strictly after `from`.
fn next_weekday(from: NaiveDate, day: chrono::Weekday) -> NaiveDate {
    let current = i64::from(from.weekday().num_days_from_monday());
    let target = i64::from(day.num_days_from_monday());
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    from + Duration::days(ahead)
}

fn extract_due_date(
    tokens: &[String],
    reference_time: DateTime<Utc>,
) -> Option<(DateTime<Utc>, String)> {
    let span = date_spans(tokens, reference_time).into_iter().next()?;
    let (hour, minute, term) = match time_spans(tokens).last() {
        Some(time) => {
            let raw = tokens[time.start..time.start + time.len].join(" ");
            (time.hour, time.minute, format!("{} {}", span.term, raw))
        }
        None => (23, 59, span.term.clone()),
    };
    let naive = span.date.and_hms_opt(hour, minute, 0)?;
    Some((Utc.from_utc_datetime(&naive), term))
}

/// Derive a display title from captured text.
///
/// Drops priority phrases, relative dates and times (with their leading
/// connector), leading command words ("create", "add", "remind me to", ...)
/// and a category label directly followed by "task". Falls back to
/// `fallback` when nothing is left.
pub fn suggest_title(text: &str, fallback: &str) -> String {
    let words: Vec<(&str, String)> = text
        .split_whitespace()
        .filter_map(|raw| {
            let key = normalize(raw).ok()?.tokens.join("");
            (!key.is_empty()).then_some((raw, key))
        })
        .collect();
    let keys: Vec<String> = words.iter().map(|(_, k)| k.clone()).collect();
    let mut removed = vec![false; keys.len()];

    let normalized = NormalizedText {
        lowered: keys.join(" "),
        tokens: keys.clone(),
    };
    let priority_phrases = vocab::URGENT_PHRASES
        .iter()
        .chain(vocab::HIGH_PHRASES)
        .chain(vocab::LOW_PHRASES);
    for phrase in priority_phrases {
        mark_phrase(&normalized, phrase, &mut removed);
    }

    // Only span positions matter here, so any fixed reference will do.
    let spans = date_spans(&keys, DateTime::<Utc>::default())
        .into_iter()
        .map(|s| (s.start, s.len))
        .chain(time_spans(&keys).into_iter().map(|s| (s.start, s.len)));
    for (start, len) in spans {
        removed[start..start + len].iter_mut().for_each(|r| *r = true);
        if start > 0 && vocab::DATE_CONNECTORS.contains(&keys[start - 1].as_str()) {
            removed[start - 1] = true;
        }
    }

    let categories = CategoryTable::default().names();
    for i in 0..keys.len().saturating_sub(1) {
        if keys[i + 1] == "task" && categories.contains(&keys[i]) {
            removed[i] = true;
        }
    }

    // Leading filler, repeated until stable.
    loop {
        let Some(first) = removed.iter().position(|r| !r) else {
            break;
        };
        let rest = NormalizedText {
            tokens: keys[first..].to_vec(),
            lowered: keys[first..].join(" "),
        };
        if let Some(phrase) = vocab::TITLE_FILLER_PHRASES
            .iter()
            .map(|p| p.replace('\'', ""))
            .find(|p| rest.find_phrase(p) == Some(0))
        {
            let len = phrase.split_whitespace().count();
            removed[first..first + len].iter_mut().for_each(|r| *r = true);
            continue;
        }
        let key = keys[first].as_str();
        if vocab::TITLE_FILLER_WORDS.contains(&key) || matches!(key, "a" | "an" | "to") {
            removed[first] = true;
            continue;
        }
        break;
    }

    let mut kept: Vec<&str> = words
        .iter()
        .zip(&removed)
        .filter(|(_, r)| !**r)
        .map(|((raw, _), _)| *raw)
        .collect();
    while kept
        .last()
        .is_some_and(|w| vocab::DATE_CONNECTORS.contains(&w.to_lowercase().as_str()))
    {
        kept.pop();
    }

    let joined = kept.join(" ");
    let trimmed = joined.trim_matches(|c: char| matches!(c, ',' | ':' | ';' | '-' | '.' | '!'));
    let mut chars = trimmed.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => fallback.to_string(),
    }
}

fn mark_phrase(normalized: &NormalizedText, phrase: &str, removed: &mut [bool]) {
    let len = phrase.split_whitespace().count();
    if let Some(start) = normalized.find_phrase(phrase) {
        removed[start..start + len].iter_mut().for_each(|r| *r = true);
    }
}

/// Default title fallback for a capture source.
pub fn fallback_title(source: TaskSource) -> &'static str {
    match source {
        TaskSource::Voice => "Voice task",
        _ => "Untitled task",
    }
}
