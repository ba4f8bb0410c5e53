//! Keyword tables shared by the extraction and context rules.
//!
//! Every rule in the engine is a lookup against one of these lists, so the
//! behavior of the engine is fully described by this file plus the
//! caller-supplied category table.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Phrases that mark a task as urgent.
pub const URGENT_PHRASES: &[&str] = &["urgent", "asap", "must do now", "critical"];

/// Phrases that mark a task as high priority.
pub const HIGH_PHRASES: &[&str] = &["important", "high priority"];

/// Phrases that mark a task as low priority.
pub const LOW_PHRASES: &[&str] = &["low priority", "when possible", "someday"];

/// Tokens copied verbatim into a task's tags.
pub const TAG_VOCABULARY: &[&str] = &[
    "meeting",
    "urgent",
    "review",
    "call",
    "email",
    "presentation",
    "report",
    "deadline",
    "follow-up",
    "followup",
    "interview",
    "invoice",
    "research",
    "planning",
    "errand",
];

/// Keyword to estimated minutes. First matching token wins.
pub const DURATION_HINTS: &[(&str, u32)] = &[
    ("quick", 15),
    ("brief", 15),
    ("meeting", 30),
    ("call", 30),
    ("review", 60),
    ("analyze", 60),
];

/// Estimate used when the caller asks for one and no keyword matched.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Phrases counted as urgency indicators in context entries.
pub const URGENCY_PHRASES: &[&str] = &[
    "urgent",
    "asap",
    "as soon as possible",
    "immediately",
    "right away",
    "critical",
    "deadline",
    "due today",
    "end of day",
    "eod",
    "by tomorrow",
    "by monday",
    "by tuesday",
    "by wednesday",
    "by thursday",
    "by friday",
    "before the weekend",
    "end of the week",
    "don't forget",
    "do not forget",
    "time-sensitive",
    "overdue",
    "high priority",
];

/// Words ignored when picking context keywords.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "but", "by", "can", "could", "did", "do", "does", "dont", "for", "from",
    "get", "got", "had", "has", "have", "he", "her", "hi", "him", "his", "how", "i", "if", "im",
    "in", "into", "is", "it", "its", "just", "let", "lets", "me", "my", "need", "no", "not", "of",
    "on", "or", "our", "please", "she", "should", "so", "some", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "to", "up", "us", "was", "we", "were", "what",
    "when", "which", "will", "with", "would", "you", "your",
];

/// Positive sentiment lexicon.
pub const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "awesome",
    "happy",
    "glad",
    "thanks",
    "thank",
    "appreciate",
    "appreciated",
    "love",
    "nice",
    "perfect",
    "success",
    "successful",
    "congrats",
    "congratulations",
    "pleased",
    "excited",
    "done",
    "resolved",
    "win",
];

/// Negative sentiment lexicon.
pub const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "problem",
    "problems",
    "issue",
    "issues",
    "fail",
    "failed",
    "failure",
    "broken",
    "late",
    "delay",
    "delayed",
    "worried",
    "worry",
    "stress",
    "stressed",
    "angry",
    "upset",
    "unfortunately",
    "sorry",
    "critical",
    "overdue",
    "blocked",
    "forget",
    "forgot",
    "error",
    "wrong",
    "complaint",
    "cancelled",
    "urgent",
];

/// Verbs that make a context sentence look like an actionable task.
pub const ACTION_VERBS: &[&str] = &[
    "call", "email", "send", "review", "prepare", "finish", "submit", "schedule", "book", "buy",
    "pay", "fix", "write", "update", "reply", "follow", "remind", "meet", "check", "complete",
    "draft", "plan", "organize", "confirm", "renew", "pick",
];

/// Leading phrases dropped from captured titles.
pub const TITLE_FILLER_PHRASES: &[&str] = &[
    "remind me to",
    "i need to",
    "i have to",
    "don't forget to",
    "dont forget to",
    "remember to",
    "please",
];

/// Command words dropped from captured titles anywhere they occur.
pub const TITLE_FILLER_WORDS: &[&str] = &["create", "add", "schedule", "task", "new"];

/// Connectors dropped when they precede a removed date or time.
pub const DATE_CONNECTORS: &[&str] = &["at", "by", "on", "for", "this", "next", "due", "before"];

/// Words that resolve to a relative day.
pub const RELATIVE_DAYS: &[(&str, i64)] = &[("today", 0), ("tonight", 0), ("tomorrow", 1)];

/// Weekday names in English.
pub const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Look up a weekday by its full lowercase name.
pub fn weekday(token: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, day)| *day)
}

/// Ordered keyword-to-category table.
///
/// Categories are an open set: callers extend or replace entries by name.
/// When a keyword appears under several categories the earlier one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    entries: Vec<(String, Vec<String>)>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        let builtin: &[(&str, &[&str])] = &[
            (
                "work",
                &[
                    "meeting",
                    "meetings",
                    "call",
                    "report",
                    "presentation",
                    "client",
                    "project",
                    "email",
                ],
            ),
            (
                "health",
                &[
                    "doctor",
                    "exercise",
                    "health",
                    "appointment",
                    "dentist",
                    "gym",
                    "workout",
                ],
            ),
            (
                "personal",
                &["family", "home", "personal", "groceries", "shopping", "birthday"],
            ),
            (
                "learning",
                &["learn", "learning", "study", "course", "class", "tutorial"],
            ),
        ];

        let mut table = Self::empty();
        for (name, keywords) in builtin {
            table.set(*name, keywords.iter().map(|k| k.to_string()).collect());
        }
        table
    }
}

impl CategoryTable {
    /// A table with no categories at all.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the keywords of `name`, or append it as a new category.
    pub fn set(&mut self, name: impl Into<String>, keywords: Vec<String>) {
        let name = name.into().to_lowercase();
        let keywords = keywords.into_iter().map(|k| k.to_lowercase()).collect();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = keywords,
            None => self.entries.push((name, keywords)),
        }
    }

    /// Apply every entry of `other` on top of this table.
    pub fn merge(&mut self, other: &CategoryTable) {
        for (name, keywords) in &other.entries {
            self.set(name.clone(), keywords.clone());
        }
    }

    /// Category for a single token, if any keyword matches.
    pub fn category_for(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| k == token))
            .map(|(name, _)| name.as_str())
    }

    /// Category names in table order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
