//! Data models for Taskwise entities.
//!
//! This module defines the core data structures:
//! - `Task` - Work items with priority, status, category, due date and tags
//! - `ContextEntry` - Externally sourced notes (emails, messages, notes)
//! - `PartialTask` / `TaskDefaults` - Inputs to the task assembler
//! - `DateRange` - Analytics window
//!
//! Closed enumerations parse from their snake_case string form and fail with
//! [`Error::UnrecognizedEnumValue`] on anything else.

pub mod insight;

pub use insight::{Insight, InsightKind, serialize_rendered};

use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Task priority. Variant order matches rank (`Low` lowest).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Numeric rank used for ordering (`urgent` = 3 ... `low` = 0).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 3,
            Priority::High => 2,
            Priority::Medium => 1,
            Priority::Low => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(Error::unrecognized("priority", s)),
        }
    }
}

/// Task status in the workflow.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Pending or in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(Error::unrecognized("status", s)),
        }
    }
}

/// How a task came into existence. Audit only, never used for ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    #[default]
    Manual,
    Voice,
    Extracted,
}

impl TaskSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskSource::Manual => "manual",
            TaskSource::Voice => "voice",
            TaskSource::Extracted => "extracted",
        }
    }
}

impl fmt::Display for TaskSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(TaskSource::Manual),
            "voice" => Ok(TaskSource::Voice),
            "extracted" => Ok(TaskSource::Extracted),
            _ => Err(Error::unrecognized("source", s)),
        }
    }
}

/// Where a context entry was captured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Whatsapp,
    Email,
    Notes,
    Calendar,
    #[default]
    Other,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Whatsapp => "whatsapp",
            SourceType::Email => "email",
            SourceType::Notes => "notes",
            SourceType::Calendar => "calendar",
            SourceType::Other => "other",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" => Ok(SourceType::Whatsapp),
            "email" => Ok(SourceType::Email),
            "notes" => Ok(SourceType::Notes),
            "calendar" => Ok(SourceType::Calendar),
            "other" => Ok(SourceType::Other),
            _ => Err(Error::unrecognized("source_type", s)),
        }
    }
}

/// A unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (e.g., "tw-a1b2")
    pub id: String,

    /// Short title, never empty
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: TaskStatus,

    /// Open label set (work, personal, health, learning, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<u32>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Set if and only if `status == Completed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub source: TaskSource,

    /// Explanation of how the attributes were inferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
}

impl Task {
    /// Create a pending, medium-priority task.
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            status: TaskStatus::default(),
            category: None,
            due_date: None,
            estimated_duration_minutes: None,
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
            source: TaskSource::default(),
            ai_insight: None,
        }
    }

    /// Due in the past and not completed. Derived, never stored.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Return a copy moved to `status`.
    ///
    /// `completed_at` is stamped on entry into `Completed` and cleared when
    /// leaving it; re-completing an already completed task keeps the original
    /// stamp.
    pub fn transition(&self, status: TaskStatus, now: DateTime<Utc>) -> Task {
        let mut next = self.clone();
        next.completed_at = match (self.status, status) {
            (TaskStatus::Completed, TaskStatus::Completed) => self.completed_at.or(Some(now)),
            (_, TaskStatus::Completed) => Some(now),
            _ => None,
        };
        next.status = status;
        next.updated_at = now;
        next
    }
}

/// Values derived from a context entry by the context interpreter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextDerived {
    /// Most frequent non-stopword tokens, most frequent first
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Matched urgency phrases, in order of appearance
    #[serde(default)]
    pub urgency_indicators: Vec<String>,

    /// Lexicon polarity in [-1, 1]
    #[serde(default)]
    pub sentiment_score: f64,

    /// Relative dates, weekdays and ISO dates mentioned
    #[serde(default)]
    pub deadline_mentions: Vec<String>,
}

/// A captured, externally sourced note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Unique identifier (e.g., "twc-a1b2")
    pub id: String,

    pub content: String,

    #[serde(default)]
    pub source_type: SourceType,

    pub timestamp: DateTime<Utc>,

    /// Snapshot from the last interpretation, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived: Option<ContextDerived>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl ContextEntry {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        source_type: SourceType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            source_type,
            timestamp,
            derived: None,
            processed_at: None,
        }
    }

    /// Return a copy carrying a fresh derived snapshot. The receiver is untouched.
    pub fn with_derived(&self, derived: ContextDerived, processed_at: DateTime<Utc>) -> Self {
        Self {
            derived: Some(derived),
            processed_at: Some(processed_at),
            ..self.clone()
        }
    }
}

/// Explicit caller-supplied task values. Every `Some` wins over inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_duration_minutes: Option<u32>,
    pub tags: Option<BTreeSet<String>>,
    pub source: Option<TaskSource>,
    pub ai_insight: Option<String>,
}

impl PartialTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// System defaults applied when neither the caller nor the extractor set a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefaults {
    pub priority: Priority,
    pub status: TaskStatus,
    pub source: TaskSource,
    pub estimated_duration_minutes: Option<u32>,
    /// When set, categories outside this set are rejected (strict mode)
    pub allowed_categories: Option<BTreeSet<String>>,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            source: TaskSource::Manual,
            estimated_duration_minutes: None,
            allowed_categories: None,
        }
    }
}

/// Longest analytics window, in days.
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Inclusive time window for analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(Error::validation(
                "window",
                format!("start {} is after end {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending at `end`, at most [`MAX_WINDOW_DAYS`] long.
    pub fn last_days(end: DateTime<Utc>, days: u32) -> Result<Self> {
        if days > MAX_WINDOW_DAYS {
            return Err(Error::validation(
                "days",
                format!("window of {} days exceeds {}", days, MAX_WINDOW_DAYS),
            ));
        }
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| Error::validation("days", format!("{} days before {}", days, end)))?;
        Self::new(start, end)
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    /// Calendar days touched by the window, oldest first.
    pub fn calendar_days(&self) -> Vec<NaiveDate> {
        let last = self.end.date_naive();
        self.start
            .date_naive()
            .iter_days()
            .take_while(|d| *d <= last)
            .collect()
    }
}

/// Parse an ISO-8601 boundary timestamp.
///
/// Accepts RFC 3339 (`2025-07-07T09:00:00Z`), naive date-times which are taken
/// as UTC (`2025-07-07T09:00:00`, `2025-07-07T09:00`, `2025-07-07 09:00:00`) and
/// bare dates (`2025-07-07`, midnight UTC).
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(Error::invalid_input(field, value))
}
