//! Command implementations for the Taskwise CLI.
//!
//! This module contains the business logic for each CLI command.
//! Commands are organized by entity type:
//! - `init` - Create the data directory
//! - `capture` / `task_*` - Task capture and management
//! - `rank` / `plan` - Ordering views
//! - `context_*` - Context entries and task suggestions
//! - `analytics` - Productivity snapshot
//! - `config_*` - Configuration inspection and updates
//!
//! Store-backed commands are generic over the storage traits, so they run
//! the same against the JSONL store and the in-memory store.

use crate::config::{self, ResolvedConfig};
use crate::engine::{
    self, Bucket, ContextInterpreter, Extractor, Plan, ProductivitySnapshot, RuleExtractor,
    SuggestedTask,
};
use crate::models::{
    ContextDerived, ContextEntry, DateRange, PartialTask, Priority, SourceType, Task, TaskSource,
    TaskStatus, parse_timestamp,
};
use crate::storage::{
    CONTEXT_PREFIX, ContextStore, JsonlStore, TASK_PREFIX, TaskStore, generate_unique_id,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Resolve an optional `--now` argument; absent means the current time.
pub fn reference_time(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(value) => parse_timestamp("now", value),
        None => Ok(Utc::now()),
    }
}

/// One-line summary of a task for human output.
fn task_line(task: &Task) -> String {
    let mut line = format!("{} [{}] {}", task.id, task.priority, task.title);
    if task.status != TaskStatus::Pending {
        line.push_str(&format!(" ({})", task.status));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d %H:%M")));
    }
    if let Some(ref category) = task.category {
        line.push_str(&format!(" #{}", category));
    }
    line
}

fn task_details(task: &Task) -> String {
    let mut lines = vec![
        format!("{} {}", task.id, task.title),
        format!("  Status: {}", task.status),
        format!("  Priority: {}", task.priority),
    ];
    if let Some(ref category) = task.category {
        lines.push(format!("  Category: {}", category));
    }
    if let Some(due) = task.due_date {
        lines.push(format!("  Due: {}", due.format("%Y-%m-%d %H:%M UTC")));
    }
    if let Some(minutes) = task.estimated_duration_minutes {
        lines.push(format!("  Estimate: {} min", minutes));
    }
    if !task.tags.is_empty() {
        let tags: Vec<&str> = task.tags.iter().map(String::as_str).collect();
        lines.push(format!("  Tags: {}", tags.join(", ")));
    }
    if let Some(ref description) = task.description {
        lines.push(format!("  Description: {}", description));
    }
    lines.push(format!("  Source: {}", task.source));
    lines.push(format!(
        "  Created: {}",
        task.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(completed) = task.completed_at {
        lines.push(format!(
            "  Completed: {}",
            completed.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    if let Some(ref insight) = task.ai_insight {
        lines.push(format!("  {}", insight));
    }
    lines.join("\n")
}

fn existing_task_ids<S: TaskStore>(store: &S) -> Result<BTreeSet<String>> {
    Ok(store.list()?.into_iter().map(|t| t.id).collect())
}

// === Init ===

#[derive(Serialize)]
pub struct InitResult {
    pub data_dir: String,
    /// False when the store already existed
    pub created: bool,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.created {
            format!("Initialized taskwise in {}", self.data_dir)
        } else {
            format!("Taskwise already initialized in {}", self.data_dir)
        }
    }
}

/// Create the data directory and empty stores. Safe to run twice.
pub fn init(data_dir: &Path) -> Result<InitResult> {
    let created = !JsonlStore::exists(data_dir);
    JsonlStore::init(data_dir)?;
    Ok(InitResult {
        data_dir: data_dir.display().to_string(),
        created,
    })
}

// === Capture ===

/// Raw capture arguments, as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct CaptureInput {
    pub text: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due: Option<String>,
    pub duration: Option<u32>,
    pub tags: Vec<String>,
    pub voice: bool,
}

impl CaptureInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Parse the explicit values into assembler overrides.
    fn to_partial(&self) -> Result<PartialTask> {
        let priority = self
            .priority
            .as_deref()
            .map(Priority::from_str)
            .transpose()?;
        let due_date = self
            .due
            .as_deref()
            .map(|d| parse_timestamp("due", d))
            .transpose()?;
        let tags = (!self.tags.is_empty()).then(|| {
            self.tags
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        });
        Ok(PartialTask {
            title: self.title.clone(),
            description: self.description.clone(),
            priority,
            category: self.category.clone(),
            due_date,
            estimated_duration_minutes: self.duration,
            tags,
            source: Some(if self.voice {
                TaskSource::Voice
            } else {
                TaskSource::Manual
            }),
            ..Default::default()
        })
    }
}

#[derive(Serialize)]
pub struct CaptureResult {
    pub task: Task,
    /// Rules that fired during extraction
    pub reasons: Vec<String>,
}

impl Output for CaptureResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!("Captured {}", task_line(&self.task));
        for reason in &self.reasons {
            out.push_str(&format!("\n  - {}", reason));
        }
        out
    }
}

/// Turn captured text into a stored task.
///
/// Pipeline: normalize, extract with the configured tables, derive a title
/// when none was given, assemble with explicit values winning, save.
pub fn capture<S: TaskStore>(
    store: &mut S,
    config: &ResolvedConfig,
    input: CaptureInput,
    now: DateTime<Utc>,
) -> Result<CaptureResult> {
    let normalized = engine::normalize(&input.text)?;
    let extractor = RuleExtractor::new(config.extractor_config());
    let extracted = extractor.extract(&normalized, now);

    let mut overrides = input.to_partial()?;
    if overrides.title.is_none() {
        let source = overrides.source.unwrap_or_default();
        overrides.title = Some(engine::suggest_title(
            &input.text,
            engine::fallback_title(source),
        ));
    }

    let taken = existing_task_ids(&*store)?;
    let id = generate_unique_id(TASK_PREFIX, &input.text, |id| taken.contains(id));
    let task = engine::assemble(&extracted, overrides, &config.task_defaults(), id, now)?;
    store.save(&task)?;

    Ok(CaptureResult {
        task,
        reasons: extracted.reasons,
    })
}

// === Tasks ===

/// Filters for `task list`. Unset filters match everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

#[derive(Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub count: usize,
}

impl Output for TaskList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks found.".to_string();
        }
        let mut lines = vec![format!("{} task(s):", self.count)];
        lines.extend(self.tasks.iter().map(|t| format!("  {}", task_line(t))));
        lines.join("\n")
    }
}

/// List tasks in storage order.
pub fn task_list<S: TaskStore>(store: &S, filter: &TaskFilter) -> Result<TaskList> {
    let status = filter
        .status
        .as_deref()
        .map(TaskStatus::from_str)
        .transpose()?;
    let priority = filter
        .priority
        .as_deref()
        .map(Priority::from_str)
        .transpose()?;
    let category = filter.category.as_deref().map(str::to_lowercase);
    let tag = filter.tag.as_deref().map(str::to_lowercase);

    let tasks: Vec<Task> = store
        .list()?
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| priority.is_none_or(|p| t.priority == p))
        .filter(|t| {
            category
                .as_deref()
                .is_none_or(|c| t.category.as_deref().map(str::to_lowercase).as_deref() == Some(c))
        })
        .filter(|t| tag.as_deref().is_none_or(|tag| t.tags.contains(tag)))
        .collect();

    Ok(TaskList {
        count: tasks.len(),
        tasks,
    })
}

#[derive(Serialize)]
pub struct TaskShowResult {
    #[serde(flatten)]
    pub task: Task,
    pub overdue: bool,
    pub bucket: Bucket,
}

impl Output for TaskShowResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut out = task_details(&self.task);
        if self.overdue {
            out.push_str("\n  OVERDUE");
        } else if self.bucket != Bucket::None {
            out.push_str(&format!("\n  Bucket: {}", self.bucket));
        }
        out
    }
}

pub fn task_show<S: TaskStore>(store: &S, id: &str, now: DateTime<Utc>) -> Result<TaskShowResult> {
    let task = store.get(id)?;
    Ok(TaskShowResult {
        overdue: task.is_overdue(now),
        bucket: engine::bucket(&task, now),
        task,
    })
}

#[derive(Serialize)]
pub struct TaskStatusResult {
    pub task: Task,
    pub previous_status: TaskStatus,
}

impl Output for TaskStatusResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!(
            "{} {} -> {}",
            self.task.id, self.previous_status, self.task.status
        )
    }
}

/// Move a task to a new status and persist it.
pub fn task_status<S: TaskStore>(
    store: &mut S,
    id: &str,
    status: &str,
    now: DateTime<Utc>,
) -> Result<TaskStatusResult> {
    let status = TaskStatus::from_str(status)?;
    let task = store.get(id)?;
    let updated = task.transition(status, now);
    store.save(&updated)?;
    Ok(TaskStatusResult {
        previous_status: task.status,
        task: updated,
    })
}

#[derive(Serialize)]
pub struct TaskDeleteResult {
    pub id: String,
    pub deleted: bool,
}

impl Output for TaskDeleteResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted {}", self.id)
    }
}

pub fn task_delete<S: TaskStore>(store: &mut S, id: &str) -> Result<TaskDeleteResult> {
    store.delete(id)?;
    Ok(TaskDeleteResult {
        id: id.to_string(),
        deleted: true,
    })
}

// === Rank / plan ===

#[derive(Serialize)]
pub struct RankedTask {
    pub position: usize,
    pub bucket: Bucket,
    #[serde(flatten)]
    pub task: Task,
}

#[derive(Serialize)]
pub struct RankResult {
    pub now: DateTime<Utc>,
    pub tasks: Vec<RankedTask>,
}

impl Output for RankResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "Nothing to rank.".to_string();
        }
        self.tasks
            .iter()
            .map(|r| {
                let marker = if r.bucket == Bucket::Overdue { " !" } else { "" };
                format!("{:>3}. {}{}", r.position, task_line(&r.task), marker)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rank tasks. Without `include_closed` only pending and in-progress tasks are shown.
pub fn rank<S: TaskStore>(
    store: &S,
    include_closed: bool,
    now: DateTime<Utc>,
) -> Result<RankResult> {
    let tasks: Vec<Task> = store
        .list()?
        .into_iter()
        .filter(|t| include_closed || t.status.is_active())
        .collect();
    let tasks = engine::rank(&tasks, now)
        .into_iter()
        .enumerate()
        .map(|(i, task)| RankedTask {
            position: i + 1,
            bucket: engine::bucket(&task, now),
            task,
        })
        .collect();
    Ok(RankResult { now, tasks })
}

#[derive(Serialize)]
pub struct PlanResult {
    pub now: DateTime<Utc>,
    #[serde(flatten)]
    pub plan: Plan,
}

impl Output for PlanResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.plan.is_empty() {
            return "Nothing planned. Capture a task with `tw capture`.".to_string();
        }
        let groups = [
            ("Overdue", &self.plan.overdue),
            ("Today", &self.plan.today),
            ("Upcoming", &self.plan.upcoming),
            ("Later", &self.plan.later),
        ];
        let mut lines = Vec::new();
        for (name, tasks) in groups {
            if tasks.is_empty() {
                continue;
            }
            lines.push(format!("{} ({}):", name, tasks.len()));
            lines.extend(tasks.iter().map(|t| format!("  {}", task_line(t))));
        }
        lines.join("\n")
    }
}

pub fn plan<S: TaskStore>(store: &S, now: DateTime<Utc>) -> Result<PlanResult> {
    let tasks = store.list()?;
    Ok(PlanResult {
        now,
        plan: engine::plan(&tasks, now),
    })
}

// === Context ===

#[derive(Serialize)]
pub struct ContextEntryResult {
    pub entry: ContextEntry,
    pub derived: ContextDerived,
}

impl Output for ContextEntryResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "{} [{}] {}",
                self.entry.id,
                self.entry.source_type,
                self.entry.timestamp.format("%Y-%m-%d %H:%M UTC")
            ),
            format!("  {}", self.entry.content),
        ];
        if !self.derived.keywords.is_empty() {
            lines.push(format!("  Keywords: {}", self.derived.keywords.join(", ")));
        }
        if !self.derived.urgency_indicators.is_empty() {
            lines.push(format!(
                "  Urgency: {}",
                self.derived.urgency_indicators.join(", ")
            ));
        }
        if !self.derived.deadline_mentions.is_empty() {
            lines.push(format!(
                "  Deadlines: {}",
                self.derived.deadline_mentions.join(", ")
            ));
        }
        lines.push(format!("  Sentiment: {:.2}", self.derived.sentiment_score));
        lines.join("\n")
    }
}

/// Store a context entry together with its interpretation.
pub fn context_add<S: ContextStore>(
    store: &mut S,
    config: &ResolvedConfig,
    content: &str,
    source: &str,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ContextEntryResult> {
    if content.trim().is_empty() {
        return Err(Error::invalid_input("content", content));
    }
    let source_type = SourceType::from_str(source)?;

    let taken: BTreeSet<String> = store.list_context()?.into_iter().map(|e| e.id).collect();
    let id = generate_unique_id(CONTEXT_PREFIX, content, |id| taken.contains(id));
    let entry = ContextEntry::new(id, content, source_type, timestamp);

    let derived = ContextInterpreter::new(config.interpreter_config()).interpret(&entry);
    let entry = entry.with_derived(derived.clone(), now);
    store.save_context(&entry)?;

    Ok(ContextEntryResult { entry, derived })
}

#[derive(Serialize)]
pub struct ContextList {
    pub entries: Vec<ContextEntry>,
    pub count: usize,
}

impl Output for ContextList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No context entries.".to_string();
        }
        let mut lines = vec![format!("{} context entr(ies):", self.count)];
        for entry in &self.entries {
            let urgent = entry
                .derived
                .as_ref()
                .is_some_and(|d| !d.urgency_indicators.is_empty());
            lines.push(format!(
                "  {} [{}]{} {}",
                entry.id,
                entry.source_type,
                if urgent { " !" } else { "" },
                entry.content.lines().next().unwrap_or_default()
            ));
        }
        lines.join("\n")
    }
}

pub fn context_list<S: ContextStore>(store: &S) -> Result<ContextList> {
    let entries = store.list_context()?;
    Ok(ContextList {
        count: entries.len(),
        entries,
    })
}

/// Show an entry; entries stored without a snapshot are interpreted on the fly.
pub fn context_show<S: ContextStore>(
    store: &S,
    config: &ResolvedConfig,
    id: &str,
) -> Result<ContextEntryResult> {
    let entry = store.get_context(id)?;
    let derived = match entry.derived {
        Some(ref derived) => derived.clone(),
        None => ContextInterpreter::new(config.interpreter_config()).interpret(&entry),
    };
    Ok(ContextEntryResult { entry, derived })
}

#[derive(Serialize)]
pub struct ContextSuggestResult {
    pub entry_id: String,
    pub suggestions: Vec<SuggestedTask>,
    /// Tasks saved from the suggestions (only with `--create`)
    pub created: Vec<Task>,
}

impl Output for ContextSuggestResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.suggestions.is_empty() {
            return format!("No actionable sentences in {}.", self.entry_id);
        }
        let mut lines = vec![format!(
            "{} suggestion(s) from {}:",
            self.suggestions.len(),
            self.entry_id
        )];
        for suggestion in &self.suggestions {
            let priority = suggestion
                .attributes
                .priority
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!("  [{}] {}", priority, suggestion.title));
        }
        for task in &self.created {
            lines.push(format!("Created {}", task_line(task)));
        }
        lines.join("\n")
    }
}

/// Suggest tasks from a context entry, optionally saving them.
pub fn context_suggest<S: TaskStore + ContextStore>(
    store: &mut S,
    config: &ResolvedConfig,
    id: &str,
    create: bool,
    reference_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<ContextSuggestResult> {
    let entry = store.get_context(id)?;
    let extractor = RuleExtractor::new(config.extractor_config());
    let suggestions =
        engine::suggest_tasks(&entry, reference_time.unwrap_or(entry.timestamp), &extractor);

    let mut created = Vec::new();
    if create {
        let defaults = config.task_defaults();
        let mut taken = existing_task_ids(&*store)?;
        // Assemble everything before saving so a bad suggestion saves nothing.
        for suggestion in &suggestions {
            let id = generate_unique_id(TASK_PREFIX, &suggestion.description, |id| {
                taken.contains(id)
            });
            let task = engine::assemble(
                &suggestion.attributes,
                suggestion.to_partial(),
                &defaults,
                id,
                now,
            )?;
            taken.insert(task.id.clone());
            created.push(task);
        }
        for task in &created {
            store.save(task)?;
        }
    }

    Ok(ContextSuggestResult {
        entry_id: entry.id,
        suggestions,
        created,
    })
}

// === Analytics ===

#[derive(Debug, Serialize)]
pub struct AnalyticsResult {
    #[serde(flatten)]
    pub snapshot: ProductivitySnapshot,
}

impl Output for AnalyticsResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let s = &self.snapshot;
        let mut lines = vec![
            format!(
                "Productivity {} to {}",
                s.window.start.format("%Y-%m-%d"),
                s.window.end.format("%Y-%m-%d")
            ),
            format!("  Score: {:.0}/100", s.productivity_score),
            format!(
                "  Tasks: {} created, {} completed ({:.1}%)",
                s.total_tasks,
                s.completed_tasks,
                s.completion_rate * 100.0
            ),
        ];
        if let Some(on_time) = s.on_time_rate {
            lines.push(format!("  On time: {:.1}%", on_time * 100.0));
        }
        if s.overdue_tasks > 0 {
            lines.push(format!("  Overdue: {}", s.overdue_tasks));
        }
        if s.streaks.longest > 0 {
            lines.push(format!(
                "  Streak: {} day(s), longest {}",
                s.streaks.current, s.streaks.longest
            ));
        }
        if !s.priority_distribution.is_empty() {
            let parts: Vec<String> = s
                .priority_distribution
                .iter()
                .rev()
                .map(|(p, n)| format!("{} {}", p, n))
                .collect();
            lines.push(format!("  Priorities: {}", parts.join(", ")));
        }
        if !s.category_distribution.is_empty() {
            let parts: Vec<String> = s
                .category_distribution
                .iter()
                .map(|(c, n)| format!("{} {}", c, n))
                .collect();
            lines.push(format!("  Categories: {}", parts.join(", ")));
        }
        if !s.insights.is_empty() {
            lines.push("Insights:".to_string());
            for insight in &s.insights {
                lines.push(format!("  * {}: {}", insight.title(), insight.message()));
            }
        }
        lines.join("\n")
    }
}

/// Productivity snapshot over the `days` days ending at `now`.
pub fn analytics<S: TaskStore + ContextStore>(
    store: &S,
    config: &ResolvedConfig,
    days: u32,
    now: DateTime<Utc>,
) -> Result<AnalyticsResult> {
    let tasks = store.list()?;
    let entries = store.list_context()?;
    let window = DateRange::last_days(now, days)?;
    Ok(AnalyticsResult {
        snapshot: engine::aggregate(&tasks, &entries, window, &config.aggregate_options()),
    })
}

// === Config ===

#[derive(Serialize)]
pub struct ConfigShowResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_path: Option<String>,
    pub session_path: String,
    pub config: ResolvedConfig,
}

impl Output for ConfigShowResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let c = &self.config;
        let mut lines = vec![
            format!(
                "default-priority = {} ({})",
                c.default_priority.value, c.default_priority.source
            ),
            format!(
                "keyword-limit = {} ({})",
                c.keyword_limit.value, c.keyword_limit.source
            ),
            format!(
                "throughput-baseline = {} ({})",
                c.throughput_baseline.value, c.throughput_baseline.source
            ),
            format!(
                "estimate-duration = {} ({})",
                c.estimate_duration.value, c.estimate_duration.source
            ),
            format!(
                "default-duration = {} ({})",
                c.default_duration.value, c.default_duration.source
            ),
            format!(
                "strict-categories = {} ({})",
                c.strict_categories.value, c.strict_categories.source
            ),
            format!("categories ({}):", c.categories.source),
        ];
        for (name, keywords) in c.categories.value.entries() {
            lines.push(format!("  {}: {}", name, keywords.join(", ")));
        }
        lines.push(format!("Session config: {}", self.session_path));
        if let Some(ref path) = self.system_path {
            lines.push(format!("System config: {}", path));
        }
        lines.join("\n")
    }
}

pub fn config_show(data_dir: &Path, config: ResolvedConfig) -> ConfigShowResult {
    ConfigShowResult {
        system_path: config::system_config_path().map(|p| p.display().to_string()),
        session_path: config::session_config_path(data_dir).display().to_string(),
        config,
    }
}

#[derive(Serialize)]
pub struct ConfigSetResult {
    pub key: String,
    pub value: String,
    pub path: String,
}

impl Output for ConfigSetResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path)
    }
}

/// Set a key in the data-directory config.kdl.
pub fn config_set(data_dir: &Path, key: &str, value: &str) -> Result<ConfigSetResult> {
    let path = config::session_config_path(data_dir);
    let mut session = config::read_config(&path)?;
    session.set(key, value).map_err(Error::Config)?;
    config::write_config(&path, &session)?;
    Ok(ConfigSetResult {
        key: key.to_string(),
        value: value.to_string(),
        path: path.display().to_string(),
    })
}
