//! Priority and scheduling order for tasks.
//!
//! Ordering criteria, highest first:
//! 1. Overdue tasks before everything else, most overdue first
//! 2. Priority rank, descending
//! 3. Due date ascending, undated tasks last
//! 4. `created_at` ascending, then id, so the order is total

use crate::models::Task;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Days ahead that still count as upcoming.
pub const UPCOMING_DAYS: i64 = 7;

/// Compare two tasks by scheduling order at `now`.
pub fn compare(a: &Task, b: &Task, now: DateTime<Utc>) -> Ordering {
    let a_overdue = a.is_overdue(now);
    let b_overdue = b.is_overdue(now);

    b_overdue
        .cmp(&a_overdue)
        .then_with(|| {
            if a_overdue && b_overdue {
                // Earlier due date means more overdue.
                a.due_date.cmp(&b.due_date)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Return the tasks in scheduling order. The input is not modified.
pub fn rank(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut ranked = tasks.to_vec();
    ranked.sort_by(|a, b| compare(a, b, now));
    tracing::debug!(
        count = ranked.len(),
        overdue = ranked.iter().filter(|t| t.is_overdue(now)).count(),
        "ranked tasks"
    );
    ranked
}

/// Scheduling bucket for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Today,
    Upcoming,
    Overdue,
    None,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Today => "today",
            Bucket::Upcoming => "upcoming",
            Bucket::Overdue => "overdue",
            Bucket::None => "none",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which bucket `task` falls in at `now`.
///
/// Overdue wins over today, so a task due earlier today is overdue.
pub fn bucket(task: &Task, now: DateTime<Utc>) -> Bucket {
    if task.is_overdue(now) {
        return Bucket::Overdue;
    }
    match task.due_date {
        Some(due) if due.date_naive() == now.date_naive() => Bucket::Today,
        Some(due) if due >= now && due <= now + Duration::days(UPCOMING_DAYS) => Bucket::Upcoming,
        _ => Bucket::None,
    }
}

/// Active tasks grouped by bucket, each group in rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub overdue: Vec<Task>,
    pub today: Vec<Task>,
    pub upcoming: Vec<Task>,
    /// Undated or due further out than the upcoming horizon
    pub later: Vec<Task>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.overdue.len() + self.today.len() + self.upcoming.len() + self.later.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group pending and in-progress tasks into a plan for `now`.
pub fn plan(tasks: &[Task], now: DateTime<Utc>) -> Plan {
    let active: Vec<Task> = tasks
        .iter()
        .filter(|t| t.status.is_active())
        .cloned()
        .collect();

    let mut plan = Plan::default();
    for task in rank(&active, now) {
        match bucket(&task, now) {
            Bucket::Overdue => plan.overdue.push(task),
            Bucket::Today => plan.today.push(task),
            Bucket::Upcoming => plan.upcoming.push(task),
            Bucket::None => plan.later.push(task),
        }
    }
    plan
}
