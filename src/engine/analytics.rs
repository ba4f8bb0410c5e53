//! Productivity analytics over a task and context snapshot.
//!
//! The aggregator never fails: an empty snapshot yields a zeroed
//! [`ProductivitySnapshot`] with a single `no_activity` insight.
//!
//! Task metrics are computed over tasks whose `created_at` falls in the
//! window. Completion-time metrics (streaks, peak hour, daily activity) look
//! at every task whose `completed_at` falls in the window, and the overdue
//! count is measured at the window end.

use crate::engine::context::derived_or_interpret;
use crate::engine::vocab::CategoryTable;
use crate::models::{ContextEntry, DateRange, Insight, Priority, Task, TaskStatus};
use chrono::{Duration, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Thresholds and weights for the analytics aggregator.
pub mod thresholds {
    /// Weight of the completion rate in the productivity score.
    pub const COMPLETION_WEIGHT: f64 = 0.5;
    /// Weight of the on-time ratio in the productivity score.
    pub const ON_TIME_WEIGHT: f64 = 0.3;
    /// Weight of normalized throughput in the productivity score.
    pub const THROUGHPUT_WEIGHT: f64 = 0.2;

    /// Completions per window treated as full throughput.
    pub const DEFAULT_THROUGHPUT_BASELINE: f64 = 10.0;

    /// Completion rate above which the high-completion insight fires.
    pub const HIGH_COMPLETION_RATE: f64 = 0.8;
    /// Completion rate below which the low-completion insight fires.
    pub const LOW_COMPLETION_RATE: f64 = 0.5;
    /// Share of high/urgent tasks above which the priority pattern fires.
    pub const HIGH_PRIORITY_SHARE: f64 = 0.6;
    /// Urgency indicators (summed over context) above which the urgent insight fires.
    pub const URGENT_INDICATOR_COUNT: usize = 3;
    /// Average sentiment below which the negative-sentiment insight fires.
    pub const NEGATIVE_SENTIMENT: f64 = -0.3;
    /// Minimum current streak (days) for the streak insight.
    pub const MIN_STREAK_DAYS: u32 = 3;
    /// Minimum completions in the busiest hour for the peak-hour insight.
    pub const MIN_PEAK_HOUR_COMPLETIONS: usize = 5;
}

/// Caller-supplied aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Completions per window that count as 100% throughput
    pub throughput_baseline: f64,
    /// Categories always present in the distribution, zero-filled
    pub known_categories: Vec<String>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            throughput_baseline: thresholds::DEFAULT_THROUGHPUT_BASELINE,
            known_categories: CategoryTable::default().names(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Cancelled => self.cancelled += 1,
        }
    }
}

/// Runs of consecutive calendar days with at least one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    /// Run ending at the window end (or the day before, if the end day is still empty)
    pub current: u32,
    pub longest: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHour {
    /// Hour of day, 0-23 (UTC)
    pub hour: u32,
    pub completions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub created: usize,
    pub completed: usize,
}

/// Aggregated productivity metrics for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivitySnapshot {
    pub window: DateRange,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub status_counts: StatusCounts,
    pub overdue_tasks: usize,
    /// `completed / total`, 0 when there are no tasks
    pub completion_rate: f64,
    /// On-time share of completed tasks that had a due date
    pub on_time_rate: Option<f64>,
    /// Completions relative to the baseline, clamped to [0, 1]
    pub throughput: f64,
    /// Weighted composite in [0, 100]
    pub productivity_score: f64,
    pub priority_distribution: BTreeMap<Priority, usize>,
    pub category_distribution: BTreeMap<String, usize>,
    pub uncategorized: usize,
    pub streaks: Streaks,
    pub average_completion_hours: Option<f64>,
    pub peak_hour: Option<PeakHour>,
    pub daily_activity: Vec<DailyActivity>,
    pub context_entries: usize,
    pub urgency_indicator_count: usize,
    pub average_sentiment: f64,
    #[serde(serialize_with = "crate::models::serialize_rendered")]
    pub insights: Vec<Insight>,
}

/// Aggregate tasks and context entries over `window`.
pub fn aggregate(
    tasks: &[Task],
    entries: &[ContextEntry],
    window: DateRange,
    options: &AggregateOptions,
) -> ProductivitySnapshot {
    let in_window: Vec<&Task> = tasks
        .iter()
        .filter(|t| window.contains(t.created_at))
        .collect();
    let total_tasks = in_window.len();

    let mut status_counts = StatusCounts::default();
    let mut priority_distribution: BTreeMap<Priority, usize> =
        Priority::ALL.iter().map(|p| (*p, 0)).collect();
    let mut category_distribution: BTreeMap<String, usize> = options
        .known_categories
        .iter()
        .map(|c| (c.clone(), 0))
        .collect();
    let mut uncategorized = 0;

    for task in &in_window {
        status_counts.record(task.status);
        *priority_distribution.entry(task.priority).or_insert(0) += 1;
        match &task.category {
            Some(category) => *category_distribution.entry(category.clone()).or_insert(0) += 1,
            None => uncategorized += 1,
        }
    }

    let completed: Vec<&Task> = in_window
        .iter()
        .copied()
        .filter(|t| t.status == TaskStatus::Completed)
        .collect();
    let completed_tasks = completed.len();
    let completion_rate = ratio(completed_tasks, total_tasks);

    let dated: Vec<&Task> = completed
        .iter()
        .copied()
        .filter(|t| t.due_date.is_some())
        .collect();
    let on_time_rate = (!dated.is_empty()).then(|| {
        let on_time = dated
            .iter()
            .filter(|t| {
                matches!((t.completed_at, t.due_date), (Some(done), Some(due)) if done <= due)
            })
            .count();
        ratio(on_time, dated.len())
    });

    let throughput = if options.throughput_baseline > 0.0 {
        (completed_tasks as f64 / options.throughput_baseline).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let productivity_score = 100.0
        * (thresholds::COMPLETION_WEIGHT * completion_rate.clamp(0.0, 1.0)
            + thresholds::ON_TIME_WEIGHT * on_time_rate.unwrap_or(0.0).clamp(0.0, 1.0)
            + thresholds::THROUGHPUT_WEIGHT * throughput);

    let overdue_tasks = tasks
        .iter()
        .filter(|t| t.created_at <= window.end && t.is_overdue(window.end))
        .count();

    let completion_hours: Vec<f64> = completed
        .iter()
        .filter_map(|t| t.completed_at.map(|done| done - t.created_at))
        .map(|d| d.num_seconds().max(0) as f64 / 3600.0)
        .collect();
    let average_completion_hours = (!completion_hours.is_empty())
        .then(|| completion_hours.iter().sum::<f64>() / completion_hours.len() as f64);

    // Completion-time metrics
    let completion_times: Vec<_> = tasks
        .iter()
        .filter_map(|t| t.completed_at)
        .filter(|done| window.contains(*done))
        .collect();
    let completion_days: BTreeSet<NaiveDate> =
        completion_times.iter().map(|t| t.date_naive()).collect();
    let streaks = streaks(&completion_days, window);
    let peak_hour = peak_hour(completion_times.iter().map(|t| t.hour()));

    let daily_activity = window
        .calendar_days()
        .into_iter()
        .map(|date| DailyActivity {
            date,
            created: in_window
                .iter()
                .filter(|t| t.created_at.date_naive() == date)
                .count(),
            completed: completion_times
                .iter()
                .filter(|t| t.date_naive() == date)
                .count(),
        })
        .collect();

    let context: Vec<_> = entries
        .iter()
        .filter(|e| window.contains(e.timestamp))
        .map(derived_or_interpret)
        .collect();
    let urgency_indicator_count = context.iter().map(|d| d.urgency_indicators.len()).sum();
    let average_sentiment = if context.is_empty() {
        0.0
    } else {
        context.iter().map(|d| d.sentiment_score).sum::<f64>() / context.len() as f64
    };

    let mut snapshot = ProductivitySnapshot {
        window,
        total_tasks,
        completed_tasks,
        status_counts,
        overdue_tasks,
        completion_rate,
        on_time_rate,
        throughput,
        productivity_score,
        priority_distribution,
        category_distribution,
        uncategorized,
        streaks,
        average_completion_hours,
        peak_hour,
        daily_activity,
        context_entries: context.len(),
        urgency_indicator_count,
        average_sentiment,
        insights: Vec::new(),
    };
    snapshot.insights = insights(&snapshot);

    tracing::debug!(
        tasks = snapshot.total_tasks,
        completed = snapshot.completed_tasks,
        entries = snapshot.context_entries,
        score = snapshot.productivity_score,
        insights = snapshot.insights.len(),
        "aggregated productivity snapshot"
    );
    snapshot
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn streaks(days: &BTreeSet<NaiveDate>, window: DateRange) -> Streaks {
    let mut longest = 0;
    let mut run = 0;
    for day in window.calendar_days() {
        if days.contains(&day) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    let first = window.start.date_naive();
    let mut day = window.end.date_naive();
    if !days.contains(&day) {
        day -= Duration::days(1);
    }
    let mut current = 0;
    while day >= first && days.contains(&day) {
        current += 1;
        day -= Duration::days(1);
    }

    Streaks { current, longest }
}

/// Busiest completion hour; ties go to the earliest hour.
fn peak_hour(hours: impl Iterator<Item = u32>) -> Option<PeakHour> {
    let mut counts = [0usize; 24];
    for hour in hours {
        if let Some(slot) = counts.get_mut(hour as usize) {
            *slot += 1;
        }
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .fold(None, |best: Option<PeakHour>, (hour, count)| match best {
            Some(b) if b.completions >= *count => Some(b),
            _ => Some(PeakHour {
                hour: hour as u32,
                completions: *count,
            }),
        })
}

fn insights(snapshot: &ProductivitySnapshot) -> Vec<Insight> {
    let mut out = Vec::new();
    let has_tasks = snapshot.total_tasks > 0;

    if has_tasks && snapshot.completion_rate > thresholds::HIGH_COMPLETION_RATE {
        out.push(Insight::HighCompletion {
            completion_rate: snapshot.completion_rate,
        });
    }
    if has_tasks && snapshot.completion_rate < thresholds::LOW_COMPLETION_RATE {
        out.push(Insight::LowCompletion {
            completion_rate: snapshot.completion_rate,
        });
    }

    let high = snapshot.priority_distribution.get(&Priority::High).copied().unwrap_or(0)
        + snapshot.priority_distribution.get(&Priority::Urgent).copied().unwrap_or(0);
    let share = ratio(high, snapshot.total_tasks);
    if share > thresholds::HIGH_PRIORITY_SHARE {
        out.push(Insight::HighPriorityPattern { share });
    }

    if snapshot.overdue_tasks > 0 {
        out.push(Insight::OverdueBacklog {
            count: snapshot.overdue_tasks,
        });
    }
    if snapshot.urgency_indicator_count > thresholds::URGENT_INDICATOR_COUNT {
        out.push(Insight::UrgentContext {
            indicator_count: snapshot.urgency_indicator_count,
        });
    }
    if snapshot.context_entries > 0 && snapshot.average_sentiment < thresholds::NEGATIVE_SENTIMENT
    {
        out.push(Insight::NegativeSentiment {
            average: snapshot.average_sentiment,
        });
    }
    if snapshot.streaks.current >= thresholds::MIN_STREAK_DAYS {
        out.push(Insight::Streak {
            days: snapshot.streaks.current,
        });
    }
    if let Some(peak) = snapshot.peak_hour {
        if peak.completions >= thresholds::MIN_PEAK_HOUR_COMPLETIONS {
            out.push(Insight::PeakHour {
                hour: peak.hour,
                completions: peak.completions,
            });
        }
    }
    if !has_tasks {
        out.push(Insight::NoActivity);
    }
    out
}
