//! Task assembly from extracted attributes, caller overrides and defaults.
//!
//! Resolution per field: `overrides` > `extracted` > `defaults`. Assembly is
//! atomic: either a complete task comes back or an error naming the field.

use crate::engine::extract::ExtractedAttributes;
use crate::models::{PartialTask, Task, TaskDefaults, TaskStatus};
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Build a complete task.
///
/// `id` and `now` are supplied by the caller so assembly stays pure. The
/// title is kept verbatim; it only has to be non-blank.
pub fn assemble(
    extracted: &ExtractedAttributes,
    overrides: PartialTask,
    defaults: &TaskDefaults,
    id: impl Into<String>,
    now: DateTime<Utc>,
) -> Result<Task> {
    let title = match overrides.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err(Error::validation("title", "title required")),
    };

    let estimated_duration_minutes = match overrides.estimated_duration_minutes {
        Some(0) => {
            return Err(Error::validation(
                "estimated_duration_minutes",
                "must be a positive number of minutes",
            ));
        }
        Some(minutes) => Some(minutes),
        None => extracted
            .estimated_duration_minutes
            .or(defaults.estimated_duration_minutes),
    };

    let category = overrides
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .or_else(|| extracted.category.clone());
    if let (Some(allowed), Some(category)) = (&defaults.allowed_categories, &category) {
        if !allowed.contains(category) {
            return Err(Error::unrecognized("category", category.clone()));
        }
    }

    let status = overrides.status.unwrap_or(defaults.status);
    let ai_insight = overrides.ai_insight.or_else(|| {
        (!extracted.reasons.is_empty())
            .then(|| format!("Inferred: {}", extracted.reasons.join("; ")))
    });

    let task = Task {
        id: id.into(),
        title,
        description: overrides.description,
        priority: overrides
            .priority
            .or(extracted.priority)
            .unwrap_or(defaults.priority),
        status,
        category,
        due_date: overrides.due_date.or(extracted.due_date),
        estimated_duration_minutes,
        tags: overrides.tags.unwrap_or_else(|| extracted.tags.clone()),
        created_at: now,
        updated_at: now,
        completed_at: (status == TaskStatus::Completed).then_some(now),
        source: overrides.source.unwrap_or(defaults.source),
        ai_insight,
    };

    tracing::debug!(
        id = %task.id,
        priority = %task.priority,
        category = task.category.as_deref().unwrap_or("-"),
        "assembled task"
    );
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::extract::extract;
    use crate::engine::normalize::normalize;
    use crate::models::{Priority, TaskSource};
    use crate::test_utils::at;
    use std::collections::BTreeSet;

    fn inferred() -> ExtractedAttributes {
        extract(
            &normalize("Urgent: call client tomorrow at 2pm").unwrap(),
            at(2025, 7, 7, 9, 0),
        )
    }

    #[test]
    fn test_title_required() {
        let now = at(2025, 7, 7, 9, 0);
        for overrides in [PartialTask::new(), PartialTask::new().with_title("   ")] {
            let err = assemble(&inferred(), overrides, &TaskDefaults::default(), "tw-0001", now)
                .unwrap_err();
            match err {
                Error::Validation { field, message } => {
                    assert_eq!(field, "title");
                    assert_eq!(message, "title required");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_title_kept_verbatim() {
        let title = "  Call client (ACME)  ";
        let task = assemble(
            &inferred(),
            PartialTask::new().with_title(title),
            &TaskDefaults::default(),
            "tw-0001",
            at(2025, 7, 7, 9, 0),
        )
        .unwrap();
        assert_eq!(task.title, title);
    }

    #[test]
    fn test_inferred_values_fill_gaps() {
        let now = at(2025, 7, 7, 9, 0);
        let task = assemble(
            &inferred(),
            PartialTask::new().with_title("Call client"),
            &TaskDefaults::default(),
            "tw-0001",
            now,
        )
        .unwrap();
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.category.as_deref(), Some("work"));
        assert_eq!(task.due_date, Some(at(2025, 7, 8, 14, 0)));
        assert_eq!(task.estimated_duration_minutes, Some(30));
        assert!(task.tags.contains("call"));
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.source, TaskSource::Manual);
        assert_eq!(task.created_at, now);
        assert!(task.completed_at.is_none());
        assert!(task.ai_insight.as_deref().unwrap().contains("priority urgent"));
    }

    #[test]
    fn test_overrides_win() {
        let due = at(2025, 8, 1, 12, 0);
        let overrides = PartialTask {
            title: Some("Call client".to_string()),
            priority: Some(Priority::Low),
            category: Some("sales".to_string()),
            due_date: Some(due),
            estimated_duration_minutes: Some(45),
            tags: Some(BTreeSet::new()),
            source: Some(TaskSource::Voice),
            ai_insight: Some("user said so".to_string()),
            ..Default::default()
        };
        let task = assemble(
            &inferred(),
            overrides,
            &TaskDefaults::default(),
            "tw-0001",
            at(2025, 7, 7, 9, 0),
        )
        .unwrap();
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.category.as_deref(), Some("sales"));
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.estimated_duration_minutes, Some(45));
        assert!(task.tags.is_empty());
        assert_eq!(task.source, TaskSource::Voice);
        assert_eq!(task.ai_insight.as_deref(), Some("user said so"));
    }

    #[test]
    fn test_defaults_apply_last() {
        let defaults = TaskDefaults {
            priority: Priority::High,
            estimated_duration_minutes: Some(20),
            ..Default::default()
        };
        let task = assemble(
            &ExtractedAttributes::default(),
            PartialTask::new().with_title("Water plants"),
            &defaults,
            "tw-0001",
            at(2025, 7, 7, 9, 0),
        )
        .unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.estimated_duration_minutes, Some(20));
        assert!(task.category.is_none());
        assert!(task.ai_insight.is_none());
    }

    #[test]
    fn test_completed_status_stamps_completed_at() {
        let now = at(2025, 7, 7, 9, 0);
        let overrides = PartialTask {
            title: Some("Already done".to_string()),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let task = assemble(
            &ExtractedAttributes::default(),
            overrides,
            &TaskDefaults::default(),
            "tw-0001",
            now,
        )
        .unwrap();
        assert_eq!(task.completed_at, Some(now));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let overrides = PartialTask {
            title: Some("Nap".to_string()),
            estimated_duration_minutes: Some(0),
            ..Default::default()
        };
        let err = assemble(
            &ExtractedAttributes::default(),
            overrides,
            &TaskDefaults::default(),
            "tw-0001",
            at(2025, 7, 7, 9, 0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { ref field, .. } if field == "estimated_duration_minutes"
        ));
    }

    #[test]
    fn test_strict_categories() {
        let defaults = TaskDefaults {
            allowed_categories: Some(["work".to_string()].into_iter().collect()),
            ..Default::default()
        };
        let now = at(2025, 7, 7, 9, 0);

        let ok = assemble(
            &inferred(),
            PartialTask::new().with_title("Call client"),
            &defaults,
            "tw-0001",
            now,
        );
        assert!(ok.is_ok());

        let err = assemble(
            &inferred(),
            PartialTask::new().with_title("Call client").with_category("hobby"),
            &defaults,
            "tw-0002",
            now,
        )
        .unwrap_err();
        match err {
            Error::UnrecognizedEnumValue { field, value } => {
                assert_eq!(field, "category");
                assert_eq!(value, "hobby");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
