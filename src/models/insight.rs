//! Rule-generated productivity insights.
//!
//! Each variant is one template with a typed payload, so the set of
//! insights the aggregator can produce is closed and exhaustively matched.

use serde::{Deserialize, Serialize, Serializer};

/// Broad grouping used by the analytics views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Productivity,
    Recommendation,
    Pattern,
    Context,
}

/// A single insight with its template payload.
///
/// Deserializes from the bare tagged payload; [`serialize_rendered`] adds
/// the rendered text on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Insight {
    HighCompletion { completion_rate: f64 },
    LowCompletion { completion_rate: f64 },
    HighPriorityPattern { share: f64 },
    OverdueBacklog { count: usize },
    UrgentContext { indicator_count: usize },
    NegativeSentiment { average: f64 },
    Streak { days: u32 },
    PeakHour { hour: u32, completions: usize },
    NoActivity,
}

impl Insight {
    pub fn kind(&self) -> InsightKind {
        match self {
            Insight::HighCompletion { .. } | Insight::Streak { .. } => InsightKind::Productivity,
            Insight::LowCompletion { .. }
            | Insight::OverdueBacklog { .. }
            | Insight::NoActivity => InsightKind::Recommendation,
            Insight::HighPriorityPattern { .. } | Insight::PeakHour { .. } => InsightKind::Pattern,
            Insight::UrgentContext { .. } | Insight::NegativeSentiment { .. } => {
                InsightKind::Context
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Insight::HighCompletion { .. } => "High productivity",
            Insight::LowCompletion { .. } => "Low completion rate",
            Insight::HighPriorityPattern { .. } => "High priority pattern",
            Insight::OverdueBacklog { .. } => "Overdue tasks",
            Insight::UrgentContext { .. } => "Multiple urgent items detected",
            Insight::NegativeSentiment { .. } => "Stressful context",
            Insight::Streak { .. } => "Completion streak",
            Insight::PeakHour { .. } => "Peak productivity hour",
            Insight::NoActivity => "No recent activity",
        }
    }

    /// Natural-language message rendered from the payload.
    pub fn message(&self) -> String {
        match self {
            Insight::HighCompletion { completion_rate } => format!(
                "You completed {:.1}% of your tasks in this period!",
                completion_rate * 100.0
            ),
            Insight::LowCompletion { completion_rate } => format!(
                "Low completion rate ({:.1}%). Consider breaking large tasks into smaller, manageable pieces.",
                completion_rate * 100.0
            ),
            Insight::HighPriorityPattern { share } => format!(
                "{:.0}% of your tasks are high or urgent priority. Consider prioritizing more strategically.",
                share * 100.0
            ),
            Insight::OverdueBacklog { count } => {
                let noun = if *count == 1 { "task is" } else { "tasks are" };
                format!("{} {} overdue. Reschedule or close them.", count, noun)
            }
            Insight::UrgentContext { indicator_count } => format!(
                "Multiple urgent items detected: {} urgency signals in your recent context.",
                indicator_count
            ),
            Insight::NegativeSentiment { average } => format!(
                "Your recent context reads as stressful (sentiment {:.2}). Plan a buffer for the week.",
                average
            ),
            Insight::Streak { days } => {
                format!("You have completed tasks {} days in a row.", days)
            }
            Insight::PeakHour { hour, completions } => format!(
                "You complete the most tasks around {:02}:00 ({} completions). Schedule high-priority work then.",
                hour, completions
            ),
            Insight::NoActivity => {
                "No tasks were created in this period. Capture a task to get started.".to_string()
            }
        }
    }

    /// Fixed confidence per template.
    pub fn confidence(&self) -> f64 {
        match self {
            Insight::HighCompletion { .. } => 0.9,
            Insight::LowCompletion { .. } => 0.8,
            Insight::HighPriorityPattern { .. } => 0.7,
            Insight::OverdueBacklog { .. } => 0.95,
            Insight::UrgentContext { .. } => 0.75,
            Insight::NegativeSentiment { .. } => 0.6,
            Insight::Streak { .. } => 0.9,
            Insight::PeakHour { .. } => 0.65,
            Insight::NoActivity => 1.0,
        }
    }
}

#[derive(Serialize)]
struct Rendered<'a> {
    #[serde(flatten)]
    insight: &'a Insight,
    title: &'static str,
    message: String,
    kind: InsightKind,
    confidence: f64,
}

/// Serialize insights with their title, message, kind and confidence
/// alongside the tagged payload.
pub fn serialize_rendered<S: Serializer>(
    insights: &[Insight],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(insights.iter().map(|insight| Rendered {
        insight,
        title: insight.title(),
        message: insight.message(),
        kind: insight.kind(),
        confidence: insight.confidence(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_serializes_with_type_tag() {
        let json = serde_json::to_value(Insight::OverdueBacklog { count: 2 }).unwrap();
        assert_eq!(json["type"], "overdue_backlog");
        assert_eq!(json["count"], 2);

        let json = serde_json::to_value(Insight::NoActivity).unwrap();
        assert_eq!(json["type"], "no_activity");
    }

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(serialize_with = "serialize_rendered")]
        insights: Vec<Insight>,
    }

    #[test]
    fn test_rendered_insight_carries_text_and_confidence() {
        let wrapper = Wrapper {
            insights: vec![Insight::OverdueBacklog { count: 2 }, Insight::NoActivity],
        };
        let json = serde_json::to_value(&wrapper).unwrap();
        let first = &json["insights"][0];
        assert_eq!(first["type"], "overdue_backlog");
        assert_eq!(first["count"], 2);
        assert_eq!(first["title"], "Overdue tasks");
        assert_eq!(first["message"], "2 tasks are overdue. Reschedule or close them.");
        assert_eq!(first["kind"], "recommendation");
        assert_eq!(first["confidence"], 0.95);

        let second = &json["insights"][1];
        assert_eq!(second["type"], "no_activity");
        assert_eq!(second["confidence"], 1.0);

        let back: Wrapper = serde_json::from_value(json).unwrap();
        assert_eq!(back.insights, wrapper.insights);
    }

    #[test]
    fn test_low_completion_message() {
        let insight = Insight::LowCompletion {
            completion_rate: 0.25,
        };
        assert_eq!(insight.kind(), InsightKind::Recommendation);
        assert!(insight.message().contains("25.0%"));
        assert!(insight.title().to_lowercase().contains("low completion rate"));
    }

    #[test]
    fn test_overdue_message_pluralizes() {
        assert!(
            Insight::OverdueBacklog { count: 1 }
                .message()
                .starts_with("1 task is")
        );
        assert!(
            Insight::OverdueBacklog { count: 3 }
                .message()
                .starts_with("3 tasks are")
        );
    }

    #[test]
    fn test_urgent_context_wording() {
        let insight = Insight::UrgentContext { indicator_count: 5 };
        assert_eq!(insight.kind(), InsightKind::Context);
        assert!(insight.message().contains("Multiple urgent items detected"));
    }
}
