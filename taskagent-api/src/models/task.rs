//! Task records and the extraction pipeline draft
//!
//! A `TaskDraft` is produced by the response validator and is the only way
//! into `NewTask`: the draft is immutable, and `finalize_on` applies
//! priority resolution and due-date normalization as a pure transformation.
//! Nothing reaches the store without passing through it.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskagent_common::{Category, Priority, PrioritySource};

use crate::dates::normalize_due_date_on;
use crate::inference::{PriorityResolver, ScoreBoard};

/// Incoming request body: a free-text task description
#[derive(Debug, Deserialize)]
pub struct TaskInput {
    pub description: String,
}

/// Intermediate record extracted from the language model.
///
/// `priority` is the model's literal claim ("Unknown" when absent) and
/// `due_date` the raw expression; both are judged during finalization, not
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub due_date: Option<String>,
    pub priority: String,
    pub category: Category,
    pub confidence_score: u8,
}

impl TaskDraft {
    /// Resolve priority and normalize the due date against today's date
    pub fn finalize(self, description: &str) -> NewTask {
        self.finalize_on(description, Local::now().date_naive())
    }

    /// Resolve priority and normalize the due date against an explicit
    /// reference date.
    ///
    /// Never fails: priority degrades to the scorer's verdict and an
    /// unresolvable due date becomes `None`, so every draft that survived
    /// validation yields a storable task.
    pub fn finalize_on(self, description: &str, today: NaiveDate) -> NewTask {
        let resolution = PriorityResolver::new().resolve_on(
            description,
            &self.priority,
            self.confidence_score,
            today,
        );

        let due_date = self
            .due_date
            .as_deref()
            .and_then(|raw| normalize_due_date_on(raw, today));

        NewTask {
            name: self.name,
            due_date,
            priority: resolution.priority,
            category: self.category,
            confidence_score: resolution.confidence,
            priority_source: resolution.source,
            reasoning: resolution.reasoning,
        }
    }
}

/// Fully resolved task, ready for persistence.
///
/// Invariants: `priority` is never Unknown, `confidence_score` is within
/// [0, 100], and `due_date` is either absent or a canonical calendar date.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: Category,
    pub confidence_score: u8,
    pub priority_source: PrioritySource,
    /// Scorer evidence, present only for regex-sourced priorities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ScoreBoard>,
}

/// Stored task as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: Uuid,
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: Category,
    pub confidence_score: u8,
    pub priority_source: PrioritySource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// PUT /tasks/{id} request body; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        // 2025-06-02 is a Monday
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn draft(priority: &str, confidence: u8, due_date: Option<&str>) -> TaskDraft {
        TaskDraft {
            name: "Submit tax documents".to_string(),
            due_date: due_date.map(str::to_string),
            priority: priority.to_string(),
            category: Category::Finance,
            confidence_score: confidence,
        }
    }

    #[test]
    fn finalize_trusts_confident_ai_priority() {
        let task = draft("High", 85, Some("2025-04-15"))
            .finalize_on("submit the tax documents", monday());
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.confidence_score, 85);
        assert_eq!(task.priority_source, PrioritySource::Ai);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 4, 15));
        assert!(task.reasoning.is_none());
    }

    #[test]
    fn finalize_falls_back_to_scorer_on_unknown_priority() {
        let task = draft("Unknown", 95, None).finalize_on("urgent wire transfer", monday());
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.priority_source, PrioritySource::Regex);
        assert!(task.reasoning.is_some());
    }

    #[test]
    fn finalize_never_yields_unknown_priority() {
        let task = draft("Unknown", 0, None).finalize_on("water the plants", monday());
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.confidence_score, 0);
    }

    #[test]
    fn unresolvable_due_date_becomes_none() {
        let task = draft("High", 90, Some("whenever you get a chance"))
            .finalize_on("pay rent", monday());
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn stale_due_date_year_is_corrected() {
        let task = draft("High", 90, Some("2020-04-15")).finalize_on("file taxes", monday());
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 4, 15));
    }
}
