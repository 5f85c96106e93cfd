//! Core domain types for TaskAgent
//!
//! Priority, category, and priority provenance are closed sum types.
//! String conversions are centralized here so the database layer, the API
//! layer, and the inference engine all agree on the canonical spellings.

use serde::{Deserialize, Serialize};

/// Task priority level
///
/// `Unknown` only appears on drafts coming back from the language model;
/// the priority resolver guarantees finalized tasks carry High/Medium/Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
    Unknown,
}

impl Priority {
    /// Canonical string representation (matches stored values)
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unknown => "Unknown",
        }
    }

    /// Parse one of the three assignable levels, case-insensitively.
    ///
    /// Returns `None` for "Unknown" and for anything outside the closed
    /// set. Callers decide what absence means; nothing is coerced here.
    pub fn parse_known(value: &str) -> Option<Priority> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Finance,
    Other,
}

impl Category {
    /// Canonical string representation (matches stored values)
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Finance => "Finance",
            Category::Other => "Other",
        }
    }

    /// Parse a category case-insensitively, rejecting unknown labels.
    ///
    /// Used for search filters, where an invented label must not silently
    /// become an `Other` filter.
    pub fn parse_known(value: &str) -> Option<Category> {
        match value.trim().to_lowercase().as_str() {
            "work" => Some(Category::Work),
            "personal" => Some(Category::Personal),
            "finance" => Some(Category::Finance),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Parse a category case-insensitively, defaulting to `Other`.
    ///
    /// An unrecognized category is not an error: the model sometimes
    /// invents labels ("Errands", "Health") and those tasks are still
    /// worth storing.
    pub fn parse_lossy(value: &str) -> Category {
        match value.trim().to_lowercase().as_str() {
            "work" => Category::Work,
            "personal" => Category::Personal,
            "finance" => Category::Finance,
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a task's final priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrioritySource {
    /// Trusted the language model's verdict
    Ai,
    /// Fell back to the weighted pattern engine
    Regex,
}

impl PrioritySource {
    /// Stored string form ('ai' or 'regex', enforced by a DB check)
    pub fn as_str(&self) -> &'static str {
        match self {
            PrioritySource::Ai => "ai",
            PrioritySource::Regex => "regex",
        }
    }

    /// Parse the stored string form
    pub fn parse(value: &str) -> Option<PrioritySource> {
        match value {
            "ai" => Some(PrioritySource::Ai),
            "regex" => Some(PrioritySource::Regex),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse_known("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse_known("medium"), Some(Priority::Medium));
        assert_eq!(Priority::parse_known(" Low "), Some(Priority::Low));
    }

    #[test]
    fn priority_parse_rejects_unknown_and_garbage() {
        assert_eq!(Priority::parse_known("Unknown"), None);
        assert_eq!(Priority::parse_known("Urgent"), None);
        assert_eq!(Priority::parse_known(""), None);
    }

    #[test]
    fn category_parse_defaults_to_other() {
        assert_eq!(Category::parse_lossy("Work"), Category::Work);
        assert_eq!(Category::parse_lossy("finance"), Category::Finance);
        assert_eq!(Category::parse_lossy("Errands"), Category::Other);
        assert_eq!(Category::parse_lossy(""), Category::Other);
    }

    #[test]
    fn priority_source_round_trips_stored_form() {
        assert_eq!(PrioritySource::parse("ai"), Some(PrioritySource::Ai));
        assert_eq!(PrioritySource::parse("regex"), Some(PrioritySource::Regex));
        assert_eq!(PrioritySource::parse("AI"), None);
    }
}
