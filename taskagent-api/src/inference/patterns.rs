//! Weighted priority pattern library
//!
//! Static classification rules applied to task descriptions. Rules are
//! grouped into three tiers; every matching rule contributes its weight to
//! its tier, with no early exit. A single date-proximity rule contributes a
//! weight that depends on how soon an explicit deadline falls.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use taskagent_common::Priority;

/// Priority tier accumulating weighted evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    /// Tiers in preference order; ties between equal scores resolve to the
    /// earliest entry.
    pub const ALL: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    /// The priority level this tier maps to
    pub fn as_priority(&self) -> Priority {
        match self {
            Tier::High => Priority::High,
            Tier::Medium => Priority::Medium,
            Tier::Low => Priority::Low,
        }
    }

    /// The tier a recognized priority level maps back to
    pub fn from_priority(priority: Priority) -> Option<Tier> {
        match priority {
            Priority::High => Some(Tier::High),
            Priority::Medium => Some(Tier::Medium),
            Priority::Low => Some(Tier::Low),
            Priority::Unknown => None,
        }
    }
}

/// Evidence contributed by a single rule match
#[derive(Debug, Clone)]
pub struct Contribution {
    pub tier: Tier,
    pub points: u32,
    pub evidence: String,
}

/// A single classification rule
pub enum Rule {
    /// Case-insensitive pattern matched anywhere in the description
    Text {
        tier: Tier,
        pattern: Regex,
        weight: u32,
    },
    /// Explicit `due ... YYYY-MM-DD` deadline; contributes High+8 when due
    /// within a day and Medium+5 when due within a week
    DateProximity { pattern: Regex },
}

impl Rule {
    fn text(tier: Tier, pattern: &str, weight: u32) -> Rule {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("invalid priority pattern {pattern:?}: {e}"));
        Rule::Text {
            tier,
            pattern,
            weight,
        }
    }

    /// Evaluate this rule against a description.
    ///
    /// Returns the contribution when the rule matches, `None` otherwise.
    /// An unparseable captured date never contributes.
    pub fn evaluate(&self, description: &str, today: NaiveDate) -> Option<Contribution> {
        match self {
            Rule::Text {
                tier,
                pattern,
                weight,
            } => pattern.find(description).map(|found| Contribution {
                tier: *tier,
                points: *weight,
                evidence: format!("Matched: {}", found.as_str()),
            }),
            Rule::DateProximity { pattern } => {
                let captured = pattern.captures(description)?.get(1)?;
                let due_date = NaiveDate::parse_from_str(captured.as_str(), "%Y-%m-%d").ok()?;
                let days_until_due = (due_date - today).num_days();

                if days_until_due <= 1 {
                    Some(Contribution {
                        tier: Tier::High,
                        points: 8,
                        evidence: "Due within 24 hours".to_string(),
                    })
                } else if days_until_due <= 7 {
                    Some(Contribution {
                        tier: Tier::Medium,
                        points: 5,
                        evidence: "Due within week".to_string(),
                    })
                } else {
                    None
                }
            }
        }
    }
}

/// The static rule set, compiled once at first use and shared read-only
/// across all scoring calls.
pub static PATTERN_LIBRARY: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = Vec::new();

    // Deadline proximity (evaluated first so its evidence leads the trace)
    rules.push(Rule::DateProximity {
        pattern: Regex::new(r"due.*?(\d{4}-\d{2}-\d{2})").expect("invalid due-date pattern"),
    });

    // High tier: explicit urgency
    for pattern in [
        r"urgent",
        r"asap",
        r"emergency",
        r"critical",
        r"immediate(ly)?",
        r"right away",
    ] {
        rules.push(Rule::text(Tier::High, pattern, 10));
    }

    // High tier: deadline indicators
    for pattern in [
        r"by (today|tomorrow|tonight)",
        r"due (today|tomorrow|tonight)",
        r"within \d+ hours?",
        r"end of( the)? day",
    ] {
        rules.push(Rule::text(Tier::High, pattern, 8));
    }

    // High tier: important stakeholders
    for pattern in [
        r"(boss|client|customer) (needs|wants|requested)",
        r"executive",
        r"CEO",
        r"board meeting",
    ] {
        rules.push(Rule::text(Tier::High, pattern, 7));
    }

    // High tier: financial/legal implications
    for pattern in [r"deadline", r"tax", r"legal", r"compliance", r"regulatory"] {
        rules.push(Rule::text(Tier::High, pattern, 6));
    }

    // Medium tier: time-bound but not urgent
    for pattern in [
        r"this week",
        r"next week",
        r"upcoming",
        r"soon",
        r"schedule[d]?",
    ] {
        rules.push(Rule::text(Tier::Medium, pattern, 5));
    }

    // Medium tier: project-related
    for pattern in [
        r"project",
        r"meeting",
        r"presentation",
        r"report",
        r"review",
    ] {
        rules.push(Rule::text(Tier::Medium, pattern, 4));
    }

    // Medium tier: follow-up activities
    for pattern in [r"follow[- ]?up", r"check[- ]?in", r"update"] {
        rules.push(Rule::text(Tier::Medium, pattern, 3));
    }

    // Low tier: optional/flexible tasks
    for pattern in [
        r"when possible",
        r"if you can",
        r"would be nice",
        r"maybe",
        r"consider",
    ] {
        rules.push(Rule::text(Tier::Low, pattern, 2));
    }

    // Low tier: maintenance/routine
    for pattern in [r"routine", r"regular", r"maintenance", r"organize", r"clean"] {
        rules.push(Rule::text(Tier::Low, pattern, 1));
    }

    rules
});

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn text_rule_matches_case_insensitively() {
        let rule = Rule::text(Tier::High, r"urgent", 10);
        let contribution = rule.evaluate("URGENT: fix the build", today()).unwrap();
        assert_eq!(contribution.tier, Tier::High);
        assert_eq!(contribution.points, 10);
        assert_eq!(contribution.evidence, "Matched: URGENT");
    }

    #[test]
    fn text_rule_ignores_non_matching_text() {
        let rule = Rule::text(Tier::Low, r"routine", 1);
        assert!(rule.evaluate("water the plants", today()).is_none());
    }

    #[test]
    fn date_proximity_scores_high_within_one_day() {
        let rule = &PATTERN_LIBRARY[0];
        let contribution = rule
            .evaluate("report due 2025-06-03", today())
            .expect("deadline should match");
        assert_eq!(contribution.tier, Tier::High);
        assert_eq!(contribution.points, 8);
        assert_eq!(contribution.evidence, "Due within 24 hours");
    }

    #[test]
    fn date_proximity_scores_medium_within_week() {
        let rule = &PATTERN_LIBRARY[0];
        let contribution = rule
            .evaluate("slides due 2025-06-08", today())
            .expect("deadline should match");
        assert_eq!(contribution.tier, Tier::Medium);
        assert_eq!(contribution.points, 5);
    }

    #[test]
    fn date_proximity_ignores_distant_and_invalid_dates() {
        let rule = &PATTERN_LIBRARY[0];
        assert!(rule.evaluate("due 2025-09-01", today()).is_none());
        assert!(rule.evaluate("due 2025-13-45", today()).is_none());
        assert!(rule.evaluate("no deadline here", today()).is_none());
    }

    #[test]
    fn library_compiles_all_tiers() {
        // One date rule plus 42 text patterns across the three tiers
        assert_eq!(PATTERN_LIBRARY.len(), 43);
        assert!(PATTERN_LIBRARY
            .iter()
            .any(|r| matches!(r, Rule::DateProximity { .. })));
    }
}
