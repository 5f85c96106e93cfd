//! Priority resolution
//!
//! Arbitrates between the language model's proposed priority and the
//! rule-based scorer. A confident, recognized AI verdict is trusted as-is;
//! everything else falls back to weighted pattern scoring.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use taskagent_common::{Priority, PrioritySource};

use super::scorer::{PriorityScorer, ScoreBoard};

/// Final priority decision for one task
///
/// Always carries an assignable priority (never Unknown) and a confidence
/// in [0, 100]. `reasoning` is present only for regex-sourced decisions.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityResult {
    pub priority: Priority,
    pub confidence: u8,
    pub source: PrioritySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ScoreBoard>,
}

/// Decides whether to trust the AI verdict or fall back to the scorer
pub struct PriorityResolver {
    /// Minimum AI confidence required to accept the AI's priority
    trust_threshold: u8,
    scorer: PriorityScorer,
}

impl PriorityResolver {
    pub fn new() -> Self {
        Self {
            trust_threshold: 70,
            scorer: PriorityScorer::new(),
        }
    }

    /// Resolve a task's priority against today's date
    pub fn resolve(&self, description: &str, ai_priority: &str, ai_confidence: u8) -> PriorityResult {
        self.resolve_on(
            description,
            ai_priority,
            ai_confidence,
            Local::now().date_naive(),
        )
    }

    /// Resolve a task's priority against an explicit reference date.
    ///
    /// An AI priority outside the closed High/Medium/Low set (including
    /// "Unknown") is treated as absent for the trust check and falls
    /// through to scoring; it is never coerced to a level. Total for all
    /// string/integer inputs.
    pub fn resolve_on(
        &self,
        description: &str,
        ai_priority: &str,
        ai_confidence: u8,
        today: NaiveDate,
    ) -> PriorityResult {
        let recognized = Priority::parse_known(ai_priority);

        if let Some(priority) = recognized {
            if ai_confidence >= self.trust_threshold {
                return PriorityResult {
                    priority,
                    confidence: ai_confidence.min(100),
                    source: PrioritySource::Ai,
                    reasoning: None,
                };
            }
        }

        let board = self.scorer.score(description, recognized, today);
        let tier = board.winning_tier();
        let confidence = (board.winning_score() * 10).min(100) as u8;

        PriorityResult {
            priority: tier.as_priority(),
            confidence,
            source: PrioritySource::Regex,
            reasoning: Some(board),
        }
    }
}

impl Default for PriorityResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn confident_ai_verdict_is_trusted() {
        let result =
            PriorityResolver::new().resolve_on("water the plants", "High", 85, today());
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.confidence, 85);
        assert_eq!(result.source, PrioritySource::Ai);
        assert!(result.reasoning.is_none());
    }

    #[test]
    fn low_ai_confidence_falls_back_to_scoring() {
        let result = PriorityResolver::new().resolve_on("urgent: call the bank", "Low", 40, today());
        assert_eq!(result.source, PrioritySource::Regex);
        // High gets 10 from "urgent"; Low gets only the +3 existing bonus
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.confidence, 100);
        assert!(result.reasoning.is_some());
    }

    #[test]
    fn unknown_priority_ignores_high_ai_confidence() {
        let result =
            PriorityResolver::new().resolve_on("urgent: call the bank", "Unknown", 95, today());
        assert_eq!(result.source, PrioritySource::Regex);
        assert_eq!(result.priority, Priority::High);
    }

    #[test]
    fn unrecognized_priority_string_is_treated_as_absent() {
        let result =
            PriorityResolver::new().resolve_on("urgent: call the bank", "Critical", 95, today());
        assert_eq!(result.source, PrioritySource::Regex);
        assert_eq!(result.priority, Priority::High);
        // No +3 bonus was granted for the unrecognized label
        let board = result.reasoning.unwrap();
        assert_eq!(board.high.score, 10);
    }

    #[test]
    fn boundary_confidence_is_trusted() {
        let result = PriorityResolver::new().resolve_on("anything", "Medium", 70, today());
        assert_eq!(result.source, PrioritySource::Ai);
        assert_eq!(result.confidence, 70);
    }

    #[test]
    fn zero_signal_resolves_low_with_zero_confidence() {
        let result = PriorityResolver::new().resolve_on("water the plants", "Unknown", 0, today());
        assert_eq!(result.priority, Priority::Low);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.source, PrioritySource::Regex);
    }

    #[test]
    fn confidence_derivation_caps_at_one_hundred() {
        // "urgent asap emergency" scores 30 in High; 30 * 10 caps at 100
        let result =
            PriorityResolver::new().resolve_on("urgent asap emergency", "Unknown", 0, today());
        assert_eq!(result.confidence, 100);

        // A single weight-6 match derives 60
        let result = PriorityResolver::new().resolve_on("tax forms", "Unknown", 0, today());
        assert_eq!(result.confidence, 60);
    }
}
