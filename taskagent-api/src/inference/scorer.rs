//! Rule-based priority scoring
//!
//! Applies the static pattern library to a task description, accumulating
//! per-tier scores and human-readable match traces. The resulting
//! `ScoreBoard` doubles as the reasoning payload attached to regex-sourced
//! priority decisions.

use chrono::NaiveDate;
use serde::Serialize;
use taskagent_common::Priority;

use super::patterns::{Tier, PATTERN_LIBRARY};

/// Score and ordered match trace for one tier
#[derive(Debug, Clone, Default, Serialize)]
pub struct TierScore {
    /// Accumulated weight of all matching rules
    pub score: u32,
    /// Human-readable evidence, in match order
    pub matches: Vec<String>,
}

/// Per-tier evidence accumulated while scoring a single description.
///
/// Created fresh per scoring call and never shared across requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreBoard {
    pub high: TierScore,
    pub medium: TierScore,
    pub low: TierScore,
}

impl ScoreBoard {
    /// Evidence accumulated for a tier
    pub fn tier(&self, tier: Tier) -> &TierScore {
        match tier {
            Tier::High => &self.high,
            Tier::Medium => &self.medium,
            Tier::Low => &self.low,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut TierScore {
        match tier {
            Tier::High => &mut self.high,
            Tier::Medium => &mut self.medium,
            Tier::Low => &mut self.low,
        }
    }

    /// Record a rule contribution
    pub fn add(&mut self, tier: Tier, points: u32, evidence: impl Into<String>) {
        let entry = self.tier_mut(tier);
        entry.score += points;
        entry.matches.push(evidence.into());
    }

    /// The tier with the strictly greatest score.
    ///
    /// Ties resolve in High > Medium > Low preference order. When every
    /// tier scored zero the result is Low: a task with no urgency signal
    /// defaults to low urgency, never to Unknown.
    pub fn winning_tier(&self) -> Tier {
        let mut winner = Tier::Low;
        let mut best = 0;
        for tier in Tier::ALL {
            let score = self.tier(tier).score;
            if score > best {
                winner = tier;
                best = score;
            }
        }
        winner
    }

    /// Score of the winning tier (zero when nothing matched)
    pub fn winning_score(&self) -> u32 {
        self.tier(self.winning_tier()).score
    }
}

/// Weighted pattern scorer over the static library.
///
/// Pure: the only inputs are the description, the optionally supplied
/// current priority, and the reference date for deadline proximity.
pub struct PriorityScorer {
    /// Bonus granted to the tier matching an already-assigned priority
    existing_priority_bonus: u32,
}

impl PriorityScorer {
    pub fn new() -> Self {
        Self {
            existing_priority_bonus: 3,
        }
    }

    /// Score a description against every rule in the library.
    ///
    /// When `current_priority` is one of the three assignable levels, its
    /// tier receives a fixed bonus so an existing assignment is not
    /// discarded on weak contrary evidence.
    pub fn score(
        &self,
        description: &str,
        current_priority: Option<Priority>,
        today: NaiveDate,
    ) -> ScoreBoard {
        let mut board = ScoreBoard::default();

        for rule in PATTERN_LIBRARY.iter() {
            if let Some(contribution) = rule.evaluate(description, today) {
                board.add(
                    contribution.tier,
                    contribution.points,
                    contribution.evidence,
                );
            }
        }

        if let Some(tier) = current_priority.and_then(Tier::from_priority) {
            board.add(
                tier,
                self.existing_priority_bonus,
                "Considering existing priority",
            );
        }

        board
    }
}

impl Default for PriorityScorer {
    fn default() -> Self {
        Self::new()
    }
}
