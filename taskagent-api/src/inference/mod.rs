//! Priority inference engine
//!
//! Layered decision process that reconciles the language model's proposed
//! priority against a deterministic, weighted rule-based engine:
//! - `patterns`: the static weighted pattern library
//! - `scorer`: per-tier evidence accumulation and tie-breaking
//! - `resolver`: AI-vs-regex arbitration and confidence derivation

pub mod patterns;
pub mod resolver;
pub mod scorer;

pub use patterns::{Contribution, Rule, Tier, PATTERN_LIBRARY};
pub use resolver::{PriorityResolver, PriorityResult};
pub use scorer::{PriorityScorer, ScoreBoard, TierScore};
