//! Scoring layer: two interchangeable petition scorers behind one trait.
//!
//! The heuristic scorer is pure pattern matching; the Claude scorer calls
//! the Anthropic Messages API. Both produce the same [`Evaluation`] shape,
//! which is the only contract the calibration reporter depends on.
//!
//! [`Evaluation`]: petiscore_core::Evaluation

mod claude;
mod heuristic;
mod prompt;
mod scorer;

pub use claude::{ClaudeScorer, DEFAULT_MODEL, PROMPT_TEXT_BUDGET};
pub use heuristic::HeuristicScorer;
pub use prompt::render_prompt;
pub use scorer::{ScoreError, Scorer};
