use std::time::Duration;

use async_trait::async_trait;
use petiscore_core::Evaluation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model response contained no text")]
    EmptyResponse,
    #[error("malformed model response: {reason}")]
    MalformedResponse { reason: String },
}

/// A petition quality scorer.
///
/// Implementations must be interchangeable: the pipeline records which
/// method produced a score but treats the result identically.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Short method tag recorded on each evaluation (`heuristic`, `claude`).
    fn method(&self) -> &'static str;

    /// Politeness delay between successive evaluations. Not a scheduling
    /// guarantee; purely rate limiting toward the external service.
    fn pause(&self) -> Duration;

    /// Evaluate one petition text.
    async fn evaluate(&self, text: &str) -> Result<Evaluation, ScoreError>;
}
