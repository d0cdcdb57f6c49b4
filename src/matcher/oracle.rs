use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Why an oracle call produced no usable answer.
///
/// Every variant is recoverable: callers fall back to lexical matching.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Not configured, or the service refused the call
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("oracle request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid oracle response: {0}")]
    InvalidResponse(String),
}

/// Meaning-aware similarity between two texts, in `[0, 1]`
#[async_trait]
pub trait SimilarityOracle: Send + Sync {
    async fn score(&self, text_a: &str, text_b: &str) -> Result<f32, OracleError>;
}

/// Lemmas of the alphabetic tokens of a text
#[async_trait]
pub trait Lemmatizer: Send + Sync {
    async fn lemmas(&self, text: &str) -> Result<HashSet<String>, OracleError>;
}
