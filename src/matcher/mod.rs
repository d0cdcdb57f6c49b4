pub mod http;
pub mod oracle;
pub mod search;

use crate::config::OracleConfig;
use crate::error::Result;
use crate::text::normalize;
use http::{HttpLemmatizer, HttpSimilarityOracle};
use oracle::{Lemmatizer, OracleError, SimilarityOracle};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Which kind of answer a comparison should produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Lexical,
    Semantic,
}

/// Outcome of one query/recipe comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    /// Lexical mode
    Hit(bool),
    /// Semantic mode, in `[0, 1]`
    Score(f32),
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        match *self {
            MatchResult::Hit(hit) => hit,
            MatchResult::Score(score) => score > 0.0,
        }
    }

    /// Hits count as 1.0, misses as 0.0
    pub fn score(&self) -> f32 {
        match *self {
            MatchResult::Hit(true) => 1.0,
            MatchResult::Hit(false) => 0.0,
            MatchResult::Score(score) => score,
        }
    }
}

/// Lexical match without a lemmatizer: prefix, substring and depluralization.
pub fn lexical_hit(query: &str, target: &str) -> bool {
    let q = normalize(query);
    let text = normalize(target);
    if q.is_empty() || text.is_empty() {
        return false;
    }
    heuristic_hit(query, &q, &text)
}

/// Cheap checks in order; `q` and `text` are normalized and non-empty.
fn heuristic_hit(raw_query: &str, q: &str, text: &str) -> bool {
    // "pas" -> "pasta", "passata"
    if text.split_whitespace().any(|word| word.starts_with(q)) {
        return true;
    }

    if text.contains(q) {
        return true;
    }

    // "beans" -> "bean"
    if let Some(stem) = q.strip_suffix('s') {
        if text.contains(stem) {
            return true;
        }
    }

    let lowered = raw_query.trim().to_lowercase();
    if let Some(stem) = lowered
        .strip_suffix("'s")
        .or_else(|| lowered.strip_suffix("\u{2019}s"))
    {
        let stem = normalize(stem);
        if !stem.is_empty() && text.contains(&stem) {
            return true;
        }
    }

    false
}

/// Lowercased lemmas made only of letters
fn alphabetic_lemmas(lemmas: HashSet<String>) -> HashSet<String> {
    lemmas
        .into_iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty() && l.chars().all(char::is_alphabetic))
        .collect()
}

/// Match engine with optional semantic and lemma oracles.
///
/// Cloning is cheap; the oracles are shared.
#[derive(Clone)]
pub struct MatchEngine {
    oracle: Option<Arc<dyn SimilarityOracle>>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
    timeout: Duration,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ORACLE_TIMEOUT)
    }
}

impl MatchEngine {
    /// Lexical-only engine; `timeout` bounds every later oracle call
    pub fn new(timeout: Duration) -> Self {
        Self {
            oracle: None,
            lemmatizer: None,
            timeout,
        }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn SimilarityOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    /// Build HTTP-backed oracles for whichever endpoints are configured
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        let timeout = config.timeout();
        let mut engine = Self::new(timeout);

        if let Some(url) = &config.similarity_url {
            engine = engine.with_oracle(Arc::new(HttpSimilarityOracle::new(
                url,
                &config.user_agent,
                timeout,
            )?));
            info!("Semantic similarity oracle configured at {}", url);
        }

        if let Some(url) = &config.lemmatizer_url {
            engine = engine.with_lemmatizer(Arc::new(HttpLemmatizer::new(
                url,
                &config.user_agent,
                timeout,
            )?));
            info!("Lemmatizer configured at {}", url);
        }

        Ok(engine)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    pub fn has_lemmatizer(&self) -> bool {
        self.lemmatizer.is_some()
    }

    async fn guarded<T, F>(&self, call: F) -> std::result::Result<T, OracleError>
    where
        F: Future<Output = std::result::Result<T, OracleError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout(self.timeout)),
        }
    }

    /// Lexical match including lemma overlap when a lemmatizer is available.
    pub async fn lexical_hit(&self, query: &str, target: &str) -> bool {
        let q = normalize(query);
        let text = normalize(target);
        if q.is_empty() || text.is_empty() {
            return false;
        }

        if heuristic_hit(query, &q, &text) {
            return true;
        }

        match self.try_lemma_overlap(query, &text).await {
            Ok(overlap) => overlap,
            Err(OracleError::Unavailable(reason)) => {
                debug!("Skipping lemma overlap: {}", reason);
                false
            }
            Err(e) => {
                warn!("Lemmatizer failed, treating as no match: {}", e);
                false
            }
        }
    }

    /// Whether query and target share an alphabetic lemma.
    pub async fn try_lemma_overlap(
        &self,
        query: &str,
        target: &str,
    ) -> std::result::Result<bool, OracleError> {
        let lemmatizer = self
            .lemmatizer
            .as_ref()
            .ok_or_else(|| OracleError::Unavailable("no lemmatizer configured".to_string()))?;

        let (query_lemmas, target_lemmas) = self
            .guarded(async {
                futures::try_join!(lemmatizer.lemmas(query), lemmatizer.lemmas(target))
            })
            .await?;

        let query_lemmas = alphabetic_lemmas(query_lemmas);
        let target_lemmas = alphabetic_lemmas(target_lemmas);
        Ok(!query_lemmas.is_disjoint(&target_lemmas))
    }

    /// Oracle similarity over the normalized texts, clamped to `[0, 1]`.
    pub async fn try_semantic_score(
        &self,
        query: &str,
        target: &str,
    ) -> std::result::Result<f32, OracleError> {
        let oracle = self.oracle.as_ref().ok_or_else(|| {
            OracleError::Unavailable("no similarity oracle configured".to_string())
        })?;

        let q = normalize(query);
        let text = normalize(target);
        let score = self.guarded(oracle.score(&q, &text)).await?;

        if !score.is_finite() {
            return Err(OracleError::InvalidResponse(format!(
                "non-finite score {score}"
            )));
        }
        Ok(score.clamp(0.0, 1.0))
    }

    /// Semantic score that never fails: on any oracle error the lexical
    /// verdict is returned as 1.0 or 0.0.
    pub async fn semantic_score(&self, query: &str, target: &str) -> f32 {
        match self.try_semantic_score(query, target).await {
            Ok(score) => score,
            Err(e) => {
                match &e {
                    OracleError::Unavailable(_) => debug!("Semantic score fallback: {}", e),
                    _ => warn!("Semantic score fallback: {}", e),
                }
                if self.lexical_hit(query, target).await {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub async fn evaluate(&self, query: &str, target: &str, mode: MatchMode) -> MatchResult {
        match mode {
            MatchMode::Lexical => MatchResult::Hit(self.lexical_hit(query, target).await),
            MatchMode::Semantic => MatchResult::Score(self.semantic_score(query, target).await),
        }
    }
}
