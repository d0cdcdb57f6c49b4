use crate::matcher::{MatchEngine, MatchMode, MatchResult};
use crate::recipe::RecipeRow;
use crate::text::normalize;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info};

pub const DEFAULT_SEARCH_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Maximum comparisons in flight
    pub concurrency: usize,
    /// Semantic mode only
    pub min_score: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_SEARCH_CONCURRENCY,
            min_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Position in the input slice
    pub index: usize,
    pub name: String,
    pub result: MatchResult,
}

/// Match `query` against every recipe.
///
/// Lexical hits come back in input order. Semantic results are filtered by
/// `min_score` and sorted best first; equal scores keep input order.
pub async fn search_recipes(
    engine: &MatchEngine,
    query: &str,
    recipes: &[RecipeRow],
    mode: MatchMode,
    options: &SearchOptions,
) -> Vec<SearchHit> {
    if normalize(query).is_empty() {
        debug!("Empty query, skipping search");
        return Vec::new();
    }

    let concurrency = options.concurrency.max(1);
    debug!(
        "Searching {} recipes for {:?} ({:?}, concurrency {})",
        recipes.len(),
        query,
        mode,
        concurrency
    );

    let results: Vec<(usize, MatchResult)> = stream::iter(recipes.iter().enumerate())
        .map(|(index, recipe)| {
            let target = recipe.match_target();
            async move { (index, engine.evaluate(query, target.as_str(), mode).await) }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let mut hits: Vec<SearchHit> = results
        .into_iter()
        .filter(|(_, result)| match mode {
            MatchMode::Lexical => result.is_match(),
            MatchMode::Semantic => result.score() >= options.min_score,
        })
        .map(|(index, result)| SearchHit {
            index,
            name: recipes[index].name.clone(),
            result,
        })
        .collect();

    if mode == MatchMode::Semantic {
        hits.sort_by(|a, b| b.result.score().total_cmp(&a.result.score()));
    }

    info!(
        "Search for {:?} matched {} of {} recipes",
        query,
        hits.len(),
        recipes.len()
    );
    hits
}
