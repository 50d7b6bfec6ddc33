use serde::Serialize;
use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    recommender::{Catalog, ItemSummary, Recommender, RecommenderHandle},
};

/// Outcome of a catalog rebuild
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReloadSummary {
    pub generation: u64,
    pub catalog_size: usize,
    pub vocabulary_size: usize,
}

/// Finds hotels similar to `name` in the catalog currently being served
///
/// The recommender reference is taken once, so a concurrent reload does not
/// change the catalog mid-query.
pub fn get_recommendations(
    handle: &RecommenderHandle,
    name: &str,
    count: usize,
) -> AppResult<Vec<ItemSummary>> {
    let recommender = handle.current();
    let recommendations = recommender.recommend(name, count)?;

    tracing::debug!(
        generation = recommender.generation(),
        name = %name,
        count,
        "Recommendations computed"
    );

    Ok(recommendations)
}

/// Loads and builds a new catalog generation, then swaps it in.
///
/// Any failure leaves the current recommender in place.
pub async fn reload_catalog(
    handle: &RecommenderHandle,
    catalog_path: impl Into<PathBuf>,
) -> AppResult<ReloadSummary> {
    let path = catalog_path.into();
    let generation = handle.next_generation();

    let recommender = tokio::task::spawn_blocking(move || -> AppResult<Recommender> {
        let catalog = Catalog::from_path(&path)?;
        Ok(Recommender::build(catalog, generation)?)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Catalog rebuild task failed: {}", e)))??;

    let serving = handle.replace(recommender);
    let summary = ReloadSummary {
        generation: serving.generation(),
        catalog_size: serving.len(),
        vocabulary_size: serving.vocabulary_size(),
    };

    tracing::info!(
        generation = summary.generation,
        catalog_size = summary.catalog_size,
        "Recommendation catalog reloaded"
    );

    Ok(summary)
}
