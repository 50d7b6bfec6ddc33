use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::{
    api::{
        extract::{Json, Query},
        AppState,
    },
    error::AppResult,
    middleware::{auth::AdminUser, request_id::RequestId},
    recommender::ItemSummary,
    services::recommendations::{self, ReloadSummary},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub name: String,
    pub count: Option<usize>,
}

/// `GET /recommendations?name=<hotel>&count=<k>`
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<ItemSummary>>> {
    let count = query.count.unwrap_or(state.config.default_recommendations);

    tracing::info!(
        request_id = %request_id,
        name = %query.name,
        count,
        "Processing recommendation request"
    );

    let results = recommendations::get_recommendations(&state.recommender, &query.name, count)?;
    Ok(Json(results))
}

/// Rebuilds the catalog from the configured file and swaps it in
pub async fn reload(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<ReloadSummary>> {
    tracing::info!(admin_id = %admin.id, path = %state.config.catalog_path, "Catalog reload requested");
    let summary = recommendations::reload_catalog(&state.recommender, &state.config.catalog_path).await?;
    Ok(Json(summary))
}
