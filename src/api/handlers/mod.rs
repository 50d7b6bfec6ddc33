use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::models::PageParams;

pub mod admin;
pub mod auth;
pub mod hotels;
pub mod payments;
pub mod recommendations;
pub mod reservations;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let recommender = state.recommender.current();
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "catalog_size": recommender.len(),
            "generation": recommender.generation(),
        })),
    )
}

/// Page parameters from optional `limit` / `skip` query values
pub(crate) fn page_params(limit: Option<usize>, skip: Option<usize>) -> PageParams {
    let defaults = PageParams::default();
    PageParams::new(limit.unwrap_or(defaults.limit), skip.unwrap_or(defaults.skip))
}
