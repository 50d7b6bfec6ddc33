use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use super::page_params;
use crate::{
    api::{
        extract::{Json, Path, Query},
        AppState,
    },
    error::AppResult,
    middleware::auth::AdminUser,
    models::{Hotel, HotelFilter, HotelInput, HotelStatus, Page, PageParams},
    services::hotels,
};

/// Query string of hotel listings: filters plus pagination
#[derive(Debug, Default, Deserialize)]
pub struct HotelQuery {
    pub city: Option<String>,
    pub country: Option<String>,
    pub rating: Option<String>,
    pub status: Option<HotelStatus>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

impl HotelQuery {
    fn split(self) -> (HotelFilter, PageParams) {
        (
            HotelFilter {
                city: self.city,
                country: self.country,
                rating: self.rating,
                status: self.status,
            },
            page_params(self.limit, self.skip),
        )
    }
}

pub async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelQuery>,
) -> AppResult<Json<Page<Hotel>>> {
    let (filter, page) = query.split();
    Ok(Json(state.store.hotels.list(&filter, page).await?))
}

pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Hotel>> {
    Ok(Json(hotels::get_hotel(&state.store, id).await?))
}

pub async fn create_hotel(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<HotelInput>,
) -> AppResult<(StatusCode, Json<Hotel>)> {
    let hotel = hotels::create_hotel(&state.store, input).await?;
    Ok((StatusCode::CREATED, Json(hotel)))
}

pub async fn update_hotel(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(input): Json<HotelInput>,
) -> AppResult<Json<Hotel>> {
    Ok(Json(hotels::update_hotel(&state.store, id, input).await?))
}

pub async fn delete_hotel(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    hotels::delete_hotel(&state.store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Admin listing; same filters, every status visible
pub async fn admin_list_hotels(
    state: State<AppState>,
    _admin: AdminUser,
    query: Query<HotelQuery>,
) -> AppResult<Json<Page<Hotel>>> {
    list_hotels(state, query).await
}

pub async fn admin_get_hotel(
    state: State<AppState>,
    _admin: AdminUser,
    id: Path<Uuid>,
) -> AppResult<Json<Hotel>> {
    get_hotel(state, id).await
}
