use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use super::page_params;
use crate::{
    api::{
        extract::{Json, Path, Query},
        AppState,
    },
    error::{AppError, AppResult},
    middleware::auth::{AdminUser, CurrentUser},
    models::{Page, Reservation, ReservationFilter, ReservationStatus},
    services::reservations::{
        self, Availability, AvailabilityRequest, CreateReservationRequest,
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct ReservationQuery {
    pub user_id: Option<Uuid>,
    pub hotel_id: Option<Uuid>,
    pub status: Option<ReservationStatus>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ReservationStatus,
}

pub async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<AvailabilityRequest>,
) -> AppResult<Json<Availability>> {
    Ok(Json(reservations::check_availability(&state.store, request).await?))
}

pub async fn create_reservation(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(request): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = reservations::create_reservation(&state.store, &caller.user, request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Reservations of the calling user
pub async fn my_reservations(
    State(state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<Page<Reservation>>> {
    let filter = ReservationFilter {
        user_id: Some(caller.user.id),
        hotel_id: query.hotel_id,
        status: query.status,
    };
    let page = page_params(query.limit, query.skip);
    Ok(Json(state.store.reservations.list(&filter, page).await?))
}

pub async fn list_reservations(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<Page<Reservation>>> {
    let filter = ReservationFilter {
        user_id: query.user_id,
        hotel_id: query.hotel_id,
        status: query.status,
    };
    let page = page_params(query.limit, query.skip);
    Ok(Json(state.store.reservations.list(&filter, page).await?))
}

pub async fn get_reservation(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(reservations::get_reservation(&state.store, id).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(reservations::set_status(&state.store, id, update.status).await?))
}

pub async fn delete_reservation(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.store.reservations.delete(id).await? {
        return Err(AppError::NotFound(format!("Reservation {}", id)));
    }
    tracing::info!(reservation_id = %id, "Reservation deleted");
    Ok(StatusCode::NO_CONTENT)
}
