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
    middleware::auth::{AdminUser, CurrentUser},
    models::{Page, Payment, PaymentFilter, PaymentStatus},
    services::payments::{self, PaymentRequest},
};

#[derive(Debug, Default, Deserialize)]
pub struct PaymentQuery {
    pub user_id: Option<Uuid>,
    pub reservation_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: PaymentStatus,
}

pub async fn pay(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(request): Json<PaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let payment = payments::pay(&state.store, &caller.user, request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list_payments(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<PaymentQuery>,
) -> AppResult<Json<Page<Payment>>> {
    let filter = PaymentFilter {
        user_id: query.user_id,
        reservation_id: query.reservation_id,
        status: query.status,
    };
    let page = page_params(query.limit, query.skip);
    Ok(Json(state.store.payments.list(&filter, page).await?))
}

pub async fn get_payment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    Ok(Json(payments::get_payment(&state.store, id).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<Json<Payment>> {
    Ok(Json(payments::set_status(&state.store, id, update.status).await?))
}

pub async fn refund(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    let payment = payments::refund(&state.store, id).await?;
    tracing::info!(payment_id = %id, admin_id = %admin.id, "Payment refunded");
    Ok(Json(payment))
}
