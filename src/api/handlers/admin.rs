//! Administrator views over accounts and the dashboard.

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
    middleware::auth::AdminUser,
    models::{Page, Role, UserFilter, UserView},
    services::users::{self, DashboardStats, UpdateUserRequest},
};

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Page<UserView>>> {
    let filter = UserFilter {
        email: query.email,
        role: query.role,
    };
    let page = page_params(query.limit, query.skip);
    let users = state.store.users.list(&filter, page).await?;
    Ok(Json(users.map(UserView::from)))
}

pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserView>> {
    Ok(Json(users::get_user(&state.store, id).await?.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<UserView>> {
    Ok(Json(users::update_user(&state.store, id, request).await?.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if admin.id == id {
        return Err(AppError::InvalidInput(
            "Administrators cannot delete their own account".to_string(),
        ));
    }
    users::delete_user(&state.store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(users::dashboard_stats(&state.store).await?))
}
