use axum::{extract::State, http::StatusCode};

use crate::{
    api::{
        extract::Json,
        AppState,
    },
    error::AppResult,
    middleware::auth::CurrentUser,
    models::{Role, UserView},
    services::auth::{self, LoginRequest, Session, SignupRequest},
};

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    let user = auth::signup(&state.store, request, Role::User).await?;
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<Session>> {
    Ok(Json(auth::login(&state.store, request).await?))
}

pub async fn logout(State(state): State<AppState>, caller: CurrentUser) -> AppResult<StatusCode> {
    auth::logout(&state.store, &caller.token).await?;
    tracing::info!(user_id = %caller.user.id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(caller: CurrentUser) -> Json<UserView> {
    Json(UserView::from(caller.user))
}
