use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{HotelFilter, ReservationFilter, Role, User, UserFilter},
    services::payments::total_revenue,
    store::Store,
};

/// Partial update applied by an administrator
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStats {
    pub hotels_count: usize,
    pub users_count: usize,
    pub reservations_count: usize,
    pub total_revenue: f64,
}

pub async fn get_user(store: &Store, id: Uuid) -> AppResult<User> {
    store
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
}

pub async fn update_user(store: &Store, id: Uuid, request: UpdateUserRequest) -> AppResult<User> {
    let mut user = get_user(store, id).await?;

    if let Some(first_name) = request.first_name {
        if first_name.trim().is_empty() {
            return Err(AppError::InvalidInput("first_name cannot be blank".to_string()));
        }
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = request.last_name {
        if last_name.trim().is_empty() {
            return Err(AppError::InvalidInput("last_name cannot be blank".to_string()));
        }
        user.last_name = last_name.trim().to_string();
    }
    if let Some(phone) = request.phone {
        user.phone = Some(phone).filter(|p| !p.trim().is_empty());
    }
    if let Some(role) = request.role {
        user.role = role;
    }

    store
        .users
        .update(user)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
}

/// Deletes an account and closes all of its sessions
pub async fn delete_user(store: &Store, id: Uuid) -> AppResult<()> {
    if !store.users.delete(id).await? {
        return Err(AppError::NotFound(format!("User {}", id)));
    }
    let revoked = store.sessions.revoke_user(id).await?;
    tracing::info!(user_id = %id, revoked_sessions = revoked, "User deleted");
    Ok(())
}

pub async fn dashboard_stats(store: &Store) -> AppResult<DashboardStats> {
    Ok(DashboardStats {
        hotels_count: store.hotels.count(&HotelFilter::default()).await?,
        users_count: store.users.count(&UserFilter::default()).await?,
        reservations_count: store
            .reservations
            .count(&ReservationFilter::default())
            .await?,
        total_revenue: total_revenue(store).await?,
    })
}
