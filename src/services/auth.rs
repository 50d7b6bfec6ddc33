use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Role, User, UserFilter, UserView},
    store::Store,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued on successful login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: UserView,
}

/// Hashes a password into an Argon2id PHC string
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Checks a password against a stored PHC string; malformed hashes never verify
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

async fn hash_password_blocking(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

async fn verify_password_blocking(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Minimal shape check: `local@domain.tld`
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn validate_signup(request: &SignupRequest) -> AppResult<()> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "First and last name are required".to_string(),
        ));
    }
    if !is_valid_email(request.email.trim()) {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Looks a user up by email, ignoring case
pub async fn find_by_email(store: &Store, email: &str) -> AppResult<Option<User>> {
    let filter = UserFilter {
        email: Some(email.trim().to_lowercase()),
        role: None,
    };
    Ok(store.users.find(&filter).await?.into_iter().next())
}

/// Registers a new account with the given role
pub async fn signup(store: &Store, request: SignupRequest, role: Role) -> AppResult<User> {
    validate_signup(&request)?;

    let email = request.email.trim().to_lowercase();
    if find_by_email(store, &email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "An account already exists for {}",
            email
        )));
    }

    let password_hash = hash_password_blocking(request.password).await?;
    let user = User {
        id: Uuid::new_v4(),
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        email,
        phone: request.phone.filter(|phone| !phone.trim().is_empty()),
        role,
        password_hash,
        created_at: Utc::now(),
    };

    // Email uniqueness is enforced under the store lock
    let unique = UserFilter {
        email: Some(user.email.clone()),
        role: None,
    };
    let conflict = format!("An account already exists for {}", user.email);
    let user = store.users.insert_unique(user, &unique, conflict).await?;
    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");
    Ok(user)
}

/// Verifies credentials and opens a session
pub async fn login(store: &Store, request: LoginRequest) -> AppResult<Session> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = find_by_email(store, &request.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password_blocking(request.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = %user.id, "Rejected login attempt");
        return Err(invalid());
    }

    let token = store.sessions.create(user.id).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Session {
        token,
        user: UserView::from(&user),
    })
}

pub async fn logout(store: &Store, token: &str) -> AppResult<()> {
    store.sessions.revoke(token).await?;
    Ok(())
}

/// Resolves a bearer token to its user
pub async fn authenticate(store: &Store, token: &str) -> AppResult<User> {
    let user_id = store
        .sessions
        .resolve(token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    store
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session user no longer exists".to_string()))
}

/// Ensures an admin account exists for `email`.
///
/// An existing account with that email is promoted instead of recreated.
pub async fn seed_admin(store: &Store, email: &str, password: &str) -> AppResult<User> {
    if let Some(mut existing) = find_by_email(store, email).await? {
        if !existing.is_admin() {
            existing.role = Role::Admin;
            store.users.update(existing.clone()).await?;
            tracing::info!(user_id = %existing.id, "Promoted existing account to admin");
        }
        return Ok(existing);
    }

    let request = SignupRequest {
        first_name: "Admin".to_string(),
        last_name: "Account".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        phone: None,
    };
    signup(store, request, Role::Admin).await
}
