use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

/// Account role; `Admin` is the only privilege level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Stored user account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Always stored lowercased
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User as returned to clients, without credentials
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl Record for User {
    type Filter = UserFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter
            .email
            .as_ref()
            .map_or(true, |email| self.email.eq_ignore_ascii_case(email))
            && filter.role.map_or(true, |role| self.role == role)
    }
}
