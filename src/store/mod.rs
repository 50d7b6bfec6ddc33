//! Persistence boundary for users, hotels, reservations, payments and sessions.
//!
//! Handlers and services only see the traits defined here; `Store::in_memory`
//! wires the in-process implementation used by the binary and the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Hotel, Page, PageParams, Payment, Reservation, User},
};

pub mod memory;

pub use memory::{MemoryRepository, MemorySessionStore};

/// A record kept in a [`Repository`]
pub trait Record: Clone + Send + Sync + 'static {
    type Filter: Send + Sync;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// Guard run by [`Repository::insert_checked`] over the records in scope
pub type InsertGuard<T> = Box<dyn FnOnce(&[&T]) -> AppResult<()> + Send>;

/// CRUD access to one collection of records
///
/// Listings are ordered by creation time, then id, so pagination is stable.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Stores a new record; fails with a conflict if the id is taken
    async fn insert(&self, record: T) -> AppResult<T>;

    /// Inserts `record` only if `guard` accepts the records matching `scope`.
    ///
    /// The guard and the write happen under one lock, so no other insert can
    /// slip in between them.
    async fn insert_checked(
        &self,
        record: T,
        scope: &T::Filter,
        guard: InsertGuard<T>,
    ) -> AppResult<T>;

    /// Inserts `record` unless a record matching `unique` already exists
    async fn insert_unique(&self, record: T, unique: &T::Filter, conflict: String) -> AppResult<T> {
        let guard: InsertGuard<T> = Box::new(move |existing: &[&T]| {
            if existing.is_empty() {
                Ok(())
            } else {
                Err(AppError::Conflict(conflict))
            }
        });
        self.insert_checked(record, unique, guard).await
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<T>>;

    /// Every record matching `filter`
    async fn find(&self, filter: &T::Filter) -> AppResult<Vec<T>>;

    async fn list(&self, filter: &T::Filter, page: PageParams) -> AppResult<Page<T>>;

    async fn count(&self, filter: &T::Filter) -> AppResult<usize>;

    /// Replaces an existing record, returning `None` if it does not exist
    async fn update(&self, record: T) -> AppResult<Option<T>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Bearer-token sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens a session and returns its token
    async fn create(&self, user_id: Uuid) -> AppResult<String>;

    /// User owning `token`, if the session exists
    async fn resolve(&self, token: &str) -> AppResult<Option<Uuid>>;

    async fn revoke(&self, token: &str) -> AppResult<bool>;

    /// Drops every session of a user, returning how many were removed
    async fn revoke_user(&self, user_id: Uuid) -> AppResult<usize>;
}

/// Handles to every collection, shared by the whole application
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Repository<User>>,
    pub hotels: Arc<dyn Repository<Hotel>>,
    pub reservations: Arc<dyn Repository<Reservation>>,
    pub payments: Arc<dyn Repository<Payment>>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Store {
    /// Store backed by process memory
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryRepository::<User>::new()),
            hotels: Arc::new(MemoryRepository::<Hotel>::new()),
            reservations: Arc::new(MemoryRepository::<Reservation>::new()),
            payments: Arc::new(MemoryRepository::<Payment>::new()),
            sessions: Arc::new(MemorySessionStore::new()),
        }
    }
}
