use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InsertGuard, Record, Repository, SessionStore};
use crate::{
    error::{AppError, AppResult},
    models::{Page, PageParams},
};

/// Repository holding records in a `HashMap` behind an async lock
pub struct MemoryRepository<T: Record> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn sorted_matches(&self, filter: &T::Filter) -> Vec<T> {
        let records = self.records.read().await;
        let mut matching: Vec<T> = records
            .values()
            .filter(|record| record.matches(filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        matching
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn insert(&self, record: T) -> AppResult<T> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id()) {
            return Err(AppError::Conflict(format!(
                "Record {} already exists",
                record.id()
            )));
        }
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn insert_checked(
        &self,
        record: T,
        scope: &T::Filter,
        guard: InsertGuard<T>,
    ) -> AppResult<T> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id()) {
            return Err(AppError::Conflict(format!(
                "Record {} already exists",
                record.id()
            )));
        }

        let in_scope: Vec<&T> = records.values().filter(|r| r.matches(scope)).collect();
        guard(&in_scope)?;

        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<T>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: &T::Filter) -> AppResult<Vec<T>> {
        Ok(self.sorted_matches(filter).await)
    }

    async fn list(&self, filter: &T::Filter, page: PageParams) -> AppResult<Page<T>> {
        Ok(Page::paginate(self.sorted_matches(filter).await, page))
    }

    async fn count(&self, filter: &T::Filter) -> AppResult<usize> {
        let records = self.records.read().await;
        Ok(records.values().filter(|record| record.matches(filter)).count())
    }

    async fn update(&self, record: T) -> AppResult<Option<T>> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }
}

/// Session store mapping random tokens to user ids
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Uuid>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: Uuid) -> AppResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.write().await.insert(token.clone(), user_id);
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> AppResult<Option<Uuid>> {
        Ok(self.sessions.read().await.get(token).copied())
    }

    async fn revoke(&self, token: &str) -> AppResult<bool> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }

    async fn revoke_user(&self, user_id: Uuid) -> AppResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, owner| *owner != user_id);
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hotel, HotelFilter, HotelInput, HotelStatus};

    fn hotel(name: &str, city: &str) -> Hotel {
        Hotel::new(HotelInput {
            name: name.to_string(),
            country: "Morocco".to_string(),
            city: city.to_string(),
            rating: "ThreeStar".to_string(),
            address: String::new(),
            description: String::new(),
            facilities: String::new(),
            rooms: 5,
            price_per_night: 60.0,
            status: HotelStatus::Active,
        })
    }

    #[tokio::test]
    async fn test_insert_get_update_delete() {
        let repo = MemoryRepository::<Hotel>::new();
        let mut created = repo.insert(hotel("Riad", "Fes")).await.unwrap();

        assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));

        created.name = "Riad Fes".to_string();
        let updated = repo.update(created.clone()).await.unwrap();
        assert_eq!(updated.map(|h| h.name), Some("Riad Fes".to_string()));

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert_eq!(repo.get(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_conflicts() {
        let repo = MemoryRepository::<Hotel>::new();
        let record = hotel("Riad", "Fes");
        repo.insert(record.clone()).await.unwrap();
        let err = repo.insert(record).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_insert_unique_rejects_match_in_scope() {
        let repo = MemoryRepository::<Hotel>::new();
        let in_fes = HotelFilter {
            city: Some("Fes".to_string()),
            ..Default::default()
        };

        repo.insert_unique(hotel("Riad", "Fes"), &in_fes, "taken".to_string())
            .await
            .unwrap();
        let err = repo
            .insert_unique(hotel("Dar", "Fes"), &in_fes, "taken".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "taken"));

        let in_rabat = HotelFilter {
            city: Some("Rabat".to_string()),
            ..Default::default()
        };
        repo.insert_unique(hotel("Dar", "Rabat"), &in_rabat, "taken".to_string())
            .await
            .unwrap();
        assert_eq!(repo.count(&HotelFilter::default()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_checked_guard_sees_scope_only() {
        let repo = MemoryRepository::<Hotel>::new();
        repo.insert(hotel("Riad", "Fes")).await.unwrap();
        repo.insert(hotel("Dar", "Rabat")).await.unwrap();

        let in_fes = HotelFilter {
            city: Some("Fes".to_string()),
            ..Default::default()
        };
        let err = repo
            .insert_checked(
                hotel("Kasbah", "Fes"),
                &in_fes,
                Box::new(|existing: &[&Hotel]| {
                    assert_eq!(existing.len(), 1);
                    Err(AppError::Conflict("full".to_string()))
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.count(&in_fes).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_insert_unique_admits_one() {
        let repo = Arc::new(MemoryRepository::<Hotel>::new());
        let in_fes = HotelFilter {
            city: Some("Fes".to_string()),
            ..Default::default()
        };

        let attempts: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let scope = in_fes.clone();
                tokio::spawn(async move {
                    repo.insert_unique(hotel(&format!("Riad {}", i), "Fes"), &scope, "taken".to_string())
                        .await
                })
            })
            .collect();

        let mut admitted = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(repo.count(&in_fes).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = MemoryRepository::<Hotel>::new();
        assert_eq!(repo.update(hotel("Ghost", "Rabat")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = MemoryRepository::<Hotel>::new();
        for i in 0..5 {
            repo.insert(hotel(&format!("Fes {}", i), "Fes")).await.unwrap();
        }
        repo.insert(hotel("Rabat 0", "Rabat")).await.unwrap();

        let filter = HotelFilter {
            city: Some("Fes".to_string()),
            ..Default::default()
        };
        let page = repo.list(&filter, PageParams::new(2, 2)).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.pages, 3);
        assert!(page.items.iter().all(|h| h.city == "Fes"));

        assert_eq!(repo.count(&HotelFilter::default()).await.unwrap(), 6);
    }

    #[test]
    fn test_sessions_round_trip() {
        let sessions = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        let token = tokio_test::block_on(sessions.create(user_id)).unwrap();
        assert_eq!(
            tokio_test::block_on(sessions.resolve(&token)).unwrap(),
            Some(user_id)
        );

        assert!(tokio_test::block_on(sessions.revoke(&token)).unwrap());
        assert_eq!(tokio_test::block_on(sessions.resolve(&token)).unwrap(), None);
    }

    #[test]
    fn test_revoke_user_drops_all_sessions() {
        let sessions = MemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let other = Uuid::new_v4();

        tokio_test::block_on(async {
            sessions.create(user_id).await.unwrap();
            sessions.create(user_id).await.unwrap();
            let kept = sessions.create(other).await.unwrap();

            assert_eq!(sessions.revoke_user(user_id).await.unwrap(), 2);
            assert_eq!(sessions.resolve(&kept).await.unwrap(), Some(other));
        });
    }
}
