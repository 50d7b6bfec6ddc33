use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};

use super::{Catalog, RecommendError, Recommender};

/// Shared reference to the recommender currently serving queries.
///
/// Readers take a cloned `Arc` and keep using it for the whole request, so a
/// concurrent [`RecommenderHandle::replace`] never affects a query in flight.
#[derive(Clone)]
pub struct RecommenderHandle {
    current: Arc<RwLock<Arc<Recommender>>>,
    next_generation: Arc<AtomicU64>,
}

impl RecommenderHandle {
    pub fn new(recommender: Recommender) -> Self {
        let next_generation = recommender.generation() + 1;
        Self {
            current: Arc::new(RwLock::new(Arc::new(recommender))),
            next_generation: Arc::new(AtomicU64::new(next_generation)),
        }
    }

    /// Builds the first generation from a catalog
    pub fn build(catalog: Catalog) -> Result<Self, RecommendError> {
        Ok(Self::new(Recommender::build(catalog, 1)?))
    }

    /// Recommender to use for one query
    pub fn current(&self) -> Arc<Recommender> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Reserves the generation number for the next rebuild
    pub fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }

    /// Swaps in a freshly built recommender and returns the one now serving.
    ///
    /// A rebuild that finishes after a newer generation was installed is
    /// discarded, so the served generation never goes backwards.
    pub fn replace(&self, recommender: Recommender) -> Arc<Recommender> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if recommender.generation() < guard.generation() {
            tracing::warn!(
                stale = recommender.generation(),
                serving = guard.generation(),
                "Discarding stale recommender generation"
            );
            return Arc::clone(&guard);
        }

        *guard = Arc::new(recommender);
        Arc::clone(&guard)
    }
}
