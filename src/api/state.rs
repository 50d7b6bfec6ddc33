use std::sync::Arc;

use crate::{config::Config, recommender::RecommenderHandle, store::Store};

/// Shared application state, built once at startup and injected into handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub recommender: RecommenderHandle,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, recommender: RecommenderHandle, config: Config) -> Self {
        Self {
            store,
            recommender,
            config: Arc::new(config),
        }
    }
}
