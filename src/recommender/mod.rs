//! Content-based hotel recommender.
//!
//! The catalog's combined text is vectorized with TF-IDF once, stored in a
//! brute-force cosine index, and queried by hotel name. Everything built here
//! is immutable; a catalog change means building a new [`Recommender`] and
//! swapping it in through a [`RecommenderHandle`].

use serde::Serialize;
use std::collections::HashMap;

pub mod catalog;
pub mod handle;
pub mod index;
pub mod tokenizer;
pub mod vectorizer;

pub use catalog::{Catalog, CatalogError, CatalogItem, HotelRecord};
pub use handle::RecommenderHandle;
pub use index::{cosine_distance, Neighbor, SimilarityIndex};
pub use vectorizer::{TfidfVectorizer, Vector, Vocabulary};

/// Number of recommendations returned when the caller does not ask for a count
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Errors produced while building or querying the recommender
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Cannot build a recommender from an empty catalog")]
    EmptyCatalog,

    #[error("k must be between 1 and {size}, got {k}")]
    InvalidK { k: usize, size: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Hotel not found: {0}")]
    NotFound(String),
}

/// Display record returned for each recommended hotel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub region: String,
    pub city: String,
    pub name: String,
    pub rating: String,
    pub address: String,
}

impl From<&CatalogItem> for ItemSummary {
    fn from(item: &CatalogItem) -> Self {
        Self {
            region: item.region.clone(),
            city: item.city.clone(),
            name: item.name.clone(),
            rating: item.rating.clone(),
            address: item.address.clone(),
        }
    }
}

/// Built recommender for one catalog load generation
#[derive(Debug)]
pub struct Recommender {
    generation: u64,
    items: Vec<CatalogItem>,
    vocabulary: Vocabulary,
    index: SimilarityIndex,
    /// Lowercased name to catalog position, first occurrence wins
    names: HashMap<String, usize>,
}

impl Recommender {
    /// Vectorizes the catalog and builds the similarity index
    pub fn build(catalog: Catalog, generation: u64) -> Result<Self, RecommendError> {
        let (vocabulary, vectors) = TfidfVectorizer::build(catalog.items())?;
        let index = SimilarityIndex::build(vectors);

        let items = catalog.items().to_vec();
        let mut names = HashMap::with_capacity(items.len());
        let mut duplicates = 0usize;
        for item in &items {
            let key = normalize_name(&item.name);
            if names.contains_key(&key) {
                duplicates += 1;
            } else {
                names.insert(key, item.position);
            }
        }

        if duplicates > 0 {
            tracing::warn!(
                duplicates,
                "Catalog contains duplicate hotel names, first occurrence is used for lookups"
            );
        }

        tracing::info!(
            generation,
            catalog_size = items.len(),
            vocabulary_size = vocabulary.len(),
            "Recommender built"
        );

        Ok(Self {
            generation,
            items,
            vocabulary,
            index,
            names,
        })
    }

    /// Returns the `count` hotels most similar to `name`, closest first.
    ///
    /// Lookup is case-insensitive and the queried hotel is never part of the result.
    pub fn recommend(&self, name: &str, count: usize) -> Result<Vec<ItemSummary>, RecommendError> {
        let position = *self
            .names
            .get(&normalize_name(name))
            .ok_or_else(|| RecommendError::NotFound(name.trim().to_string()))?;

        if count == 0 {
            return Err(RecommendError::InvalidArgument(
                "count must be at least 1".to_string(),
            ));
        }
        if count >= self.items.len() {
            return Err(RecommendError::InvalidArgument(format!(
                "count must be less than the catalog size ({}), got {}",
                self.items.len(),
                count
            )));
        }

        let vector = self
            .index
            .vector(position)
            .ok_or_else(|| RecommendError::NotFound(name.trim().to_string()))?;
        let mut neighbors = self.index.query(vector, count + 1)?;

        match neighbors.iter().position(|n| n.index == position) {
            Some(own) => {
                neighbors.remove(own);
            }
            None => {
                neighbors.pop();
            }
        }

        Ok(neighbors
            .iter()
            .map(|n| ItemSummary::from(&self.items[n.index]))
            .collect())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn item(&self, position: usize) -> Option<&CatalogItem> {
        self.items.get(position)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
