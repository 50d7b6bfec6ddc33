use super::{vectorizer::Vector, RecommendError};

/// One nearest-neighbor hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Catalog position of the matched item
    pub index: usize,
    /// Cosine distance to the query vector, lower is more similar
    pub distance: f64,
}

/// `1 - cosine_similarity(a, b)`.
///
/// A zero vector has similarity 0 with everything.
pub fn cosine_distance(a: &Vector, b: &Vector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 1.0;
    }
    1.0 - a.dot(b) / denom
}

/// Brute-force nearest-neighbor index over item vectors
///
/// Read-only once built. Every query scans all stored vectors.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    vectors: Vec<Vector>,
}

impl SimilarityIndex {
    pub fn build(vectors: Vec<Vector>) -> Self {
        Self { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vector(&self, index: usize) -> Option<&Vector> {
        self.vectors.get(index)
    }

    /// Returns the `k` stored vectors closest to `vector`.
    ///
    /// Sorted by ascending distance; equal distances keep catalog order.
    pub fn query(&self, vector: &Vector, k: usize) -> Result<Vec<Neighbor>, RecommendError> {
        let size = self.vectors.len();
        if k == 0 || k > size {
            return Err(RecommendError::InvalidK { k, size });
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, stored)| Neighbor {
                index,
                distance: cosine_distance(vector, stored),
            })
            .collect();

        // sort_by is stable, which gives the catalog-order tie break
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);

        Ok(neighbors)
    }
}
