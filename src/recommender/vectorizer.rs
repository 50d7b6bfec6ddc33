use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{catalog::CatalogItem, tokenizer::tokenize, RecommendError};

/// Term to column mapping, frozen once built
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vocabulary {
    columns: BTreeMap<String, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary with columns assigned in lexicographic term order
    fn from_terms(terms: BTreeSet<String>) -> Self {
        let columns = terms
            .into_iter()
            .enumerate()
            .map(|(column, term)| (term, column))
            .collect();
        Self { columns }
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.columns.get(term).copied()
    }

    /// Terms in column order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Term-weight vector over a vocabulary
///
/// Logically dense with `len()` columns; only non-zero weights are stored,
/// sorted by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl Vector {
    /// Builds a vector from `(column, weight)` pairs.
    ///
    /// Zero weights and columns outside `dim` are discarded; repeated columns are summed.
    pub fn from_entries(dim: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (column, weight) in entries {
            if column < dim {
                *merged.entry(column).or_insert(0.0) += weight;
            }
        }
        let entries = merged.into_iter().filter(|(_, w)| *w != 0.0).collect();
        Self { dim, entries }
    }

    /// Builds a vector from a dense slice
    pub fn from_dense(values: &[f64]) -> Self {
        Self::from_entries(values.len(), values.iter().copied().enumerate())
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Number of columns, equal to the vocabulary size
    pub fn len(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// True when every weight is zero
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |(c, _)| *c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Non-zero `(column, weight)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (column, weight) in &self.entries {
            dense[*column] = *weight;
        }
        dense
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &Vector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
        self
    }
}

/// TF-IDF text vectorizer
///
/// Weight of term `t` in item `d` is `tf(t, d) * idf(t)` with
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, then each vector is L2-normalized.
pub struct TfidfVectorizer;

impl TfidfVectorizer {
    /// Fits a vocabulary over the catalog and returns one vector per item, in catalog order
    pub fn build(items: &[CatalogItem]) -> Result<(Vocabulary, Vec<Vector>), RecommendError> {
        Self::build_from_texts(items.iter().map(|item| item.combined_text.as_str()))
    }

    pub fn build_from_texts<'a>(
        texts: impl IntoIterator<Item = &'a str>,
    ) -> Result<(Vocabulary, Vec<Vector>), RecommendError> {
        let documents: Vec<Vec<String>> = texts.into_iter().map(tokenize).collect();
        if documents.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }

        let terms: BTreeSet<String> = documents.iter().flatten().cloned().collect();
        let vocabulary = Vocabulary::from_terms(terms);

        let mut doc_freq = vec![0usize; vocabulary.len()];
        let counts: Vec<HashMap<usize, usize>> = documents
            .iter()
            .map(|tokens| {
                let mut tf: HashMap<usize, usize> = HashMap::new();
                for token in tokens {
                    if let Some(column) = vocabulary.index_of(token) {
                        *tf.entry(column).or_insert(0) += 1;
                    }
                }
                for column in tf.keys() {
                    doc_freq[*column] += 1;
                }
                tf
            })
            .collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|df| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let dim = vocabulary.len();
        let vectors = counts
            .into_iter()
            .map(|tf| {
                Vector::from_entries(
                    dim,
                    tf.into_iter()
                        .map(|(column, count)| (column, count as f64 * idf[column])),
                )
                .normalized()
            })
            .collect();

        Ok((vocabulary, vectors))
    }
}
