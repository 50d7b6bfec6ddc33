use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// Pagination parameters accepted on list endpoints
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub skip: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
        }
    }
}

impl PageParams {
    pub fn new(limit: usize, skip: usize) -> Self {
        Self { limit, skip }
    }

    /// Limit clamped to `1..=100`
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    /// Slices `all` according to `params`
    pub fn paginate(all: Vec<T>, params: PageParams) -> Self {
        let limit = params.effective_limit();
        let total = all.len();
        let items = all.into_iter().skip(params.skip).take(limit).collect();

        Self {
            items,
            total,
            page: params.skip / limit + 1,
            limit,
            pages: total.div_ceil(limit),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            pages: self.pages,
        }
    }
}
