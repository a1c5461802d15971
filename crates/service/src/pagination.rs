//! Pagination primitives for store queries.
//!
//! Page indexes are zero-based; sizes are clamped to a sane range so a caller
//! cannot request an unbounded slice.

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PageRequest {
    /// zero-based page index
    #[serde(default)]
    pub page: u32,
    /// items per page
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    10
}

impl PageRequest {
    /// Clamp the size to 1..=100 and convert to `u64` for the paginator.
    pub fn normalize(self) -> (u64, u64) {
        let size = self.size.clamp(1, 100);
        (self.page as u64, size as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: default_size() }
    }
}

/// One page of results plus the totals for the whole filtered set.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
