//! Pagination request/response types.

use serde::{Deserialize, Serialize};

/// A page request with 1-based page number and page size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.page_size
    }

    /// Number of rows to fetch.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// A page of results with total count metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Current 1-based page number.
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
    /// Total item count across all pages.
    pub total: u64,
}

impl<T> PageResponse<T> {
    /// Assemble a page of results.
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total: u64) -> Self {
        Self {
            items,
            page,
            page_size,
            total,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    50
}
