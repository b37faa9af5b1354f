//! Pagination primitives shared across all list queries.

use serde::{Deserialize, Serialize};

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_LIMIT: u32 = 100;

    /// Default items per page.
    const DEFAULT_LIMIT: u32 = 10;

    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Zero-based inclusive row range `[(page-1)*limit, page*limit - 1]`.
    pub fn range(&self) -> (u64, u64) {
        let limit = u64::from(self.limit());
        let page = u64::from(self.current_page());
        ((page - 1) * limit, page * limit - 1)
    }
}

/// Paged result envelope returned by list queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let limit = pagination.limit();
        Self {
            items,
            total,
            page: pagination.current_page(),
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// `ceil(total / limit)`, never less than one page.
pub fn total_pages(total: i64, limit: u32) -> i64 {
    let limit = i64::from(limit.max(1));
    ((total.max(0) + limit - 1) / limit).max(1)
}
