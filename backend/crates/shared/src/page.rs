//! Pagination Primitives
//!
//! Page-number pagination shared by every list operation: a 1-based page
//! plus a per-page limit on the way in, items plus the total match count on
//! the way out. Whether an empty page is an error is the caller's decision.

use serde::{Deserialize, Serialize};

/// Default items per page when the caller does not say
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// A page request (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn first_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    /// Clamp zero or absent values to the defaults
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: if self.limit == 0 {
                DEFAULT_PAGE_LIMIT
            } else {
                self.limit
            },
        }
    }

    /// Rows to skip before this page starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: Page,
    /// Total matches across all pages
    pub total: u64,
}

impl<T> Paged<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page.limit))
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page.page) * u64::from(self.page.limit) < self.total
    }

    pub fn has_prev_page(&self) -> bool {
        self.page.page > 1
    }

    /// Map each item, keeping the page bookkeeping
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total: self.total,
        }
    }
}

/// Wire shape for one page of a list, with the bookkeeping a feed UI needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub success: bool,
    pub count: usize,
    pub current_page: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub data: Vec<T>,
}

impl<T> PagedResponse<T> {
    /// Build the envelope, converting each item with `f`
    pub fn from_paged<S>(paged: &Paged<S>, mut f: impl FnMut(&S) -> T) -> Self {
        Self {
            success: true,
            count: paged.items.len(),
            current_page: paged.page.page,
            total: paged.total,
            total_pages: paged.total_pages(),
            has_next_page: paged.has_next_page(),
            has_prev_page: paged.has_prev_page(),
            data: paged.items.iter().map(&mut f).collect(),
        }
    }
}
