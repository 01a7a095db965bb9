use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 6;
pub const MAX_PAGE_SIZE: u64 = 50;

/// `max(1, ceil(total / page_size))`
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Lenient query-string parsing: anything that is not a positive integer falls
    /// back to the defaults.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let page_size = parse_positive(page_size)
            .map(|size| size.min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, page_size }
    }

    /// Rows to skip. `None` when the page lies beyond anything the store can
    /// address, which only happens for pages past the end.
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1)
            .checked_mul(self.page_size)
            .filter(|offset| *offset <= i64::MAX as u64)
    }

    /// Same size, page pulled back to the last one that exists.
    pub fn clamped(&self, total: u64) -> Self {
        Self {
            page: self.page.min(total_pages(total, self.page_size)),
            page_size: self.page_size,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<i64>().ok().filter(|n| *n > 0).map(|n| n as u64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: total_pages(total, request.page_size),
        }
    }
}
