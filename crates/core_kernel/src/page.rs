//! Pagination primitives for list operations
//!
//! Store ports that return large result sets take a [`PageRequest`] and
//! return a [`Page`], so callers always know the total count alongside the
//! slice they received.

use serde::{Deserialize, Serialize};

/// A request for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u32 = 10;

    /// Creates a page request; a zero `per_page` falls back to the default
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: if per_page == 0 {
                Self::DEFAULT_PER_PAGE
            } else {
                per_page
            },
        }
    }

    /// Number of items to skip before this page starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_PER_PAGE)
    }
}

/// One page of results plus the total count across all pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a page from a slice of items and the overall total
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    /// An empty page for the given request
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Total number of pages at the current page size
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    /// Maps the items of this page, preserving the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest::new(3, 25);
        assert_eq!(request.offset(), 75);
    }

    #[test]
    fn test_page_request_zero_per_page_uses_default() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.per_page, PageRequest::DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(0, 10), 21);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_map_preserves_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(2, 2), 9);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1", "2"]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.total, 9);
    }
}
