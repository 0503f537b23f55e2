//! This module defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of expenses to return per page when not specified in a request.
    pub default_page_size: u64,
    /// The upper bound on `per_page` accepted from a request.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// One page of rows plus the counts a client needs to render pagination
/// controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The number of rows matching the query across all pages.
    pub total: u64,
    /// The number of pages at the requested page size.
    pub pages: u64,
    pub current_page: u64,
}

/// The number of pages needed to display `total` rows at `per_page` rows per
/// page. Zero rows means zero pages.
pub fn page_count(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1))
}

#[cfg(test)]
mod tests {
    use super::page_count;

    #[test]
    fn exact_multiple() {
        assert_eq!(page_count(40, 20), 2);
    }

    #[test]
    fn partial_last_page() {
        assert_eq!(page_count(41, 20), 3);
    }

    #[test]
    fn no_rows_means_no_pages() {
        assert_eq!(page_count(0, 20), 0);
    }

    #[test]
    fn zero_page_size_does_not_divide_by_zero() {
        assert_eq!(page_count(5, 0), 5);
    }
}
