//! Page type for paginated query results.

use serde::Deserialize;

/// A page of list results with the total number of matches.
///
/// Mirrors the server's paginated envelope `{"count": N, "results": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<R> {
    /// Total number of rows matching the filters, across all pages.
    pub count: usize,
    /// The rows on this page.
    pub results: Vec<R>,
}

impl<R> Page<R> {
    /// Creates a new page.
    pub fn new(results: Vec<R>, count: usize) -> Self {
        Self { count, results }
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the number of rows on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Builds one page out of a complete, unpaged result list.
    ///
    /// `page` is 1-based. A page past the end yields no rows but keeps the
    /// full count.
    pub fn slice(all: Vec<R>, page: usize, page_size: usize) -> Self {
        let count = all.len();
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let results = all.into_iter().skip(start).take(page_size).collect();
        Self { count, results }
    }
}
