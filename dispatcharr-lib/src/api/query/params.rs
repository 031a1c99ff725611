//! List request parameters.

use super::Filters;
use super::Ordering;

/// Page size used by the server when none is requested.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Largest page size the server accepts.
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Parameters of a paged list request.
///
/// # Example
///
/// ```
/// use dispatcharr_lib::api::query::{ListParams, Ordering};
///
/// let params = ListParams::new(2, 50)
///     .ordering(Ordering::desc("name"))
///     .filter("channel_group_name", "Sports,News");
///
/// assert_eq!(
///     params.to_pairs(),
///     vec![
///         ("page".to_string(), "2".to_string()),
///         ("page_size".to_string(), "50".to_string()),
///         ("ordering".to_string(), "-name".to_string()),
///         ("channel_group_name".to_string(), "Sports,News".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub ordering: Option<Ordering>,
    pub filters: Filters,
}

impl ListParams {
    /// Creates parameters for the given 1-based page.
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            ordering: None,
            filters: Filters::new(),
        }
    }

    /// Sets the ordering.
    pub fn ordering(mut self, ordering: impl Into<Option<Ordering>>) -> Self {
        self.ordering = ordering.into();
        self
    }

    /// Adds a filter value.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.set(key, value);
        self
    }

    /// Replaces the filters.
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Query pairs for the ordering and filters only, without paging.
    ///
    /// Used by the id-enumeration endpoint, which matches the same rows as
    /// the list endpoint across all pages.
    pub fn filter_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering".to_string(), ordering.to_param()));
        }
        pairs.extend(
            self.filters
                .active()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        pairs
    }

    /// Full query pairs for the list endpoint.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(self.filter_pairs());
        pairs
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}
