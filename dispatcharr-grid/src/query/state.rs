//! Pagination, sort and filter state.

use dispatcharr_lib::api::query::DEFAULT_PAGE_SIZE;
use dispatcharr_lib::api::query::Filters;
use dispatcharr_lib::api::query::ListParams;
use dispatcharr_lib::api::query::Ordering;

/// Direction of the active sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    None,
    Asc,
    Desc,
}

/// Single-field sort state.
///
/// Toggling the active field cycles `None → Asc → Desc → None`; toggling a
/// different field discards the previous one and starts at `Asc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    field: Option<String>,
    direction: SortDirection,
}

impl SortState {
    /// Sort on `field` in the given direction.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: Some(field.into()),
            direction,
        }
    }

    /// The active field, if it has a direction.
    pub fn field(&self) -> Option<&str> {
        match self.direction {
            SortDirection::None => None,
            _ => self.field.as_deref(),
        }
    }

    /// Direction of the active field.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Direction shown for `field`: `None` unless it is the active field.
    pub fn direction_of(&self, field: &str) -> SortDirection {
        if self.field.as_deref() == Some(field) {
            self.direction
        } else {
            SortDirection::None
        }
    }

    /// Advance the sort cycle for `field`.
    pub fn toggle(&mut self, field: &str) {
        if self.field.as_deref() == Some(field) {
            self.direction = match self.direction {
                SortDirection::None => SortDirection::Asc,
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::None,
            };
        } else {
            self.field = Some(field.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    /// The `ordering` parameter for this state, if sorted.
    pub fn to_ordering(&self) -> Option<Ordering> {
        let field = self.field()?;
        match self.direction {
            SortDirection::Asc => Some(Ordering::asc(field)),
            SortDirection::Desc => Some(Ordering::desc(field)),
            SortDirection::None => None,
        }
    }
}

/// Everything that determines which rows a table requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// 0-based page index.
    pub page_index: usize,
    pub page_size: usize,
    pub sort: SortState,
    /// Committed filter values.
    pub filters: Filters,
}

impl QueryState {
    /// First page, default size, unsorted and unfiltered.
    pub fn new() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortState::default(),
            filters: Filters::new(),
        }
    }

    /// Index of the page's first row among all matching rows.
    pub fn offset(&self) -> usize {
        self.page_index * self.page_size
    }

    /// Builds the list request for this state.
    pub fn to_params(&self) -> ListParams {
        ListParams::new(self.page_index + 1, self.page_size)
            .ordering(self.sort.to_ordering())
            .filters(self.filters.clone())
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of pages needed for `count` rows.
pub(crate) fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Human-readable "X to Y of Z" label for the current page.
pub(crate) fn range_text(page_index: usize, page_size: usize, count: usize) -> String {
    if count == 0 {
        return "0 to 0 of 0".to_string();
    }
    let start = (page_index * page_size + 1).min(count);
    let end = ((page_index + 1) * page_size).min(count);
    format!("{start} to {end} of {count}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycle_on_one_field() {
        let mut sort = SortState::default();
        assert_eq!(sort.direction_of("name"), SortDirection::None);

        let mut seen = Vec::new();
        for _ in 0..4 {
            sort.toggle("name");
            seen.push(sort.direction_of("name"));
        }

        assert_eq!(
            seen,
            vec![
                SortDirection::Asc,
                SortDirection::Desc,
                SortDirection::None,
                SortDirection::Asc,
            ]
        );
    }

    #[test]
    fn test_switching_field_starts_ascending() {
        let mut sort = SortState::new("name", SortDirection::Desc);
        sort.toggle("channel_group__name");
        assert_eq!(sort.direction_of("channel_group__name"), SortDirection::Asc);
        assert_eq!(sort.direction_of("name"), SortDirection::None);
        assert_eq!(sort.field(), Some("channel_group__name"));
    }

    #[test]
    fn test_ordering_param() {
        assert_eq!(SortState::default().to_ordering(), None);
        assert_eq!(
            SortState::new("name", SortDirection::Desc)
                .to_ordering()
                .map(|o| o.to_param()),
            Some("-name".to_string())
        );
        assert_eq!(SortState::new("name", SortDirection::None).field(), None);
    }

    #[test]
    fn test_params_use_one_based_page() {
        let mut state = QueryState::new();
        state.page_index = 2;
        state.page_size = 10;
        state.filters.set("name", "news");
        state.sort.toggle("name");

        let params = state.to_params();
        assert_eq!(params.page, 3);
        assert_eq!(params.page_size, 10);
        assert_eq!(params.ordering, Some(Ordering::asc("name")));
        assert_eq!(params.filters.get("name"), Some("news"));
    }

    #[test]
    fn test_page_count_and_range() {
        assert_eq!(page_count(0, 25), 0);
        assert_eq!(page_count(25, 25), 1);
        assert_eq!(page_count(26, 25), 2);
        assert_eq!(range_text(0, 25, 60), "1 to 25 of 60");
        assert_eq!(range_text(2, 25, 60), "51 to 60 of 60");
        assert_eq!(range_text(0, 25, 0), "0 to 0 of 0");
    }
}
