//! The controller that keeps one table in sync with its gateway.

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dispatcharr_lib::api::Gateway;
use dispatcharr_lib::api::query::Filters;
use dispatcharr_lib::api::query::MAX_PAGE_SIZE;
use dispatcharr_lib::error::Error;
use dispatcharr_lib::model::Actor;
use dispatcharr_lib::model::Row;
use dispatcharr_lib::model::RowId;
use log::debug;
use log::error;
use log::info;
use log::warn;

use crate::reorder::splice_page;
use crate::selection::CheckState;
use crate::selection::SelectionSet;
use crate::table::TableSnapshot;
use crate::timer::Debouncer;

use super::state::QueryState;
use super::state::page_count;
use super::state::range_text;

/// Errors from user actions that mutate remote data.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The actor lacks the privilege the action requires.
    #[error("{action} requires admin privileges")]
    Unauthorized { action: &'static str },

    /// The action needs at least one selected row.
    #[error("No rows selected")]
    EmptySelection,

    /// The gateway call failed.
    #[error(transparent)]
    Gateway(#[from] Error),
}

/// What happened to the response of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the displayed data.
    Applied,
    /// A newer fetch had already been applied; the response was discarded.
    Superseded,
    /// The gateway failed; the previous data is still displayed.
    Failed,
}

/// Internal state for the controller.
#[derive(Debug)]
pub(crate) struct QueryInner<R> {
    /// Requested query. Ahead of `applied` while a fetch is outstanding.
    state: QueryState,
    /// Query the displayed rows were fetched with.
    applied: QueryState,
    /// Filter edits waiting for the debounce window to close.
    staged: Filters,
    rows: Vec<R>,
    total_count: usize,
    page_count: usize,
    range_text: String,
    /// Every ID matching the committed filters, across all pages.
    all_ids: Vec<RowId>,
    selection: SelectionSet,
    loading: bool,
    /// Sequence number of the response currently displayed.
    applied_seq: u64,
    last_error: Option<String>,
}

impl<R> QueryInner<R> {
    fn new(state: QueryState) -> Self {
        Self {
            staged: state.filters.clone(),
            applied: state.clone(),
            state,
            rows: Vec::new(),
            total_count: 0,
            page_count: 0,
            range_text: range_text(0, 0, 0),
            all_ids: Vec::new(),
            selection: SelectionSet::new(),
            loading: false,
            applied_seq: 0,
            last_error: None,
        }
    }
}

/// Query State Controller for one table.
///
/// Cheap to clone; clones share state. Row data is replaced wholesale by each
/// successful fetch, and the selection is reconciled against the full ID
/// enumeration returned with it.
///
/// Fetches carry a monotonic sequence number. A response is applied only if
/// no newer response has been applied already, so a slow answer to an old
/// query cannot overwrite the answer to a newer one.
///
/// # Example
///
/// ```ignore
/// let table = QueryController::new(Arc::new(client.streams()));
/// table.fetch().await;
///
/// table.set_filter("name", "news");   // committed after 500 ms of quiet
/// table.set_sort("name").await;       // ascending
/// table.set_page_index(2).await;      // second page
/// ```
pub struct QueryController<G: Gateway> {
    gateway: Arc<G>,
    inner: Arc<RwLock<QueryInner<G::Row>>>,
    debouncer: Arc<Debouncer>,
    issued: Arc<AtomicU64>,
}

impl<G: Gateway> Clone for QueryController<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            inner: self.inner.clone(),
            debouncer: self.debouncer.clone(),
            issued: self.issued.clone(),
        }
    }
}

impl<G: Gateway + 'static> QueryController<G> {
    /// Create a controller on the first page with default settings.
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_state(gateway, QueryState::new())
    }

    /// Create a controller starting from `state`.
    pub fn with_state(gateway: Arc<G>, state: QueryState) -> Self {
        Self {
            gateway,
            inner: Arc::new(RwLock::new(QueryInner::new(state))),
            debouncer: Arc::new(Debouncer::default()),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The gateway this controller fetches from.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    fn read(&self) -> RwLockReadGuard<'_, QueryInner<G::Row>> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, QueryInner<G::Row>> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }

    // -------------------------------------------------------------------------
    // State access
    // -------------------------------------------------------------------------

    /// Requested query state (committed filters only).
    ///
    /// Differs from the displayed one only while a fetch is outstanding; a
    /// failed fetch reverts it.
    pub fn state(&self) -> QueryState {
        self.read().state.clone()
    }

    /// Filter values as typed, including edits not yet committed.
    pub fn staged_filters(&self) -> Filters {
        self.read().staged.clone()
    }

    /// Rows of the last applied response.
    pub fn rows(&self) -> Vec<G::Row> {
        self.read().rows.clone()
    }

    /// IDs of the loaded rows, in display order.
    pub fn row_ids(&self) -> Vec<RowId> {
        self.read().rows.iter().map(Row::id).collect()
    }

    /// Total number of rows matching the committed filters.
    pub fn total_count(&self) -> usize {
        self.read().total_count
    }

    /// Number of pages at the current page size.
    pub fn page_count(&self) -> usize {
        self.read().page_count
    }

    /// "X to Y of Z" label for the loaded page.
    pub fn range_text(&self) -> String {
        self.read().range_text.clone()
    }

    /// Every ID matching the committed filters.
    pub fn all_ids(&self) -> Vec<RowId> {
        self.read().all_ids.clone()
    }

    /// Whether the most recently issued fetch is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Message of the last failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    /// Consistent view of everything the renderer needs.
    pub fn snapshot(&self) -> TableSnapshot<G::Row> {
        let inner = self.read();
        TableSnapshot {
            state: inner.applied.clone(),
            staged: inner.staged.clone(),
            rows: inner.rows.clone(),
            check_state: inner.selection.check_state(&inner.all_ids),
            selection: inner.selection.clone(),
            total_count: inner.total_count,
            page_count: inner.page_count,
            range_text: inner.range_text.clone(),
            loading: inner.loading,
        }
    }

    // -------------------------------------------------------------------------
    // Query state operations
    // -------------------------------------------------------------------------

    /// Stage a filter value.
    ///
    /// All filter keys share one debounce window: the staged values are
    /// committed (and the page index reset to 0) only once no filter has been
    /// edited for the quiet period, followed by a single fetch.
    pub fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().staged.set(key, value);

        let this = self.clone();
        self.debouncer.call(async move {
            this.commit_filters().await;
        });
    }

    /// Commit staged filters immediately, skipping the debounce window.
    pub async fn commit_filters(&self) -> FetchOutcome {
        self.debouncer.cancel();
        self.refetch_with(|inner| {
            inner.state.filters = inner.staged.clone();
            inner.state.page_index = 0;
        })
        .await
    }

    /// Advance the sort cycle for `field` and refetch.
    pub async fn set_sort(&self, field: &str) -> FetchOutcome {
        self.refetch_with(|inner| inner.state.sort.toggle(field)).await
    }

    /// Change the page size and refetch.
    ///
    /// The page index is pulled back onto the last page if the larger size
    /// leaves it out of range.
    pub async fn set_page_size(&self, page_size: usize) -> FetchOutcome {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.refetch_with(|inner| {
            inner.state.page_size = page_size;
            let pages = page_count(inner.total_count, page_size);
            if pages > 0 && inner.state.page_index >= pages {
                inner.state.page_index = pages - 1;
            }
        })
        .await
    }

    /// Go to the 1-based `page` and refetch.
    ///
    /// Returns `None` without fetching if `page` is outside `[1, page_count]`.
    pub async fn set_page_index(&self, page: usize) -> Option<FetchOutcome> {
        let pages = self.page_count();
        if page < 1 || page > pages {
            debug!("Ignoring page {} outside 1..={}", page, pages);
            return None;
        }
        Some(self.refetch_with(|inner| inner.state.page_index = page - 1).await)
    }

    /// Fetch the page described by the current state.
    pub async fn fetch(&self) -> FetchOutcome {
        self.refetch_with(|_| {}).await
    }

    async fn refetch_with<F>(&self, mutate: F) -> FetchOutcome
    where
        F: FnOnce(&mut QueryInner<G::Row>) + Send,
    {
        let (seq, requested) = {
            let mut inner = self.write();
            mutate(&mut inner);
            inner.loading = true;
            let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            (seq, inner.state.clone())
        };
        let params = requested.to_params();
        debug!("Fetch #{}: {:?}", seq, params);

        let result = futures::future::try_join(
            self.gateway.list(&params),
            self.gateway.ids_for_filter(&params),
        )
        .await;

        let latest = seq == self.issued.load(Ordering::SeqCst);
        let mut inner = self.write();
        if latest {
            inner.loading = false;
        }

        match result {
            Ok((page, ids)) => {
                if seq <= inner.applied_seq {
                    debug!(
                        "Discarding response #{}, #{} already applied",
                        seq, inner.applied_seq
                    );
                    return FetchOutcome::Superseded;
                }
                inner.applied_seq = seq;
                inner.applied = requested;
                if !inner.loading {
                    // No newer fetch is pending.
                    inner.state = inner.applied.clone();
                }
                inner.total_count = page.count;
                inner.page_count = page_count(page.count, params.page_size);
                inner.range_text = range_text(params.page - 1, params.page_size, page.count);
                inner.rows = page.results;

                let dropped = inner.selection.retain_within(&ids);
                if !dropped.is_empty() {
                    debug!("Deselected {} rows no longer matching filters", dropped.len());
                }
                inner.all_ids = ids;
                inner.last_error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                error!("Fetch #{} failed: {}", seq, e);
                inner.last_error = Some(e.to_string());
                if latest {
                    inner.state = inner.applied.clone();
                }
                FetchOutcome::Failed
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_all_ids_for_test(&self, ids: Vec<RowId>) {
        self.write().all_ids = ids;
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Copy of the current selection.
    pub fn selection(&self) -> SelectionSet {
        self.read().selection.clone()
    }

    /// Selected IDs, sorted.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.read().selection.selected()
    }

    /// Toggle one row. Returns `true` if it is selected afterwards.
    pub fn toggle_row(&self, id: RowId) -> bool {
        self.write().selection.toggle(id)
    }

    /// Select every row matching the committed filters, on every page.
    /// Returns the number of newly selected rows.
    pub fn select_all(&self) -> usize {
        let mut inner = self.write();
        let all = inner.all_ids.clone();
        inner.selection.select_all(&all).len()
    }

    /// Deselect everything.
    pub fn clear_selection(&self) -> Vec<RowId> {
        self.write().selection.clear()
    }

    /// State of the "select all" checkbox.
    pub fn select_all_state(&self) -> CheckState {
        let inner = self.read();
        inner.selection.check_state(&inner.all_ids)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Delete every selected row, then refetch.
    ///
    /// Requires an admin actor. The selection is kept if the gateway fails.
    pub async fn delete_selected(&self, actor: &Actor) -> Result<usize, ActionError> {
        if !actor.is_admin() {
            warn!("{} may not bulk delete", actor.username);
            return Err(ActionError::Unauthorized {
                action: "bulk delete",
            });
        }

        let ids = self.selected_ids();
        if ids.is_empty() {
            return Err(ActionError::EmptySelection);
        }

        if let Err(e) = self.gateway.bulk_delete(&ids).await {
            error!("Bulk delete of {} rows failed: {}", ids.len(), e);
            return Err(e.into());
        }
        info!("Deleted {} rows", ids.len());

        self.clear_selection();
        self.fetch().await;
        Ok(ids.len())
    }

    /// Rearrange the loaded rows to follow `order` without contacting the
    /// gateway.
    ///
    /// Rows missing from `order` keep their relative order at the end. The
    /// full ID list is updated so the reordered page sits in place.
    ///
    /// Returns `false` and changes nothing if the loaded rows are not the
    /// window of the full ID list they were fetched as.
    #[must_use]
    pub fn apply_local_order(&self, order: &[RowId]) -> bool {
        let mut inner = self.write();
        let mut rows = inner.rows.clone();
        rows.sort_by_key(|row| order.iter().position(|id| *id == row.id()).unwrap_or(usize::MAX));

        let visible: Vec<RowId> = rows.iter().map(Row::id).collect();
        let Some(all_ids) = splice_page(&inner.all_ids, inner.applied.offset(), &visible) else {
            warn!(
                "Loaded page does not match the ID list at offset {}",
                inner.applied.offset()
            );
            return false;
        };
        inner.rows = rows;
        inner.all_ids = all_ids;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering as AtomicOrdering;
    use std::time::Duration;

    use dispatcharr_lib::api::query::Ordering as SortOrdering;
    use dispatcharr_lib::model::UserLevel;

    use super::*;
    use crate::query::SortDirection;
    use crate::table::ColumnDef;
    use crate::table::HeaderContent;
    use crate::table::RenderContext;
    use crate::table::render;
    use crate::testing::Call;
    use crate::testing::Item;
    use crate::testing::FakeGateway;
    use crate::testing::ids;
    use crate::testing::item;
    use crate::timer::DEBOUNCE_DELAY;

    fn catalog(n: i64) -> Vec<Item> {
        (1..=n).map(|i| item(i, &format!("stream-{i:02}"))).collect()
    }

    fn controller(rows: Vec<Item>, page_size: usize) -> (Arc<FakeGateway>, QueryController<FakeGateway>) {
        let gateway = Arc::new(FakeGateway::new(rows));
        let state = QueryState {
            page_size,
            ..QueryState::new()
        };
        (gateway.clone(), QueryController::with_state(gateway, state))
    }

    #[tokio::test]
    async fn test_fetch_populates_page_metadata() {
        let (gateway, table) = controller(catalog(12), 5);

        assert_eq!(table.fetch().await, FetchOutcome::Applied);

        assert_eq!(table.row_ids(), ids(&[1, 2, 3, 4, 5]));
        assert_eq!(table.total_count(), 12);
        assert_eq!(table.page_count(), 3);
        assert_eq!(table.range_text(), "1 to 5 of 12");
        assert_eq!(table.all_ids().len(), 12);
        assert!(!table.is_loading());

        let calls = gateway.calls();
        assert!(matches!(&calls[0], Call::List(p) if p.page == 1 && p.page_size == 5));
        assert!(matches!(&calls[1], Call::Ids(_)));
    }

    #[tokio::test]
    async fn test_sort_builds_ordering_param() {
        let (gateway, table) = controller(catalog(3), 25);

        table.set_sort("name").await;
        table.set_sort("name").await;

        let lists = gateway.list_calls();
        assert_eq!(lists[0].ordering, Some(SortOrdering::asc("name")));
        assert_eq!(lists[1].ordering, Some(SortOrdering::desc("name")));
        assert_eq!(lists[1].to_pairs()[2].1, "-name");
        assert_eq!(table.row_ids(), ids(&[3, 2, 1]));
    }

    #[tokio::test]
    async fn test_page_index_out_of_range_is_ignored() {
        let (gateway, table) = controller(catalog(12), 5);
        table.fetch().await;

        assert_eq!(table.set_page_index(0).await, None);
        assert_eq!(table.set_page_index(4).await, None);
        assert_eq!(gateway.list_calls().len(), 1);

        assert_eq!(table.set_page_index(3).await, Some(FetchOutcome::Applied));
        assert_eq!(table.state().page_index, 2);
        assert_eq!(table.row_ids(), ids(&[11, 12]));
        assert_eq!(table.range_text(), "11 to 12 of 12");
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_burst_issues_one_fetch_on_first_page() {
        let (gateway, table) = controller(
            vec![item(1, "fox"), item(2, "foxtrot"), item(3, "golf")],
            1,
        );
        table.fetch().await;
        table.set_page_index(3).await;
        let before = gateway.list_calls().len();

        for value in ["fo", "fox", "foxtrot"] {
            table.set_filter("name", value);
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        assert_eq!(gateway.list_calls().len(), before);
        assert_eq!(table.staged_filters().get("name"), Some("foxtrot"));

        tokio::time::sleep(DEBOUNCE_DELAY).await;

        let lists = gateway.list_calls();
        assert_eq!(lists.len(), before + 1);
        let last = lists.last().unwrap();
        assert_eq!(last.filters.get("name"), Some("foxtrot"));
        assert_eq!(last.page, 1);
        assert_eq!(table.state().page_index, 0);
        assert_eq!(table.row_ids(), ids(&[2]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_to_different_keys_share_one_window() {
        let (gateway, table) = controller(catalog(3), 25);

        table.set_filter("name", "stream");
        tokio::time::sleep(Duration::from_millis(400)).await;
        table.set_filter("m3u_account", "2");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(gateway.list_calls().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let lists = gateway.list_calls();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].filters.get("name"), Some("stream"));
        assert_eq!(lists[0].filters.get("m3u_account"), Some("2"));
    }

    #[tokio::test]
    async fn test_selection_survives_paging_and_sorting() {
        let (_gateway, table) = controller(catalog(12), 5);
        table.fetch().await;
        table.toggle_row(RowId(2));
        table.toggle_row(RowId(11));

        table.set_page_index(2).await;
        table.set_sort("name").await;
        table.set_page_size(10).await;

        assert_eq!(table.selected_ids(), ids(&[2, 11]));
    }

    #[tokio::test]
    async fn test_narrowing_filter_drops_selection() {
        let (_gateway, table) = controller(catalog(12), 5);
        table.fetch().await;
        table.toggle_row(RowId(1));
        table.toggle_row(RowId(10));

        table.set_filter("name", "stream-1");
        table.commit_filters().await;

        // "stream-1" matches 10, 11 and 12 only.
        assert_eq!(table.all_ids(), ids(&[10, 11, 12]));
        assert_eq!(table.selected_ids(), ids(&[10]));
    }

    #[tokio::test]
    async fn test_select_all_spans_pages() {
        let (_gateway, table) = controller(catalog(12), 5);
        table.fetch().await;

        assert_eq!(table.select_all(), 12);
        assert_eq!(table.select_all_state(), CheckState::Checked);
        assert_eq!(table.snapshot().selection.len(), 12);

        table.clear_selection();
        assert_eq!(table.select_all_state(), CheckState::Unchecked);
    }

    #[tokio::test]
    async fn test_failure_keeps_last_snapshot() {
        let (gateway, table) = controller(catalog(12), 5);
        table.fetch().await;

        gateway.fail_reads.store(true, AtomicOrdering::SeqCst);
        assert_eq!(table.set_page_index(2).await, Some(FetchOutcome::Failed));

        assert_eq!(table.row_ids(), ids(&[1, 2, 3, 4, 5]));
        assert_eq!(table.range_text(), "1 to 5 of 12");
        assert_eq!(table.state().page_index, 0);
        assert!(!table.is_loading());
        assert!(table.last_error().is_some());
        // No automatic retry.
        assert_eq!(gateway.list_calls().len(), 2);

        gateway.fail_reads.store(false, AtomicOrdering::SeqCst);
        assert_eq!(table.fetch().await, FetchOutcome::Applied);
        assert_eq!(table.last_error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_does_not_overwrite_newer() {
        let (gateway, table) = controller(catalog(3), 25);
        gateway.delay_lists(&[Duration::from_millis(300), Duration::ZERO]);

        let slow = table.clone();
        let fast = table.clone();
        let (first, second) = tokio::join!(slow.fetch(), async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            fast.set_sort("name").await
        });

        assert_eq!(second, FetchOutcome::Applied);
        assert_eq!(first, FetchOutcome::Superseded);
        assert_eq!(table.state().sort.field(), Some("name"));
        assert!(!table.is_loading());
    }

    #[tokio::test]
    async fn test_delete_selected_requires_admin() {
        let (gateway, table) = controller(catalog(4), 25);
        table.fetch().await;
        table.toggle_row(RowId(1));

        let viewer = Actor::new("viewer", UserLevel::Standard);
        let err = table.delete_selected(&viewer).await.unwrap_err();

        assert!(matches!(err, ActionError::Unauthorized { .. }));
        assert!(!gateway.calls().iter().any(|c| matches!(c, Call::BulkDelete(_))));
        assert_eq!(table.selected_ids(), ids(&[1]));
    }

    #[tokio::test]
    async fn test_delete_selected_refetches() {
        let (gateway, table) = controller(catalog(4), 25);
        table.fetch().await;
        table.toggle_row(RowId(1));
        table.toggle_row(RowId(3));

        let admin = Actor::new("admin", UserLevel::Admin);
        assert_eq!(table.delete_selected(&admin).await.unwrap(), 2);

        assert!(gateway.calls().contains(&Call::BulkDelete(ids(&[1, 3]))));
        assert!(table.selection().is_empty());
        assert_eq!(table.row_ids(), ids(&[2, 4]));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_selection() {
        let (gateway, table) = controller(catalog(4), 25);
        table.fetch().await;
        table.toggle_row(RowId(2));
        gateway.fail_writes.store(true, AtomicOrdering::SeqCst);

        let admin = Actor::new("admin", UserLevel::Admin);
        let err = table.delete_selected(&admin).await.unwrap_err();

        assert!(matches!(err, ActionError::Gateway(_)));
        assert_eq!(table.selected_ids(), ids(&[2]));
    }

    #[tokio::test]
    async fn test_apply_local_order() {
        let (_gateway, table) = controller(catalog(4), 25);
        table.fetch().await;

        assert!(table.apply_local_order(&ids(&[3, 1, 2, 4])));

        assert_eq!(table.row_ids(), ids(&[3, 1, 2, 4]));
        assert_eq!(table.all_ids(), ids(&[3, 1, 2, 4]));
    }

    #[tokio::test]
    async fn test_local_order_on_second_page_splices_in_place() {
        let (_gateway, table) = controller(catalog(6), 2);
        table.fetch().await;
        table.set_page_index(2).await;

        assert!(table.apply_local_order(&ids(&[4, 3])));
        assert_eq!(table.all_ids(), ids(&[1, 2, 4, 3, 5, 6]));
    }

    #[tokio::test]
    async fn test_local_order_refused_when_id_list_is_out_of_date() {
        let (_gateway, table) = controller(catalog(4), 2);
        table.fetch().await;
        // The ID list no longer starts with the loaded page.
        table.set_all_ids_for_test(ids(&[9, 1, 2]));

        assert!(!table.apply_local_order(&ids(&[2, 1])));
        assert_eq!(table.row_ids(), ids(&[1, 2]));
        assert_eq!(table.all_ids(), ids(&[9, 1, 2]));
    }

    #[tokio::test]
    async fn test_failed_navigation_keeps_pager_on_loaded_page() {
        let (gateway, table) = controller(catalog(4), 2);
        table.fetch().await;
        gateway.fail_reads.store(true, AtomicOrdering::SeqCst);

        assert_eq!(table.set_page_index(2).await, Some(FetchOutcome::Failed));
        assert_eq!(table.set_sort("name").await, FetchOutcome::Failed);

        assert_eq!(table.state().page_index, 0);
        assert_eq!(table.state().sort.field(), None);

        let columns = vec![ColumnDef::text("name", "Name", |i: &Item| i.name.clone()).sortable("name")];
        let actor = Actor::new("admin", UserLevel::Admin);
        let cx = RenderContext {
            actor: &actor,
            group_options: &[],
            dragging: None,
        };
        let model = render(&columns, &table.snapshot(), &cx);
        assert_eq!(model.pager.page, 1);
        assert_eq!(model.pager.range_text, "1 to 2 of 4");
        assert_eq!(model.rows.len(), 2);
        assert!(matches!(
            &model.headers[0].content,
            HeaderContent::Label { sort: SortDirection::None, .. }
        ));

        // A retry asks for the loaded page, not the one that failed.
        gateway.fail_reads.store(false, AtomicOrdering::SeqCst);
        table.fetch().await;
        assert_eq!(gateway.list_calls().last().unwrap().page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_success_after_failed_newer_fetch_is_consistent() {
        let (gateway, table) = controller(catalog(4), 2);
        table.fetch().await;
        gateway.delay_lists(&[Duration::from_millis(300), Duration::ZERO]);

        let slow = table.clone();
        let failing = table.clone();
        let gw = gateway.clone();
        let (first, second) = tokio::join!(slow.set_page_index(2), async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            gw.fail_reads.store(true, AtomicOrdering::SeqCst);
            let outcome = failing.set_sort("name").await;
            gw.fail_reads.store(false, AtomicOrdering::SeqCst);
            outcome
        });

        assert_eq!(second, FetchOutcome::Failed);
        assert_eq!(first, Some(FetchOutcome::Applied));
        let snapshot = table.snapshot();
        assert_eq!(snapshot.state.page_index, 1);
        assert_eq!(snapshot.state.sort.field(), None);
        assert_eq!(table.state(), snapshot.state);
        assert_eq!(table.row_ids(), ids(&[3, 4]));
    }
}
