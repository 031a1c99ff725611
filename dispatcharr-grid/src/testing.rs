//! In-memory gateway used by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use dispatcharr_lib::api::Gateway;
use dispatcharr_lib::api::query::Direction;
use dispatcharr_lib::api::query::ListParams;
use dispatcharr_lib::api::query::Page;
use dispatcharr_lib::error::ApiError;
use dispatcharr_lib::error::Error;
use dispatcharr_lib::model::Row;
use dispatcharr_lib::model::RowId;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub id: RowId,
    pub name: String,
}

impl Row for Item {
    fn id(&self) -> RowId {
        self.id
    }
}

pub fn item(id: i64, name: &str) -> Item {
    Item {
        id: RowId(id),
        name: name.to_string(),
    }
}

pub fn ids(raw: &[i64]) -> Vec<RowId> {
    raw.iter().copied().map(RowId).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ListParams),
    Ids(ListParams),
    MutateOrder(RowId, Vec<RowId>),
    Groups,
    BulkDelete(Vec<RowId>),
}

/// Serves `rows` with `name` substring filtering, `name` ordering and paging.
#[derive(Default)]
pub struct FakeGateway {
    rows: Mutex<Vec<Item>>,
    calls: Mutex<Vec<Call>>,
    list_delays: Mutex<VecDeque<Duration>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeGateway {
    pub fn new(rows: Vec<Item>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<ListParams> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Delays the next list responses, one entry per call.
    pub fn delay_lists(&self, delays: &[Duration]) {
        self.list_delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn set_rows(&self, rows: Vec<Item>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.lock().unwrap().iter().map(|r| r.id).collect()
    }

    fn matching(&self, params: &ListParams) -> Vec<Item> {
        let mut rows: Vec<Item> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                params
                    .filters
                    .get("name")
                    .is_none_or(|needle| r.name.contains(needle))
            })
            .cloned()
            .collect();
        if let Some(ordering) = &params.ordering {
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            if ordering.direction == Direction::Desc {
                rows.reverse();
            }
        }
        rows
    }

    fn read_error(&self) -> Result<(), Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Api(ApiError::http(500, "boom")));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    type Row = Item;

    async fn list(&self, params: &ListParams) -> Result<Page<Item>, Error> {
        self.calls.lock().unwrap().push(Call::List(params.clone()));
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.read_error()?;
        Ok(Page::slice(self.matching(params), params.page, params.page_size))
    }

    async fn ids_for_filter(&self, params: &ListParams) -> Result<Vec<RowId>, Error> {
        self.calls.lock().unwrap().push(Call::Ids(params.clone()));
        self.read_error()?;
        Ok(self.matching(params).into_iter().map(|r| r.id).collect())
    }

    async fn mutate_order(&self, parent: RowId, ordered: &[RowId]) -> Result<(), Error> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::MutateOrder(parent, ordered.to_vec()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Api(ApiError::http(500, "order not saved")));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.sort_by_key(|r| ordered.iter().position(|id| *id == r.id).unwrap_or(usize::MAX));
        Ok(())
    }

    async fn groups_lookup(&self) -> Result<Vec<String>, Error> {
        self.calls.lock().unwrap().push(Call::Groups);
        self.read_error()?;
        Ok(vec!["News".to_string(), "Sports".to_string()])
    }

    async fn bulk_delete(&self, ids: &[RowId]) -> Result<(), Error> {
        self.calls.lock().unwrap().push(Call::BulkDelete(ids.to_vec()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Api(ApiError::http(500, "delete failed")));
        }
        self.rows.lock().unwrap().retain(|r| !ids.contains(&r.id));
        Ok(())
    }
}
