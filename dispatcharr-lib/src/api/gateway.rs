//! The data gateway consumed by table controllers.

use async_trait::async_trait;

use crate::api::query::ListParams;
use crate::api::query::Page;
use crate::error::Error;
use crate::model::Row;
use crate::model::RowId;

/// Remote operations backing one entity table.
///
/// The server is authoritative for paging, sorting and filtering: `list`
/// returns exactly the page described by `params`, and `ids_for_filter`
/// returns every matching ID regardless of paging.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// The row type served by this gateway.
    type Row: Row;

    /// Fetches one page of rows plus the total match count.
    async fn list(&self, params: &ListParams) -> Result<Page<Self::Row>, Error>;

    /// Fetches every ID matching the filters in `params`, in result order.
    ///
    /// Paging fields of `params` are ignored.
    async fn ids_for_filter(&self, params: &ListParams) -> Result<Vec<RowId>, Error>;

    /// Persists a new full ordering of the child rows under `parent`.
    async fn mutate_order(&self, parent: RowId, ordered: &[RowId]) -> Result<(), Error> {
        let _ = (parent, ordered);
        Err(Error::Unsupported("mutate_order"))
    }

    /// Fetches the options offered by the group filter dropdown.
    async fn groups_lookup(&self) -> Result<Vec<String>, Error>;

    /// Deletes the given rows.
    async fn bulk_delete(&self, ids: &[RowId]) -> Result<(), Error> {
        let _ = ids;
        Err(Error::Unsupported("bulk_delete"))
    }
}
