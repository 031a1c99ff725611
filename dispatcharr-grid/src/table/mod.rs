//! Column definitions and the table render model.

mod column;
mod render;

pub use column::*;
pub use render::*;

use dispatcharr_lib::api::query::Filters;

use crate::query::QueryState;
use crate::selection::CheckState;
use crate::selection::SelectionSet;

/// A consistent copy of one table's state, taken under a single lock.
#[derive(Debug, Clone)]
pub struct TableSnapshot<R> {
    /// The query `rows` were fetched with.
    pub state: QueryState,
    /// Filter values as typed, including uncommitted edits.
    pub staged: Filters,
    pub rows: Vec<R>,
    pub selection: SelectionSet,
    /// "Select all" state against every row matching the filters.
    pub check_state: CheckState,
    pub total_count: usize,
    pub page_count: usize,
    pub range_text: String,
    pub loading: bool,
}
