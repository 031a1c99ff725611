//! Drag Reorder Coordinator.
//!
//! [`DragCoordinator`] is the pure state machine driven by `grab`, `move`,
//! `drop`, `ack` and `nack`. [`Reorderer`] binds it to a
//! [`QueryController`](crate::QueryController): it applies a dropped order
//! to the table optimistically, persists it through the gateway and refetches
//! once the server accepts it.

mod collision;
mod coordinator;
mod reorderer;

pub use collision::*;
pub use coordinator::*;
pub use reorderer::*;

use dispatcharr_lib::model::RowId;

/// Remove the item at `from` and insert it at `to`.
///
/// Indices past the end are clamped.
pub fn array_move(list: &[RowId], from: usize, to: usize) -> Vec<RowId> {
    let mut out = list.to_vec();
    if from >= out.len() {
        return out;
    }
    let item = out.remove(from);
    out.insert(to.min(out.len()), item);
    out
}

/// Replace the window of `all` starting at `offset` with `page`.
///
/// Returns `None` if the window does not hold exactly the rows of `page`,
/// i.e. the full list is out of date.
pub fn splice_page(all: &[RowId], offset: usize, page: &[RowId]) -> Option<Vec<RowId>> {
    let end = offset + page.len();
    let window = all.get(offset..end)?;

    let mut expected = window.to_vec();
    let mut actual = page.to_vec();
    expected.sort();
    actual.sort();
    if expected != actual {
        return None;
    }

    let mut out = Vec::with_capacity(all.len());
    out.extend_from_slice(&all[..offset]);
    out.extend_from_slice(page);
    out.extend_from_slice(&all[end..]);
    Some(out)
}
