//! Server-synchronized table controllers.
//!
//! Entity-agnostic machinery shared by every catalog table:
//!
//! - [`query`] - pagination, sort and filter state with debounced commits
//! - [`selection`] - row selection that survives paging
//! - [`table`] - column definitions and the render model
//! - [`reorder`] - optimistic drag-to-reorder with server persistence
//! - [`store`] - application state shared across tables
//! - [`preview`] - live regex search/replace preview
//! - [`timer`] - cancellable timers and the debouncer built on them

pub mod preview;
pub mod query;
pub mod reorder;
pub mod selection;
pub mod store;
pub mod table;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use query::QueryController;
pub use reorder::Reorderer;
pub use selection::SelectionSet;
pub use store::AppStore;
