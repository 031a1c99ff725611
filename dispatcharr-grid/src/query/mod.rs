//! Query State Controller.
//!
//! Owns pagination, sort and filter state for one table, derives the list
//! request from it, and keeps the last successful response (rows, total
//! count, page count, range label, full ID list).

mod controller;
mod state;

pub use controller::ActionError;
pub use controller::FetchOutcome;
pub use controller::QueryController;
pub use state::QueryState;
pub use state::SortDirection;
pub use state::SortState;
