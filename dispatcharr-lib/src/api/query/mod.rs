//! Query parameter types for paged list endpoints.
//!
//! - [`Ordering`] - single-field ordering, encoded as `field` or `-field`
//! - [`Filters`] - filter key/value pairs passed through as query parameters
//! - [`ListParams`] - a complete list request (page, page size, ordering, filters)
//! - [`Page`] - one page of results with the total match count

mod filter;
mod order;
mod page;
mod params;

pub use filter::Filters;
pub use order::Direction;
pub use order::Ordering;
pub use page::Page;
pub use params::ListParams;
pub use params::DEFAULT_PAGE_SIZE;
pub use params::MAX_PAGE_SIZE;
