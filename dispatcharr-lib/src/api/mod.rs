//! REST API operations

mod channels;
mod gateway;
pub mod query;
mod streams;

pub use channels::*;
pub use gateway::*;
pub use streams::*;
