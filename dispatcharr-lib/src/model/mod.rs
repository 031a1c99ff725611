//! Data model types

mod channel;
mod row;
mod stream;
mod user;

pub use channel::Channel;
pub use row::Row;
pub use row::RowId;
pub use stream::Stream;
pub use user::Actor;
pub use user::UserLevel;
