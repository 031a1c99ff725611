//! Authentication
//!
//! The client only consumes bearer tokens; how they are obtained (login form,
//! refresh) is left to the [`TokenProvider`] implementation.

mod token;

pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
