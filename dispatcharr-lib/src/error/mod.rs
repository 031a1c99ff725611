//! Error types

mod api;
mod auth;

pub use api::*;
pub use auth::*;

/// Top-level error returned by every client and gateway operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request reached the API (or tried to) and failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No usable credentials could be obtained.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The gateway does not implement the requested operation.
    #[error("Operation not supported by this gateway: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// Returns the HTTP status code if the API answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }

    /// Returns `true` if the API rejected the request for lack of privilege.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }
}
