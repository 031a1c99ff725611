//! Authentication error types

/// Errors raised while obtaining credentials for a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token has been configured.
    #[error("No access token configured")]
    MissingToken,

    /// Access token expired and no replacement is available.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },
}
