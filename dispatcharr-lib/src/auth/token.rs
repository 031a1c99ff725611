//! TokenProvider trait and AccessToken

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::AuthError;

/// A JWT access token with optional expiration.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a new access token with expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }
}

/// Trait for providing access tokens to the Dispatcharr client.
///
/// The client calls `get_token` before each API request. Implementations
/// should return cached tokens when valid and handle refresh transparently.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets an access token for the server at `base_url`.
    async fn get_token(&self, base_url: &str) -> Result<AccessToken, AuthError>;
}

/// A simple token provider that always returns the same static token.
///
/// # Example
///
/// ```
/// use dispatcharr_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _base_url: &str) -> Result<AccessToken, AuthError> {
        if self.token.access_token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        if self.token.is_expired() {
            return Err(AuthError::TokenExpired {
                message: "static token cannot be refreshed".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}
