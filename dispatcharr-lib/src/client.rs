//! Main DispatcharrClient

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;

/// The main client for interacting with the Dispatcharr REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use dispatcharr_lib::{DispatcharrClient, auth::StaticTokenProvider};
///
/// let client = DispatcharrClient::builder()
///     .url("http://dispatcharr.local:9191")
///     .token_provider(StaticTokenProvider::new("jwt"))
///     .build();
///
/// let streams = client.streams();
/// ```
#[derive(Clone)]
pub struct DispatcharrClient {
    inner: Arc<DispatcharrClientInner>,
}

struct DispatcharrClientInner {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl DispatcharrClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> DispatcharrClientBuilder<Missing, Missing> {
        DispatcharrClientBuilder::new()
    }

    /// Returns the base URL of the Dispatcharr server.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Builds the absolute URL of an API path with query pairs appended.
    pub(crate) fn api_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, Error> {
        let raw = format!(
            "{}/api/{}",
            self.inner.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|_| ApiError::InvalidUrl(raw.clone()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Performs a GET request and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, Error> {
        let url = self.api_url(path, query)?;
        let response = self.request(Method::GET, url, None::<&()>).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Api(ApiError::parse_with_body(e.to_string(), body)))
    }

    /// Sends a JSON body and discards the response body.
    pub(crate) async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.api_url(path, &[])?;
        self.request(method, url, Some(body)).await?;
        Ok(())
    }

    /// Makes an authenticated HTTP request.
    ///
    /// Non-success statuses are turned into [`ApiError::Http`]. Requests are
    /// never retried; callers decide whether to try again.
    async fn request<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        let token = self
            .inner
            .token_provider
            .get_token(&self.inner.base_url)
            .await?;

        debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method, url)
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Api(ApiError::from_body(status.as_u16(), &body)))
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> Error {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => Error::Api(ApiError::Timeout(timeout)),
            _ => Error::Api(ApiError::Network(error)),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`DispatcharrClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The Dispatcharr server URL
/// - `token_provider` - A [`TokenProvider`] implementation
pub struct DispatcharrClientBuilder<U, P> {
    url: U,
    token_provider: P,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl DispatcharrClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for DispatcharrClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> DispatcharrClientBuilder<Missing, P> {
    /// Sets the Dispatcharr server URL.
    pub fn url(self, url: impl Into<String>) -> DispatcharrClientBuilder<Set<String>, P> {
        DispatcharrClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> DispatcharrClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> DispatcharrClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        DispatcharrClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> DispatcharrClientBuilder<U, P> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl DispatcharrClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`DispatcharrClient`].
    pub fn build(self) -> DispatcharrClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        DispatcharrClient {
            inner: Arc::new(DispatcharrClientInner {
                base_url: self.url.0,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn client(url: &str) -> DispatcharrClient {
        DispatcharrClient::builder()
            .url(url)
            .token_provider(StaticTokenProvider::new("token"))
            .build()
    }

    #[test]
    fn test_api_url_joins_path() {
        let url = client("http://host:9191/").api_url("/channels/streams/", &[]).unwrap();
        assert_eq!(url.as_str(), "http://host:9191/api/channels/streams/");
    }

    #[test]
    fn test_api_url_encodes_query() {
        let query = vec![
            ("page".to_string(), "1".to_string()),
            ("name".to_string(), "news & sports".to_string()),
        ];
        let url = client("http://host").api_url("channels/streams/", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://host/api/channels/streams/?page=1&name=news+%26+sports"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = client("not a url").api_url("channels/", &[]).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidUrl(_))));
    }
}
