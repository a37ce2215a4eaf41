//! HTTP client implementation for the Robinhood API.

use chrono::Duration;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::api::{InstrumentsService, MarketDataService, OptionsService};
use crate::auth::Session;
use crate::{Error, Result};

use super::config::ClientConfig;
use super::paginated::{self, CursorStream, Page};

/// The main client for interacting with the Robinhood API.
///
/// This client provides access to all API services through method calls
/// that return service structs. The client manages authentication,
/// request building, retries, and response parsing.
///
/// # Example
///
/// ```no_run
/// use robinhood_rs::RobinhoodClient;
///
/// # async fn example() -> robinhood_rs::Result<()> {
/// let client = RobinhoodClient::login("your-username", "your-password").await?;
///
/// // Every listed instrument for a symbol, across all pages
/// let instruments = client.instruments().for_symbol(&"AAPL".into()).await?;
///
/// // Option chains for the first match
/// if let Some(instrument) = instruments.first() {
///     if let Some(chain_id) = &instrument.tradable_chain_id {
///         let chains = client.options().chains(&[chain_id.clone()]).await?;
///         println!("{} chain(s)", chains.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct RobinhoodClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
}

impl RobinhoodClient {
    /// Log in with username and password against the default endpoint.
    pub async fn login(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::login_with_config(username, password, ClientConfig::default()).await
    }

    /// Log in with username and password and a custom configuration.
    pub async fn login_with_config(
        username: impl Into<String>,
        password: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let session = Session::from_credentials(username, password, &config).await?;
        Self::with_session(session, config)
    }

    /// Create a client from an access token obtained elsewhere.
    ///
    /// The resulting session cannot refresh itself.
    pub fn from_token(access_token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let session = Session::from_token(access_token, None, None, &config)?;
        Self::with_session(session, config)
    }

    /// Create a new client with an existing session and custom configuration.
    pub fn with_session(session: Session, config: ClientConfig) -> Result<Self> {
        let http = config.http_client()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                session,
                config,
            }),
        })
    }

    /// Get the instruments service.
    pub fn instruments(&self) -> InstrumentsService {
        InstrumentsService::new(self.inner.clone())
    }

    /// Get the options service (instruments, chains, positions, orders).
    pub fn options(&self) -> OptionsService {
        OptionsService::new(self.inner.clone())
    }

    /// Get the market data service.
    pub fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    /// Manually refresh the session token.
    pub async fn refresh_session(&self) -> Result<()> {
        self.inner.session.refresh().await
    }

    /// Revoke the access token.
    pub async fn logout(&self) -> Result<()> {
        self.inner.session.revoke().await
    }

    /// The base URL every request is resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }
}

impl ClientInner {
    /// Ensure the session is valid before making a request.
    pub(crate) async fn ensure_session_valid(&self) -> Result<()> {
        if self.config.auto_refresh_session && self.session.can_refresh().await {
            let buffer = Duration::seconds(self.config.refresh_buffer_secs);
            if self.session.expires_within(buffer).await {
                self.session.refresh().await?;
            }
        }
        Ok(())
    }

    /// Build request headers with authentication.
    pub(crate) async fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let token = self.session.access_token().await;
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Make a GET request relative to the base URL.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_url::<T, ()>(&self.config.url_for(path), None).await
    }

    /// Make a GET request relative to the base URL with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        self.get_url(&self.config.url_for(path), Some(query)).await
    }

    /// Make a GET request to an absolute URL, such as a pagination cursor.
    ///
    /// Failures that [`RetryConfig::should_retry`](crate::RetryConfig::should_retry) accepts are retried.
    pub(crate) async fn get_url<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: Option<&Q>,
    ) -> Result<T> {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match self.send_get(url, query).await {
                Err(e) if attempt < retry.max_retries && retry.should_retry(&e) => {
                    let backoff = retry.delay_for(attempt);
                    tracing::warn!(
                        url,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Retrying request"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_get<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: Option<&Q>,
    ) -> Result<T> {
        self.ensure_session_valid().await?;
        let headers = self.build_headers().await?;

        let mut request = self.http.get(url).headers(headers);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body relative to the base URL.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.post_url(&self.config.url_for(path), Some(body)).await
    }

    /// Make a POST request to an absolute URL returned by the server.
    pub(crate) async fn post_url<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: Option<&B>,
    ) -> Result<T> {
        self.ensure_session_valid().await?;
        let headers = self.build_headers().await?;

        let mut request = self.http.post(url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Fetch every page of a collection starting at `path`.
    ///
    /// `query` is encoded into the first page's URL only.
    pub(crate) async fn fetch_all<T, Q>(&self, path: &str, query: Option<Q>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let start_url = self.config.url_for(path);
        let records = paginated::fetch_all(&start_url, query.as_ref(), |url| async move {
            self.get_url::<Page<T>, ()>(&url, None).await
        })
        .await?;
        Ok(records)
    }

    /// Lazily stream every record of a collection starting at `path`.
    pub(crate) fn stream_all<T>(self: &Arc<Self>, path: &str) -> CursorStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let inner = Arc::clone(self);
        CursorStream::new(self.config.url_for(path), move |url: String| {
            let inner = Arc::clone(&inner);
            Box::pin(async move { inner.get_url::<Page<T>, ()>(&url, None).await })
                as paginated::BoxFuture<'static, Result<Page<T>>>
        })
    }

    /// Handle an API response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            // 204 and some action endpoints answer with no body at all
            if bytes.is_empty() {
                return Ok(serde_json::from_value(serde_json::Value::Null)?);
            }
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let status_code = status.as_u16();

        // Check for rate limiting
        if status_code == 429 {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(60);
            return Err(Error::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let url = response.url().to_string();
        let body: serde_json::Value = response.json().await.unwrap_or_default();

        // Check for auth errors
        if status_code == 401 {
            return Err(Error::SessionExpired);
        }

        // Check for not found errors
        if status_code == 404 {
            let message = body
                .get("detail")
                .and_then(|m| m.as_str())
                .map(|detail| format!("{}: {}", url, detail))
                .unwrap_or(url);
            return Err(Error::NotFound(message));
        }

        Err(Error::from_api_response(status_code, body))
    }
}

impl Clone for RobinhoodClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for RobinhoodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobinhoodClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
