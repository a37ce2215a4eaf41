//! Client configuration options.

use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Base URL of the production REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.robinhood.com";

/// OAuth client id used by the Robinhood web application.
pub const DEFAULT_CLIENT_ID: &str = "c82SH0WZOsabOXGP2sxqcj34FxkvfnWRZBKlBjFS";

/// Configuration for the Robinhood client.
///
/// The base URL lives here rather than in a global so that tests and
/// proxies can point a client at a different host.
///
/// # Example
///
/// ```
/// use robinhood_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://127.0.0.1:8080")?
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// assert_eq!(config.base_url, "http://127.0.0.1:8080");
/// # Ok::<(), robinhood_rs::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host every relative request path is joined to, without
    /// a trailing slash
    pub base_url: String,
    /// OAuth client id sent with password and refresh grants
    pub client_id: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Whether to automatically refresh expired sessions
    pub auto_refresh_session: bool,
    /// Buffer time (in seconds) before expiry to refresh
    pub refresh_buffer_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("robinhood-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
            auto_refresh_session: true,
            refresh_buffer_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different API host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref();
        let parsed = Url::parse(raw)
            .map_err(|e| Error::Config(format!("Invalid base URL {:?}: {}", raw, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Base URL must use http or https, got {:?}",
                parsed.scheme()
            )));
        }
        self.base_url = raw.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Set the OAuth client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable automatic session refresh.
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh_session = enabled;
        self
    }

    /// Set the buffer time before expiry to refresh.
    pub fn with_refresh_buffer(mut self, secs: i64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }

    /// Build an HTTP client that applies the configured timeout and
    /// User-Agent.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?)
    }

    /// Resolve a request path (`/instruments/`) against the base URL.
    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// When and how often a failed GET is sent again.
///
/// Only GETs go through this policy, and every page of a paginated listing
/// is a GET, so a flaky page is retried in place before the walk gives up.
/// POSTs (orders, cancels, OAuth grants) are sent exactly once because
/// repeating them is not safe.
///
/// A GET is retried after a timeout, a connection failure, or a response
/// whose status is in `retry_statuses` (429 included). The wait before the
/// n-th retry is `base_delay * 2^n`, never more than `delay_cap`.
///
/// ```
/// use robinhood_rs::RetryConfig;
/// use std::time::Duration;
///
/// let retry = RetryConfig::default()
///     .with_max_retries(5)
///     .with_base_delay(Duration::from_millis(100));
/// assert_eq!(retry.delay_for(3), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 sends each GET once
    pub max_retries: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// Upper bound on any single wait
    pub delay_cap: Duration,
    /// Response statuses that count as transient
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            delay_cap: Duration::from_secs(30),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Send every GET once.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Allow up to `max` retries per GET.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the wait before the first retry.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Cap the wait between retries.
    pub fn with_delay_cap(mut self, cap: Duration) -> Self {
        self.delay_cap = cap;
        self
    }

    /// Replace the set of statuses treated as transient.
    pub fn with_retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_statuses = statuses.into();
        self
    }

    /// Wait before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let doubled = 2u32
            .checked_pow(retry)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(self.delay_cap);
        doubled.min(self.delay_cap)
    }

    /// Whether a failed GET is worth sending again.
    pub fn should_retry(&self, error: &Error) -> bool {
        match error {
            Error::Timeout => true,
            Error::Http(e) => e.is_connect() || e.is_request(),
            Error::RateLimited { .. } => self.retry_statuses.contains(&429),
            Error::Api { status, .. } => self.retry_statuses.contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.auto_refresh_session);
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:9000/")
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(
            config.url_for("/instruments/"),
            "http://localhost:9000/instruments/"
        );
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        assert!(matches!(
            ClientConfig::default().with_base_url("not a url"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ClientConfig::default().with_base_url("ftp://example.com"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_retry_delay_doubles() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_for(0), Duration::from_millis(500));
        assert_eq!(retry.delay_for(1), Duration::from_secs(1));
        assert_eq!(retry.delay_for(2), Duration::from_secs(2));
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let retry = RetryConfig::default()
            .with_base_delay(Duration::from_secs(10))
            .with_delay_cap(Duration::from_secs(30));

        assert_eq!(retry.delay_for(3), Duration::from_secs(30));
        assert_eq!(retry.delay_for(64), Duration::from_secs(30));
    }

    fn api_error(status: u16) -> Error {
        Error::Api {
            status,
            detail: String::new(),
            body: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let retry = RetryConfig::default();
        assert!(retry.should_retry(&Error::Timeout));
        assert!(retry.should_retry(&api_error(503)));
        assert!(retry.should_retry(&Error::RateLimited { retry_after_secs: 1 }));

        assert!(!retry.should_retry(&api_error(400)));
        assert!(!retry.should_retry(&Error::SessionExpired));
        assert!(!retry.should_retry(&Error::NotFound("x".into())));
    }

    #[test]
    fn test_custom_statuses_replace_defaults() {
        let retry = RetryConfig::default().with_retry_statuses([502]);
        assert!(retry.should_retry(&api_error(502)));
        assert!(!retry.should_retry(&api_error(503)));
        assert!(!retry.should_retry(&Error::RateLimited { retry_after_secs: 1 }));
    }
}
