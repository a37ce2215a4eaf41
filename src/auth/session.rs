//! Session management for Robinhood API authentication.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::ClientConfig;
use crate::{Error, Result};

/// OAuth scope requested for every grant.
const SCOPE: &str = "internal";

/// Requested lifetime of a password-grant token, in seconds.
const TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Authentication session for the Robinhood API.
///
/// Holds an OAuth bearer token plus, when available, the refresh token
/// needed to renew it.
///
/// # Thread Safety
///
/// `Session` is cheap to clone and safe to share across tasks; token
/// refresh takes a write lock so concurrent requests never observe a
/// half-updated token pair.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

struct SessionInner {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session from an access token obtained elsewhere.
    ///
    /// Without a refresh token the session cannot renew itself; without an
    /// expiry it is treated as valid until the API answers 401.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client for token requests cannot
    /// be built from `config`.
    ///
    /// # Example
    ///
    /// ```
    /// use robinhood_rs::{ClientConfig, Session};
    ///
    /// let session = Session::from_token("access-token", None, None, &ClientConfig::default())?;
    /// # Ok::<(), robinhood_rs::Error>(())
    /// ```
    pub fn from_token(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        config: &ClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(SessionInner {
                http: config.http_client()?,
                base_url: config.base_url.clone(),
                client_id: config.client_id.clone(),
                access_token: SecretString::from(access_token.into()),
                refresh_token: refresh_token.map(SecretString::from),
                expires_at,
            })),
        })
    }

    /// Log in with username and password (OAuth password grant).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use robinhood_rs::{ClientConfig, Session};
    ///
    /// # async fn example() -> robinhood_rs::Result<()> {
    /// let session = Session::from_credentials(
    ///     "your-username",
    ///     "your-password",
    ///     &ClientConfig::default(),
    /// ).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn from_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self> {
        let username = username.into();
        let password = SecretString::from(password.into());

        let form = PasswordGrant {
            grant_type: "password",
            scope: SCOPE,
            client_id: &config.client_id,
            expires_in: TOKEN_LIFETIME_SECS,
            username: &username,
            password: password.expose_secret(),
        };
        let http = config.http_client()?;
        let token = Self::request_token(&http, &config.base_url, &form).await?;

        Ok(Self {
            inner: Arc::new(RwLock::new(SessionInner {
                http,
                base_url: config.base_url.clone(),
                client_id: config.client_id.clone(),
                access_token: SecretString::from(token.access_token),
                refresh_token: token.refresh_token.map(SecretString::from),
                expires_at: token.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
            })),
        })
    }

    /// Check if the access token has expired.
    ///
    /// Sessions with an unknown expiry never report as expired.
    pub async fn is_expired(&self) -> bool {
        let inner = self.inner.read().await;
        inner.expires_at.is_some_and(|at| Utc::now() >= at)
    }

    /// Check if the session will expire within the given buffer period.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        let inner = self.inner.read().await;
        inner.expires_at.is_some_and(|at| Utc::now() + buffer >= at)
    }

    /// Get the session expiration time, if known.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.expires_at
    }

    /// Whether this session holds a refresh token.
    pub async fn can_refresh(&self) -> bool {
        self.inner.read().await.refresh_token.is_some()
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionExpired`] if the session has no refresh
    /// token, or [`Error::Authentication`] if the exchange is rejected.
    pub async fn refresh(&self) -> Result<()> {
        let mut inner = self.inner.write().await;

        let Some(refresh_token) = inner.refresh_token.as_ref() else {
            return Err(Error::SessionExpired);
        };

        let form = RefreshGrant {
            grant_type: "refresh_token",
            scope: SCOPE,
            client_id: &inner.client_id,
            expires_in: TOKEN_LIFETIME_SECS,
            refresh_token: refresh_token.expose_secret(),
        };
        let token = Self::request_token(&inner.http, &inner.base_url, &form).await?;

        inner.access_token = SecretString::from(token.access_token);
        if let Some(new_refresh) = token.refresh_token {
            inner.refresh_token = Some(SecretString::from(new_refresh));
        }
        inner.expires_at = token
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        tracing::info!(expires_at = ?inner.expires_at, "Refreshed access token");
        Ok(())
    }

    /// Get the current access token.
    ///
    /// This does not check expiry; the client refreshes ahead of requests
    /// when auto-refresh is enabled.
    pub(crate) async fn access_token(&self) -> SecretString {
        self.inner.read().await.access_token.clone()
    }

    /// Get the refresh token (if available).
    ///
    /// Store this securely to create future sessions without re-entering
    /// credentials.
    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .refresh_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// Revoke the access token (logout).
    pub async fn revoke(&self) -> Result<()> {
        let inner = self.inner.read().await;
        let url = format!("{}/oauth2/revoke_token/", inner.base_url);

        let response = inner
            .http
            .post(&url)
            .form(&[
                ("client_id", inner.client_id.as_str()),
                ("token", inner.access_token.expose_secret()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            return Err(Error::from_api_response(status, body));
        }

        Ok(())
    }

    async fn request_token<F: Serialize>(
        http: &reqwest::Client,
        base_url: &str,
        form: &F,
    ) -> Result<TokenResponse> {
        let url = format!("{}/oauth2/token/", base_url);

        let response = http.post(&url).form(form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "Token request failed ({}): {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    grant_type: &'a str,
    scope: &'a str,
    client_id: &'a str,
    expires_in: i64,
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    grant_type: &'a str,
    scope: &'a str,
    client_id: &'a str,
    expires_in: i64,
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::from_token(
            "super-secret-token",
            Some("super-secret-refresh".to_string()),
            None,
            &ClientConfig::default(),
        )
        .unwrap();
        let debug_str = format!("{:?}", session);

        assert!(!debug_str.contains("super-secret"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_unknown_expiry_never_expires() {
        let session = Session::from_token("token", None, None, &ClientConfig::default()).unwrap();
        assert!(!session.is_expired().await);
        assert!(!session.expires_within(Duration::days(365)).await);
    }

    #[tokio::test]
    async fn test_expires_within_buffer() {
        let expires_at = Utc::now() + Duration::seconds(30);
        let session =
            Session::from_token("token", None, Some(expires_at), &ClientConfig::default()).unwrap();
        assert!(!session.is_expired().await);
        assert!(session.expires_within(Duration::seconds(60)).await);
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails() {
        let session = Session::from_token("token", None, None, &ClientConfig::default()).unwrap();
        assert!(!session.can_refresh().await);
        assert!(matches!(session.refresh().await, Err(Error::SessionExpired)));
    }
}
