//! Error types for the Robinhood API client.
//!
//! This module provides a single error type covering transport failures,
//! API error responses, and the structural checks performed on resource
//! URLs returned by the server.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Robinhood operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Robinhood API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (connection, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status
    #[error("API error: status={status}, detail={detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable message from the `detail` field
        detail: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// Authentication failed (invalid credentials, token exchange failure)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Access token has expired and needs refresh
    #[error("Session expired; refresh required")]
    SessionExpired,

    /// Rate limited by the API
    #[error("Rate limited; retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Number of seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A resource URL could not be parsed at all.
    #[error("Malformed URL {url:?}: {source}")]
    MalformedUrl {
        /// The offending input
        url: String,
        /// Underlying parse failure
        #[source]
        source: url::ParseError,
    },

    /// A resource URL parsed, but its path is too shallow for the
    /// identifier that was requested.
    #[error("Unexpected path shape in {url:?}: expected at least {expected} segments, found {found}")]
    UnexpectedPathShape {
        /// The offending URL
        url: String,
        /// Segments required
        expected: usize,
        /// Segments present after trimming
        found: usize,
    },

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

// Timeouts get their own variant so callers can tell them from other
// transport failures.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(e)
        }
    }
}

impl Error {
    /// Returns `true` if the error came from the transport: network,
    /// HTTP status, or response decoding.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Json(_)
                | Error::Api { .. }
                | Error::SessionExpired
                | Error::RateLimited { .. }
                | Error::Timeout
                | Error::NotFound(_)
        )
    }

    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    ///
    /// # Example
    ///
    /// ```
    /// use robinhood_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable() {
    ///         println!("Retrying operation...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => !e.is_decode() && !e.is_builder(),
            Error::Timeout | Error::RateLimited { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::SessionExpired)
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, unexpected URL, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_)
            | Error::Config(_)
            | Error::MalformedUrl { .. }
            | Error::UnexpectedPathShape { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a response body.
    ///
    /// The brokerage reports failures as `{"detail": "..."}`; validation
    /// failures come back as `{"field": ["message", ...]}` and are
    /// flattened into the detail string.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let detail = match body.get("detail").and_then(|d| d.as_str()) {
            Some(detail) => detail.to_string(),
            None => body
                .as_object()
                .and_then(|fields| {
                    let messages: Vec<String> = fields
                        .iter()
                        .filter_map(|(field, value)| {
                            let first = value.as_array()?.first()?.as_str()?;
                            Some(format!("{}: {}", field, first))
                        })
                        .collect();
                    (!messages.is_empty()).then(|| messages.join("; "))
                })
                .unwrap_or_else(|| "Unknown API error".to_string()),
        };

        Error::Api {
            status,
            detail,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        assert!(Error::Timeout.is_retryable());
        assert!(Error::RateLimited { retry_after_secs: 30 }.is_retryable());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
        assert!(!Error::SessionExpired.is_retryable());
    }

    #[test]
    fn test_error_auth() {
        assert!(Error::SessionExpired.is_auth_error());
        assert!(Error::Authentication("failed".into()).is_auth_error());
        assert!(!Error::Timeout.is_auth_error());
    }

    #[test]
    fn test_transport_classification() {
        assert!(Error::NotFound("gone".into()).is_transport());
        assert!(Error::from_api_response(502, Value::Null).is_transport());

        let shape = Error::UnexpectedPathShape {
            url: "https://api.robinhood.com/".into(),
            expected: 2,
            found: 0,
        };
        assert!(!shape.is_transport());
        assert!(shape.is_client_error());
    }

    #[test]
    fn test_from_api_response_detail() {
        let body = serde_json::json!({ "detail": "Not enough shares to sell." });

        match Error::from_api_response(400, body) {
            Error::Api { status, detail, .. } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Not enough shares to sell.");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_api_response_field_errors() {
        let body = serde_json::json!({ "quantity": ["Ensure this value is greater than 0."] });

        match Error::from_api_response(400, body) {
            Error::Api { detail, .. } => {
                assert_eq!(detail, "quantity: Ensure this value is greater than 0.");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_api_response_unknown_body() {
        match Error::from_api_response(500, Value::Null) {
            Error::Api { detail, .. } => assert_eq!(detail, "Unknown API error"),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}
