//! Authentication and session management for the Robinhood API.
//!
//! Robinhood issues OAuth bearer tokens through `/oauth2/token/`. A
//! [`Session`] can be created by logging in with a username and password
//! (password grant) or from tokens persisted by a previous run.
//!
//! # Password Login
//!
//! ```no_run
//! use robinhood_rs::{ClientConfig, Session};
//!
//! # async fn example() -> robinhood_rs::Result<()> {
//! let session = Session::from_credentials(
//!     "username",
//!     "password",
//!     &ClientConfig::default(),
//! ).await?;
//!
//! // Keep the refresh token to skip the password next time.
//! let refresh = session.refresh_token().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Existing Tokens
//!
//! ```
//! use robinhood_rs::{ClientConfig, Session};
//!
//! let session = Session::from_token(
//!     "access-token",
//!     Some("refresh-token".to_string()),
//!     None,
//!     &ClientConfig::default(),
//! )?;
//! # Ok::<(), robinhood_rs::Error>(())
//! ```

mod session;

pub use session::Session;
