//! HTTP client and service layer for the Robinhood API.
//!
//! This module provides the main entry point [`RobinhoodClient`] for
//! interacting with the Robinhood API, its [`ClientConfig`], and the
//! cursor-following [`paginated`] protocol shared by every list endpoint.
//!
//! # Example
//!
//! ```no_run
//! use robinhood_rs::{ClientConfig, RobinhoodClient};
//!
//! # async fn example() -> robinhood_rs::Result<()> {
//! let config = ClientConfig::default().with_base_url("https://api.robinhood.com")?;
//! let client = RobinhoodClient::from_token("access-token", config)?;
//!
//! let positions = client.options().aggregate_positions(true).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL, DEFAULT_CLIENT_ID};
pub use http::RobinhoodClient;
pub use paginated::{CursorStream, Page, PartialCollection};
pub(crate) use http::ClientInner;
