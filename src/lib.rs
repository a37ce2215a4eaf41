//! # robinhood-rs
//!
//! An async Rust client for the Robinhood brokerage's private REST API.
//!
//! This crate provides typed access to equity instruments, option
//! contracts and chains, option positions and orders, and market quotes.
//!
//! ## Features
//!
//! - **Authentication**: OAuth password grant and token refresh
//! - **Pagination**: Every list accessor follows the server's `next` links to
//!   exhaustion, with a guard against cursors that point back at themselves
//! - **Resource URLs**: Recover ids from the resource URLs the API embeds in
//!   its records
//! - **Options**: Contracts, chains, aggregate positions, order placement
//! - **Market Data**: Quotes, option quotes with greeks, historicals
//! - **Async-first**: Built on Tokio and reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use robinhood_rs::{RobinhoodClient, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> robinhood_rs::Result<()> {
//!     let client = RobinhoodClient::login("username", "password").await?;
//!     let aapl = Symbol::new("AAPL");
//!
//!     // All instruments listed under a symbol
//!     let instruments = client.instruments().for_symbol(&aapl).await?;
//!     println!("Found {} instruments", instruments.len());
//!
//!     // Current quote
//!     let quote = client.market_data().quote(&aapl).await?;
//!     println!("Last trade: {:?}", quote.last_trade_price);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Following Resource URLs
//!
//! Records reference each other by URL. The `models::parse_*` helpers turn
//! those URLs back into ids:
//!
//! ```rust,no_run
//! use robinhood_rs::RobinhoodClient;
//!
//! #[tokio::main]
//! async fn main() -> robinhood_rs::Result<()> {
//!     let client = RobinhoodClient::login("user", "pass").await?;
//!
//!     for position in client.options().aggregate_positions(true).await? {
//!         let chain_id = position.chain_id()?;
//!         for leg in &position.legs {
//!             println!("{} {} -> option {}", chain_id, position.symbol, leg.option_id()?);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Order Placement
//!
//! ```rust,no_run
//! use robinhood_rs::RobinhoodClient;
//! use robinhood_rs::models::{Direction, NewOptionsLeg, NewOptionsOrderBuilder, PositionEffect, Side};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> robinhood_rs::Result<()> {
//!     let client = RobinhoodClient::login("user", "pass").await?;
//!
//!     let order = NewOptionsOrderBuilder::new()
//!         .account("https://api.robinhood.com/accounts/5QR12345/")
//!         .direction(Direction::Debit)
//!         .price(dec!(1.25))
//!         .quantity(dec!(1))
//!         .leg(NewOptionsLeg::new(
//!             "https://api.robinhood.com/options/instruments/f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5/",
//!             Side::Buy,
//!             PositionEffect::Open,
//!         ))
//!         .build()?;
//!
//!     let placed = client.options().place_order(&order).await?;
//!     println!("Order placed: {} ({:?})", placed.id, placed.state);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{ChainId, InstrumentId, OptionId, OrderId, Symbol};
pub use client::{ClientConfig, RetryConfig, RobinhoodClient};
pub use auth::Session;

/// Prelude module for convenient imports.
///
/// ```rust
/// use robinhood_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        ChainId, InstrumentId, OptionId, OrderId, Symbol,
        // Enums
        Direction, InstrumentState, OptionType, OrderState, OrderType, PositionEffect,
        PositionType, Side, TimeInForce, Tradability, Trigger,
        // Instrument models
        Instrument, OptionChain, OptionInstrument, OptionsPosition,
        // Order models
        NewOptionsLeg, NewOptionsOrder, NewOptionsOrderBuilder, OptionsOrder,
        // Market data
        Historicals, OptionsQuote, OptionsStrategyQuote, Quote, StrategyLeg,
        // Resource URLs
        extract_id, parse_chain_id, parse_instrument_id, parse_option_id, PathShape,
    };
    pub use crate::api::OptionInstrumentsQuery;
    pub use crate::client::paginated::{fetch_all, Page, PartialCollection};
    pub use crate::client::{ClientConfig, RetryConfig, RobinhoodClient};
    pub use crate::auth::Session;
}
