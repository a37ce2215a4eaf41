//! Enumeration types for the Robinhood API.
//!
//! Robinhood encodes these as lowercase snake_case strings. Enums that
//! describe server-side state carry an `Unknown` catch-all so a new value
//! on the wire does not break decoding of the whole page.

use serde::{Deserialize, Serialize};

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy
    Call,
    /// Right to sell
    Put,
}

impl OptionType {
    /// Returns `true` for calls.
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Returns `true` for puts.
    pub fn is_put(&self) -> bool {
        matches!(self, OptionType::Put)
    }
}

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

/// Whether an option leg opens or closes a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionEffect {
    /// Opens a new position
    Open,
    /// Closes an existing position
    Close,
}

/// Whether an order or position costs or pays premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Premium is paid
    Debit,
    /// Premium is received
    Credit,
}

/// Long or short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    /// Long position
    Long,
    /// Short position
    Short,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Limit order
    Limit,
    /// Market order
    Market,
}

/// How long an order stays working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good for day
    #[default]
    Gfd,
    /// Good till cancelled
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// At the opening
    Opg,
}

/// What releases an order to the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Released immediately
    #[default]
    Immediate,
    /// Released when the stop price trades
    Stop,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// Accepted locally, not yet sent
    Queued,
    /// Sent, not yet acknowledged
    Unconfirmed,
    /// Working at the exchange
    Confirmed,
    /// Partially executed and still working
    PartiallyFilled,
    /// Fully executed
    Filled,
    /// Cancelled
    Cancelled,
    /// Rejected
    Rejected,
    /// Failed
    Failed,
    /// Any state this crate does not know about
    #[serde(other)]
    Unknown,
}

impl OrderState {
    /// Returns `true` if the order can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderState::Filled | OrderState::Cancelled | OrderState::Rejected | OrderState::Failed
        )
    }

    /// Returns `true` if the order may still execute.
    pub fn is_working(&self) -> bool {
        matches!(
            self,
            OrderState::Queued
                | OrderState::Unconfirmed
                | OrderState::Confirmed
                | OrderState::PartiallyFilled
        )
    }
}

/// Whether an instrument can be traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tradability {
    /// Open and close allowed
    Tradable,
    /// Not tradable
    Untradable,
    /// Only closing trades allowed
    PositionClosingOnly,
    /// Any value this crate does not know about
    #[serde(other)]
    Unknown,
}

/// Listing state of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentState {
    /// Listed and active
    Active,
    /// Delisted or halted
    Inactive,
    /// Past expiration (options)
    Expired,
    /// Any value this crate does not know about
    #[serde(other)]
    Unknown,
}
