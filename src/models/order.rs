//! Option order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::*;
use super::primitives::{ChainId, OptionId, OrderId};
use super::resource_url::parse_option_id;
use crate::Result;

/// One leg of an option order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsOrderLeg {
    /// Leg id
    pub id: String,
    /// URL of the option contract
    pub option: String,
    /// Open or close
    pub position_effect: PositionEffect,
    /// Contracts per unit of the order
    pub ratio_quantity: u32,
    /// Buy or sell
    pub side: Side,
    /// Fills against this leg
    #[serde(default)]
    pub executions: Vec<Execution>,
}

impl OptionsOrderLeg {
    /// Id of the option contract this leg trades.
    pub fn option_id(&self) -> Result<OptionId> {
        parse_option_id(&self.option)
    }
}

/// A single fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    /// Execution id
    pub id: String,
    /// Fill price
    pub price: Decimal,
    /// Filled quantity
    pub quantity: Decimal,
    /// Settlement date
    #[serde(default)]
    pub settlement_date: Option<chrono::NaiveDate>,
    /// Fill time
    pub timestamp: DateTime<Utc>,
}

/// An option order as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsOrder {
    /// Order id
    pub id: OrderId,
    /// Client reference id
    #[serde(default)]
    pub ref_id: Option<String>,
    /// URL to POST to cancel the order; `None` once it is no longer cancellable
    #[serde(default)]
    pub cancel_url: Option<String>,
    /// Chain the order trades on
    pub chain_id: ChainId,
    /// Chain symbol
    pub chain_symbol: String,
    /// Strategy closed by this order, set on closing orders
    #[serde(default)]
    pub closing_strategy: Option<String>,
    /// Strategy opened by this order, set on opening orders
    #[serde(default)]
    pub opening_strategy: Option<String>,
    /// Debit or credit
    pub direction: Direction,
    /// Order legs
    #[serde(default)]
    pub legs: Vec<OptionsOrderLeg>,
    /// Limit price per unit
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Stop price
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// Total premium
    #[serde(default)]
    pub premium: Option<Decimal>,
    /// Premium of executed quantity
    #[serde(default)]
    pub processed_premium: Option<Decimal>,
    /// Units ordered
    pub quantity: Decimal,
    /// Units executed
    #[serde(default)]
    pub processed_quantity: Option<Decimal>,
    /// Units still working
    #[serde(default)]
    pub pending_quantity: Option<Decimal>,
    /// Units cancelled
    #[serde(default)]
    pub canceled_quantity: Option<Decimal>,
    /// Lifecycle state
    pub state: OrderState,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Trigger
    pub trigger: Trigger,
    /// Limit or market
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Free-form rejection category
    #[serde(default)]
    pub response_category: Option<serde_json::Value>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl OptionsOrder {
    /// Returns `true` if the order may still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        self.cancel_url.is_some() && self.state.is_working()
    }
}

/// One leg of a new option order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOptionsLeg {
    /// URL of the option contract
    pub option: String,
    /// Open or close
    pub position_effect: PositionEffect,
    /// Contracts per unit of the order
    pub ratio_quantity: u32,
    /// Buy or sell
    pub side: Side,
}

impl NewOptionsLeg {
    /// Create a leg with a ratio of one.
    pub fn new(option_url: impl Into<String>, side: Side, position_effect: PositionEffect) -> Self {
        Self {
            option: option_url.into(),
            position_effect,
            ratio_quantity: 1,
            side,
        }
    }

    /// Set the ratio quantity.
    pub fn ratio(mut self, ratio_quantity: u32) -> Self {
        self.ratio_quantity = ratio_quantity;
        self
    }
}

/// A new option order to submit.
///
/// Use [`NewOptionsOrderBuilder`] to construct one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOptionsOrder {
    /// URL of the account placing the order
    pub account: String,
    /// Debit or credit
    pub direction: Direction,
    /// Order legs
    pub legs: Vec<NewOptionsLeg>,
    /// Limit price per unit
    pub price: Decimal,
    /// Units to trade
    pub quantity: Decimal,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Trigger
    pub trigger: Trigger,
    /// Limit or market
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Stop price for stop-triggered orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Client reference id, used by the server to deduplicate submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    /// Skip the pattern-day-trader check
    pub override_day_trade_checks: bool,
    /// Skip the day-trade buying power check
    pub override_dtbp_checks: bool,
}

/// Builder for [`NewOptionsOrder`].
///
/// Only checks that required fields are present; whether the order is
/// acceptable is for the server to decide.
///
/// # Example
///
/// ```
/// use robinhood_rs::models::{
///     Direction, NewOptionsLeg, NewOptionsOrderBuilder, PositionEffect, Side,
/// };
/// use rust_decimal_macros::dec;
///
/// let order = NewOptionsOrderBuilder::new()
///     .account("https://api.robinhood.com/accounts/5QR12345/")
///     .direction(Direction::Debit)
///     .price(dec!(1.25))
///     .quantity(dec!(1))
///     .leg(NewOptionsLeg::new(
///         "https://api.robinhood.com/options/instruments/f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5/",
///         Side::Buy,
///         PositionEffect::Open,
///     ))
///     .build()
///     .unwrap();
/// assert_eq!(order.legs.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct NewOptionsOrderBuilder {
    account: Option<String>,
    direction: Option<Direction>,
    legs: Vec<NewOptionsLeg>,
    price: Option<Decimal>,
    quantity: Option<Decimal>,
    time_in_force: TimeInForce,
    trigger: Trigger,
    order_type: Option<OrderType>,
    stop_price: Option<Decimal>,
    ref_id: Option<String>,
}

impl NewOptionsOrderBuilder {
    /// Create a new order builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the account URL.
    pub fn account(mut self, account_url: impl Into<String>) -> Self {
        self.account = Some(account_url.into());
        self
    }

    /// Set the direction (debit/credit).
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Add a leg.
    pub fn leg(mut self, leg: NewOptionsLeg) -> Self {
        self.legs.push(leg);
        self
    }

    /// Set the limit price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the quantity.
    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the time in force (default: good for day).
    pub fn time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set the order type (default: limit).
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Make the order stop-triggered at `stop_price`.
    pub fn stop_price(mut self, stop_price: Decimal) -> Self {
        self.trigger = Trigger::Stop;
        self.stop_price = Some(stop_price);
        self
    }

    /// Set a client reference id.
    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    /// Build the order.
    pub fn build(self) -> Result<NewOptionsOrder> {
        let missing = |field: &str| crate::Error::InvalidInput(format!("{} is required", field));

        let account = self.account.ok_or_else(|| missing("account"))?;
        let direction = self.direction.ok_or_else(|| missing("direction"))?;
        let price = self.price.ok_or_else(|| missing("price"))?;
        let quantity = self.quantity.ok_or_else(|| missing("quantity"))?;

        if self.legs.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Order must have at least one leg".to_string(),
            ));
        }

        Ok(NewOptionsOrder {
            account,
            direction,
            legs: self.legs,
            price,
            quantity,
            time_in_force: self.time_in_force,
            trigger: self.trigger,
            order_type: self.order_type.unwrap_or(OrderType::Limit),
            stop_price: self.stop_price,
            ref_id: self.ref_id,
            override_day_trade_checks: false,
            override_dtbp_checks: false,
        })
    }
}
