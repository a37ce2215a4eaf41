//! Financial instrument models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Direction, InstrumentState, OptionType, PositionType, Tradability};
use super::primitives::{ChainId, InstrumentId, OptionId, Symbol};
use super::resource_url::{parse_chain_id, parse_instrument_id, parse_option_id};
use crate::Result;

/// Equity (stock/ETF/ADR) instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// Instrument id
    pub id: InstrumentId,
    /// URL of this instrument
    pub url: String,
    /// Trading symbol
    pub symbol: Symbol,
    /// Full name of the security
    #[serde(default)]
    pub name: String,
    /// Short display name
    #[serde(default)]
    pub simple_name: Option<String>,
    /// Instrument type ("stock", "etp", "adr", ...)
    #[serde(rename = "type", default)]
    pub instrument_type: String,
    /// Listing state
    pub state: InstrumentState,
    /// Tradability on the exchange
    pub tradability: Tradability,
    /// Tradability on Robinhood Securities
    #[serde(default)]
    pub rhs_tradability: Option<Tradability>,
    /// Whether the instrument can be traded at all
    #[serde(default)]
    pub tradeable: bool,
    /// URL of the listing market
    #[serde(rename = "market", default)]
    pub market_url: Option<String>,
    /// URL of the fundamentals resource
    #[serde(rename = "fundamentals", default)]
    pub fundamentals_url: Option<String>,
    /// URL of the quote resource
    #[serde(rename = "quote", default)]
    pub quote_url: Option<String>,
    /// URL of the splits resource
    #[serde(rename = "splits", default)]
    pub splits_url: Option<String>,
    /// Symbol used by the option chain
    #[serde(default)]
    pub chain_symbol: Option<String>,
    /// Chain that options on this instrument belong to
    #[serde(default)]
    pub tradable_chain_id: Option<ChainId>,
    /// Initial margin requirement ratio
    #[serde(default)]
    pub margin_initial_ratio: Option<Decimal>,
    /// Maintenance margin ratio
    #[serde(default)]
    pub maintenance_ratio: Option<Decimal>,
    /// Day trade margin ratio
    #[serde(default)]
    pub day_trade_ratio: Option<Decimal>,
    /// Minimum price increment
    #[serde(default)]
    pub min_tick_size: Option<Decimal>,
    /// Bloomberg unique identifier
    #[serde(default)]
    pub bloomberg_unique: Option<String>,
    /// Listing date
    #[serde(default)]
    pub list_date: Option<NaiveDate>,
    /// Country of domicile
    #[serde(default)]
    pub country: Option<String>,
}

impl Instrument {
    /// Returns `true` if options can be traded on this instrument.
    pub fn has_options(&self) -> bool {
        self.tradable_chain_id.is_some()
    }

    /// Recover the id from this instrument's own URL.
    pub fn id_from_url(&self) -> Result<InstrumentId> {
        parse_instrument_id(&self.url)
    }
}

/// Tick size rules for an option chain or contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChainTick {
    /// Tick above the cutoff price
    #[serde(default)]
    pub above_tick: Option<Decimal>,
    /// Tick below the cutoff price
    #[serde(default)]
    pub below_tick: Option<Decimal>,
    /// Price at which the tick size changes
    #[serde(default)]
    pub cutoff_price: Option<Decimal>,
}

impl OptionChainTick {
    /// Tick size that applies at `price`.
    pub fn tick_for(&self, price: Decimal) -> Option<Decimal> {
        match self.cutoff_price {
            Some(cutoff) if price >= cutoff => self.above_tick,
            _ => self.below_tick,
        }
    }
}

/// An option contract (options instrument).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionInstrument {
    /// Contract id
    pub id: OptionId,
    /// URL of this contract
    pub url: String,
    /// Chain the contract belongs to
    pub chain_id: ChainId,
    /// Symbol of the chain (usually the underlying symbol)
    pub chain_symbol: String,
    /// Expiration date
    pub expiration_date: NaiveDate,
    /// Strike price
    pub strike_price: Decimal,
    /// Call or put
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Listing state
    pub state: InstrumentState,
    /// Tradability on the exchange
    pub tradability: Tradability,
    /// Tradability on Robinhood Securities
    #[serde(default)]
    pub rhs_tradability: Option<Tradability>,
    /// Tick size rules
    #[serde(default)]
    pub min_ticks: Option<OptionChainTick>,
    /// Date the contract was listed
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// When the record was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the record last changed
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An option chain: every expiration for one underlying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    /// Chain id
    pub id: ChainId,
    /// Chain symbol
    pub symbol: Symbol,
    /// Whether new positions may be opened
    #[serde(default)]
    pub can_open_position: bool,
    /// Cash delivered per contract for adjusted chains
    #[serde(default)]
    pub cash_component: Option<Decimal>,
    /// Available expiration dates
    #[serde(default)]
    pub expiration_dates: Vec<NaiveDate>,
    /// Contract multiplier (usually 100)
    pub trade_value_multiplier: Decimal,
    /// Deliverables of each contract
    #[serde(default)]
    pub underlying_instruments: Vec<UnderlyingInstrument>,
    /// Tick size rules
    #[serde(default)]
    pub min_ticks: Option<OptionChainTick>,
}

/// One deliverable of an option chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderlyingInstrument {
    /// Record id
    pub id: String,
    /// URL of the deliverable instrument
    pub instrument: String,
    /// Shares delivered per contract
    pub quantity: Decimal,
}

impl UnderlyingInstrument {
    /// Id of the deliverable instrument.
    pub fn instrument_id(&self) -> Result<InstrumentId> {
        parse_instrument_id(&self.instrument)
    }
}

/// Position in one option contract, as a leg of an aggregate position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsLeg {
    /// Leg id
    pub id: String,
    /// URL of the underlying per-contract position
    pub position: String,
    /// Long or short
    pub position_type: PositionType,
    /// URL of the option contract
    pub option: String,
    /// Contracts per unit of the strategy
    pub ratio_quantity: u32,
    /// Expiration date
    pub expiration_date: NaiveDate,
    /// Strike price
    pub strike_price: Decimal,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionsLeg {
    /// Id of the option contract this leg holds.
    pub fn option_id(&self) -> Result<OptionId> {
        parse_option_id(&self.option)
    }
}

/// An aggregate (strategy-level) option position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsPosition {
    /// Position id
    pub id: String,
    /// URL of the option chain
    pub chain: String,
    /// Underlying symbol
    pub symbol: Symbol,
    /// Strategy name ("long_call", "short_put_spread", ...)
    pub strategy: String,
    /// Average opening price per unit
    pub average_open_price: Decimal,
    /// Legs of the strategy
    #[serde(default)]
    pub legs: Vec<OptionsLeg>,
    /// Number of strategy units held
    pub quantity: Decimal,
    /// Average opening price of today's trades
    #[serde(default)]
    pub intraday_average_open_price: Option<Decimal>,
    /// Units opened today
    #[serde(default)]
    pub intraday_quantity: Option<Decimal>,
    /// Debit or credit
    pub direction: Direction,
    /// Direction of today's trades
    #[serde(default)]
    pub intraday_direction: Option<Direction>,
    /// Contract multiplier
    pub trade_value_multiplier: Decimal,
    /// When the position was opened
    pub created_at: DateTime<Utc>,
    /// When the position last changed
    pub updated_at: DateTime<Utc>,
}

impl OptionsPosition {
    /// Id of the chain this position trades on.
    pub fn chain_id(&self) -> Result<ChainId> {
        parse_chain_id(&self.chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_instrument_deserialize() {
        let json = serde_json::json!({
            "id": "450dfc6d-5510-4d40-abfb-f633b7d9be3e",
            "url": "https://api.robinhood.com/instruments/450dfc6d-5510-4d40-abfb-f633b7d9be3e/",
            "quote": "https://api.robinhood.com/quotes/AAPL/",
            "fundamentals": "https://api.robinhood.com/fundamentals/AAPL/",
            "splits": "https://api.robinhood.com/instruments/450dfc6d-5510-4d40-abfb-f633b7d9be3e/splits/",
            "state": "active",
            "market": "https://api.robinhood.com/markets/XNAS/",
            "simple_name": "Apple",
            "name": "Apple Inc. Common Stock",
            "tradeable": true,
            "tradability": "tradable",
            "symbol": "AAPL",
            "bloomberg_unique": "EQ0010169500001000",
            "margin_initial_ratio": "0.5000",
            "maintenance_ratio": "0.2500",
            "country": "US",
            "day_trade_ratio": "0.2500",
            "list_date": "1990-01-02",
            "min_tick_size": null,
            "type": "stock",
            "tradable_chain_id": "cee01a93-626e-4ee6-9b04-60e2fd1392d1",
            "rhs_tradability": "tradable",
            "chain_symbol": "AAPL"
        });

        let instrument: Instrument = serde_json::from_value(json).unwrap();
        assert_eq!(instrument.symbol, Symbol::new("AAPL"));
        assert_eq!(instrument.margin_initial_ratio, Some(dec!(0.5)));
        assert!(instrument.min_tick_size.is_none());
        assert!(instrument.has_options());
        assert_eq!(instrument.id_from_url().unwrap(), instrument.id);
    }

    #[test]
    fn test_option_instrument_deserialize() {
        let json = serde_json::json!({
            "chain_id": "cee01a93-626e-4ee6-9b04-60e2fd1392d1",
            "chain_symbol": "AAPL",
            "created_at": "2020-03-20T01:12:38.271578Z",
            "expiration_date": "2020-04-17",
            "id": "f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5",
            "issue_date": "2020-03-20",
            "min_ticks": { "above_tick": "0.05", "below_tick": "0.01", "cutoff_price": "3.00" },
            "rhs_tradability": "untradable",
            "state": "active",
            "strike_price": "250.0000",
            "tradability": "tradable",
            "type": "call",
            "updated_at": "2020-03-20T01:12:38.271585Z",
            "url": "https://api.robinhood.com/options/instruments/f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5/"
        });

        let option: OptionInstrument = serde_json::from_value(json).unwrap();
        assert!(option.option_type.is_call());
        assert_eq!(option.strike_price, dec!(250));
        assert_eq!(option.rhs_tradability, Some(Tradability::Untradable));

        let ticks = option.min_ticks.unwrap();
        assert_eq!(ticks.tick_for(dec!(2.50)), Some(dec!(0.01)));
        assert_eq!(ticks.tick_for(dec!(3.00)), Some(dec!(0.05)));
    }

    #[test]
    fn test_position_chain_id() {
        let json = serde_json::json!({
            "id": "pos-1",
            "chain": "https://api.robinhood.com/options/chains/cee01a93-626e-4ee6-9b04-60e2fd1392d1/",
            "symbol": "AAPL",
            "strategy": "long_call",
            "average_open_price": "120.0000",
            "legs": [{
                "id": "leg-1",
                "position": "https://api.robinhood.com/options/positions/p-1/",
                "position_type": "long",
                "option": "https://api.robinhood.com/options/instruments/f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5/",
                "ratio_quantity": 1,
                "expiration_date": "2020-03-27",
                "strike_price": "250.0000",
                "option_type": "call"
            }],
            "quantity": "1.0000",
            "intraday_average_open_price": "0.0000",
            "intraday_quantity": "0.0000",
            "direction": "debit",
            "intraday_direction": "debit",
            "trade_value_multiplier": "100.0000",
            "created_at": "2020-03-20T19:49:03.862417Z",
            "updated_at": "2020-03-20T19:49:03.862417Z"
        });

        let position: OptionsPosition = serde_json::from_value(json).unwrap();
        assert_eq!(
            position.chain_id().unwrap().as_str(),
            "cee01a93-626e-4ee6-9b04-60e2fd1392d1"
        );
        assert_eq!(
            position.legs[0].option_id().unwrap().as_str(),
            "f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5"
        );
    }
}
