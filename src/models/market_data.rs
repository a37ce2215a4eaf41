//! Market data models for snapshot quotes and historicals.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::PositionType;
use super::primitives::{InstrumentId, OptionId, Symbol};
use super::resource_url::{parse_instrument_id, parse_option_id};
use crate::Result;

/// Equity quote snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Trading symbol
    pub symbol: Symbol,
    /// Best ask price
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    /// Best ask size
    #[serde(default)]
    pub ask_size: Option<i64>,
    /// Best bid price
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    /// Best bid size
    #[serde(default)]
    pub bid_size: Option<i64>,
    /// Last regular-session trade price
    #[serde(default)]
    pub last_trade_price: Option<Decimal>,
    /// Last extended-hours trade price
    #[serde(default)]
    pub last_extended_hours_trade_price: Option<Decimal>,
    /// Previous close
    #[serde(default)]
    pub previous_close: Option<Decimal>,
    /// Previous close adjusted for corporate actions
    #[serde(default)]
    pub adjusted_previous_close: Option<Decimal>,
    /// Date of the previous close
    #[serde(default)]
    pub previous_close_date: Option<NaiveDate>,
    /// Whether trading is halted
    #[serde(default)]
    pub trading_halted: bool,
    /// Whether the instrument has traded today
    #[serde(default)]
    pub has_traded: bool,
    /// Source of the last trade price ("consolidated", "nls")
    #[serde(default)]
    pub last_trade_price_source: Option<String>,
    /// When the quote was last updated
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// URL of the instrument
    pub instrument: String,
}

impl Quote {
    /// Calculate the bid-ask spread.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.ask_price, self.bid_price) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Id of the quoted instrument.
    pub fn instrument_id(&self) -> Result<InstrumentId> {
        parse_instrument_id(&self.instrument)
    }
}

/// Option quote snapshot with greeks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsQuote {
    /// URL of the option contract
    pub instrument: String,
    /// Best ask price
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    /// Best ask size
    #[serde(default)]
    pub ask_size: Option<i64>,
    /// Best bid price
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    /// Best bid size
    #[serde(default)]
    pub bid_size: Option<i64>,
    /// Mark (midpoint) price
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    /// Mark price adjusted for the tick size
    #[serde(default)]
    pub adjusted_mark_price: Option<Decimal>,
    /// Last trade price
    #[serde(default)]
    pub last_trade_price: Option<Decimal>,
    /// Last trade size
    #[serde(default)]
    pub last_trade_size: Option<i64>,
    /// Session high
    #[serde(default)]
    pub high_price: Option<Decimal>,
    /// Session low
    #[serde(default)]
    pub low_price: Option<Decimal>,
    /// Previous close
    #[serde(default)]
    pub previous_close_price: Option<Decimal>,
    /// Date of the previous close
    #[serde(default)]
    pub previous_close_date: Option<NaiveDate>,
    /// Break-even price of a long position
    #[serde(default)]
    pub break_even_price: Option<Decimal>,
    /// Buy price with a high fill rate
    #[serde(default)]
    pub high_fill_rate_buy_price: Option<Decimal>,
    /// Sell price with a high fill rate
    #[serde(default)]
    pub high_fill_rate_sell_price: Option<Decimal>,
    /// Buy price with a low fill rate
    #[serde(default)]
    pub low_fill_rate_buy_price: Option<Decimal>,
    /// Sell price with a low fill rate
    #[serde(default)]
    pub low_fill_rate_sell_price: Option<Decimal>,
    /// Probability of profit for a long position
    #[serde(default)]
    pub chance_of_profit_long: Option<Decimal>,
    /// Probability of profit for a short position
    #[serde(default)]
    pub chance_of_profit_short: Option<Decimal>,
    /// Implied volatility
    #[serde(default)]
    pub implied_volatility: Option<Decimal>,
    /// Delta
    #[serde(default)]
    pub delta: Option<Decimal>,
    /// Gamma
    #[serde(default)]
    pub gamma: Option<Decimal>,
    /// Theta
    #[serde(default)]
    pub theta: Option<Decimal>,
    /// Vega
    #[serde(default)]
    pub vega: Option<Decimal>,
    /// Rho
    #[serde(default)]
    pub rho: Option<Decimal>,
    /// Open interest
    #[serde(default)]
    pub open_interest: Option<i64>,
    /// Session volume
    #[serde(default)]
    pub volume: Option<i64>,
}

impl OptionsQuote {
    /// Id of the quoted option contract.
    pub fn option_id(&self) -> Result<OptionId> {
        parse_option_id(&self.instrument)
    }
}

/// One leg of a strategy quote request.
#[derive(Debug, Clone)]
pub struct StrategyLeg {
    /// URL of the option contract
    pub instrument: String,
    /// Contracts per unit of the strategy
    pub ratio: Decimal,
    /// Long or short
    pub position_type: PositionType,
}

impl StrategyLeg {
    /// Create a strategy leg.
    pub fn new(instrument_url: impl Into<String>, ratio: Decimal, position_type: PositionType) -> Self {
        Self {
            instrument: instrument_url.into(),
            ratio,
            position_type,
        }
    }
}

/// Quote for a multi-leg option strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsStrategyQuote {
    /// Mark price adjusted for the tick size
    #[serde(default)]
    pub adjusted_mark_price: Option<Decimal>,
    /// Net ask price
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    /// Net bid price
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    /// Net mark price
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    /// Previous close date
    #[serde(default)]
    pub previous_close_date: Option<NaiveDate>,
    /// Previous close price
    #[serde(default)]
    pub previous_close_price: Option<Decimal>,
    /// Legs as understood by the server
    #[serde(default)]
    pub legs: Vec<OptionsStrategyQuoteLeg>,
}

/// A leg of a strategy quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsStrategyQuoteLeg {
    /// Option contract id
    pub id: OptionId,
    /// Ratio
    pub ratio: Decimal,
    /// Long or short
    #[serde(rename = "type")]
    pub position_type: PositionType,
}

/// Historical bars for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Historicals {
    /// URL of the quote resource
    #[serde(default)]
    pub quote: Option<String>,
    /// Trading symbol
    pub symbol: Symbol,
    /// Bar interval ("5minute", "day", "week")
    pub interval: String,
    /// Covered span ("day", "week", "year")
    pub span: String,
    /// Session bounds ("regular", "extended", "trading")
    #[serde(default)]
    pub bounds: Option<String>,
    /// URL of the instrument
    #[serde(default)]
    pub instrument: Option<String>,
    /// Instrument id
    #[serde(default)]
    pub instrument_id: Option<InstrumentId>,
    /// The bars, oldest first
    #[serde(default)]
    pub historicals: Vec<Historical>,
}

/// One OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Historical {
    /// Bar start time
    pub begins_at: DateTime<Utc>,
    /// Open price
    pub open_price: Decimal,
    /// Close price
    pub close_price: Decimal,
    /// High price
    pub high_price: Decimal,
    /// Low price
    pub low_price: Decimal,
    /// Volume
    #[serde(default)]
    pub volume: i64,
    /// Session ("reg", "pre", "post")
    #[serde(default)]
    pub session: Option<String>,
    /// Whether the bar was filled in by the server
    #[serde(default)]
    pub interpolated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_deserialize() {
        let json = serde_json::json!({
            "ask_price": "254.290000",
            "ask_size": 100,
            "bid_price": "254.230000",
            "bid_size": 200,
            "last_trade_price": "254.290000",
            "last_extended_hours_trade_price": null,
            "previous_close": "247.740000",
            "adjusted_previous_close": "247.740000",
            "previous_close_date": "2020-03-19",
            "symbol": "AAPL",
            "trading_halted": false,
            "has_traded": true,
            "last_trade_price_source": "consolidated",
            "updated_at": "2020-03-20T20:00:00Z",
            "instrument": "https://api.robinhood.com/instruments/450dfc6d-5510-4d40-abfb-f633b7d9be3e/"
        });

        let quote: Quote = serde_json::from_value(json).unwrap();
        assert_eq!(quote.spread(), Some(dec!(0.06)));
        assert!(quote.last_extended_hours_trade_price.is_none());
        assert_eq!(
            quote.instrument_id().unwrap().as_str(),
            "450dfc6d-5510-4d40-abfb-f633b7d9be3e"
        );
    }

    #[test]
    fn test_options_quote_greeks() {
        let json = serde_json::json!({
            "instrument": "https://api.robinhood.com/options/instruments/f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5/",
            "ask_price": "1.250000",
            "ask_size": 10,
            "bid_price": "1.150000",
            "bid_size": 12,
            "mark_price": "1.200000",
            "delta": "0.512345",
            "theta": "-0.051234",
            "high_price": null,
            "low_price": null,
            "open_interest": 1234,
            "volume": 56
        });

        let quote: OptionsQuote = serde_json::from_value(json).unwrap();
        assert_eq!(quote.delta, Some(dec!(0.512345)));
        assert!(quote.high_price.is_none());
        assert_eq!(
            quote.option_id().unwrap().as_str(),
            "f7ff3f6c-c1fe-4bd8-9ad5-b4a8e2b1d1b5"
        );
    }

    #[test]
    fn test_historicals_deserialize() {
        let json = serde_json::json!({
            "quote": "https://api.robinhood.com/quotes/BBBY/",
            "symbol": "BBBY",
            "interval": "day",
            "span": "week",
            "bounds": "regular",
            "instrument_id": "abc",
            "historicals": [{
                "begins_at": "2020-03-16T00:00:00Z",
                "open_price": "4.500000",
                "close_price": "4.210000",
                "high_price": "4.700000",
                "low_price": "4.100000",
                "volume": 1500000,
                "session": "reg",
                "interpolated": false
            }]
        });

        let historicals: Historicals = serde_json::from_value(json).unwrap();
        assert_eq!(historicals.historicals.len(), 1);
        assert_eq!(historicals.historicals[0].close_price, dec!(4.21));
    }
}
