//! Market data service for snapshot quotes and historicals.

use std::sync::Arc;

use serde::Serialize;

use crate::client::ClientInner;
use crate::models::{
    Historicals, OptionsQuote, OptionsStrategyQuote, PositionType, Quote, StrategyLeg, Symbol,
};
use crate::{Error, Result};

/// Maximum number of option instrument URLs per quote request.
pub const MAX_OPTION_QUOTES_PER_REQUEST: usize = 80;

/// Service for market data operations.
///
/// # Example
///
/// ```no_run
/// # use robinhood_rs::Symbol;
/// # async fn example(client: robinhood_rs::RobinhoodClient) -> robinhood_rs::Result<()> {
/// let aapl = Symbol::new("AAPL");
/// let quote = client.market_data().quote(&aapl).await?;
/// println!("{}: bid={:?}, ask={:?}", quote.symbol, quote.bid_price, quote.ask_price);
///
/// let week = client.market_data().historicals(&aapl, "day", "week").await?;
/// for bar in &week.historicals {
///     println!("{} close={}", bar.begins_at, bar.close_price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketDataService {
    inner: Arc<ClientInner>,
}

impl MarketDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the trading-session quote for a symbol.
    pub async fn quote(&self, symbol: &Symbol) -> Result<Quote> {
        let path = format!("/marketdata/quotes/{}/", urlencoding::encode(symbol.as_str()));
        self.inner
            .get_with_query(&path, &[("bounds", "trading")])
            .await
    }

    /// Get regular-session historical bars for a symbol.
    ///
    /// `interval` is the bar width (`"5minute"`, `"day"`, `"week"`) and
    /// `span` the covered period (`"day"`, `"week"`, `"year"`, `"5year"`).
    pub async fn historicals(&self, symbol: &Symbol, interval: &str, span: &str) -> Result<Historicals> {
        #[derive(Serialize)]
        struct Query<'a> {
            bounds: &'a str,
            include_inactive: bool,
            interval: &'a str,
            span: &'a str,
        }

        let path = format!("/marketdata/historicals/{}/", urlencoding::encode(symbol.as_str()));
        let query = Query {
            bounds: "regular",
            include_inactive: true,
            interval,
            span,
        };

        self.inner.get_with_query(&path, &query).await
    }

    /// Get quotes for option contracts by instrument URL.
    ///
    /// Contracts the server does not know are left out of the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for more than
    /// [`MAX_OPTION_QUOTES_PER_REQUEST`] URLs.
    pub async fn options_quotes(&self, instrument_urls: &[&str]) -> Result<Vec<OptionsQuote>> {
        if instrument_urls.len() > MAX_OPTION_QUOTES_PER_REQUEST {
            return Err(Error::InvalidInput(format!(
                "Too many option instruments. Maximum is {}, got {}",
                MAX_OPTION_QUOTES_PER_REQUEST,
                instrument_urls.len()
            )));
        }
        if instrument_urls.is_empty() {
            return Ok(Vec::new());
        }

        #[derive(serde::Deserialize)]
        struct Response {
            results: Vec<Option<OptionsQuote>>,
        }

        let response: Response = self
            .inner
            .get_with_query(
                "/marketdata/options/",
                &[("instruments", instrument_urls.join(","))],
            )
            .await?;
        Ok(response.results.into_iter().flatten().collect())
    }

    /// Get a combined quote for a multi-leg strategy.
    pub async fn strategy_quote(&self, legs: &[StrategyLeg]) -> Result<OptionsStrategyQuote> {
        if legs.is_empty() {
            return Err(Error::InvalidInput("strategy has no legs".to_string()));
        }

        #[derive(Serialize)]
        struct Query {
            instruments: String,
            ratios: String,
            types: String,
        }

        let mut instruments = Vec::with_capacity(legs.len());
        let mut ratios = Vec::with_capacity(legs.len());
        let mut types = Vec::with_capacity(legs.len());
        for leg in legs {
            instruments.push(leg.instrument.as_str());
            ratios.push(leg.ratio.to_string());
            types.push(match leg.position_type {
                PositionType::Long => "long",
                PositionType::Short => "short",
            });
        }

        let query = Query {
            instruments: instruments.join(","),
            ratios: ratios.join(","),
            types: types.join(","),
        };

        self.inner
            .get_with_query("/marketdata/options/strategy/quotes/", &query)
            .await
    }
}
