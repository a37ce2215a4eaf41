//! Options service: contracts, chains, positions and orders.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::paginated::{CursorStream, Page};
use crate::client::ClientInner;
use crate::models::{
    ChainId, InstrumentState, NewOptionsOrder, OptionChain, OptionInstrument, OptionType,
    OptionsOrder, OptionsPosition, Tradability,
};
use crate::{Error, Result};

/// Filters for listing option contracts.
///
/// Filters are sent with the first page request only; later pages follow
/// the server's `next` links verbatim.
#[derive(Debug, Default, Clone, Serialize)]
pub struct OptionInstrumentsQuery {
    /// Chain to list contracts from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
    /// Chain symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_symbol: Option<String>,
    /// Comma-separated expiration dates (`YYYY-MM-DD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_dates: Option<String>,
    /// Listing state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<InstrumentState>,
    /// Tradability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tradability: Option<Tradability>,
    /// Call or put
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub option_type: Option<OptionType>,
    /// Exact strike price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_price: Option<Decimal>,
}

impl OptionInstrumentsQuery {
    /// Contracts of one chain.
    pub fn for_chain(chain_id: impl Into<ChainId>) -> Self {
        Self {
            chain_id: Some(chain_id.into()),
            ..Default::default()
        }
    }

    /// Restrict to the given expiration dates.
    pub fn expiring_on(mut self, dates: &[NaiveDate]) -> Self {
        let joined = dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.expiration_dates = Some(joined);
        self
    }

    /// Restrict to calls or puts.
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    /// Restrict by listing state.
    pub fn state(mut self, state: InstrumentState) -> Self {
        self.state = Some(state);
        self
    }

    /// Restrict by tradability.
    pub fn tradability(mut self, tradability: Tradability) -> Self {
        self.tradability = Some(tradability);
        self
    }

    /// Restrict to one strike.
    pub fn strike_price(mut self, strike: Decimal) -> Self {
        self.strike_price = Some(strike);
        self
    }
}

/// Service for option contracts, chains, positions and orders.
///
/// # Example
///
/// ```no_run
/// use robinhood_rs::api::OptionInstrumentsQuery;
/// use robinhood_rs::models::{InstrumentState, OptionType};
///
/// # async fn example(client: robinhood_rs::RobinhoodClient) -> robinhood_rs::Result<()> {
/// let query = OptionInstrumentsQuery::for_chain("cee01a93-626e-4ee6-9b04-60e2fd1392d1")
///     .option_type(OptionType::Call)
///     .state(InstrumentState::Active);
///
/// let calls = client.options().instruments(query).await?;
/// println!("{} active calls", calls.len());
/// # Ok(())
/// # }
/// ```
pub struct OptionsService {
    inner: Arc<ClientInner>,
}

impl OptionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List option contracts matching `query`, across all pages.
    pub async fn instruments(&self, query: OptionInstrumentsQuery) -> Result<Vec<OptionInstrument>> {
        self.inner
            .fetch_all("/options/instruments/", Some(query))
            .await
    }

    /// Get option chains by id, across all pages.
    ///
    /// An empty `ids` slice returns an empty vec without a request.
    pub async fn chains(&self, ids: &[ChainId]) -> Result<Vec<OptionChain>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids
            .iter()
            .map(ChainId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        self.inner
            .fetch_all("/options/chains/", Some([("ids", ids)]))
            .await
    }

    /// List aggregate option positions.
    ///
    /// With `nonzero` set, closed positions are left out.
    pub async fn aggregate_positions(&self, nonzero: bool) -> Result<Vec<OptionsPosition>> {
        self.inner
            .fetch_all(
                "/options/aggregate_positions/",
                nonzero.then_some([("nonzero", "true")]),
            )
            .await
    }

    /// Get one page of option orders, most recent first.
    ///
    /// `cursor` is the opaque cursor token from a previous page; `None` or
    /// an empty token requests the first page.
    pub async fn orders_page(&self, cursor: Option<&str>) -> Result<Page<OptionsOrder>> {
        match cursor.filter(|c| !c.is_empty()) {
            Some(cursor) => {
                self.inner
                    .get_with_query("/options/orders/", &[("cursor", cursor)])
                    .await
            }
            None => self.inner.get("/options/orders/").await,
        }
    }

    /// List every option order, most recent first.
    pub async fn orders(&self) -> Result<Vec<OptionsOrder>> {
        self.inner
            .fetch_all::<OptionsOrder, ()>("/options/orders/", None)
            .await
    }

    /// Stream every option order, fetching pages as the stream is polled.
    pub fn orders_stream(&self) -> CursorStream<OptionsOrder> {
        self.inner
            .stream_all::<OptionsOrder>("/options/orders/")
    }

    /// Submit a new option order.
    pub async fn place_order(&self, order: &NewOptionsOrder) -> Result<OptionsOrder> {
        tracing::debug!(legs = order.legs.len(), price = %order.price, "Placing options order");
        self.inner.post("/options/orders/", order).await
    }

    /// Cancel a working order through its `cancel_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the order carries no cancel URL.
    pub async fn cancel_order(&self, order: &OptionsOrder) -> Result<()> {
        let Some(cancel_url) = order.cancel_url.as_deref() else {
            return Err(Error::InvalidInput(format!(
                "order {} is not cancellable",
                order.id
            )));
        };

        let _: serde_json::Value = self.inner.post_url::<_, ()>(cancel_url, None).await?;
        Ok(())
    }
}
