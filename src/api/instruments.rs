//! Instruments service for retrieving equity instrument data.

use std::sync::Arc;

use crate::client::paginated::Page;
use crate::client::ClientInner;
use crate::models::{self, Instrument, InstrumentId, Symbol};
use crate::Result;

/// Service for equity instrument operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: robinhood_rs::RobinhoodClient) -> robinhood_rs::Result<()> {
/// // Every instrument listed under a symbol
/// let instruments = client.instruments().for_symbol(&"AAPL".into()).await?;
///
/// // Resolve an instrument id back to its record
/// if let Some(first) = instruments.first() {
///     let same = client.instruments().get(&first.id).await?;
///     assert!(same.is_some());
/// }
/// # Ok(())
/// # }
/// ```
pub struct InstrumentsService {
    inner: Arc<ClientInner>,
}

impl InstrumentsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List every instrument the brokerage knows about.
    ///
    /// This walks the whole `/instruments/` collection and is slow.
    pub async fn list_all(&self) -> Result<Vec<Instrument>> {
        self.inner.fetch_all::<Instrument, ()>("/instruments/", None).await
    }

    /// List the instruments matching a symbol, across all pages.
    pub async fn for_symbol(&self, symbol: &Symbol) -> Result<Vec<Instrument>> {
        self.inner
            .fetch_all("/instruments/", Some([("symbol", symbol.as_str())]))
            .await
    }

    /// Get instruments by id.
    ///
    /// Only the first page of the response is read; an empty `ids` slice
    /// returns an empty vec without a request.
    pub async fn by_ids(&self, ids: &[InstrumentId]) -> Result<Vec<Instrument>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids
            .iter()
            .map(InstrumentId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let page: Page<Instrument> = self
            .inner
            .get_with_query("/instruments/", &[("ids", ids)])
            .await?;
        Ok(page.results)
    }

    /// Get a single instrument by id, `None` if the server returns nothing.
    pub async fn get(&self, id: &InstrumentId) -> Result<Option<Instrument>> {
        let instruments = self.by_ids(std::slice::from_ref(id)).await?;
        Ok(instruments.into_iter().next())
    }

    /// URL of an instrument on the configured endpoint.
    pub fn instrument_url(&self, id: &InstrumentId) -> String {
        models::instrument_url(&self.inner.config.base_url, id)
    }
}
