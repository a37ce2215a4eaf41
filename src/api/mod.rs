//! API service modules for Robinhood endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the Robinhood API.

mod instruments;
mod market_data;
mod options;

pub use instruments::InstrumentsService;
pub use market_data::{MarketDataService, MAX_OPTION_QUOTES_PER_REQUEST};
pub use options::{OptionInstrumentsQuery, OptionsService};
