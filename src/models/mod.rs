//! Data models for the Robinhood API.
//!
//! Models are organized by domain:
//!
//! - [`primitives`] - Id newtypes like `InstrumentId`, `ChainId`
//! - [`enums`] - Enumeration types for sides, states, etc.
//! - [`instrument`] - Equity instruments, option contracts, chains, positions
//! - [`order`] - Option order models
//! - [`market_data`] - Quote and historicals snapshots
//! - [`resource_url`] - Recovering ids from resource URLs

pub mod primitives;
pub mod enums;
pub mod instrument;
pub mod order;
pub mod market_data;
pub mod resource_url;

// Re-export commonly used types
pub use primitives::*;
pub use enums::*;
pub use instrument::*;
pub use order::*;
pub use market_data::*;
pub use resource_url::*;
