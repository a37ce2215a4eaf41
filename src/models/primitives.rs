//! Primitive types and newtypes for type-safe API interactions.
//!
//! Robinhood identifies most resources by UUID strings. Wrapping them keeps
//! an instrument id from being passed where a chain id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_newtype!(
    /// The id of an equity instrument.
    ///
    /// # Example
    ///
    /// ```
    /// use robinhood_rs::InstrumentId;
    ///
    /// let id = InstrumentId::new("450dfc6d-5510-4d40-abfb-f633b7d9be3e");
    /// println!("Instrument: {}", id);
    /// ```
    InstrumentId
);

string_newtype!(
    /// The id of an option chain.
    ChainId
);

string_newtype!(
    /// The id of an option contract (an options instrument).
    OptionId
);

string_newtype!(
    /// The id of an order.
    OrderId
);

string_newtype!(
    /// A trading symbol (e.g., "AAPL", "SPY").
    ///
    /// # Example
    ///
    /// ```
    /// use robinhood_rs::Symbol;
    ///
    /// let symbol = Symbol::new("AAPL");
    /// assert_eq!(symbol.as_str(), "AAPL");
    /// ```
    Symbol
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_id() {
        let id = InstrumentId::new("abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(id.to_string(), "abc-123");
    }

    #[test]
    fn test_symbol() {
        let symbol: Symbol = "AAPL".into();
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let chain = ChainId::new("chain-1");
        assert_eq!(serde_json::to_string(&chain).unwrap(), "\"chain-1\"");

        let back: ChainId = serde_json::from_str("\"chain-1\"").unwrap();
        assert_eq!(back, chain);
    }
}
