//! Identifier extraction from resource URLs.
//!
//! Robinhood links records to each other by URL rather than by id: an
//! option position names its chain as
//! `https://api.robinhood.com/options/chains/{id}/`, an order leg names its
//! contract as `https://api.robinhood.com/options/instruments/{id}/`. The
//! helpers here recover the bare id so it can be used in follow-up queries.
//! Path-only references such as `/instruments/{id}/` are accepted too.

use url::{ParseError, Url};

use super::primitives::{ChainId, InstrumentId, OptionId};
use crate::{Error, Result};

/// Where the identifier sits in a resource URL's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathShape {
    /// Minimum number of path segments the URL must have.
    pub min_segments: usize,
    /// 0-based index of the identifier segment.
    pub segment_index: usize,
}

impl PathShape {
    /// `/instruments/{id}/`
    pub const INSTRUMENT: PathShape = PathShape::new(2, 1);
    /// `/options/chains/{id}/`
    pub const CHAIN: PathShape = PathShape::new(3, 2);
    /// `/options/instruments/{id}/`
    pub const OPTION_INSTRUMENT: PathShape = PathShape::new(3, 2);

    /// Describe a custom path shape.
    pub const fn new(min_segments: usize, segment_index: usize) -> Self {
        Self {
            min_segments,
            segment_index,
        }
    }

    /// Extract the identifier at this shape from `resource_url`.
    pub fn extract(&self, resource_url: &str) -> Result<String> {
        extract_id(resource_url, self.min_segments, self.segment_index)
    }
}

/// Return the path segment at `segment_index` of `resource_url`.
///
/// Leading and trailing slashes are trimmed before splitting, so
/// `https://host/instruments/ABC/` has the two segments `instruments` and
/// `ABC`, and `https://host/` has none. Query strings and fragments are
/// ignored. A reference without scheme and host, like `/instruments/ABC/`,
/// is read as a path.
///
/// # Errors
///
/// - [`Error::MalformedUrl`] if `resource_url` cannot be parsed as a URL
///   or a path reference.
/// - [`Error::UnexpectedPathShape`] if the path has fewer than
///   `min_segments` segments, or no segment at `segment_index`.
///
/// # Example
///
/// ```
/// use robinhood_rs::models::extract_id;
///
/// let id = extract_id("https://api.robinhood.com/instruments/ABC123/", 2, 1)?;
/// assert_eq!(id, "ABC123");
/// # Ok::<(), robinhood_rs::Error>(())
/// ```
pub fn extract_id(resource_url: &str, min_segments: usize, segment_index: usize) -> Result<String> {
    let parsed = parse_reference(resource_url).map_err(|source| Error::MalformedUrl {
        url: resource_url.to_string(),
        source,
    })?;

    let trimmed = parsed.path().trim_matches('/');
    let segments: Vec<&str> = if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    };

    let required = min_segments.max(segment_index + 1);
    if segments.len() < required {
        return Err(Error::UnexpectedPathShape {
            url: resource_url.to_string(),
            expected: required,
            found: segments.len(),
        });
    }

    Ok(segments[segment_index].to_string())
}

/// Parse an absolute URL, or resolve a relative reference against a
/// placeholder origin so only its path matters.
fn parse_reference(resource_url: &str) -> std::result::Result<Url, ParseError> {
    match Url::parse(resource_url) {
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/")?.join(resource_url)
        }
        parsed => parsed,
    }
}

/// Extract the instrument id from an instrument URL.
pub fn parse_instrument_id(instrument_url: &str) -> Result<InstrumentId> {
    PathShape::INSTRUMENT.extract(instrument_url).map(InstrumentId::new)
}

/// Extract the chain id from an option chain URL.
pub fn parse_chain_id(chain_url: &str) -> Result<ChainId> {
    PathShape::CHAIN.extract(chain_url).map(ChainId::new)
}

/// Extract the option contract id from an option instrument URL.
pub fn parse_option_id(option_url: &str) -> Result<OptionId> {
    PathShape::OPTION_INSTRUMENT
        .extract(option_url)
        .map(OptionId::new)
}

/// Build the URL of an instrument on the API at `base_url`.
///
/// ```
/// use robinhood_rs::models::{instrument_url, parse_instrument_id, InstrumentId};
///
/// let id = InstrumentId::new("450dfc6d-5510-4d40-abfb-f633b7d9be3e");
/// let url = instrument_url("https://api.robinhood.com", &id);
/// assert_eq!(parse_instrument_id(&url)?, id);
/// # Ok::<(), robinhood_rs::Error>(())
/// ```
pub fn instrument_url(base_url: &str, instrument_id: &InstrumentId) -> String {
    format!("{}/instruments/{}/", base_url.trim_end_matches('/'), instrument_id)
}
