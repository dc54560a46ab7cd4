//! Deal Fixtures

use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::warn;

use crate::{
    deals::Deal,
    fixtures::{FixtureError, products::parse_percentage},
    products::ProductId,
};

/// Wrapper for deals in YAML
#[derive(Debug, Deserialize)]
pub struct DealsFixture {
    /// Map of deal key -> deal fixture
    pub deals: FxHashMap<String, DealFixture>,
}

/// Deal Fixture
///
/// The end of the deal is given either as an absolute `ends_at` timestamp or as an `ends_in`
/// offset from the fixture's reference time (e.g., "2d 3h").
#[derive(Debug, Deserialize)]
pub struct DealFixture {
    /// Deal title
    pub title: String,

    /// Product keys the deal applies to
    #[serde(default)]
    pub products: Vec<String>,

    /// Discount (e.g., "20%")
    pub discount: String,

    /// Capacity of the deal
    #[serde(default)]
    pub max_quantity: Option<u32>,

    /// Units already claimed
    #[serde(default)]
    pub used_quantity: u32,

    /// RFC 3339 start time
    #[serde(default)]
    pub starts_at: Option<String>,

    /// RFC 3339 end time
    #[serde(default)]
    pub ends_at: Option<String>,

    /// Offset from the reference time
    #[serde(default)]
    pub ends_in: Option<String>,
}

impl DealFixture {
    /// Build the deal, resolving relative end times against `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount or a timestamp cannot be parsed, or if neither `ends_at`
    /// nor `ends_in` is given.
    pub fn try_into_deal(self, key: &str, now: Timestamp) -> Result<Deal, FixtureError> {
        let discount = parse_percentage(&self.discount)?;

        let ends_at = match (self.ends_at.as_deref(), self.ends_in.as_deref()) {
            (Some(at), _) => parse_timestamp(at)?,
            (None, Some(offset)) => now
                .checked_add(parse_offset(offset)?)
                .map_err(|_err| FixtureError::InvalidTimestamp(offset.to_string()))?,
            (None, None) => return Err(FixtureError::MissingDealEnd(key.to_string())),
        };

        if let Some(max) = self.max_quantity
            && self.used_quantity > max
        {
            warn!(
                deal = key,
                used = self.used_quantity,
                max,
                "deal claims more units than its capacity"
            );
        }

        let mut deal = Deal::new(key, self.title, discount, ends_at)?
            .with_products(self.products.into_iter().map(ProductId::new))
            .with_quantities(self.max_quantity, self.used_quantity);

        if let Some(starts_at) = self.starts_at.as_deref() {
            deal = deal.starting_at(parse_timestamp(starts_at)?);
        }

        Ok(deal)
    }
}

/// Parse an RFC 3339 timestamp (e.g., "2025-10-09T12:00:00Z")
///
/// # Errors
///
/// Returns an error if the string is not a valid timestamp.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, FixtureError> {
    s.trim()
        .parse::<Timestamp>()
        .map_err(|_err| FixtureError::InvalidTimestamp(s.to_string()))
}

/// Parse a human readable offset (e.g., "2d 3h" or "45m")
///
/// # Errors
///
/// Returns an error if the string is not a valid duration.
pub fn parse_offset(s: &str) -> Result<SignedDuration, FixtureError> {
    let duration = humantime::parse_duration(s.trim())
        .map_err(|_err| FixtureError::InvalidTimestamp(s.to_string()))?;

    SignedDuration::try_from(duration).map_err(|_err| FixtureError::InvalidTimestamp(s.to_string()))
}
