//! Deals
//!
//! Flash deals: a percentage off a set of products for a limited time and, optionally, a limited
//! number of units.

use std::fmt;

use decimal_percentage::Percentage;
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    pricing::{PricingError, discounted_price, percent_of},
    products::ProductId,
};

pub mod ticker;
pub mod timer;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Errors raised when building a deal.
#[derive(Debug, Error, PartialEq)]
pub enum DealError {
    /// The discount is not between 0% and 100%.
    #[error("deal {0} has a discount outside 0-100%")]
    InvalidDiscount(DealId),
}

/// Catalog identifier of a deal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct DealId(String);

impl DealId {
    /// Create a deal id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DealId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Whether a deal can still be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealStatus {
    /// The deal ends in the future.
    Active,

    /// The deal's end has passed. Deals never leave this state.
    Expired,
}

/// Share of a deal's units already claimed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Claimed {
    /// Fraction of the capacity claimed, clamped to `0..=1`.
    Percent(Percentage),

    /// The deal has no capacity (absent or zero), so no ratio exists.
    UnknownCapacity,
}

impl Claimed {
    /// Percent points (0 to 100) for progress bars, or `None` with unknown capacity.
    pub fn percent_points(&self) -> Option<Decimal> {
        match self {
            Claimed::Percent(percent) => Some((*percent * Decimal::ONE_HUNDRED).round_dp(2)),
            Claimed::UnknownCapacity => None,
        }
    }
}

/// Time left on a deal, truncated to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// The deal has ended.
    Expired,

    /// The deal is running.
    Left {
        /// Whole days
        days: i64,

        /// Whole hours after the days
        hours: i64,

        /// Whole minutes after the hours
        minutes: i64,
    },
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Remaining::Expired => f.write_str("Expired"),
            Remaining::Left { days, hours, .. } if days > 0 => write!(f, "{days}d {hours}h"),
            Remaining::Left { hours, minutes, .. } if hours > 0 => {
                write!(f, "{hours}h {minutes}m")
            }
            Remaining::Left { minutes, .. } => write!(f, "{minutes}m"),
        }
    }
}

/// Time left between `now` and `ends_at`.
///
/// Anything at or past the end is [`Remaining::Expired`]. Otherwise the difference is split into
/// whole days, hours and minutes by floor division; leftover seconds are dropped, so a deal with
/// thirty seconds to go shows `0m`.
pub fn format_remaining(now: Timestamp, ends_at: Timestamp) -> Remaining {
    remaining_from(ends_at.duration_since(now))
}

fn remaining_from(difference: SignedDuration) -> Remaining {
    let seconds = difference.as_secs();

    if difference <= SignedDuration::ZERO {
        return Remaining::Expired;
    }

    Remaining::Left {
        days: seconds / SECONDS_PER_DAY,
        hours: (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
        minutes: (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
    }
}

/// Deal
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    id: DealId,
    title: String,
    product_ids: Vec<ProductId>,
    discount: Percentage,
    max_quantity: Option<u32>,
    used_quantity: u32,
    starts_at: Option<Timestamp>,
    ends_at: Timestamp,
}

impl Deal {
    /// Create a deal with no products and no capacity limit.
    ///
    /// # Errors
    ///
    /// Returns [`DealError::InvalidDiscount`] if `discount` is not between 0% and 100%.
    pub fn new(
        id: impl Into<DealId>,
        title: impl Into<String>,
        discount: Percentage,
        ends_at: Timestamp,
    ) -> Result<Self, DealError> {
        let id = id.into();
        let fraction = discount * Decimal::ONE;

        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(DealError::InvalidDiscount(id));
        }

        Ok(Self {
            id,
            title: title.into(),
            product_ids: Vec::new(),
            discount,
            max_quantity: None,
            used_quantity: 0,
            starts_at: None,
            ends_at,
        })
    }

    /// Set the products the deal applies to.
    #[must_use]
    pub fn with_products(mut self, product_ids: impl IntoIterator<Item = ProductId>) -> Self {
        self.product_ids = product_ids.into_iter().collect();
        self
    }

    /// Set the capacity and the units already claimed.
    ///
    /// `used` is kept as given even if it exceeds `max`; the claimed ratio clamps for display.
    #[must_use]
    pub fn with_quantities(mut self, max: Option<u32>, used: u32) -> Self {
        self.max_quantity = max;
        self.used_quantity = used;
        self
    }

    /// Set when the deal started.
    #[must_use]
    pub fn starting_at(mut self, starts_at: Timestamp) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    /// Deal id
    pub fn id(&self) -> &DealId {
        &self.id
    }

    /// Deal title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Products the deal applies to
    pub fn product_ids(&self) -> &[ProductId] {
        &self.product_ids
    }

    /// Discount off each product's price
    pub fn discount(&self) -> Percentage {
        self.discount
    }

    /// Capacity, if the deal is limited
    pub fn max_quantity(&self) -> Option<u32> {
        self.max_quantity
    }

    /// Units claimed so far
    pub fn used_quantity(&self) -> u32 {
        self.used_quantity
    }

    /// When the deal started, if known
    pub fn starts_at(&self) -> Option<Timestamp> {
        self.starts_at
    }

    /// When the deal ends
    pub fn ends_at(&self) -> Timestamp {
        self.ends_at
    }

    /// Whether the deal applies to the given product.
    pub fn covers(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }

    /// Status at `now`.
    pub fn status(&self, now: Timestamp) -> DealStatus {
        match self.remaining(now) {
            Remaining::Expired => DealStatus::Expired,
            Remaining::Left { .. } => DealStatus::Active,
        }
    }

    /// Time left at `now`.
    pub fn remaining(&self, now: Timestamp) -> Remaining {
        format_remaining(now, self.ends_at)
    }

    /// Share of the capacity already claimed.
    ///
    /// A missing or zero capacity is [`Claimed::UnknownCapacity`] rather than a division by a
    /// substitute value.
    pub fn claimed(&self) -> Claimed {
        let Some(max) = self.max_quantity.filter(|max| *max > 0) else {
            return Claimed::UnknownCapacity;
        };

        let ratio = Decimal::from(self.used_quantity) / Decimal::from(max);

        Claimed::Percent(Percentage::from(ratio.min(Decimal::ONE)))
    }

    /// Units still available, or `None` for deals without a capacity.
    pub fn available(&self) -> Option<u32> {
        self.max_quantity
            .map(|max| max.saturating_sub(self.used_quantity))
    }

    /// Price of a product under this deal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount cannot be represented in minor units.
    pub fn deal_price<'a>(
        &self,
        price: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        discounted_price(price, &self.discount)
    }

    /// Amount saved on a product under this deal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount cannot be represented in minor units.
    pub fn savings_on<'a>(
        &self,
        price: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        percent_of(price, &self.discount)
    }
}
