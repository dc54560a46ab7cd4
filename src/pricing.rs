//! Pricing
//!
//! Pure computations over line items: line totals, tax and the cart snapshot.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::{LineItem, LineItemId};

/// Errors that can occur while pricing line items.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A minor unit amount did not fit after multiplication or rounding.
    #[error("amount overflowed while pricing")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Derived totals for the selected part of a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartSnapshot<'a> {
    /// Sum of unit price times quantity over the selected lines
    pub subtotal: Money<'a, Currency>,

    /// Flat shipping fee charged once per order
    pub shipping_fee: Money<'a, Currency>,

    /// Tax charged on the subtotal
    pub tax: Money<'a, Currency>,

    /// Subtotal plus shipping plus tax
    pub total: Money<'a, Currency>,

    /// Number of selected lines
    pub lines: usize,

    /// Sum of quantities over the selected lines
    pub units: u64,
}

impl<'a> CartSnapshot<'a> {
    /// A snapshot with every amount at zero.
    pub fn zero(currency: &'a Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            subtotal: zero,
            shipping_fee: zero,
            tax: zero,
            total: zero,
            lines: 0,
            units: 0,
        }
    }
}

/// Computes the totals for the selected line items.
///
/// Only items whose id is in `selected` contribute to the subtotal. The shipping fee is charged
/// once whenever the item list is non-empty, even if nothing is selected; an empty item list
/// prices to zero across the board. Tax is rounded to whole minor units, midpoint away from zero.
///
/// # Errors
///
/// - [`PricingError::Money`]: an item or the shipping fee is in a different currency.
/// - [`PricingError::Overflow`]: a line total or the tax does not fit in minor units.
pub fn compute_snapshot<'a>(
    items: &[LineItem<'a>],
    selected: &FxHashSet<LineItemId>,
    shipping_fee: Money<'a, Currency>,
    tax_rate: Option<&Percentage>,
) -> Result<CartSnapshot<'a>, PricingError> {
    let currency = shipping_fee.currency();

    if items.is_empty() {
        return Ok(CartSnapshot::zero(currency));
    }

    let mut subtotal = Money::from_minor(0, currency);
    let mut lines = 0;
    let mut units = 0;

    for item in items.iter().filter(|item| selected.contains(&item.id())) {
        subtotal = subtotal.add(line_total(item)?)?;
        lines += 1;
        units += u64::from(item.quantity().get());
    }

    let tax = match tax_rate {
        Some(rate) => Money::from_minor(percent_of_minor(rate, subtotal.to_minor_units())?, currency),
        None => Money::from_minor(0, currency),
    };

    let total = subtotal.add(shipping_fee)?.add(tax)?;

    Ok(CartSnapshot {
        subtotal,
        shipping_fee,
        tax,
        total,
        lines,
        units,
    })
}

/// Unit price times quantity for a single line.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
pub fn line_total<'a>(item: &LineItem<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let unit = item.unit_price();
    let minor = unit
        .to_minor_units()
        .checked_mul(i64::from(item.quantity().get()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit.currency()))
}

/// Markdown saved on a line, relative to its original unit price.
///
/// Lines without an original price save nothing and return `None`.
///
/// # Errors
///
/// - [`PricingError::Money`]: the original price is in a different currency.
/// - [`PricingError::Overflow`]: the saving does not fit in minor units.
pub fn line_savings<'a>(item: &LineItem<'a>) -> Result<Option<Money<'a, Currency>>, PricingError> {
    let Some(original) = item.original_unit_price() else {
        return Ok(None);
    };

    let per_unit = original.sub(*item.unit_price())?;
    let minor = per_unit
        .to_minor_units()
        .checked_mul(i64::from(item.quantity().get()))
        .ok_or(PricingError::Overflow)?;

    Ok(Some(Money::from_minor(minor, per_unit.currency())))
}

/// Price after taking a percentage off, rounded to whole minor units.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the discount cannot be represented in minor units.
/// - [`PricingError::Money`]: money arithmetic failed.
pub fn discounted_price<'a>(
    price: Money<'a, Currency>,
    percent: &Percentage,
) -> Result<Money<'a, Currency>, PricingError> {
    let discount = percent_of(price, percent)?;

    Ok(price.sub(discount)?)
}

/// The given percentage of a price, rounded to whole minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount cannot be represented in minor units.
pub fn percent_of<'a>(
    price: Money<'a, Currency>,
    percent: &Percentage,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = percent_of_minor(percent, price.to_minor_units())?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Calculate a percentage of a minor unit amount, rounding midpoint away from zero.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::Overflow)?;

    ((*percent) * Decimal::ONE) // `Percentage` does not expose its inner `Decimal`
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}
