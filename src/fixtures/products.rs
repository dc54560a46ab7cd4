//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, IDR, MWK, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Selling store
    #[serde(default)]
    pub store: Option<String>,

    /// Product price (e.g., "2799999 MWK")
    pub price: String,

    /// Price before markdown, same format as `price`
    #[serde(default)]
    pub original_price: Option<String>,

    /// Review rating
    #[serde(default)]
    pub rating: f32,

    /// Units in stock; omitted means unlimited
    #[serde(default)]
    pub stock: Option<u32>,
}

impl ProductFixture {
    /// Build the product, keyed by its fixture key.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or the two prices use different currencies.
    pub fn try_into_product(self, key: &str) -> Result<Product<'static>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;
        let mut product = Product::new(
            ProductId::new(key),
            self.name,
            Money::from_minor(minor_units, currency),
        )
        .with_rating(self.rating);

        if let Some(original) = self.original_price.as_deref() {
            let (original_minor, original_currency) = parse_price(original)?;

            if original_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    original_currency.iso_alpha_code.to_string(),
                ));
            }

            product = product.with_original_price(Money::from_minor(original_minor, currency));
        }

        if let Some(store) = self.store {
            product = product.with_store(store);
        }

        if let Some(stock) = self.stock {
            product = product.with_stock(stock);
        }

        Ok(product)
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// Every supported currency has two decimal places.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "MWK" => MWK,
        "IDR" => IDR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
    } else {
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
