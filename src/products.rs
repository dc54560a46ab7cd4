//! Products

use std::fmt;

use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Deserialize;

/// Catalog identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Name of the store selling the product
    pub store_name: Option<String>,

    /// Current selling price
    pub price: Money<'a, Currency>,

    /// Price before markdown, shown struck through
    pub original_price: Option<Money<'a, Currency>>,

    /// Average review rating (0 to 5)
    pub rating: f32,

    /// Units available for sale
    pub stock_count: u32,

    /// Whether the product can currently be bought
    pub in_stock: bool,
}

impl<'a> Product<'a> {
    /// Create an in-stock product with the given price and no markdown.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            store_name: None,
            price,
            original_price: None,
            rating: 0.0,
            stock_count: u32::MAX,
            in_stock: true,
        }
    }

    /// Set the struck-through original price.
    #[must_use]
    pub fn with_original_price(mut self, original_price: Money<'a, Currency>) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Set the stock count. A count of zero also marks the product out of stock.
    #[must_use]
    pub fn with_stock(mut self, stock_count: u32) -> Self {
        self.stock_count = stock_count;
        self.in_stock = stock_count > 0;
        self
    }

    /// Set the store name.
    #[must_use]
    pub fn with_store(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = Some(store_name.into());
        self
    }

    /// Set the review rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    /// Currency the product is priced in.
    pub fn currency(&self) -> &'a Currency {
        self.price.currency()
    }

    /// Markdown from the original price, if the product has one.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the two prices are in different currencies.
    pub fn markdown(&self) -> Result<Option<Money<'a, Currency>>, MoneyError> {
        self.original_price
            .map(|original| original.sub(self.price))
            .transpose()
    }

    /// Clamp a requested quantity to what can actually be bought.
    ///
    /// Returns `0` for out-of-stock products.
    pub fn clamp_quantity(&self, requested: u32) -> u32 {
        if self.in_stock {
            requested.min(self.stock_count)
        } else {
            0
        }
    }
}
