//! Items

use std::{fmt, num::NonZeroU32};

use rusty_money::{Money, iso::Currency};

use crate::products::{Product, ProductId};

/// Identifier of a line in a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemId(u64);

impl LineItemId {
    /// Wrap a raw line id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw line id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product placed in a cart, with its quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    id: LineItemId,
    product_id: ProductId,
    unit_price: Money<'a, Currency>,
    original_unit_price: Option<Money<'a, Currency>>,
    quantity: NonZeroU32,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item for the given product at the given unit price.
    pub fn new(
        id: LineItemId,
        product_id: ProductId,
        unit_price: Money<'a, Currency>,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            id,
            product_id,
            unit_price,
            original_unit_price: None,
            quantity,
        }
    }

    /// Creates a line item priced from a catalog product.
    pub fn from_product(id: LineItemId, product: &Product<'a>, quantity: NonZeroU32) -> Self {
        Self {
            id,
            product_id: product.id.clone(),
            unit_price: product.price,
            original_unit_price: product.original_price,
            quantity,
        }
    }

    /// Sets the struck-through original unit price.
    #[must_use]
    pub fn with_original_unit_price(mut self, price: Money<'a, Currency>) -> Self {
        self.original_unit_price = Some(price);
        self
    }

    /// Returns the line id
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Returns the product this line refers to
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the unit price of the item
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the original unit price, if the product is marked down
    pub fn original_unit_price(&self) -> Option<&Money<'a, Currency>> {
        self.original_unit_price.as_ref()
    }

    /// Returns the quantity
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}
