//! Cart
//!
//! A cart session: an ordered list of line items plus the set of lines selected for checkout.

use std::num::NonZeroU32;

use decimal_percentage::Percentage;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    items::{LineItem, LineItemId},
    pricing::{CartSnapshot, PricingError, compute_snapshot},
    products::{Product, ProductId},
};

/// Errors raised by cart operations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// No line with this id is in the cart.
    #[error("no line item with id {0}")]
    ItemNotFound(LineItemId),

    /// Two lines share the same id.
    #[error("duplicate line item id {0}")]
    DuplicateItem(LineItemId),

    /// A quantity change would leave a negative quantity, or a zero quantity was added.
    #[error("invalid quantity {0}")]
    InvalidQuantity(i64),

    /// The product cannot be bought right now.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// An item's currency differs from the cart currency (item currency, cart currency).
    #[error("item has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Every line item id up to `u64::MAX` is taken.
    #[error("no line item ids left")]
    IdsExhausted,

    /// Errors bubbled up from pricing.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityChange<'a> {
    /// The line kept its place with a new quantity.
    Updated {
        /// Quantity before the change
        previous: NonZeroU32,

        /// Quantity after the change
        current: NonZeroU32,
    },

    /// The quantity dropped to zero and the line was removed.
    Removed(LineItem<'a>),
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    selected: FxHashSet<LineItemId>,
    currency: &'static Currency,
    next_id: u64,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            selected: FxHashSet::default(),
            currency,
            next_id: 1,
        }
    }

    /// Create a cart holding the given lines, all of them selected.
    ///
    /// # Errors
    ///
    /// - [`CartError::CurrencyMismatch`]: a line is priced in another currency.
    /// - [`CartError::DuplicateItem`]: two lines share an id.
    /// - [`CartError::IdsExhausted`]: a line already uses the largest possible id.
    pub fn with_items(
        items: impl Into<Vec<LineItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();
        let mut selected = FxHashSet::default();

        for item in &items {
            ensure_currency(item.unit_price().currency(), currency)?;

            if !selected.insert(item.id()) {
                return Err(CartError::DuplicateItem(item.id()));
            }
        }

        let next_id = items
            .iter()
            .map(|item| item.id().get())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(CartError::IdsExhausted)?;

        Ok(Cart {
            items,
            selected,
            currency,
            next_id,
        })
    }

    /// Add a product to the cart.
    ///
    /// A product already in the cart has its line's quantity increased; otherwise a new, selected
    /// line is appended. The resulting quantity is clamped to the product's stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::OutOfStock`]: the product has no stock.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`CartError::IdsExhausted`]: a new line is needed but no ids are left.
    pub fn add_product(
        &mut self,
        product: &Product<'a>,
        quantity: u32,
    ) -> Result<LineItemId, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        ensure_currency(product.currency(), self.currency)?;

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id() == &product.id)
        {
            let wanted = line.quantity().get().saturating_add(quantity);
            let clamped = NonZeroU32::new(product.clamp_quantity(wanted))
                .ok_or_else(|| CartError::OutOfStock(product.id.clone()))?;

            line.set_quantity(clamped);

            debug!(
                item = %line.id(),
                product = %product.id,
                quantity = clamped.get(),
                "merged product into cart line"
            );

            return Ok(line.id());
        }

        let clamped = NonZeroU32::new(product.clamp_quantity(quantity))
            .ok_or_else(|| CartError::OutOfStock(product.id.clone()))?;

        let id = LineItemId::new(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(CartError::IdsExhausted)?;

        self.items.push(LineItem::from_product(id, product, clamped));
        self.selected.insert(id);

        debug!(
            item = %id,
            product = %product.id,
            quantity = clamped.get(),
            "added product to cart"
        );

        Ok(id)
    }

    /// Set a line's quantity. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this id.
    pub fn set_quantity(
        &mut self,
        item_id: LineItemId,
        quantity: u32,
    ) -> Result<QuantityChange<'a>, CartError> {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return self
                .remove_item(item_id)
                .map(QuantityChange::Removed)
                .ok_or(CartError::ItemNotFound(item_id));
        };

        let line = self
            .items
            .iter_mut()
            .find(|line| line.id() == item_id)
            .ok_or(CartError::ItemNotFound(item_id))?;

        let previous = line.quantity();
        line.set_quantity(quantity);

        debug!(
            item = %item_id,
            previous = previous.get(),
            current = quantity.get(),
            "set line quantity"
        );

        Ok(QuantityChange::Updated {
            previous,
            current: quantity,
        })
    }

    /// Step a line's quantity up or down by `delta`, as the cart's +/- buttons do.
    ///
    /// Stepping down to zero removes the line.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`]: no line has this id.
    /// - [`CartError::InvalidQuantity`]: the result would be negative or exceed `u32::MAX`.
    pub fn step_quantity(
        &mut self,
        item_id: LineItemId,
        delta: i64,
    ) -> Result<QuantityChange<'a>, CartError> {
        let current = self
            .item(item_id)
            .ok_or(CartError::ItemNotFound(item_id))?
            .quantity()
            .get();

        let wanted = i64::from(current).saturating_add(delta);
        let quantity = u32::try_from(wanted).map_err(|_err| CartError::InvalidQuantity(wanted))?;

        self.set_quantity(item_id, quantity)
    }

    /// Remove a line from the cart and from the selection.
    ///
    /// Removing an id that is not in the cart does nothing and returns `None`.
    pub fn remove_item(&mut self, item_id: LineItemId) -> Option<LineItem<'a>> {
        self.selected.remove(&item_id);

        let idx = self.items.iter().position(|line| line.id() == item_id)?;
        let removed = self.items.remove(idx);

        debug!(item = %item_id, "removed line from cart");

        Some(removed)
    }

    /// Flip whether a line is selected. Returns the new selection state of the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this id.
    pub fn toggle_selection(&mut self, item_id: LineItemId) -> Result<bool, CartError> {
        if self.item(item_id).is_none() {
            return Err(CartError::ItemNotFound(item_id));
        }

        if self.selected.remove(&item_id) {
            Ok(false)
        } else {
            self.selected.insert(item_id);
            Ok(true)
        }
    }

    /// Select every line, or clear the selection if every line is already selected.
    ///
    /// Returns `true` if all lines are selected afterwards.
    pub fn toggle_select_all(&mut self) -> bool {
        if self.all_selected() {
            self.selected.clear();
            false
        } else {
            self.selected = self.items.iter().map(LineItem::id).collect();
            true
        }
    }

    /// Compute the totals for the selected lines.
    ///
    /// # Errors
    ///
    /// - [`CartError::CurrencyMismatch`]: the shipping fee is in another currency, even when the
    ///   cart is empty.
    /// - [`CartError::Pricing`]: a line total or the tax overflows.
    pub fn snapshot(
        &self,
        shipping_fee: Money<'a, Currency>,
        tax_rate: Option<&Percentage>,
    ) -> Result<CartSnapshot<'a>, CartError> {
        ensure_currency(shipping_fee.currency(), self.currency)?;

        Ok(compute_snapshot(
            &self.items,
            &self.selected,
            shipping_fee,
            tax_rate,
        )?)
    }

    /// Look up a line by id.
    pub fn item(&self, item_id: LineItemId) -> Option<&LineItem<'a>> {
        self.items.iter().find(|line| line.id() == item_id)
    }

    /// All lines, in the order they were added.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Selected lines, in cart order.
    pub fn selected_items(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items
            .iter()
            .filter(|line| self.selected.contains(&line.id()))
    }

    /// Whether the given line is selected.
    pub fn is_selected(&self, item_id: LineItemId) -> bool {
        self.selected.contains(&item_id)
    }

    /// Number of selected lines.
    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    /// Whether every line is selected. An empty cart counts as fully selected.
    pub fn all_selected(&self) -> bool {
        self.selected.len() == self.items.len()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn ensure_currency(item: &Currency, cart: &'static Currency) -> Result<(), CartError> {
    if item == cart {
        Ok(())
    } else {
        Err(CartError::CurrencyMismatch(
            item.iso_alpha_code,
            cart.iso_alpha_code,
        ))
    }
}
