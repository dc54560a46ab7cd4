//! Wishlist

use std::cmp::Reverse;

use clap::ValueEnum;
use jiff::Timestamp;
use tracing::debug;

use crate::products::{Product, ProductId};

/// Orderings offered on the wishlist page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    /// Most recently added first
    #[default]
    DateAdded,

    /// Cheapest first
    PriceLow,

    /// Most expensive first
    PriceHigh,

    /// Alphabetical by name
    Name,

    /// Best rated first
    Rating,
}

/// A saved product and when it was saved.
#[derive(Debug, Clone)]
pub struct WishlistEntry<'a> {
    /// The saved product
    pub product: Product<'a>,

    /// When it was saved
    pub added_at: Timestamp,
}

/// Wishlist
#[derive(Debug, Clone, Default)]
pub struct Wishlist<'a> {
    entries: Vec<WishlistEntry<'a>>,
}

impl<'a> Wishlist<'a> {
    /// Create an empty wishlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a product. Returns `false` if it was already saved.
    pub fn add(&mut self, product: Product<'a>, added_at: Timestamp) -> bool {
        if self.contains(&product.id) {
            return false;
        }

        debug!(product = %product.id, "added product to wishlist");

        self.entries.push(WishlistEntry { product, added_at });

        true
    }

    /// Forget a product. Removing a product that is not saved does nothing.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<WishlistEntry<'a>> {
        let idx = self
            .entries
            .iter()
            .position(|entry| &entry.product.id == product_id)?;

        debug!(product = %product_id, "removed product from wishlist");

        Some(self.entries.remove(idx))
    }

    /// Whether the product is saved.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries
            .iter()
            .any(|entry| &entry.product.id == product_id)
    }

    /// Entries in the requested order. Ties keep insertion order.
    pub fn sorted(&self, order: SortOrder) -> Vec<&WishlistEntry<'a>> {
        let mut entries: Vec<&WishlistEntry<'a>> = self.entries.iter().collect();

        match order {
            SortOrder::DateAdded => entries.sort_by_key(|entry| Reverse(entry.added_at)),
            SortOrder::PriceLow => entries.sort_by_key(|entry| entry.product.price.to_minor_units()),
            SortOrder::PriceHigh => {
                entries.sort_by_key(|entry| Reverse(entry.product.price.to_minor_units()));
            }
            SortOrder::Name => entries.sort_by(|a, b| a.product.name.cmp(&b.product.name)),
            SortOrder::Rating => {
                entries.sort_by(|a, b| b.product.rating.total_cmp(&a.product.rating));
            }
        }

        entries
    }

    /// Number of saved products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rusty_money::{Money, iso::MWK};
    use testresult::TestResult;

    use super::*;

    fn wishlist<'a>() -> TestResult<Wishlist<'a>> {
        let start = Timestamp::from_second(1_760_000_000)?;
        let mut wishlist = Wishlist::new();

        wishlist.add(
            Product::new("1", "Gaming Mouse", Money::from_major(2_799_999, MWK)).with_rating(4.5),
            start,
        );
        wishlist.add(
            Product::new("3", "Mousepad", Money::from_major(539_999, MWK)).with_rating(4.7),
            start.checked_add(SignedDuration::from_hours(1))?,
        );
        wishlist.add(
            Product::new("5", "Keyboard", Money::from_major(1_250_000, MWK)).with_rating(4.1),
            start.checked_sub(SignedDuration::from_hours(24))?,
        );

        Ok(wishlist)
    }

    fn ids(entries: &[&WishlistEntry<'_>]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| entry.product.id.to_string())
            .collect()
    }

    #[test]
    fn sort_orders() -> TestResult {
        let wishlist = wishlist()?;

        assert_eq!(ids(&wishlist.sorted(SortOrder::DateAdded)), ["3", "1", "5"]);
        assert_eq!(ids(&wishlist.sorted(SortOrder::PriceLow)), ["3", "5", "1"]);
        assert_eq!(ids(&wishlist.sorted(SortOrder::PriceHigh)), ["1", "5", "3"]);
        assert_eq!(ids(&wishlist.sorted(SortOrder::Name)), ["1", "5", "3"]);
        assert_eq!(ids(&wishlist.sorted(SortOrder::Rating)), ["3", "1", "5"]);

        Ok(())
    }

    #[test]
    fn add_is_unique_and_remove_is_idempotent() -> TestResult {
        let mut wishlist = wishlist()?;
        let now = Timestamp::from_second(1_760_000_000)?;

        assert!(!wishlist.add(
            Product::new("1", "Gaming Mouse", Money::from_major(1, MWK)),
            now
        ));
        assert_eq!(wishlist.len(), 3);

        let mouse = ProductId::new("1");

        assert!(wishlist.remove(&mouse).is_some());
        assert!(wishlist.remove(&mouse).is_none());
        assert!(!wishlist.contains(&mouse));
        assert_eq!(wishlist.len(), 2);

        Ok(())
    }
}
