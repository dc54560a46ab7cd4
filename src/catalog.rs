//! Catalog
//!
//! Read-only source of products and deals. Pricing and timer logic only ever see a [`Catalog`],
//! never embedded sample records.

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    deals::{Deal, DealId},
    products::{Product, ProductId},
};

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// Two deals share an id.
    #[error("duplicate deal id {0}")]
    DuplicateDeal(DealId),

    /// A deal refers to a product the catalog does not have.
    #[error("deal {0} refers to unknown product {1}")]
    UnknownDealProduct(DealId, ProductId),

    /// Products are priced in different currencies (expected, found).
    #[error("currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Read-only product and deal repository.
pub trait Catalog<'a> {
    /// All products.
    fn products(&self) -> &[Product<'a>];

    /// All deals.
    fn deals(&self) -> &[Deal];

    /// Look up a product by id.
    fn product(&self, id: &ProductId) -> Option<&Product<'a>> {
        self.products().iter().find(|product| &product.id == id)
    }

    /// Look up a deal by id.
    fn deal(&self, id: &DealId) -> Option<&Deal> {
        self.deals().iter().find(|deal| deal.id() == id)
    }

    /// Products covered by a deal, in catalog order.
    fn deal_products(&self, deal: &Deal) -> Vec<&Product<'a>> {
        self.products()
            .iter()
            .filter(|product| deal.covers(&product.id))
            .collect()
    }
}

/// Catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog<'a> {
    products: Vec<Product<'a>>,
    deals: Vec<Deal>,
    index: FxHashMap<ProductId, usize>,
}

impl<'a> InMemoryCatalog<'a> {
    /// Build a catalog, checking ids are unique, deals only reference known products and all
    /// products share one currency.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first inconsistency found.
    pub fn new(products: Vec<Product<'a>>, deals: Vec<Deal>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();
        let mut currency: Option<&Currency> = None;

        for (idx, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }

            match currency {
                Some(expected) if expected != product.currency() => {
                    return Err(CatalogError::CurrencyMismatch(
                        expected.iso_alpha_code,
                        product.currency().iso_alpha_code,
                    ));
                }
                Some(_) => {}
                None => currency = Some(product.currency()),
            }
        }

        let mut deal_ids = FxHashSet::default();

        for deal in &deals {
            if !deal_ids.insert(deal.id().clone()) {
                return Err(CatalogError::DuplicateDeal(deal.id().clone()));
            }

            if let Some(missing) = deal.product_ids().iter().find(|id| !index.contains_key(*id)) {
                return Err(CatalogError::UnknownDealProduct(
                    deal.id().clone(),
                    missing.clone(),
                ));
            }
        }

        Ok(Self {
            products,
            deals,
            index,
        })
    }

    /// Currency shared by every product, or `None` for an empty catalog.
    pub fn currency(&self) -> Option<&'a Currency> {
        self.products.first().map(Product::currency)
    }
}

impl<'a> Catalog<'a> for InMemoryCatalog<'a> {
    fn products(&self) -> &[Product<'a>] {
        &self.products
    }

    fn deals(&self) -> &[Deal] {
        &self.deals
    }

    fn product(&self, id: &ProductId) -> Option<&Product<'a>> {
        self.index.get(id).and_then(|idx| self.products.get(*idx))
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use jiff::Timestamp;
    use rusty_money::{
        Money,
        iso::{MWK, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn products<'a>() -> Vec<Product<'a>> {
        vec![
            Product::new("1", "Gaming Mouse", Money::from_major(2_799_999, MWK)),
            Product::new("3", "Mousepad", Money::from_major(539_999, MWK)),
        ]
    }

    fn deal(products: &[&str]) -> TestResult<Deal> {
        Ok(Deal::new(
            "flash-1",
            "Gaming week",
            Percentage::from(0.2),
            Timestamp::from_second(1_760_000_000)?,
        )?
        .with_products(products.iter().copied().map(ProductId::new)))
    }

    #[test]
    fn lookups() -> TestResult {
        let catalog = InMemoryCatalog::new(products(), vec![deal(&["3"])?])?;

        assert_eq!(
            catalog.product(&ProductId::new("3")).map(|p| p.name.as_str()),
            Some("Mousepad")
        );
        assert!(catalog.product(&ProductId::new("9")).is_none());
        assert_eq!(catalog.currency(), Some(MWK));

        let deal = catalog
            .deal(&DealId::new("flash-1"))
            .ok_or("deal not found")?;
        let covered: Vec<&str> = catalog
            .deal_products(deal)
            .iter()
            .map(|p| p.id.as_str())
            .collect();

        assert_eq!(covered, ["3"]);

        Ok(())
    }

    #[test]
    fn rejects_unknown_deal_product() -> TestResult {
        let result = InMemoryCatalog::new(products(), vec![deal(&["1", "7"])?]);

        assert!(matches!(
            result,
            Err(CatalogError::UnknownDealProduct(_, id)) if id == ProductId::new("7")
        ));

        Ok(())
    }

    #[test]
    fn rejects_duplicates_and_mixed_currencies() -> TestResult {
        let mut duplicated = products();
        duplicated.push(Product::new("1", "Again", Money::from_major(1, MWK)));

        assert!(matches!(
            InMemoryCatalog::new(duplicated, Vec::new()),
            Err(CatalogError::DuplicateProduct(_))
        ));

        let mut mixed = products();
        mixed.push(Product::new("9", "Import", Money::from_major(1, USD)));

        assert!(matches!(
            InMemoryCatalog::new(mixed, Vec::new()),
            Err(CatalogError::CurrencyMismatch("MWK", "USD"))
        ));

        assert!(matches!(
            InMemoryCatalog::new(products(), vec![deal(&[])?, deal(&[])?]),
            Err(CatalogError::DuplicateDeal(_))
        ));

        Ok(())
    }
}
