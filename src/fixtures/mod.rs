//! Fixtures
//!
//! Loads storefront sample data from YAML files laid out as
//! `<base>/products/<set>.yml`, `<base>/deals/<set>.yml` and `<base>/carts/<set>.yml`.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError, InMemoryCatalog},
    deals::{Deal, DealError},
    fixtures::{carts::CartFixture, deals::DealsFixture, products::ProductsFixture},
    products::{Product, ProductId},
};

pub mod carts;
pub mod deals;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid timestamp or offset
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Deal without an end
    #[error("Deal {0} has neither ends_at nor ends_in")]
    MissingDealEnd(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Not enough cart lines in fixture
    #[error("Not enough cart lines in fixture, available: {available}, requested: {requested}")]
    NotEnoughItems {
        /// Number of lines defined in the fixture
        available: usize,
        /// Number of lines requested
        requested: usize,
    },

    /// Deal creation error
    #[error("Failed to create deal: {0}")]
    Deal(#[from] DealError),

    /// Catalog validation error
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// A cart line as loaded from a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Product in the line
    pub product: ProductId,

    /// Units requested
    pub quantity: u32,

    /// Whether the line starts selected
    pub selected: bool,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Reference time for relative deal ends
    now: Timestamp,

    products: Vec<Product<'static>>,
    deals: Vec<Deal>,
    cart_lines: Vec<CartLine>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            now: Timestamp::now(),
            products: Vec::new(),
            deals: Vec::new(),
            cart_lines: Vec::new(),
            currency: None,
        }
    }

    /// Resolve relative deal ends (`ends_in`) against `now` instead of the current time.
    #[must_use]
    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let mut entries: Vec<_> = fixture.products.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (key, product_fixture) in entries {
            let product = product_fixture.try_into_product(&key)?;
            let currency = product.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.push(product);
        }

        debug!(set = name, products = self.products.len(), "loaded products");

        Ok(self)
    }

    /// Load deals from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a deal is invalid.
    pub fn load_deals(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("deals").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: DealsFixture = serde_norway::from_str(&contents)?;

        let mut entries: Vec<_> = fixture.deals.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (key, deal_fixture) in entries {
            let deal = deal_fixture.try_into_deal(&key, self.now)?;

            self.deals.push(deal);
        }

        debug!(set = name, deals = self.deals.len(), "loaded deals");

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced products don't exist.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for line in fixture.items {
            let product = ProductId::new(line.product);

            if self.product(&product).is_none() {
                return Err(FixtureError::ProductNotFound(product.to_string()));
            }

            self.cart_lines.push(CartLine {
                product,
                quantity: line.quantity,
                selected: line.selected,
            });
        }

        Ok(self)
    }

    /// Load a complete fixture set (products, deals and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(name)?
            .load_deals(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_by_key(&self, key: &str) -> Result<&Product<'static>, FixtureError> {
        self.product(&ProductId::new(key))
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Cart lines in the order they were loaded
    pub fn cart_lines(&self) -> &[CartLine] {
        &self.cart_lines
    }

    /// Validate the loaded products and deals as a catalog
    ///
    /// # Errors
    ///
    /// Returns an error if ids repeat or a deal refers to an unknown product.
    pub fn catalog(&self) -> Result<InMemoryCatalog<'static>, FixtureError> {
        Ok(InMemoryCatalog::new(
            self.products.clone(),
            self.deals.clone(),
        )?)
    }

    /// Create a cart from the loaded lines
    ///
    /// Takes the first `n` lines, or all of them. Quantities are clamped to stock as they would be
    /// when added by hand.
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded, too many lines are requested, or a line cannot
    /// be added.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart<'static>, FixtureError> {
        let currency = self.currency()?;

        if let Some(n) = n
            && n > self.cart_lines.len()
        {
            return Err(FixtureError::NotEnoughItems {
                requested: n,
                available: self.cart_lines.len(),
            });
        }

        let mut cart = Cart::new(currency);

        for line in self.cart_lines.iter().take(n.unwrap_or(self.cart_lines.len())) {
            let product = self
                .product(&line.product)
                .ok_or_else(|| FixtureError::ProductNotFound(line.product.to_string()))?;

            let id = cart.add_product(product, line.quantity)?;

            if !line.selected && cart.is_selected(id) {
                cart.toggle_selection(id)?;
            }
        }

        Ok(cart)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Reference time used for relative deal ends
    pub fn now(&self) -> Timestamp {
        self.now
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog<'static> for Fixture {
    fn products(&self) -> &[Product<'static>] {
        &self.products
    }

    fn deals(&self) -> &[Deal] {
        &self.deals
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use jiff::SignedDuration;
    use rusty_money::{Money, iso::MWK};
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    fn mini_set() -> TestResult<TempDir> {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "mini",
            "products:\n  \"1\":\n    name: Mouse\n    price: 2799999 MWK\n    stock: 3\n  \"3\":\n    name: Mousepad\n    price: 539999 MWK\n",
        )?;
        write_fixture(
            dir.path(),
            "deals",
            "mini",
            "deals:\n  flash:\n    title: Flash\n    products: [\"1\"]\n    discount: 20%\n    ends_in: 1h 30m\n",
        )?;
        write_fixture(
            dir.path(),
            "carts",
            "mini",
            "items:\n  - product: \"1\"\n    quantity: 5\n  - product: \"3\"\n    selected: false\n",
        )?;

        Ok(dir)
    }

    fn load(dir: &TempDir, now: Timestamp) -> TestResult<Fixture> {
        let mut fixture = Fixture::with_base_path(dir.path()).at(now);

        fixture
            .load_products("mini")?
            .load_deals("mini")?
            .load_cart("mini")?;

        Ok(fixture)
    }

    #[test]
    fn loads_products_deals_and_cart() -> TestResult {
        let dir = mini_set()?;
        let now = Timestamp::from_second(1_760_000_000)?;
        let fixture = load(&dir, now)?;

        assert_eq!(fixture.products().len(), 2);
        assert_eq!(fixture.deals().len(), 1);
        assert_eq!(fixture.cart_lines().len(), 2);
        assert_eq!(fixture.currency()?, MWK);
        assert_eq!(
            fixture.product_by_key("3")?.price,
            Money::from_major(539_999, MWK)
        );

        let deal = fixture.deals().first().ok_or("no deal")?;

        assert_eq!(
            deal.ends_at().duration_since(now),
            SignedDuration::from_mins(90)
        );

        Ok(())
    }

    #[test]
    fn cart_clamps_to_stock_and_keeps_selection() -> TestResult {
        let dir = mini_set()?;
        let fixture = load(&dir, Timestamp::from_second(1_760_000_000)?)?;
        let cart = fixture.cart(None)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.selected_len(), 1);

        let mouse = cart.items().first().ok_or("no line")?;

        assert_eq!(mouse.quantity().get(), 3);

        Ok(())
    }

    #[test]
    fn cart_rejects_request_for_too_many_lines() -> TestResult {
        let dir = mini_set()?;
        let fixture = load(&dir, Timestamp::from_second(1_760_000_000)?)?;

        assert!(matches!(
            fixture.cart(Some(5)),
            Err(FixtureError::NotEnoughItems {
                requested: 5,
                available: 2
            })
        ));
        assert_eq!(fixture.cart(Some(1))?.len(), 1);

        Ok(())
    }

    #[test]
    fn cart_referencing_unknown_product_is_rejected() -> TestResult {
        let dir = mini_set()?;

        write_fixture(
            dir.path(),
            "carts",
            "broken",
            "items:\n  - product: \"42\"\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("mini")?;

        assert!(matches!(
            fixture.load_cart("broken"),
            Err(FixtureError::ProductNotFound(key)) if key == "42"
        ));

        Ok(())
    }

    #[test]
    fn load_products_rejects_currency_mismatch() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "usd_set",
            "products:\n  apple:\n    name: Apple\n    price: 1.00 USD\n",
        )?;
        write_fixture(
            dir.path(),
            "products",
            "mwk_set",
            "products:\n  banana:\n    name: Banana\n    price: 1.00 MWK\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("usd_set")?;

        assert!(matches!(
            fixture.load_products("mwk_set"),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));

        Ok(())
    }

    #[test]
    fn catalog_rejects_deal_for_unknown_product() -> TestResult {
        let dir = mini_set()?;

        write_fixture(
            dir.path(),
            "deals",
            "stray",
            "deals:\n  stray:\n    title: Stray\n    products: [\"99\"]\n    discount: 10%\n    ends_at: 2025-10-09T12:00:00Z\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("mini")?.load_deals("stray")?;

        assert!(matches!(
            fixture.catalog(),
            Err(FixtureError::Catalog(CatalogError::UnknownDealProduct(_, _)))
        ));

        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_products("nope"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn no_currency_before_products_load() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
        assert!(matches!(fixture.cart(None), Err(FixtureError::NoCurrency)));
    }
}
