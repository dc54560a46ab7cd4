//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, QuantityChange},
    catalog::{Catalog, CatalogError, InMemoryCatalog},
    checkout::{
        CheckoutError, LoggingGateway, OrderSummary, PaymentError, PaymentGateway, PaymentMethod,
        PaymentReceipt, PaymentStatus, summarize,
    },
    deals::{
        Claimed, Deal, DealError, DealId, DealStatus, Remaining, format_remaining,
        ticker::{Clock, DealTicker, ManualClock, SystemClock},
        timer::TimerState,
    },
    fixtures::{Fixture, FixtureError},
    items::{LineItem, LineItemId},
    pricing::{CartSnapshot, PricingError, compute_snapshot, discounted_price, line_savings, line_total},
    products::{Product, ProductId},
    shipping::ShippingMethod,
    summary::{SummaryError, write_cart_summary, write_deal_board},
    wishlist::{SortOrder, Wishlist, WishlistEntry},
};
