//! Storefront
//!
//! Storefront is the pricing and timing core of a marketplace shop: a cart that derives its
//! totals from the selected lines, and a deal engine that counts flash sales down to the minute.
//!
//! Money is carried in minor units ([`rusty_money::Money`]) and discounts as
//! [`decimal_percentage::Percentage`], so no total is ever computed in floating point.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod deals;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod shipping;
pub mod summary;
pub mod wishlist;
