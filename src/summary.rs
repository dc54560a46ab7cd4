//! Summary
//!
//! Terminal tables for the cart and the deal board.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::Catalog,
    deals::timer::TimerState,
    pricing::{CartSnapshot, PricingError, line_savings, line_total},
};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Errors bubbled up from pricing.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the cart lines followed by the totals of the selected lines.
///
/// # Errors
///
/// Returns an error if a line cannot be priced or the output cannot be written.
pub fn write_cart_summary<'a>(
    mut out: impl io::Write,
    cart: &Cart<'a>,
    catalog: &impl Catalog<'a>,
    snapshot: &CartSnapshot<'a>,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Store", "Unit Price", "Qty", "Line Total", "Savings"]);

    for item in cart.items() {
        let product = catalog.product(item.product_id());

        let name = product.map_or_else(|| item.product_id().to_string(), |p| p.name.clone());
        let store = product
            .and_then(|p| p.store_name.clone())
            .unwrap_or_default();
        let savings = line_savings(item)?.map(|s| s.to_string()).unwrap_or_default();
        let marker = if cart.is_selected(item.id()) { "[x]" } else { "[ ]" };

        builder.push_record([
            marker.to_string(),
            name,
            store,
            item.unit_price().to_string(),
            item.quantity().to_string(),
            line_total(item)?.to_string(),
            savings,
        ]);
    }

    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..7), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| SummaryError::IO)?;

    let lines = [
        (
            format!("Subtotal ({} items):", snapshot.units),
            snapshot.subtotal.to_string(),
        ),
        ("Shipping:".to_string(), snapshot.shipping_fee.to_string()),
        ("Tax:".to_string(), snapshot.tax.to_string()),
        ("Total:".to_string(), snapshot.total.to_string()),
    ];

    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| SummaryError::IO)?;
    }

    writeln!(out).map_err(|_err| SummaryError::IO)
}

/// Write one row per deal with its countdown, claim progress and covered products.
///
/// Countdown labels come from `timers`; deals missing from it show as blank.
///
/// # Errors
///
/// Returns an error if a deal price cannot be computed or the output cannot be written.
pub fn write_deal_board<'a>(
    mut out: impl io::Write,
    catalog: &impl Catalog<'a>,
    timers: &TimerState,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Deal", "Discount", "Ends In", "Claimed", "Available", "Products"]);

    for deal in catalog.deals() {
        let discount = (deal.discount() * Decimal::ONE_HUNDRED).normalize();
        let claimed = deal.claimed().percent_points().map_or_else(
            || "-".to_string(),
            |points| format!("{}%", points.round().normalize()),
        );
        let available = deal
            .available()
            .map_or_else(|| "-".to_string(), |units| units.to_string());

        let mut products = Vec::new();

        for product in catalog.deal_products(deal) {
            products.push(format!(
                "{}: {} -> {}",
                product.name,
                product.price,
                deal.deal_price(product.price)?
            ));
        }

        builder.push_record([
            deal.title().to_string(),
            format!("{discount}%"),
            timers.label(deal.id()).unwrap_or_default(),
            claimed,
            available,
            products.join("\n"),
        ]);
    }

    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..5), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| SummaryError::IO)
}
