//! Checkout
//!
//! Turns the selected part of a cart into an order summary and hands it to a payment gateway.

use std::fmt;

use clap::ValueEnum;
use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{Span, info};

use crate::{
    cart::{Cart, CartError},
    items::LineItem,
    pricing::CartSnapshot,
    shipping::ShippingMethod,
};

/// Errors raised while building an order.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// No cart lines are selected.
    #[error("nothing selected for checkout")]
    NothingSelected,

    /// Errors bubbled up from the cart while pricing it.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Errors raised by a payment gateway.
#[derive(Debug, Error, PartialEq)]
pub enum PaymentError {
    /// The gateway refused the payment.
    #[error("payment declined: {0}")]
    Declined(String),
}

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PaymentMethod {
    /// Paychangu online payment
    #[default]
    Paychangu,

    /// Manual bank transfer
    BankTransfer,

    /// Cash on delivery
    #[value(name = "cod")]
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Paychangu => "Paychangu",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        })
    }
}

/// State of a submitted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Submitted, not yet settled
    Pending,

    /// Settled
    Paid,

    /// Refused by the gateway
    Failed,
}

/// Everything needed to place an order for the selected cart lines.
#[derive(Debug, Clone)]
pub struct OrderSummary<'a> {
    lines: SmallVec<[LineItem<'a>; 8]>,
    snapshot: CartSnapshot<'a>,
    shipping: ShippingMethod,
    payment: PaymentMethod,
}

impl<'a> OrderSummary<'a> {
    /// Lines being ordered
    pub fn lines(&self) -> &[LineItem<'a>] {
        &self.lines
    }

    /// Totals for the order
    pub fn snapshot(&self) -> &CartSnapshot<'a> {
        &self.snapshot
    }

    /// Amount to charge
    pub fn total(&self) -> Money<'a, Currency> {
        self.snapshot.total
    }

    /// Chosen shipping method
    pub fn shipping(&self) -> ShippingMethod {
        self.shipping
    }

    /// Chosen payment method
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }
}

/// Build the order summary for the selected lines of a cart.
///
/// # Errors
///
/// - [`CheckoutError::NothingSelected`]: no lines are selected.
/// - [`CheckoutError::Cart`]: the totals could not be computed.
#[tracing::instrument(
    name = "checkout.summarize",
    skip(cart, tax_rate),
    fields(lines = tracing::field::Empty, total = tracing::field::Empty),
    err
)]
pub fn summarize<'a>(
    cart: &Cart<'a>,
    shipping: ShippingMethod,
    payment: PaymentMethod,
    tax_rate: Option<&Percentage>,
) -> Result<OrderSummary<'a>, CheckoutError> {
    let lines: SmallVec<[LineItem<'a>; 8]> = cart.selected_items().cloned().collect();

    if lines.is_empty() {
        return Err(CheckoutError::NothingSelected);
    }

    let snapshot = cart.snapshot(shipping.fee(cart.currency()), tax_rate)?;

    let span = Span::current();
    span.record("lines", lines.len());
    span.record("total", tracing::field::display(snapshot.total));

    Ok(OrderSummary {
        lines,
        snapshot,
        shipping,
        payment,
    })
}

/// Receipt for a payment handed to a gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt<'a> {
    /// Gateway reference for the payment
    pub reference: String,

    /// Amount charged
    pub amount: Money<'a, Currency>,

    /// Method used
    pub method: PaymentMethod,

    /// Where the payment stands
    pub status: PaymentStatus,
}

/// A payment provider.
pub trait PaymentGateway {
    /// Submit a payment for the order.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if the gateway refuses the payment.
    fn submit<'a>(&mut self, order: &OrderSummary<'a>) -> Result<PaymentReceipt<'a>, PaymentError>;
}

/// Gateway that records the payment in the log and leaves it pending.
#[derive(Debug, Default)]
pub struct LoggingGateway {
    submitted: u64,
}

impl LoggingGateway {
    /// Number of payments submitted so far
    pub fn submitted(&self) -> u64 {
        self.submitted
    }
}

impl PaymentGateway for LoggingGateway {
    fn submit<'a>(&mut self, order: &OrderSummary<'a>) -> Result<PaymentReceipt<'a>, PaymentError> {
        self.submitted += 1;

        let reference = format!("PAY-{:06}", self.submitted);

        info!(
            %reference,
            method = %order.payment(),
            shipping = %order.shipping(),
            amount = %order.total(),
            "processing payment"
        );

        Ok(PaymentReceipt {
            reference,
            amount: order.total(),
            method: order.payment(),
            status: PaymentStatus::Pending,
        })
    }
}
