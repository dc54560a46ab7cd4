//! Shipping

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use rusty_money::{Money, iso::Currency};

/// Delivery speed offered at checkout. Each method is a flat fee per order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShippingMethod {
    /// Regular shipping
    #[default]
    Regular,

    /// Express shipping
    Express,

    /// Overnight shipping
    Overnight,
}

impl ShippingMethod {
    /// Every method, cheapest first.
    pub const ALL: [ShippingMethod; 3] = [
        ShippingMethod::Regular,
        ShippingMethod::Express,
        ShippingMethod::Overnight,
    ];

    /// Flat fee in major units of the order currency.
    pub const fn major_fee(self) -> i64 {
        match self {
            ShippingMethod::Regular => 15_000,
            ShippingMethod::Express => 35_000,
            ShippingMethod::Overnight => 75_000,
        }
    }

    /// Flat fee in the given currency.
    pub fn fee(self, currency: &Currency) -> Money<'_, Currency> {
        Money::from_major(self.major_fee(), currency)
    }

    /// Delivery estimate shown next to the method.
    pub const fn estimate(self) -> &'static str {
        match self {
            ShippingMethod::Regular => "5-7 business days",
            ShippingMethod::Express => "2-3 business days",
            ShippingMethod::Overnight => "Next business day",
        }
    }

    /// Human readable name.
    pub const fn label(self) -> &'static str {
        match self {
            ShippingMethod::Regular => "Regular Shipping",
            ShippingMethod::Express => "Express Shipping",
            ShippingMethod::Overnight => "Overnight Shipping",
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::MWK;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn fees_are_flat_per_method() {
        assert_eq!(
            ShippingMethod::Regular.fee(MWK),
            Money::from_major(15_000, MWK)
        );
        assert_eq!(
            ShippingMethod::Express.fee(MWK),
            Money::from_major(35_000, MWK)
        );
        assert_eq!(
            ShippingMethod::Overnight.fee(MWK),
            Money::from_major(75_000, MWK)
        );
    }

    #[test]
    fn parses_case_insensitively() -> TestResult {
        assert_eq!("express".parse::<ShippingMethod>()?, ShippingMethod::Express);
        assert_eq!("Overnight".parse::<ShippingMethod>()?, ShippingMethod::Overnight);
        assert!("drone".parse::<ShippingMethod>().is_err());

        Ok(())
    }

    #[test]
    fn default_is_regular() {
        assert_eq!(ShippingMethod::default(), ShippingMethod::Regular);
        assert_eq!(ShippingMethod::default().estimate(), "5-7 business days");
    }
}
