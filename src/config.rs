//! Command line configuration

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use decimal_percentage::Percentage;
use tracing_subscriber::EnvFilter;

use crate::{checkout::PaymentMethod, fixtures::products::parse_percentage, shipping::ShippingMethod};

/// Storefront configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart pricing and deal board", long_about = None)]
pub struct Config {
    /// Directory holding the fixture sets
    #[arg(long, env = "STOREFRONT_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set to load
    #[arg(short, long, env = "STOREFRONT_SET", default_value = "storefront")]
    pub set: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// What to show
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price the fixture cart
    Cart(CartArgs),

    /// Show the flash deal board
    Deals(DealsArgs),
}

/// Arguments for `cart`
#[derive(Debug, Args)]
pub struct CartArgs {
    /// Number of cart lines to load
    #[arg(short, long)]
    pub n: Option<usize>,

    /// Shipping method
    #[arg(long, value_enum, env = "STOREFRONT_SHIPPING", default_value_t = ShippingMethod::Regular)]
    pub shipping: ShippingMethod,

    /// Tax rate applied to the subtotal; "0%" disables tax
    #[arg(long, env = "STOREFRONT_TAX_RATE", default_value = "10%", value_parser = parse_rate)]
    pub tax_rate: Percentage,

    /// Check out the selected lines with this payment method
    #[arg(long, value_enum)]
    pub pay: Option<PaymentMethod>,
}

/// Arguments for `deals`
#[derive(Debug, Args)]
pub struct DealsArgs {
    /// Keep refreshing the board at this period (e.g., "60s") until interrupted
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub watch: Option<Duration>,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Log filter built from `--log-level`, which already falls back to `RUST_LOG`.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::new(&self.log_level)
    }
}

fn parse_rate(s: &str) -> Result<Percentage, String> {
    parse_percentage(s).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cart_arguments() -> TestResult {
        let config = Config::try_parse_from([
            "storefront",
            "--set",
            "mini",
            "cart",
            "--shipping",
            "express",
            "--tax-rate",
            "16.5%",
            "--pay",
            "cod",
        ])?;

        assert_eq!(config.set, "mini");
        assert!(matches!(
            config.command,
            Command::Cart(args)
                if args.shipping == ShippingMethod::Express
                    && args.tax_rate * Decimal::ONE == Decimal::new(165, 3)
                    && args.pay == Some(PaymentMethod::CashOnDelivery)
        ));

        Ok(())
    }

    #[test]
    fn cart_defaults() -> TestResult {
        let config = Config::try_parse_from(["storefront", "cart"])?;

        assert!(matches!(
            config.command,
            Command::Cart(args)
                if args.shipping == ShippingMethod::Regular
                    && args.tax_rate * Decimal::ONE == Decimal::new(1, 1)
                    && args.pay.is_none()
        ));

        Ok(())
    }

    #[test]
    fn deals_watch_period() -> TestResult {
        let config = Config::try_parse_from(["storefront", "deals", "--watch", "30s"])?;

        assert!(matches!(
            config.command,
            Command::Deals(args) if args.watch == Some(Duration::from_secs(30))
        ));

        Ok(())
    }

    #[test]
    fn log_level_flag_sets_filter() -> TestResult {
        let config = Config::try_parse_from(["storefront", "--log-level", "debug", "deals"])?;

        assert_eq!(config.log_filter().to_string(), "debug");

        Ok(())
    }

    #[test]
    fn rejects_bad_tax_rate() {
        let result = Config::try_parse_from(["storefront", "cart", "--tax-rate", "lots"]);

        assert!(result.is_err());
    }
}
