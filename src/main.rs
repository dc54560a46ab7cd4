//! Storefront CLI
//!
//! Prices the fixture cart or shows the flash deal board.

use std::io::{self, Write};

use anyhow::Result;
use jiff::Timestamp;
use tracing::info;

use storefront::{
    catalog::{Catalog, InMemoryCatalog},
    checkout::{LoggingGateway, PaymentGateway, summarize},
    config::{CartArgs, Command, Config, DealsArgs},
    deals::{
        ticker::{DealTicker, SystemClock},
        timer::TimerState,
    },
    fixtures::Fixture,
    summary::{write_cart_summary, write_deal_board},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|err| err.exit());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(config.log_filter())
        .init();

    let mut fixture = Fixture::with_base_path(&config.fixtures);

    fixture
        .load_products(&config.set)?
        .load_deals(&config.set)?
        .load_cart(&config.set)?;

    let catalog = fixture.catalog()?;

    match config.command {
        Command::Cart(args) => cart(&fixture, &catalog, &args),
        Command::Deals(args) => deals(&catalog, &args).await,
    }
}

fn cart(fixture: &Fixture, catalog: &InMemoryCatalog<'static>, args: &CartArgs) -> Result<()> {
    let cart = fixture.cart(args.n)?;
    let snapshot = cart.snapshot(args.shipping.fee(cart.currency()), Some(&args.tax_rate))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_cart_summary(&mut handle, &cart, catalog, &snapshot)?;

    writeln!(
        handle,
        " {} ({}), {}",
        args.shipping,
        args.shipping.estimate(),
        args.shipping.fee(cart.currency())
    )?;

    if let Some(method) = args.pay {
        let order = summarize(&cart, args.shipping, method, Some(&args.tax_rate))?;
        let receipt = LoggingGateway::default().submit(&order)?;

        writeln!(
            handle,
            " {} {} via {}: {:?}",
            receipt.reference, receipt.amount, receipt.method, receipt.status
        )?;
    }

    Ok(())
}

async fn deals(catalog: &InMemoryCatalog<'static>, args: &DealsArgs) -> Result<()> {
    let Some(period) = args.watch else {
        let timers = TimerState::rebuild(catalog.deals(), Timestamp::now());

        write_deal_board(io::stdout().lock(), catalog, &timers)?;

        return Ok(());
    };

    let ticker = DealTicker::spawn(catalog.deals().to_vec(), SystemClock, period);
    let mut updates = ticker.subscribe();

    loop {
        let timers = updates.borrow_and_update().clone();

        write_deal_board(io::stdout().lock(), catalog, &timers)?;

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    ticker.cancel();

    Ok(())
}
