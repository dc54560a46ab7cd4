//! Integration test for the flash deal board built from the bundled `storefront` fixtures.
//!
//! With the reference time at 2025-10-09T08:53:20Z:
//!
//! - `gaming-week` ends in 2d 3h, 67 of 100 claimed
//! - `headset-hour` ends in 45m, 18 of 20 claimed
//! - `keyboard-clearance` ends in 5h 7m, no capacity
//! - `launch-weekend` ended on 2025-10-05

use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::MWK};
use testresult::TestResult;

use storefront::{
    catalog::Catalog,
    deals::{
        Claimed, DealId, DealStatus,
        ticker::{DealTicker, ManualClock},
        timer::TimerState,
    },
    fixtures::Fixture,
    products::ProductId,
};

fn fixture(now: Timestamp) -> TestResult<Fixture> {
    let mut fixture = Fixture::new().at(now);

    fixture.load_products("storefront")?.load_deals("storefront")?;

    Ok(fixture)
}

fn now() -> Result<Timestamp, jiff::Error> {
    Timestamp::from_second(1_760_000_000)
}

#[test]
fn timer_state_labels_every_deal() -> TestResult {
    let now = now()?;
    let catalog = fixture(now)?.catalog()?;
    let timers = TimerState::rebuild(catalog.deals(), now);

    assert_eq!(timers.len(), 4);
    assert_eq!(timers.active_count(), 3);
    assert_eq!(timers.label(&DealId::new("gaming-week")).as_deref(), Some("2d 3h"));
    assert_eq!(timers.label(&DealId::new("headset-hour")).as_deref(), Some("45m"));
    assert_eq!(
        timers.label(&DealId::new("keyboard-clearance")).as_deref(),
        Some("5h 7m")
    );
    assert_eq!(
        timers.status(&DealId::new("launch-weekend")),
        Some(DealStatus::Expired)
    );

    Ok(())
}

#[test]
fn deal_progress_and_prices() -> TestResult {
    let now = now()?;
    let catalog = fixture(now)?.catalog()?;

    let gaming = catalog
        .deal(&DealId::new("gaming-week"))
        .ok_or("missing deal")?;

    assert_eq!(gaming.claimed().percent_points(), Some(Decimal::from(67)));
    assert_eq!(gaming.available(), Some(33));

    let mouse = catalog
        .product(&ProductId::new("1"))
        .ok_or("missing product")?;

    assert_eq!(
        gaming.deal_price(mouse.price)?,
        Money::from_minor(223_999_920, MWK)
    );
    assert_eq!(
        gaming.savings_on(mouse.price)?,
        Money::from_minor(55_999_980, MWK)
    );

    let covered: Vec<&str> = catalog
        .deal_products(gaming)
        .iter()
        .map(|product| product.id.as_str())
        .collect();

    assert_eq!(covered, ["1", "3"]);

    let keyboard = catalog
        .deal(&DealId::new("keyboard-clearance"))
        .ok_or("missing deal")?;

    assert_eq!(keyboard.claimed(), Claimed::UnknownCapacity);
    assert_eq!(keyboard.available(), None);

    let launch = catalog
        .deal(&DealId::new("launch-weekend"))
        .ok_or("missing deal")?;

    assert_eq!(launch.available(), Some(0));
    assert_eq!(launch.claimed().percent_points(), Some(Decimal::ONE_HUNDRED));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn ticker_counts_deals_down() -> TestResult {
    let now = now()?;
    let catalog = fixture(now)?.catalog()?;
    let clock = ManualClock::new(now);

    let ticker = DealTicker::spawn(
        catalog.deals().to_vec(),
        clock.clone(),
        Duration::from_secs(60),
    );
    let mut updates = ticker.subscribe();
    let headset = DealId::new("headset-hour");

    assert_eq!(ticker.current().label(&headset).as_deref(), Some("45m"));

    clock.advance(SignedDuration::from_mins(44));
    updates.changed().await?;

    assert_eq!(updates.borrow_and_update().label(&headset).as_deref(), Some("1m"));

    clock.advance(SignedDuration::from_mins(1));
    updates.changed().await?;

    let state = updates.borrow_and_update().clone();

    assert_eq!(state.status(&headset), Some(DealStatus::Expired));
    assert_eq!(state.active_count(), 2);

    ticker.cancel();

    Ok(())
}
