//! Deal ticker
//!
//! Periodically rebuilds [`TimerState`] on the tokio runtime and publishes it on a watch channel.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use jiff::{SignedDuration, Timestamp};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::{debug, info};

use crate::deals::{Deal, timer::TimerState};

/// Default refresh period for deal timers.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Create a clock stopped at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move the clock forward by `by`. The clock stays put if that would leave the supported range.
    pub fn advance(&self, by: SignedDuration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.checked_add(by).unwrap_or(*now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a running deal ticker.
///
/// The timer state is computed once when the ticker is spawned and again every period. Dropping
/// the handle stops the background task.
pub struct DealTicker {
    task: JoinHandle<()>,
    state: watch::Receiver<TimerState>,
}

impl fmt::Debug for DealTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DealTicker")
            .field("finished", &self.task.is_finished())
            .field("deals", &self.state.borrow().len())
            .finish()
    }
}

impl DealTicker {
    /// Start ticking over `deals` every `period`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(deals: impl Into<Arc<[Deal]>>, clock: impl Clock, period: Duration) -> Self {
        let deals: Arc<[Deal]> = deals.into();
        let (tx, state) = watch::channel(TimerState::rebuild(&deals, clock.now()));

        info!(deals = deals.len(), period = ?period, "starting deal ticker");

        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticks.tick().await;

                if tx.send(TimerState::rebuild(&deals, clock.now())).is_err() {
                    debug!("deal ticker has no subscribers left");
                    break;
                }
            }
        });

        Self { task, state }
    }

    /// Subscribe to timer state updates.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state.clone()
    }

    /// The most recently published timer state.
    pub fn current(&self) -> TimerState {
        self.state.borrow().clone()
    }

    /// Stop the ticker.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for DealTicker {
    fn drop(&mut self) {
        self.task.abort();
        info!("stopped deal ticker");
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use testresult::TestResult;

    use crate::deals::DealId;

    use super::*;

    fn flash_deal(now: Timestamp) -> TestResult<Deal> {
        Ok(Deal::new(
            "flash",
            "Flash deal",
            Percentage::from(0.25),
            now.checked_add(SignedDuration::from_mins(90))?,
        )?)
    }

    #[tokio::test(start_paused = true)]
    async fn computes_eagerly_on_spawn() -> TestResult {
        let now = Timestamp::from_second(1_760_000_000)?;
        let ticker = DealTicker::spawn(vec![flash_deal(now)?], ManualClock::new(now), DEFAULT_PERIOD);

        assert_eq!(
            ticker.current().label(&DealId::new("flash")).as_deref(),
            Some("1h 30m")
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn republishes_every_period() -> TestResult {
        let now = Timestamp::from_second(1_760_000_000)?;
        let clock = ManualClock::new(now);
        let ticker = DealTicker::spawn(vec![flash_deal(now)?], clock.clone(), DEFAULT_PERIOD);
        let mut updates = ticker.subscribe();

        clock.advance(SignedDuration::from_mins(61));
        updates.changed().await?;

        assert_eq!(
            updates.borrow_and_update().label(&DealId::new("flash")).as_deref(),
            Some("29m")
        );

        clock.advance(SignedDuration::from_mins(30));
        updates.changed().await?;

        assert_eq!(
            updates.borrow_and_update().label(&DealId::new("flash")).as_deref(),
            Some("Expired")
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_ticker_stops_updates() -> TestResult {
        let now = Timestamp::from_second(1_760_000_000)?;
        let ticker = DealTicker::spawn(vec![flash_deal(now)?], ManualClock::new(now), DEFAULT_PERIOD);
        let mut updates = ticker.subscribe();

        ticker.cancel();

        assert!(updates.changed().await.is_err());

        Ok(())
    }

    #[test]
    fn manual_clock_moves_only_when_told() -> TestResult {
        let now = Timestamp::from_second(1_760_000_000)?;
        let clock = ManualClock::new(now);

        assert_eq!(clock.now(), now);

        clock.advance(SignedDuration::from_secs(90));
        assert_eq!(clock.now(), now.checked_add(SignedDuration::from_secs(90))?);

        clock.set(now);
        assert_eq!(clock.now(), now);

        Ok(())
    }
}
