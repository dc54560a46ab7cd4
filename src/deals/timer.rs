//! Timer state

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::deals::{Deal, DealId, DealStatus, Remaining};

/// Remaining time for every deal, as of one instant.
///
/// Always rebuilt from scratch; entries are never patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerState {
    computed_at: Option<Timestamp>,
    remaining: FxHashMap<DealId, Remaining>,
}

impl TimerState {
    /// Compute the remaining time of each deal at `now`.
    pub fn rebuild(deals: &[Deal], now: Timestamp) -> Self {
        let remaining: FxHashMap<DealId, Remaining> = deals
            .iter()
            .map(|deal| (deal.id().clone(), deal.remaining(now)))
            .collect();

        trace!(deals = remaining.len(), %now, "rebuilt deal timers");

        Self {
            computed_at: Some(now),
            remaining,
        }
    }

    /// Time left on the given deal, if it was known at the last rebuild.
    pub fn get(&self, id: &DealId) -> Option<Remaining> {
        self.remaining.get(id).copied()
    }

    /// Display string for the given deal, or `None` before the deal has been computed.
    pub fn label(&self, id: &DealId) -> Option<String> {
        self.get(id).map(|remaining| remaining.to_string())
    }

    /// Status of the given deal at the last rebuild.
    pub fn status(&self, id: &DealId) -> Option<DealStatus> {
        self.get(id).map(|remaining| match remaining {
            Remaining::Expired => DealStatus::Expired,
            Remaining::Left { .. } => DealStatus::Active,
        })
    }

    /// Number of deals still running at the last rebuild.
    pub fn active_count(&self) -> usize {
        self.remaining
            .values()
            .filter(|remaining| !matches!(remaining, Remaining::Expired))
            .count()
    }

    /// When the state was computed; `None` for the empty default.
    pub fn computed_at(&self) -> Option<Timestamp> {
        self.computed_at
    }

    /// Number of deals tracked.
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Whether no deals are tracked.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
