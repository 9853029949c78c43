//! Offline earnings reconciliation.
//!
//! Runs once when a persisted state is loaded, before the tick loop
//! starts. Only passive generators earn while away - taps obviously
//! cannot - and the credited window is capped so a year-long absence
//! does not mint absurd numbers.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::config::{OFFLINE_CAP_MS, OFFLINE_MIN_MS};
use crate::economy;
use crate::state::GameState;

/// One-shot result surfaced to the caller for the "welcome back" screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineEarnings {
    pub earned: BigUint,
    pub elapsed_secs: f64,
}

impl OfflineEarnings {
    /// Human-readable absence, e.g. "3h 42m" or "12m".
    pub fn time_away(&self) -> String {
        let hrs = (self.elapsed_secs / 3600.0).floor() as u64;
        let mins = ((self.elapsed_secs % 3600.0) / 60.0).floor() as u64;
        if hrs > 0 {
            format!("{hrs}h {mins}m")
        } else {
            format!("{mins}m")
        }
    }
}

/// Credit passive income for the time between the last observed tick and
/// `now_ms`. Returns `None` (and changes nothing) unless the absence was
/// longer than 10 seconds, the passive rate is positive and the floored
/// credit is nonzero. On success the freshness stamp moves to `now_ms`,
/// making the credit one-shot.
pub fn reconcile(state: &mut GameState, now_ms: f64) -> Option<OfflineEarnings> {
    let elapsed_ms = (now_ms - state.last_observed_ms).min(OFFLINE_CAP_MS);
    if elapsed_ms <= OFFLINE_MIN_MS {
        return None;
    }
    let rate = economy::passive_income(state);
    if rate <= 0.0 {
        return None;
    }
    let elapsed_secs = elapsed_ms / 1000.0;
    let earned = economy::floor_hp(rate * elapsed_secs);
    if earned.is_zero() {
        return None;
    }
    state.earn(&earned);
    state.last_observed_ms = now_ms;
    Some(OfflineEarnings {
        earned,
        elapsed_secs,
    })
}
