//! Fixed-timestep engine clock using an accumulator pattern.
//!
//! The host calls in at whatever rate it likes (an interval timer, a
//! frame callback) with a wall-clock timestamp; `TickClock` converts the
//! variable deltas into a fixed number of discrete 100 ms ticks, keeping
//! the simulation deterministic and fully testable.

use crate::config::TICK_MS;

/// Longest delta consumed from a single update. Anything bigger (a
/// backgrounded tab, a suspended process) is the offline path's job, not
/// the tick loop's - catching up tick-by-tick would spiral.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct TickClock {
    /// Accumulated milliseconds not yet consumed as ticks.
    accumulator: f64,
    /// Total elapsed ticks since creation.
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None before the first frame.
    last_timestamp: Option<f64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp; returns how many whole engine ticks
    /// to process for this frame. The first frame yields zero.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / TICK_MS) as u32;
        self.accumulator -= ticks as f64 * TICK_MS;
        self.total_ticks += ticks as u64;
        ticks
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Today's calendar date as YYYY-MM-DD, for the daily token window.
#[cfg(target_arch = "wasm32")]
pub fn today_string() -> String {
    let iso = String::from(js_sys::Date::new_0().to_iso_string());
    iso.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_yields_no_ticks() {
        let mut clock = TickClock::new();
        assert_eq!(clock.update(0.0), 0);
    }

    #[test]
    fn one_tick_per_100ms() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(100.0), 1);
        assert_eq!(clock.total_ticks, 1);
    }

    #[test]
    fn remainder_carries_between_frames() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(150.0), 1); // 1 tick, 50 ms left over
        assert_eq!(clock.update(200.0), 1); // 50 + 50 = one more tick
        assert_eq!(clock.total_ticks, 2);
    }

    #[test]
    fn long_gap_is_clamped_not_replayed() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        // Ten minutes in the background turns into at most 5 ticks; the
        // offline reconciliation covers the rest.
        assert_eq!(clock.update(600_000.0), 5);
    }

    #[test]
    fn sub_tick_frames_accumulate() {
        let mut clock = TickClock::new();
        clock.update(0.0);
        let mut total = 0;
        for i in 1..=60 {
            total += clock.update(i as f64 * 16.667); // ~60 fps for 1 s
        }
        assert!((9..=11).contains(&total), "expected ~10 ticks, got {total}");
    }

    #[test]
    fn non_monotonic_clock_does_not_panic() {
        let mut clock = TickClock::new();
        clock.update(1_000.0);
        // A clock jumping backwards produces zero ticks, not a panic.
        assert_eq!(clock.update(500.0), 0);
        assert_eq!(clock.update(600.0), 1);
    }
}
