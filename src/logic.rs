//! Core simulation transitions - pure functions over `GameState`.
//!
//! The engine tick and the rev handler both read-modify-write the same
//! aggregate; callers (see `game::TurboGame`) funnel them through one
//! owner so their effects never interleave. Audio/haptic feedback is
//! returned as `Cue`s rather than fired from here, keeping every
//! transition deterministic and testable.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::audio::Cue;
use crate::config::{
    self, gear_multiplier, ManualUpgrade, PartKind, TokenPackage, DAILY_TOKEN_CAP,
    DOWNSHIFT_RPM, DOWNSHIFT_THRESHOLD, MAX_RPM, PERFECT_SHIFT_FLASH_MS, PERFECT_SHIFT_RPM,
    REDLINE, SAFETY_SHIFT_THRESHOLD_MS, STANDARD_SHIFT_RPM, TICK_MS,
};
use crate::economy;
use crate::state::GameState;

/// Why an action was rejected. Rejections are synchronous and leave the
/// state untouched - no partial charge, ever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Purchase attempted with `totalHp < cost`.
    InsufficientFunds,
    /// Token exchange already done today, or the package is over the cap.
    DailyLimitExceeded,
    /// Prestige without enough lifetime HP, or already at the top tier.
    PreconditionNotMet,
}

impl RejectReason {
    /// User-facing rejection text.
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::InsufficientFunds => "Not enough HP.",
            RejectReason::DailyLimitExceeded => {
                "You can only perform one token exchange per day."
            }
            RejectReason::PreconditionNotMet => "Requirements not met.",
        }
    }
}

/// What one rev did, for the caller and the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RevOutcome {
    /// HP credited by this tap (always paid, shift or not).
    pub earned: BigUint,
    pub shifted: bool,
    pub perfect: bool,
    pub cues: Vec<Cue>,
}

/// Advance the engine by one 100 ms tick.
///
/// Order matters and is observable: passive accrual, drag decay, redzone
/// bookkeeping / safety shift, downshift, flash expiry, freshness stamp.
pub fn tick(state: &mut GameState, now_ms: f64) -> Vec<Cue> {
    let mut cues = Vec::new();

    // 1. Passive accrual, floored per tick. Rates under 10 HP/s truncate
    // to zero online; the balance curve is tuned against this.
    let rate = economy::passive_income(state);
    let generated = economy::floor_hp(rate * (TICK_MS / 1000.0));
    if !generated.is_zero() {
        state.earn(&generated);
    }

    // 2. Constant drag, exponential in gear. Keeps high gears hungry.
    let decay_per_sec = config::BASE_DECAY_PER_SEC
        * config::DRAG_GEAR_FACTOR.powi(state.current_gear as i32 - 1);
    let decay = (decay_per_sec * (TICK_MS / 1000.0)).floor() as u32;
    state.current_rpm = state.current_rpm.saturating_sub(decay);

    // 3. Redzone dwell. Gear 6 just holds - no timer, no forced shift.
    if state.current_gear < 6 {
        if state.is_redlining() {
            match state.redzone_start_ms {
                // Normally the rev handler started the timer on entry;
                // this is the failsafe for decay-entered dwell.
                None => state.redzone_start_ms = Some(now_ms),
                Some(start) => {
                    if now_ms - start > SAFETY_SHIFT_THRESHOLD_MS {
                        // Forced shift, paid like a rev at the pre-shift
                        // gear multiplier.
                        let income = economy::rev_income(
                            state,
                            state.current_tier.multiplier(),
                            gear_multiplier(state.current_gear),
                        );
                        state.earn(&income);
                        state.current_gear += 1;
                        state.current_rpm = STANDARD_SHIFT_RPM;
                        state.redzone_start_ms = None;
                        cues.push(Cue::Upshift);
                    }
                }
            }
        } else {
            state.redzone_start_ms = None;
        }
    } else {
        state.redzone_start_ms = None;
    }

    // 4. Downshift, independent of the redzone logic. The rev-match bump
    // keeps the next tick from immediately downshifting again.
    if state.current_rpm < DOWNSHIFT_THRESHOLD && state.current_gear > 1 {
        state.current_gear -= 1;
        state.current_rpm = DOWNSHIFT_RPM;
        state.redzone_start_ms = None;
        cues.push(Cue::Downshift);
    }

    // 5. Expire the perfect-shift flash.
    if let Some(until) = state.perfect_shift_until_ms {
        if now_ms >= until {
            state.perfect_shift_until_ms = None;
        }
    }

    // 6. Freshness stamp, unconditionally; offline earnings measure from
    // the last persisted value of this.
    state.last_observed_ms = now_ms;

    cues
}

/// Apply one player tap. May run between ticks or several times within a
/// tick interval; it only ever touches the same fields the tick does.
pub fn rev(state: &mut GameState, now_ms: f64) -> RevOutcome {
    let mut cues = Vec::new();

    // Multipliers are read before the tap moves anything.
    let tier_mult = state.current_tier.multiplier();
    let gear_mult = gear_multiplier(state.current_gear);

    let gain = economy::rpm_gain(state);
    let mut new_rpm = state.current_rpm + gain;

    // Entering the band on a tap starts the dwell timer right here; the
    // tick loop would otherwise only notice one tick later. Gear 6 never
    // runs the timer.
    if state.current_gear < 6 && new_rpm >= REDLINE && state.current_rpm < REDLINE {
        state.redzone_start_ms = Some(now_ms);
    }

    // Hitting the limiter below gear 6 is the perfect shift. In gear 6
    // there is nothing to shift into: clamp and hold.
    let mut is_shift = false;
    let mut is_perfect = false;
    if new_rpm >= MAX_RPM && state.current_gear < 6 {
        is_shift = true;
        is_perfect = true;
    } else if new_rpm > MAX_RPM {
        new_rpm = MAX_RPM;
    }

    // The tap is paid at the pre-tap multipliers whether or not it shifts.
    let earned = economy::rev_income(state, tier_mult, gear_mult);
    state.earn(&earned);

    if is_perfect {
        cues.push(Cue::PerfectShift);
        state.perfect_shift_until_ms = Some(now_ms + PERFECT_SHIFT_FLASH_MS);
    }

    if is_shift {
        if !is_perfect {
            // Unreachable from a tap (taps only produce perfect shifts),
            // but the commit path mirrors the safety shift's cue routing.
            cues.push(Cue::Upshift);
        }
        state.current_gear += 1;
        state.current_rpm = if is_perfect {
            PERFECT_SHIFT_RPM
        } else {
            STANDARD_SHIFT_RPM
        };
        state.redzone_start_ms = None;
    } else {
        state.current_rpm = new_rpm;
    }

    state.last_observed_ms = now_ms;

    RevOutcome {
        earned,
        shifted: is_shift,
        perfect: is_perfect,
        cues,
    }
}

/// Buy the next level of a part. No-op on insufficient funds.
pub fn buy_part(state: &mut GameState, kind: PartKind) -> Result<(), RejectReason> {
    let level = state.part_level(kind);
    let cost = economy::part_cost(kind, level);
    if !state.can_afford(&cost) {
        return Err(RejectReason::InsufficientFunds);
    }
    state.spend(&cost);
    state.parts.insert(kind, level + 1);
    Ok(())
}

/// Buy the next level of a manual upgrade. Same cost family as parts.
pub fn buy_manual_upgrade(
    state: &mut GameState,
    which: ManualUpgrade,
) -> Result<(), RejectReason> {
    let level = match which {
        ManualUpgrade::Throttle => state.throttle_level,
        ManualUpgrade::Ecu => state.ecu_level,
    };
    let cost = economy::manual_upgrade_cost(level);
    if !state.can_afford(&cost) {
        return Err(RejectReason::InsufficientFunds);
    }
    state.spend(&cost);
    match which {
        ManualUpgrade::Throttle => state.throttle_level += 1,
        ManualUpgrade::Ecu => state.ecu_level += 1,
    }
    Ok(())
}

/// Exchange HP for a token package. At most one successful exchange per
/// calendar day, and no package may exceed the daily cap.
pub fn buy_tokens(state: &mut GameState, pkg: &TokenPackage) -> Result<(), RejectReason> {
    if state.tokens_earned_today > 0 {
        return Err(RejectReason::DailyLimitExceeded);
    }
    let cost = BigUint::from(pkg.hp_cost);
    if !state.can_afford(&cost) {
        return Err(RejectReason::InsufficientFunds);
    }
    if pkg.token_amount > DAILY_TOKEN_CAP {
        return Err(RejectReason::DailyLimitExceeded);
    }
    state.spend(&cost);
    state.tokens += pkg.token_amount;
    state.tokens_earned_today += pkg.token_amount;
    Ok(())
}

/// Roll the daily token window when the calendar day changes. Applying it
/// twice on the same day is a no-op the second time.
pub fn daily_reset(state: &mut GameState, today: &str) {
    if state.last_token_date != today {
        state.tokens_earned_today = 0;
        state.last_token_date = today.to_string();
    }
}

/// Prestige into the next tier: reset purchasable progress, keep the
/// cumulative record. The caller must persist immediately afterwards.
pub fn prestige(state: &mut GameState, now_ms: f64) -> Result<(), RejectReason> {
    let next = state.next_tier().ok_or(RejectReason::PreconditionNotMet)?;
    if state.lifetime_hp_earned < BigUint::from(next.required_lifetime_hp()) {
        return Err(RejectReason::PreconditionNotMet);
    }

    let mut fresh = GameState::new(now_ms, &state.last_token_date);
    fresh.current_tier = next;
    fresh.lifetime_hp_earned = std::mem::take(&mut state.lifetime_hp_earned);
    fresh.tokens = state.tokens;
    fresh.tokens_earned_today = state.tokens_earned_today;
    fresh.achievements = std::mem::take(&mut state.achievements);
    *state = fresh;
    Ok(())
}
