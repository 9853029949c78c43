//! Economy calculators - pure functions, fully testable.
//!
//! Everything here is a deterministic function of the catalog constants and
//! the current levels. Calculators never fail: out-of-range levels cannot
//! occur because only the purchase operations increment them.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::config::{
    self, PartKind, BASE_TAP_HP, BASE_TAP_RPM, OUTPUT_SCALING, TAP_HP_PER_THROTTLE_LEVEL,
    TAP_RPM_PER_ECU_LEVEL,
};
use crate::state::GameState;

/// Floor a non-negative f64 into a BigUint. Saturates at u128::MAX, far
/// beyond anything the balance curve reaches.
pub(crate) fn floor_hp(value: f64) -> BigUint {
    BigUint::from(value.max(0.0).floor() as u128)
}

/// Cost to go from `level` to `level + 1`: `floor(base * scaling^level)`.
/// Exponential in the *current* level, so the first purchase costs exactly
/// `base`.
pub fn upgrade_cost(base: u64, scaling: f64, level: u32) -> BigUint {
    floor_hp(base as f64 * scaling.powi(level as i32))
}

/// Cost of the next level of a part.
pub fn part_cost(kind: PartKind, level: u32) -> BigUint {
    upgrade_cost(kind.base_cost(), config::COST_SCALING, level)
}

/// Cost of the next level of a manual upgrade (same formula family).
pub fn manual_upgrade_cost(level: u32) -> BigUint {
    upgrade_cost(config::MANUAL_UPGRADE_BASE_COST, config::COST_SCALING, level)
}

/// HP/sec a part produces at `level`: 0 when unowned, else
/// `floor(base * scaling^level)`.
///
/// Note the exponent is `level`, not `level - 1`: level-1 output is already
/// one scaling step above the nominal base. The balance numbers were tuned
/// against this curve, so it stays.
pub fn part_output(kind: PartKind, level: u32) -> u64 {
    if level == 0 {
        return 0;
    }
    (kind.base_output() as f64 * OUTPUT_SCALING.powi(level as i32)).floor() as u64
}

/// The 2^tier prestige doubling applied to all income.
pub fn prestige_multiplier(state: &GameState) -> f64 {
    2.0_f64.powi(state.current_tier.index() as i32)
}

/// Total passive income in HP/sec: the sum of all owned part outputs,
/// doubled per prestige tier. Gear and manual upgrades do not apply.
pub fn passive_income(state: &GameState) -> f64 {
    let per_sec: u64 = PartKind::all()
        .iter()
        .map(|kind| part_output(*kind, state.part_level(*kind)))
        .sum();
    per_sec as f64 * prestige_multiplier(state)
}

/// HP earned by one tap:
/// `floor((10 + 5*throttle) * gearMult * tierMult * 2^tier)`.
///
/// Multipliers are passed in rather than read from the state so the
/// safety-shift path can pay out at the pre-shift gear.
pub fn rev_income(state: &GameState, tier_mult: f64, gear_mult: f64) -> BigUint {
    let base_tap = BASE_TAP_HP + TAP_HP_PER_THROTTLE_LEVEL * state.throttle_level as u64;
    let total_mult = gear_mult * tier_mult * prestige_multiplier(state);
    floor_hp(base_tap as f64 * total_mult)
}

/// RPM added by one tap: `90 + 5*ecu`.
pub fn rpm_gain(state: &GameState) -> u32 {
    BASE_TAP_RPM + TAP_RPM_PER_ECU_LEVEL * state.ecu_level
}

/// Format an HP amount for display: grouped integer under a million, then
/// M/B/T with two decimals.
pub fn format_hp(value: &BigUint) -> String {
    const MILLION: u64 = 1_000_000;
    const BILLION: u64 = 1_000_000_000;
    const TRILLION: u64 = 1_000_000_000_000;

    let approx = value.to_f64().unwrap_or(f64::MAX);
    if *value < BigUint::from(MILLION) {
        group_thousands(&value.to_string())
    } else if *value < BigUint::from(BILLION) {
        format!("{:.2}M", approx / MILLION as f64)
    } else if *value < BigUint::from(TRILLION) {
        format!("{:.2}B", approx / BILLION as f64)
    } else {
        format!("{:.2}T", approx / TRILLION as f64)
    }
}

/// Insert thousands separators into a plain decimal string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarTier;

    fn fresh() -> GameState {
        GameState::new(0.0, "2026-08-05")
    }

    #[test]
    fn cost_at_level_zero_is_base() {
        assert_eq!(part_cost(PartKind::Intake, 0), BigUint::from(66u32));
        assert_eq!(part_cost(PartKind::Widebody, 0), BigUint::from(400_000u32));
        assert_eq!(manual_upgrade_cost(0), BigUint::from(100u32));
    }

    #[test]
    fn cost_scales_exponentially() {
        // 66 * 1.12^5 = 116.31... -> 116
        assert_eq!(part_cost(PartKind::Intake, 5), BigUint::from(116u32));
        // 100 * 1.12^10 = 310.58... -> 310
        assert_eq!(manual_upgrade_cost(10), BigUint::from(310u32));
    }

    #[test]
    fn output_zero_when_unowned() {
        for kind in PartKind::all() {
            assert_eq!(part_output(*kind, 0), 0);
        }
    }

    #[test]
    fn output_level_one_already_scaled() {
        // floor(1 * 1.10^1) = 1, floor(3 * 1.10) = 3, floor(20 * 1.10) = 22
        assert_eq!(part_output(PartKind::Intake, 1), 1);
        assert_eq!(part_output(PartKind::Exhaust, 1), 3);
        assert_eq!(part_output(PartKind::Tires, 1), 22);
    }

    #[test]
    fn output_strictly_increasing_for_mid_size_base() {
        // floor(20 * 1.1^L): 22, 24, 26, 29, 32, ...
        for level in 1..60 {
            assert!(
                part_output(PartKind::Tires, level) < part_output(PartKind::Tires, level + 1),
                "flat at level {level}"
            );
        }
    }

    #[test]
    fn passive_income_sums_owned_parts() {
        let mut s = fresh();
        assert_eq!(passive_income(&s), 0.0);
        s.parts.insert(PartKind::Intake, 1); // 1 HP/s
        s.parts.insert(PartKind::Tires, 1); // 22 HP/s
        assert_eq!(passive_income(&s), 23.0);
    }

    #[test]
    fn passive_income_doubles_per_tier() {
        let mut s = fresh();
        s.parts.insert(PartKind::Exhaust, 1); // 3 HP/s
        s.current_tier = CarTier::Sports; // tier index 2 -> x4
        assert_eq!(passive_income(&s), 12.0);
    }

    #[test]
    fn rev_income_base_case() {
        let s = fresh();
        // floor(10 * 1.0 * 1.0 * 1) = 10
        assert_eq!(rev_income(&s, 1.0, 1.0), BigUint::from(10u32));
    }

    #[test]
    fn rev_income_gear_two_tier_zero() {
        // The payout of a perfect shift out of gear 2 at tier 0:
        // floor(10 * 1.25 * 1.0 * 1) = 12
        let s = fresh();
        assert_eq!(rev_income(&s, 1.0, 1.25), BigUint::from(12u32));
    }

    #[test]
    fn rev_income_scales_with_throttle_and_tier() {
        let mut s = fresh();
        s.throttle_level = 4; // base tap 30
        s.current_tier = CarTier::StreetTuner; // 2^1 = 2
        // floor(30 * 2.5 * 1.5 * 2) = floor(225) = 225
        assert_eq!(rev_income(&s, 1.5, 2.5), BigUint::from(225u32));
    }

    #[test]
    fn rpm_gain_scales_with_ecu() {
        let mut s = fresh();
        assert_eq!(rpm_gain(&s), 90);
        s.ecu_level = 6;
        assert_eq!(rpm_gain(&s), 120);
    }

    #[test]
    fn format_hp_small_values_grouped() {
        assert_eq!(format_hp(&BigUint::from(0u32)), "0");
        assert_eq!(format_hp(&BigUint::from(999u32)), "999");
        assert_eq!(format_hp(&BigUint::from(1_234u32)), "1,234");
        assert_eq!(format_hp(&BigUint::from(999_999u32)), "999,999");
    }

    #[test]
    fn format_hp_suffixes() {
        assert_eq!(format_hp(&BigUint::from(1_500_000u64)), "1.50M");
        assert_eq!(format_hp(&BigUint::from(2_340_000_000u64)), "2.34B");
        assert_eq!(format_hp(&BigUint::from(7_000_000_000_000u64)), "7.00T");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_part() -> impl Strategy<Value = PartKind> {
            prop::sample::select(PartKind::all().to_vec())
        }

        proptest! {
            #[test]
            fn prop_cost_monotone_in_level(kind in arb_part(), level in 0u32..100) {
                prop_assert!(part_cost(kind, level) <= part_cost(kind, level + 1));
            }

            #[test]
            fn prop_cost_ratio_is_scaling(kind in arb_part(), level in 0u32..80) {
                let a = part_cost(kind, level).to_f64().unwrap();
                let b = part_cost(kind, level + 1).to_f64().unwrap();
                // Flooring perturbs the ratio slightly at small magnitudes.
                prop_assert!((b / a - config::COST_SCALING).abs() < 0.02,
                    "ratio {} at level {}", b / a, level);
            }

            #[test]
            fn prop_output_monotone_when_owned(kind in arb_part(), level in 1u32..100) {
                // Flooring can flatten consecutive levels for the tiny
                // bases (intake sits at 1 HP/s for seven levels), so the
                // general guarantee is non-decreasing; strict growth is
                // pinned for a mid-size base in the unit tests.
                prop_assert!(part_output(kind, level) <= part_output(kind, level + 1));
            }

            #[test]
            fn prop_rev_income_never_zero(throttle in 0u32..500, tier_idx in 0u8..5) {
                let mut s = fresh();
                s.throttle_level = throttle;
                s.current_tier = crate::config::CarTier::from_index(tier_idx).unwrap();
                let income = rev_income(&s, 1.0, 1.0);
                prop_assert!(income >= BigUint::from(10u32));
            }

            #[test]
            fn prop_format_hp_never_panics(v in 0u128..u128::MAX / 2) {
                let _ = format_hp(&BigUint::from(v));
            }
        }
    }
}
