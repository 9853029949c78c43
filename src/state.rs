//! Game state definitions.
//!
//! `GameState` is the single mutable aggregate the whole simulation reads
//! and writes. It is deliberately a plain struct: all transitions live in
//! `logic`, `offline` and `achievements`, and the persisted form is a
//! separate snapshot struct in `save`, keeping transient presentation
//! fields out of storage.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigUint;
use num_traits::Zero;

use crate::config::{CarTier, PartKind, MAX_RPM, REDLINE};

/// Full state of one garage.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable HP balance. Never exceeds `lifetime_hp_earned`.
    pub total_hp: BigUint,
    /// Cumulative HP ever earned. Monotonically non-decreasing; spending
    /// never touches it. Drives prestige thresholds and achievements.
    pub lifetime_hp_earned: BigUint,
    /// Prestige rank. Only ever incremented (by `logic::prestige`).
    pub current_tier: CarTier,

    /// Engine speed, clamped to [0, MAX_RPM].
    pub current_rpm: u32,
    /// Transmission gear, 1..=6.
    pub current_gear: u8,
    /// Last time the engine observed the world (ms). Updated every tick
    /// and every rev, so offline time is measured from the last tick that
    /// made it into a persisted snapshot - in practice the last autosave.
    pub last_observed_ms: f64,
    /// Set while RPM has been continuously inside [REDLINE, MAX_RPM) below
    /// gear 6; cleared whenever RPM leaves the band or a shift happens.
    /// Gear 6 never runs the redzone timer.
    pub redzone_start_ms: Option<f64>,
    /// Presentation flag for the perfect-shift flash; expires on its own
    /// after `PERFECT_SHIFT_FLASH_MS`.
    pub perfect_shift_until_ms: Option<f64>,

    /// Manual upgrade levels (+HP per tap / +RPM per tap).
    pub throttle_level: u32,
    pub ecu_level: u32,
    /// Part levels. Absent key = level 0.
    pub parts: BTreeMap<PartKind, u32>,

    /// Secondary currency.
    pub tokens: u32,
    /// Tokens exchanged today; any value > 0 blocks further exchanges
    /// until the calendar day rolls over.
    pub tokens_earned_today: u32,
    /// Calendar day (YYYY-MM-DD) of the daily-limit window.
    pub last_token_date: String,

    /// Unlocked achievement ids. Append-only.
    pub achievements: BTreeSet<String>,
}

impl GameState {
    /// Fresh new-game state.
    pub fn new(now_ms: f64, today: &str) -> Self {
        Self {
            total_hp: BigUint::zero(),
            lifetime_hp_earned: BigUint::zero(),
            current_tier: CarTier::Junker,
            current_rpm: 0,
            current_gear: 1,
            last_observed_ms: now_ms,
            redzone_start_ms: None,
            perfect_shift_until_ms: None,
            throttle_level: 0,
            ecu_level: 0,
            parts: BTreeMap::new(),
            tokens: 0,
            tokens_earned_today: 0,
            last_token_date: today.to_string(),
            achievements: BTreeSet::new(),
        }
    }

    /// Level of a part (0 if never bought).
    pub fn part_level(&self, kind: PartKind) -> u32 {
        self.parts.get(&kind).copied().unwrap_or(0)
    }

    /// Credit earned HP to both the spendable and the lifetime balance.
    pub fn earn(&mut self, amount: &BigUint) {
        self.total_hp += amount;
        self.lifetime_hp_earned += amount;
    }

    /// Debit spendable HP. Caller must have checked affordability.
    pub fn spend(&mut self, amount: &BigUint) {
        debug_assert!(self.total_hp >= *amount);
        self.total_hp -= amount;
    }

    pub fn can_afford(&self, amount: &BigUint) -> bool {
        self.total_hp >= *amount
    }

    /// RPM currently inside the redzone band [REDLINE, MAX_RPM)?
    pub fn is_redlining(&self) -> bool {
        self.current_rpm >= REDLINE && self.current_rpm < MAX_RPM
    }

    /// The tier a successful prestige would move into, if any.
    pub fn next_tier(&self) -> Option<CarTier> {
        self.current_tier.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> GameState {
        GameState::new(0.0, "2026-08-05")
    }

    #[test]
    fn new_game_defaults() {
        let s = fresh();
        assert!(s.total_hp.is_zero());
        assert!(s.lifetime_hp_earned.is_zero());
        assert_eq!(s.current_tier, CarTier::Junker);
        assert_eq!(s.current_rpm, 0);
        assert_eq!(s.current_gear, 1);
        assert!(s.redzone_start_ms.is_none());
        assert!(s.parts.is_empty());
        assert!(s.achievements.is_empty());
        assert_eq!(s.last_token_date, "2026-08-05");
    }

    #[test]
    fn part_level_defaults_to_zero() {
        let mut s = fresh();
        assert_eq!(s.part_level(PartKind::Nitrous), 0);
        s.parts.insert(PartKind::Nitrous, 3);
        assert_eq!(s.part_level(PartKind::Nitrous), 3);
    }

    #[test]
    fn earn_credits_both_balances() {
        let mut s = fresh();
        s.earn(&BigUint::from(500u32));
        assert_eq!(s.total_hp, BigUint::from(500u32));
        assert_eq!(s.lifetime_hp_earned, BigUint::from(500u32));
    }

    #[test]
    fn spend_only_touches_total() {
        let mut s = fresh();
        s.earn(&BigUint::from(500u32));
        s.spend(&BigUint::from(200u32));
        assert_eq!(s.total_hp, BigUint::from(300u32));
        assert_eq!(s.lifetime_hp_earned, BigUint::from(500u32));
    }

    #[test]
    fn redline_band_is_half_open() {
        let mut s = fresh();
        s.current_rpm = REDLINE;
        assert!(s.is_redlining());
        s.current_rpm = MAX_RPM - 1;
        assert!(s.is_redlining());
        s.current_rpm = MAX_RPM;
        assert!(!s.is_redlining());
        s.current_rpm = REDLINE - 1;
        assert!(!s.is_redlining());
    }
}
