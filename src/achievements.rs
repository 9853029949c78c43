//! Achievement evaluation and toast sequencing.
//!
//! Conditions are declarative descriptors (threshold kind + comparison
//! value) evaluated generically against `(state, hp_per_second)`, so the
//! table in `config` stays plain data. Unlocks are append-only: an id is
//! evaluated only while missing from the unlocked set, and its token
//! reward is credited exactly once, ever.

use std::collections::VecDeque;

use num_bigint::BigUint;

use crate::config::{self, TOAST_HOLD_MS};
use crate::state::GameState;

/// One achievement definition. `id` is the stable key used in saves.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub reward_tokens: u32,
    pub condition: Condition,
}

/// Declarative unlock predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Cumulative lifetime HP reached the threshold.
    LifetimeHpAtLeast(u64),
    /// Currently driving in this exact gear.
    GearReached(u8),
    /// Prestige tier index reached the threshold.
    TierAtLeast(u8),
    /// Passive rate reached the threshold (unused by the current table,
    /// but part of the `(state, hp_per_second)` evaluation contract).
    HpPerSecondAtLeast(u64),
}

impl Condition {
    pub fn is_met(&self, state: &GameState, hp_per_second: f64) -> bool {
        match self {
            Condition::LifetimeHpAtLeast(threshold) => {
                state.lifetime_hp_earned >= BigUint::from(*threshold)
            }
            Condition::GearReached(gear) => state.current_gear == *gear,
            Condition::TierAtLeast(tier) => state.current_tier.index() >= *tier,
            Condition::HpPerSecondAtLeast(threshold) => hp_per_second >= *threshold as f64,
        }
    }
}

/// Look up a definition by id (e.g. to render a toast).
pub fn achievement_by_id(id: &str) -> Option<&'static AchievementDef> {
    config::ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Evaluate every locked achievement and apply new unlocks: append the id,
/// credit the token reward, enqueue a toast. Already-unlocked ids are
/// skipped before their condition is even evaluated.
pub fn sweep(state: &mut GameState, hp_per_second: f64, toasts: &mut ToastQueue) {
    for def in config::ACHIEVEMENTS {
        if state.achievements.contains(def.id) {
            continue;
        }
        if def.condition.is_met(state, hp_per_second) {
            state.achievements.insert(def.id.to_string());
            state.tokens += def.reward_tokens;
            toasts.enqueue(def.id);
        }
    }
}

/// Strictly sequential toast display: at most one achievement is current
/// at a time; the next is dequeued only after the hold time vacates the
/// slot.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: VecDeque<&'static str>,
    current: Option<(&'static str, f64)>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, id: &'static str) {
        self.pending.push_back(id);
    }

    /// Advance the display loop: vacate an expired toast, then promote the
    /// next pending one if the slot is free.
    pub fn advance(&mut self, now_ms: f64) {
        if let Some((_, shown_at)) = self.current {
            if now_ms - shown_at >= TOAST_HOLD_MS {
                self.current = None;
            }
        }
        if self.current.is_none() {
            if let Some(next) = self.pending.pop_front() {
                self.current = Some((next, now_ms));
            }
        }
    }

    /// The achievement currently on screen, if any.
    pub fn current(&self) -> Option<&'static AchievementDef> {
        self.current.and_then(|(id, _)| achievement_by_id(id))
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
