//! `TurboGame` - the single-writer facade over the whole simulation.
//!
//! The engine tick, the rev handler, purchases and the periodic
//! side-tasks (achievement sweep, autosave, daily reset) all mutate one
//! `GameState`. Instead of ad hoc concurrent timers, every mutation
//! funnels through `&mut self` here, and the side-tasks run on tick-count
//! cadences inside `advance` - so no two operations ever interleave
//! partially, and a save always reads a consistent snapshot.
//!
//! The host drives this with two calls: `advance(now, today)` on its
//! timer/frame callback, and the action methods on user input. When
//! `take_save_due()` reports true the host persists the state (the flag
//! also trips immediately on prestige, which must not wait for the next
//! autosave window, and on suspend).

use num_bigint::BigUint;

use crate::achievements::{self, ToastQueue};
use crate::audio::{AudioSink, NullSink};
use crate::config::{
    ManualUpgrade, PartKind, TokenPackage, ACHIEVEMENT_SWEEP_TICKS, AUTOSAVE_TICKS,
    DAILY_RESET_CHECK_TICKS,
};
use crate::economy;
use crate::logic::{self, RejectReason, RevOutcome};
use crate::offline::{self, OfflineEarnings};
use crate::state::GameState;
use crate::time::TickClock;

/// Haptic pulse length for one rev, in ms.
const REV_VIBRATION_MS: u32 = 10;

pub struct TurboGame {
    pub state: GameState,
    clock: TickClock,
    audio: Box<dyn AudioSink>,
    pub toasts: ToastQueue,
    /// Cached passive rate, refreshed every tick; feeds the achievement
    /// sweep and the HUD.
    hp_per_second: f64,
    save_due: bool,
}

impl TurboGame {
    /// Start a brand new game.
    pub fn new(now_ms: f64, today: &str, audio: Box<dyn AudioSink>) -> Self {
        Self::with_state(GameState::new(now_ms, today), today, audio)
    }

    /// Resume from a restored state. Reconciles offline earnings first
    /// and hands them back for the "welcome back" screen, then runs the
    /// initial daily-reset check before the tick loop starts.
    pub fn resume(
        state: GameState,
        now_ms: f64,
        today: &str,
        audio: Box<dyn AudioSink>,
    ) -> (Self, Option<OfflineEarnings>) {
        let mut state = state;
        let earnings = offline::reconcile(&mut state, now_ms);
        if let Some(e) = &earnings {
            log::info!(
                "offline earnings: +{} HP over {}",
                economy::format_hp(&e.earned),
                e.time_away()
            );
        }
        let game = Self::with_state(state, today, audio);
        (game, earnings)
    }

    fn with_state(mut state: GameState, today: &str, audio: Box<dyn AudioSink>) -> Self {
        logic::daily_reset(&mut state, today);
        let hp_per_second = economy::passive_income(&state);
        Self {
            state,
            clock: TickClock::new(),
            audio,
            toasts: ToastQueue::new(),
            hp_per_second,
            save_due: false,
        }
    }

    /// Test/headless constructor with a muted sink.
    pub fn headless(now_ms: f64, today: &str) -> Self {
        Self::new(now_ms, today, Box::new(NullSink))
    }

    /// Drive the simulation up to `now_ms`. Processes every whole tick
    /// the accumulator yields, then the toast display loop.
    pub fn advance(&mut self, now_ms: f64, today: &str) {
        let ticks = self.clock.update(now_ms);
        for _ in 0..ticks {
            let cues = logic::tick(&mut self.state, now_ms);
            for cue in cues {
                self.audio.play(cue);
            }
            self.hp_per_second = economy::passive_income(&self.state);

            let count = self.clock.total_ticks;
            if count % ACHIEVEMENT_SWEEP_TICKS == 0 {
                achievements::sweep(&mut self.state, self.hp_per_second, &mut self.toasts);
            }
            if count % DAILY_RESET_CHECK_TICKS == 0 {
                logic::daily_reset(&mut self.state, today);
            }
            if count % AUTOSAVE_TICKS == 0 {
                self.save_due = true;
            }
        }
        self.toasts.advance(now_ms);
    }

    /// One player tap. Haptics and cues fire and forget; the state commit
    /// never waits on them.
    pub fn rev(&mut self, now_ms: f64) -> RevOutcome {
        self.audio.vibrate(REV_VIBRATION_MS);
        let outcome = logic::rev(&mut self.state, now_ms);
        for cue in &outcome.cues {
            self.audio.play(*cue);
        }
        outcome
    }

    pub fn buy_part(&mut self, kind: PartKind) -> Result<(), RejectReason> {
        logic::buy_part(&mut self.state, kind)
    }

    pub fn buy_manual_upgrade(&mut self, which: ManualUpgrade) -> Result<(), RejectReason> {
        logic::buy_manual_upgrade(&mut self.state, which)
    }

    pub fn buy_tokens(&mut self, pkg: &TokenPackage) -> Result<(), RejectReason> {
        logic::buy_tokens(&mut self.state, pkg)
    }

    /// Prestige discards purchasable progress, so it must be persisted
    /// immediately - the flag trips without waiting for the autosave
    /// cadence.
    pub fn prestige(&mut self, now_ms: f64) -> Result<(), RejectReason> {
        logic::prestige(&mut self.state, now_ms)?;
        log::info!("prestiged into {}", self.state.current_tier.name());
        self.save_due = true;
        Ok(())
    }

    /// Session is being suspended (tab hidden, app backgrounded): request
    /// an immediate save.
    pub fn suspend(&mut self) {
        self.save_due = true;
    }

    /// True once per save window; the host persists when it sees true.
    pub fn take_save_due(&mut self) -> bool {
        std::mem::take(&mut self.save_due)
    }

    /// Current passive rate for the HUD.
    pub fn hp_per_second(&self) -> f64 {
        self.hp_per_second
    }

    /// Formatted spendable balance for the HUD.
    pub fn formatted_hp(&self) -> String {
        economy::format_hp(&self.state.total_hp)
    }

    /// Progress toward the next tier in [0, 100], or 100 at the top.
    pub fn prestige_progress_percent(&self) -> u8 {
        match self.state.next_tier() {
            None => 100,
            Some(next) => {
                let required = BigUint::from(next.required_lifetime_hp());
                let scaled = &self.state.lifetime_hp_earned * 100u32 / required;
                scaled.min(BigUint::from(100u32)).try_into().unwrap_or(100)
            }
        }
    }
}
