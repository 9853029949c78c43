//! Turbo Tycoon - the deterministic engine core of a car-themed idle
//! clicker.
//!
//! Tap to build RPM, earn HP from taps and passive parts, shift gears by
//! hitting the limiter, prestige for permanent multipliers. Everything
//! observable lives in a single `state::GameState`, advanced by the fixed
//! 100 ms tick machine in `logic` and funneled through the single-writer
//! facade in `game`. Rendering, storage transport and the
//! server-authoritative variant are external collaborators speaking the
//! interfaces in `audio`, `save` and `protocol`.

pub mod achievements;
pub mod audio;
pub mod config;
pub mod economy;
pub mod game;
pub mod logic;
pub mod offline;
pub mod protocol;
pub mod save;
pub mod state;
pub mod time;

mod simulator;

pub use game::TurboGame;
pub use logic::RejectReason;
pub use offline::OfflineEarnings;
pub use state::GameState;

/// Install the wasm platform hooks: panic messages and `log` output go to
/// the browser console. Call once before constructing a `TurboGame`.
#[cfg(target_arch = "wasm32")]
pub fn init_platform() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
