//! Audio and haptic collaborator contract.
//!
//! The simulation fires cues and never waits on them: a missing or broken
//! audio subsystem must never block or corrupt a state mutation, so every
//! failure path here logs and returns. Sounds are synthesized procedurally
//! with the Web Audio API - no asset files needed.

/// Shift cues the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Gear up via the safety shift - mechanical clunk.
    Upshift,
    /// Gear down - rev-match blip.
    Downshift,
    /// Tapped exactly into the limiter - satisfying chime.
    PerfectShift,
}

/// Fire-and-forget sink for audio/haptic feedback.
pub trait AudioSink {
    fn play(&self, cue: Cue);
    fn vibrate(&self, duration_ms: u32);
}

/// Sink that swallows everything. Default for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, _cue: Cue) {}
    fn vibrate(&self, _duration_ms: u32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AudioSink, Cue};
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    /// Web Audio backed sink. Construction may fail outside a secure
    /// context; the sink then degrades to silence.
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume a suspended context. Browsers suspend audio until the
        /// first user gesture; call this from the rev handler path.
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(osc_type);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some((osc, gain))
        }

        /// High-to-low sawtooth: RPM dropping plus the heavy gear thud.
        fn play_upshift(&self, ctx: &AudioContext) {
            let Some((osc, gain)) = Self::create_osc(ctx, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();
            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(100.0, t + 0.25)
                .ok();
            gain.gain().set_value_at_time(0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Low-to-high triangle: the engine spinning up to match the
        /// lower gear.
        fn play_downshift(&self, ctx: &AudioContext) {
            let Some((osc, gain)) = Self::create_osc(ctx, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(350.0, t + 0.3)
                .ok();
            gain.gain().set_value_at_time(0.2, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(0.25, t + 0.2)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// A5 sweeping up an octave - the reward chime.
        fn play_perfect_shift(&self, ctx: &AudioContext) {
            let Some((osc, gain)) = Self::create_osc(ctx, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();
            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1760.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }
    }

    impl AudioSink for WebAudioSink {
        fn play(&self, cue: Cue) {
            let Some(ctx) = &self.ctx else { return };
            self.resume();
            match cue {
                Cue::Upshift => self.play_upshift(ctx),
                Cue::Downshift => self.play_downshift(ctx),
                Cue::PerfectShift => self.play_perfect_shift(ctx),
            }
        }

        fn vibrate(&self, duration_ms: u32) {
            let Some(window) = web_sys::window() else {
                return;
            };
            // Some browsers expose no vibration hardware; the call just
            // returns false there.
            let _ = window.navigator().vibrate_with_duration(duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_is_inert() {
        let sink = NullSink;
        sink.play(Cue::Upshift);
        sink.play(Cue::Downshift);
        sink.play(Cue::PerfectShift);
        sink.vibrate(10);
    }

    #[test]
    fn sink_is_object_safe() {
        let sink: Box<dyn AudioSink> = Box::new(NullSink);
        sink.play(Cue::PerfectShift);
    }
}
