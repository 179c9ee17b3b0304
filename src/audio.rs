//! Procedural arcade beeps
//!
//! Every effect is a short oscillator tone, optionally a little arpeggio.
//! The tone table is plain data so it is testable natively; only the
//! `AudioManager` that plays it through Web Audio is wasm-only.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundEffect {
    /// Dot, food or brick consumed
    Eat,
    /// Power pellet eaten
    PowerUp,
    /// Frightened ghost eaten
    GhostEaten,
    /// Rows cleared in Block Stack
    LineClear,
    /// Piece locked or hard-dropped
    Drop,
    /// Piece or pipe rotated
    Rotate,
    /// Ball hits a paddle
    PaddleHit,
    /// Ball hits a wall
    WallHit,
    /// Brick popped
    BrickBreak,
    /// Frog hop
    Hop,
    /// Correct answer or letter
    Correct,
    /// Wrong answer
    Wrong,
    /// Point scored in a match
    Point,
    /// Life lost
    LifeLost,
    /// Level complete
    LevelUp,
    /// Game over
    GameOver,
}

/// Oscillator shape, mirrors Web Audio's `OscillatorType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One beep: start frequency, optional glide target, length and loudness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Frequency reached at the end of the tone (exponential glide)
    pub glide_to: Option<f32>,
    /// Seconds
    pub duration: f64,
    pub wave: Wave,
    /// Relative gain (0.0 - 1.0) before master volume
    pub volume: f32,
}

impl Tone {
    const fn beep(freq: f32, duration: f64, wave: Wave, volume: f32) -> Self {
        Self {
            freq,
            glide_to: None,
            duration,
            wave,
            volume,
        }
    }

    const fn glide(freq: f32, to: f32, duration: f64, wave: Wave, volume: f32) -> Self {
        Self {
            freq,
            glide_to: Some(to),
            duration,
            wave,
            volume,
        }
    }
}

impl SoundEffect {
    /// Notes making up the effect
    pub fn tones(&self) -> &'static [Tone] {
        use Wave::*;
        match self {
            SoundEffect::Eat => const { &[Tone::beep(440.0, 0.05, Square, 0.2)] },
            SoundEffect::PowerUp => const { &[Tone::glide(300.0, 900.0, 0.25, Square, 0.25)] },
            SoundEffect::GhostEaten => const {
                &[
                    Tone::beep(600.0, 0.08, Square, 0.25),
                    Tone::beep(900.0, 0.08, Square, 0.25),
                ]
            },
            SoundEffect::LineClear => const {
                &[
                    Tone::beep(523.0, 0.1, Triangle, 0.3),
                    Tone::beep(659.0, 0.1, Triangle, 0.3),
                    Tone::beep(784.0, 0.15, Triangle, 0.3),
                ]
            },
            SoundEffect::Drop => const { &[Tone::glide(150.0, 60.0, 0.1, Sine, 0.5)] },
            SoundEffect::Rotate => const { &[Tone::beep(300.0, 0.05, Triangle, 0.25)] },
            SoundEffect::PaddleHit => const { &[Tone::glide(150.0, 60.0, 0.1, Sine, 0.6)] },
            SoundEffect::WallHit => const { &[Tone::beep(400.0, 0.08, Sine, 0.3)] },
            SoundEffect::BrickBreak => const { &[Tone::beep(800.0, 0.06, Square, 0.25)] },
            SoundEffect::Hop => const { &[Tone::glide(200.0, 600.0, 0.08, Triangle, 0.3)] },
            SoundEffect::Correct => const {
                &[
                    Tone::beep(600.0, 0.1, Sine, 0.25),
                    Tone::beep(800.0, 0.1, Sine, 0.25),
                    Tone::beep(1000.0, 0.15, Sine, 0.25),
                ]
            },
            SoundEffect::Wrong => const { &[Tone::glide(200.0, 100.0, 0.2, Sawtooth, 0.25)] },
            SoundEffect::Point => const { &[Tone::beep(880.0, 0.12, Square, 0.25)] },
            SoundEffect::LifeLost => const { &[Tone::glide(300.0, 40.0, 0.5, Sine, 0.4)] },
            SoundEffect::LevelUp => const {
                &[
                    Tone::beep(400.0, 0.1, Triangle, 0.3),
                    Tone::beep(500.0, 0.1, Triangle, 0.3),
                    Tone::beep(600.0, 0.1, Triangle, 0.3),
                    Tone::beep(800.0, 0.3, Triangle, 0.3),
                ]
            },
            SoundEffect::GameOver => const {
                &[
                    Tone::beep(400.0, 0.2, Sine, 0.3),
                    Tone::beep(350.0, 0.2, Sine, 0.3),
                    Tone::beep(300.0, 0.2, Sine, 0.3),
                    Tone::beep(200.0, 0.3, Sine, 0.3),
                ]
            },
        }
    }

    /// Gap between consecutive notes of an arpeggio (seconds)
    pub fn note_spacing(&self) -> f64 {
        match self {
            SoundEffect::GameOver => 0.2,
            SoundEffect::LevelUp => 0.1,
            _ => 0.08,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};
    use crate::error::{ArcadeError, Result};

    /// Audio manager for the arcade
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(master_volume: f32, muted: bool) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: master_volume.clamp(0.0, 1.0),
                muted,
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.master_volume }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) -> Result<()> {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return Ok(());
            }
            let Some(ctx) = &self.ctx else {
                return Err(ArcadeError::Collaborator("audio disabled".into()));
            };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let spacing = effect.note_spacing();
            for (i, tone) in effect.tones().iter().enumerate() {
                self.play_tone(ctx, tone, vol, i as f64 * spacing)?;
            }
            Ok(())
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32, delay: f64) -> Result<()> {
            let osc_type = match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Triangle => OscillatorType::Triangle,
                Wave::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, osc_type) else {
                return Err(ArcadeError::Collaborator("oscillator creation failed".into()));
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(vol * tone.volume, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
                .ok();
            if let Some(to) = tone.glide_to {
                osc.frequency().set_value_at_time(tone.freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + tone.duration)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration + 0.05).ok();
            Ok(())
        }
    }
}
