//! The contract every game implements
//!
//! The [`crate::Runner`] owns scheduling, the phase machine and reporting;
//! a game only knows how to reset itself, latch input, advance one tick and
//! draw itself.

use super::input::InputEvent;
use super::session::Session;
use crate::config::GameKind;
use crate::renderer::Frame;

pub trait Game {
    fn kind(&self) -> GameKind;

    /// Whether Space toggles pause while playing (games that use Space for
    /// gameplay return false)
    fn space_pauses(&self) -> bool {
        true
    }

    /// Whether letter keys are gameplay (typing games), so P does not pause
    fn letter_input(&self) -> bool {
        false
    }

    /// Current tick interval; games that speed up with level override this
    fn tick_ms(&self, _session: &Session) -> u32 {
        self.kind().config().tick_ms
    }

    /// Rebuild the board and entities for a fresh run. Called after the
    /// session has been reset.
    fn reset(&mut self, session: &mut Session);

    /// Record an input into the game's latch. Never mutates game state
    /// directly; the next `update` resolves it.
    fn handle_input(&mut self, event: &InputEvent);

    /// Advance one fixed tick of `dt` seconds. Only called while playing.
    fn update(&mut self, session: &mut Session, dt: f32);

    /// Draw the full current state
    fn render(&self, session: &Session, frame: &mut Frame);

    /// Drop any latched input (on pause and restart)
    fn clear_input(&mut self);
}
