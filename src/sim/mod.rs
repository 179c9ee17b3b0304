//! Deterministic game-loop building blocks
//!
//! Everything here is pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering backends or platform dependencies

pub mod collision;
pub mod game;
pub mod grid;
pub mod input;
pub mod particles;
pub mod session;

pub use collision::{Rect, WallHit, Walls, hit_fraction, reflect_axis, reflect_in_bounds};
pub use game::Game;
pub use grid::{Direction, EdgeMode, GridPos};
pub use input::{DirectionLatch, HoldLatch, InputEvent, Key, PressQueue, Source, TouchPhase};
pub use particles::{Particle, Particles};
pub use session::{GamePhase, HostEvent, ScoreDisplay, Session, Severity};

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Seeded generator every game draws from
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
