//! Retro Arcade - single-screen arcade games on one shared game loop
//!
//! Core modules:
//! - `sim`: Game-loop building blocks (session state machine, input latches, grid and collision helpers)
//! - `games`: The individual games, each an implementation of [`sim::Game`]
//! - `runner`: Fixed-tick driver that owns scheduling, pause/resume and teardown
//! - `renderer`: Draw-command frames and the surfaces that present them
//! - `host`: The boundary to the page hosting a game (score/lives/status display)
//! - `platform`: Browser glue (scoped listeners, interval timer, Canvas2D)

pub mod audio;
pub mod config;
pub mod error;
pub mod games;
pub mod host;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;

pub use config::{GameConfig, GameKind};
pub use error::{ArcadeError, Result};
pub use host::{Host, RecordingHost};
pub use runner::Runner;
pub use settings::Settings;

/// Game loop constants shared by every game
pub mod consts {
    /// Tick interval for fast action games (ms)
    pub const ACTION_TICK_MS: u32 = 16;
    /// Tick interval for lane/falling games (ms)
    pub const LANE_TICK_MS: u32 = 50;
    /// Tick interval for grid-stepping games (ms)
    pub const GRID_TICK_MS: u32 = 100;
    /// Tick interval for puzzle games (ms)
    pub const PUZZLE_TICK_MS: u32 = 100;

    /// Maximum ticks run for a single `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lives at the start of a session, for games that use lives
    pub const START_LIVES: u32 = 3;

    /// How long "Level N Complete!" stays up (ms)
    pub const LEVEL_BANNER_MS: u32 = 2000;
}

/// Number of whole ticks that fit in `ms` at the given tick interval (at least 1)
#[inline]
pub fn ticks_for_ms(ms: u32, tick_ms: u32) -> u32 {
    (ms / tick_ms.max(1)).max(1)
}
