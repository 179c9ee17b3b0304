//! Static per-game configuration
//!
//! One entry per game: canvas size, control schemes and the base tick
//! interval the runner schedules the game at.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ArcadeError;

/// Every game the crate ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Chompy,
    BlockStack,
    Wormy,
    BubblePop,
    RoadDash,
    PaddleBall,
    NumberDefenders,
    WordDefenders,
    PipeDream,
}

impl GameKind {
    pub const ALL: [GameKind; 9] = [
        GameKind::Chompy,
        GameKind::BlockStack,
        GameKind::Wormy,
        GameKind::BubblePop,
        GameKind::RoadDash,
        GameKind::PaddleBall,
        GameKind::NumberDefenders,
        GameKind::WordDefenders,
        GameKind::PipeDream,
    ];

    /// Page id used by the host
    pub fn id(&self) -> &'static str {
        self.config().id
    }

    pub fn config(&self) -> &'static GameConfig {
        match self {
            GameKind::Chompy => &CHOMPY,
            GameKind::BlockStack => &BLOCK_STACK,
            GameKind::Wormy => &WORMY,
            GameKind::BubblePop => &BUBBLE_POP,
            GameKind::RoadDash => &ROAD_DASH,
            GameKind::PaddleBall => &PADDLE_BALL,
            GameKind::NumberDefenders => &NUMBER_DEFENDERS,
            GameKind::WordDefenders => &WORD_DEFENDERS,
            GameKind::PipeDream => &PIPE_DREAM,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GameKind {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        GameKind::ALL
            .iter()
            .copied()
            .find(|k| k.id() == wanted)
            .ok_or_else(|| ArcadeError::UnknownGame(s.to_string()))
    }
}

/// How a game can be controlled (shown by the host next to the canvas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlScheme {
    ArrowKeys,
    WasdArrows,
    Mouse,
    Keyboard,
    Touch,
}

/// Static configuration for one game
#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub controls: &'static [ControlScheme],
    /// Base tick interval in milliseconds (a game may shorten it as levels rise)
    pub tick_ms: u32,
    /// Whether the host should show a lives counter
    pub shows_lives: bool,
}

static CHOMPY: GameConfig = GameConfig {
    id: "chompy",
    title: "Chompy",
    description: "Navigate through mazes, eat dots, and avoid ghosts.",
    canvas_width: 560,
    canvas_height: 640,
    controls: &[ControlScheme::ArrowKeys, ControlScheme::Touch],
    tick_ms: 125,
    shows_lives: true,
};

static BLOCK_STACK: GameConfig = GameConfig {
    id: "block-stack",
    title: "Block Stack",
    description: "Stack falling blocks to create complete lines.",
    canvas_width: 240,
    canvas_height: 480,
    controls: &[ControlScheme::ArrowKeys, ControlScheme::Touch],
    tick_ms: LANE_TICK_MS,
    shows_lives: false,
};

static WORMY: GameConfig = GameConfig {
    id: "wormy",
    title: "Wormy",
    description: "Control a growing worm, eat food, and avoid hitting walls or yourself.",
    canvas_width: 400,
    canvas_height: 400,
    controls: &[ControlScheme::ArrowKeys, ControlScheme::Touch],
    tick_ms: GRID_TICK_MS,
    shows_lives: true,
};

static BUBBLE_POP: GameConfig = GameConfig {
    id: "bubble-pop",
    title: "Bubble Pop",
    description: "Bounce the ball off your paddle and pop every brick.",
    canvas_width: 960,
    canvas_height: 480,
    controls: &[ControlScheme::ArrowKeys, ControlScheme::Mouse, ControlScheme::Touch],
    tick_ms: ACTION_TICK_MS,
    shows_lives: true,
};

static ROAD_DASH: GameConfig = GameConfig {
    id: "road-dash",
    title: "Road Dash",
    description: "Help the frog cross the road safely.",
    canvas_width: 400,
    canvas_height: 600,
    controls: &[ControlScheme::ArrowKeys, ControlScheme::Touch],
    tick_ms: LANE_TICK_MS,
    shows_lives: true,
};

static PADDLE_BALL: GameConfig = GameConfig {
    id: "paddle-ball",
    title: "Paddle Ball",
    description: "The classic two-player table tennis game.",
    canvas_width: 800,
    canvas_height: 400,
    controls: &[ControlScheme::WasdArrows, ControlScheme::Touch],
    tick_ms: ACTION_TICK_MS,
    shows_lives: false,
};

static NUMBER_DEFENDERS: GameConfig = GameConfig {
    id: "number-defenders",
    title: "Number Defenders",
    description: "Solve math problems before they reach your base.",
    canvas_width: 800,
    canvas_height: 600,
    controls: &[ControlScheme::Keyboard, ControlScheme::Touch],
    tick_ms: LANE_TICK_MS,
    shows_lives: true,
};

static WORD_DEFENDERS: GameConfig = GameConfig {
    id: "word-defenders",
    title: "Word Defenders",
    description: "Spell the word before its letters hit the ground.",
    canvas_width: 800,
    canvas_height: 600,
    controls: &[ControlScheme::Keyboard, ControlScheme::Touch],
    tick_ms: LANE_TICK_MS,
    shows_lives: true,
};

static PIPE_DREAM: GameConfig = GameConfig {
    id: "pipe-dream",
    title: "Pipe Dream",
    description: "Rotate pipes to connect the source to the drain before time runs out.",
    canvas_width: 800,
    canvas_height: 600,
    controls: &[ControlScheme::Mouse, ControlScheme::ArrowKeys, ControlScheme::Touch],
    tick_ms: PUZZLE_TICK_MS,
    shows_lives: false,
};
