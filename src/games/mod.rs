//! The arcade's games, one module each

pub mod block_stack;
pub mod bubble_pop;
pub mod chompy;
pub mod number_defenders;
pub mod paddle_ball;
pub mod pipe_dream;
pub mod road_dash;
pub mod word_defenders;
pub mod wormy;

pub use block_stack::BlockStack;
pub use bubble_pop::BubblePop;
pub use chompy::Chompy;
pub use number_defenders::NumberDefenders;
pub use paddle_ball::PaddleBall;
pub use pipe_dream::PipeDream;
pub use road_dash::RoadDash;
pub use word_defenders::WordDefenders;
pub use wormy::Wormy;

use crate::config::GameKind;
use crate::error::Result;
use crate::settings::Settings;
use crate::sim::Game;

/// Build a fresh game of `kind` with its per-game settings applied
pub fn create(kind: GameKind, settings: &Settings, seed: u64) -> Result<Box<dyn Game>> {
    let game: Box<dyn Game> = match kind {
        GameKind::Chompy => Box::new(Chompy::new(seed)?),
        GameKind::BlockStack => Box::new(BlockStack::new(seed)),
        GameKind::Wormy => Box::new(Wormy::new(seed, settings.wormy_edges)),
        GameKind::BubblePop => Box::new(BubblePop::new()),
        GameKind::RoadDash => Box::new(RoadDash::new(seed)),
        GameKind::PaddleBall => Box::new(PaddleBall::new(seed)),
        GameKind::NumberDefenders => Box::new(NumberDefenders::new(
            seed,
            settings.math_mode,
            settings.math_time_limit_secs,
        )),
        GameKind::WordDefenders => Box::new(WordDefenders::new(seed)),
        GameKind::PipeDream => Box::new(PipeDream::new(seed)),
    };
    Ok(game)
}
