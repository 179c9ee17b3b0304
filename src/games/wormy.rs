//! Wormy: classic snake on a 20×20 grid

use std::collections::VecDeque;

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{Direction, DirectionLatch, EdgeMode, Game, GridPos, InputEvent, Session, seeded_rng};

pub const COLS: i32 = 20;
pub const ROWS: i32 = 20;
const CELL: f32 = 20.0;
const START: GridPos = GridPos::new(10, 10);
const FOOD_POINTS: u64 = 10;
const FOODS_PER_LEVEL: u32 = 5;

const COLOR_GRID: Color = Color::hex(0x111111);
const COLOR_HEAD: Color = Color::hex(0x55ff55);
const COLOR_BODY: Color = Color::hex(0x22aa22);
const COLOR_FOOD: Color = Color::hex(0xff5555);

pub struct Wormy {
    rng: Pcg32,
    edges: EdgeMode,
    /// Head first
    body: VecDeque<GridPos>,
    heading: Direction,
    latch: DirectionLatch,
    food: Option<GridPos>,
    eaten: u32,
}

impl Wormy {
    pub fn new(seed: u64, edges: EdgeMode) -> Self {
        let mut game = Self {
            rng: seeded_rng(seed),
            edges,
            body: VecDeque::new(),
            heading: Direction::Right,
            latch: DirectionLatch::default(),
            food: None,
            eaten: 0,
        };
        game.reset_worm();
        game
    }

    pub fn head(&self) -> GridPos {
        self.body.front().copied().unwrap_or(START)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> impl Iterator<Item = &GridPos> {
        self.body.iter()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Option<GridPos> {
        self.food
    }

    /// Put the food on a specific cell
    pub fn place_food(&mut self, pos: GridPos) {
        self.food = Some(pos);
    }

    fn reset_worm(&mut self) {
        self.body.clear();
        self.body.push_back(START);
        self.heading = Direction::Right;
        self.latch.clear();
    }

    fn spawn_food(&mut self) {
        let free: Vec<GridPos> = (0..ROWS)
            .flat_map(|y| (0..COLS).map(move |x| GridPos::new(x, y)))
            .filter(|p| !self.body.contains(p))
            .collect();
        self.food = free.choose(&mut self.rng).copied();
    }

    fn die(&mut self, session: &mut Session) {
        log::debug!("Wormy crashed at {:?}", self.head());
        if !session.lose_life() {
            self.reset_worm();
        }
    }
}

impl Game for Wormy {
    fn kind(&self) -> GameKind {
        GameKind::Wormy
    }

    fn tick_ms(&self, session: &Session) -> u32 {
        let faster = 5 * (session.level() - 1);
        100u32.saturating_sub(faster).max(50)
    }

    fn reset(&mut self, _session: &mut Session) {
        self.eaten = 0;
        self.reset_worm();
        self.spawn_food();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        if let Some(dir) = event.pressed().and_then(|k| k.direction()) {
            self.latch.request(dir);
        }
    }

    fn update(&mut self, session: &mut Session, _dt: f32) {
        if let Some(dir) = self.latch.take() {
            // Reversal onto the body is illegal
            if self.body.len() == 1 || dir != self.heading.opposite() {
                self.heading = dir;
            }
        }

        let mut next = self.head().step(self.heading);
        if !next.in_bounds(COLS, ROWS) {
            match self.edges {
                EdgeMode::Solid => return self.die(session),
                EdgeMode::Wrap => next = next.wrapped(COLS, ROWS),
            }
        }

        let eating = self.food == Some(next);
        // The tail moves out of the way unless the worm is growing
        let blocking = if eating {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        if self.body.iter().take(blocking).any(|p| *p == next) {
            return self.die(session);
        }

        self.body.push_front(next);
        if eating {
            self.eaten += 1;
            session.award(FOOD_POINTS);
            session.sound(SoundEffect::Eat);
            if self.eaten % FOODS_PER_LEVEL == 0 {
                session.set_level(self.eaten / FOODS_PER_LEVEL + 1);
                session.sound(SoundEffect::LevelUp);
                log::debug!("Wormy level {}", session.level());
            }
            self.spawn_food();
            if self.food.is_none() {
                session.end_game("Board Full - You Win");
            }
        } else {
            self.body.pop_back();
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        for i in 0..=COLS {
            let x = i as f32 * CELL;
            frame.rect(Layer::Background, x, 0.0, 1.0, ROWS as f32 * CELL, COLOR_GRID);
        }
        for i in 0..=ROWS {
            let y = i as f32 * CELL;
            frame.rect(Layer::Background, 0.0, y, COLS as f32 * CELL, 1.0, COLOR_GRID);
        }

        if let Some(food) = self.food {
            frame.circle(
                Layer::Collectibles,
                (food.x as f32 + 0.5) * CELL,
                (food.y as f32 + 0.5) * CELL,
                CELL * 0.4,
                COLOR_FOOD,
            );
        }

        for (i, seg) in self.body.iter().enumerate() {
            let color = if i == 0 { COLOR_HEAD } else { COLOR_BODY };
            frame.rect(
                Layer::Player,
                seg.x as f32 * CELL + 1.0,
                seg.y as f32 * CELL + 1.0,
                CELL - 2.0,
                CELL - 2.0,
                color,
            );
        }
    }

    fn clear_input(&mut self) {
        self.latch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, HostEvent, Key, ScoreDisplay};

    fn playing(edges: EdgeMode) -> (Wormy, Session) {
        let mut session = Session::new(Some(3));
        session.begin();
        let mut game = Wormy::new(42, edges);
        game.reset(&mut session);
        session.drain_events();
        (game, session)
    }

    fn press(game: &mut Wormy, key: Key) {
        game.handle_input(&InputEvent::KeyDown(key));
    }

    #[test]
    fn test_eats_food_five_cells_ahead() {
        let (mut game, mut session) = playing(EdgeMode::Solid);
        game.place_food(GridPos::new(15, 10));
        for _ in 0..5 {
            game.update(&mut session, 0.1);
        }
        assert_eq!(game.head(), GridPos::new(15, 10));
        assert_eq!(session.score(), 10);
        assert_eq!(game.len(), 2);
        assert_ne!(game.food(), Some(GridPos::new(15, 10)));
        assert!(session
            .drain_events()
            .contains(&HostEvent::Score(ScoreDisplay::Points(10))));
    }

    #[test]
    fn test_new_food_never_on_worm() {
        let (mut game, mut session) = playing(EdgeMode::Solid);
        for _ in 0..20 {
            let food = game.head().step(game.heading());
            game.place_food(food);
            game.update(&mut session, 0.1);
            if let Some(food) = game.food() {
                assert!(!game.body().any(|p| *p == food));
            }
            if game.head().x >= COLS - 2 {
                break;
            }
        }
    }

    #[test]
    fn test_reversal_ignored_when_long() {
        let (mut game, mut session) = playing(EdgeMode::Solid);
        game.place_food(GridPos::new(11, 10));
        game.update(&mut session, 0.1);
        assert_eq!(game.len(), 2);
        press(&mut game, Key::ArrowLeft);
        game.update(&mut session, 0.1);
        assert_eq!(game.heading(), Direction::Right);
        assert_eq!(game.head(), GridPos::new(12, 10));
    }

    #[test]
    fn test_reversal_allowed_at_length_one() {
        let (mut game, mut session) = playing(EdgeMode::Solid);
        game.place_food(GridPos::new(0, 0));
        press(&mut game, Key::ArrowLeft);
        game.update(&mut session, 0.1);
        assert_eq!(game.head(), GridPos::new(9, 10));
    }

    #[test]
    fn test_wall_costs_life_and_resets() {
        let (mut game, mut session) = playing(EdgeMode::Solid);
        game.place_food(GridPos::new(0, 0));
        for _ in 0..9 {
            game.update(&mut session, 0.1);
        }
        assert_eq!(game.head(), GridPos::new(COLS - 1, 10));
        game.update(&mut session, 0.1);
        assert_eq!(session.lives(), 2);
        assert_eq!(game.head(), START);
        assert_eq!(game.len(), 1);
    }

    #[test]
    fn test_wrap_mode_passes_through() {
        let (mut game, mut session) = playing(EdgeMode::Wrap);
        game.place_food(GridPos::new(0, 0));
        for _ in 0..10 {
            game.update(&mut session, 0.1);
        }
        assert_eq!(game.head(), GridPos::new(0, 10));
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn test_third_crash_is_game_over() {
        let (mut game, mut session) = playing(EdgeMode::Solid);
        game.place_food(GridPos::new(0, 0));
        for _ in 0..33 {
            game.update(&mut session, 0.1);
        }
        assert_eq!(session.lives(), 0);
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_speeds_up_with_level() {
        let mut session = Session::new(Some(3));
        session.begin();
        let game = Wormy::new(1, EdgeMode::Solid);
        assert_eq!(game.tick_ms(&session), 100);
        session.set_level(4);
        assert_eq!(game.tick_ms(&session), 85);
        session.set_level(40);
        assert_eq!(game.tick_ms(&session), 50);
    }
}
