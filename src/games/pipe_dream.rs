//! Pipe Dream: rotate pipes until water can flow from start to end

use std::collections::{HashSet, VecDeque};

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{Direction, Game, GridPos, InputEvent, Key, PressQueue, Session, seeded_rng};

pub const GRID: i32 = 8;
const TILE: f32 = 40.0;
const PIPE_CHANCE: f64 = 0.3;
const COMPLETE_POINTS: u64 = 1000;
const START: GridPos = GridPos::new(0, 0);
const END: GridPos = GridPos::new(GRID - 1, GRID - 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeKind {
    Start,
    End,
    Straight,
    Corner,
    Tee,
}

impl PipeKind {
    const RANDOM: [PipeKind; 3] = [PipeKind::Straight, PipeKind::Corner, PipeKind::Tee];

    /// Openings before any rotation
    fn base(&self) -> &'static [Direction] {
        match self {
            PipeKind::Start => &[Direction::Right],
            PipeKind::End => &[Direction::Left],
            PipeKind::Straight => &[Direction::Left, Direction::Right],
            PipeKind::Corner => &[Direction::Left, Direction::Down],
            PipeKind::Tee => &[Direction::Left, Direction::Right, Direction::Down],
        }
    }

    fn is_fixed(&self) -> bool {
        matches!(self, PipeKind::Start | PipeKind::End)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: PipeKind,
    /// Quarter turns clockwise
    pub turns: u8,
}

impl Tile {
    pub fn new(kind: PipeKind, turns: u8) -> Self {
        Self { kind, turns: turns % 4 }
    }

    pub fn opens(&self, dir: Direction) -> bool {
        self.kind.base().iter().any(|base| {
            let mut d = *base;
            for _ in 0..self.turns {
                d = d.clockwise();
            }
            d == dir
        })
    }

    fn rotate(&mut self) {
        self.turns = (self.turns + 1) % 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    RotateAt(GridPos),
    Cursor(Direction),
    RotateCursor,
}

pub struct PipeDream {
    rng: Pcg32,
    tiles: Vec<Option<Tile>>,
    cursor: GridPos,
    time_left_ms: u32,
    commands: PressQueue<Command>,
}

impl PipeDream {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: seeded_rng(seed),
            tiles: vec![None; (GRID * GRID) as usize],
            cursor: START,
            time_left_ms: Self::time_limit_ms(1),
            commands: PressQueue::default(),
        };
        game.build_board();
        game
    }

    /// Countdown for a level: 60 s, 5 s less per level, never under 30 s
    pub fn time_limit_ms(level: u32) -> u32 {
        let secs = 60u32.saturating_sub(level.saturating_sub(1).saturating_mul(5));
        secs.max(30) * 1000
    }

    pub fn time_left_ms(&self) -> u32 {
        self.time_left_ms
    }

    pub fn cursor(&self) -> GridPos {
        self.cursor
    }

    pub fn tile(&self, pos: GridPos) -> Option<Tile> {
        Self::index(pos).and_then(|i| self.tiles[i])
    }

    pub fn set_tile(&mut self, pos: GridPos, tile: Option<Tile>) {
        if let Some(i) = Self::index(pos) {
            self.tiles[i] = tile;
        }
    }

    /// Empty everything except the start and end tiles
    pub fn clear_board(&mut self) {
        self.tiles.fill(None);
        self.set_tile(START, Some(Tile::new(PipeKind::Start, 0)));
        self.set_tile(END, Some(Tile::new(PipeKind::End, 0)));
    }

    fn index(pos: GridPos) -> Option<usize> {
        pos.in_bounds(GRID, GRID)
            .then(|| (pos.y * GRID + pos.x) as usize)
    }

    fn build_board(&mut self) {
        self.clear_board();
        let path = self.carve_path();
        for y in 0..GRID {
            for x in 0..GRID {
                let pos = GridPos::new(x, y);
                if pos == START || pos == END || path.contains(&pos) || !self.rng.random_bool(PIPE_CHANCE) {
                    continue;
                }
                let kind = PipeKind::RANDOM[self.rng.random_range(0..PipeKind::RANDOM.len())];
                self.set_tile(pos, Some(Tile::new(kind, 0)));
            }
        }

        // Never hand out a board that is already solved
        for &pos in &path {
            if !self.is_connected() {
                break;
            }
            if let Some(tile) = Self::index(pos).and_then(|i| self.tiles[i].as_mut()) {
                tile.rotate();
            }
        }
    }

    /// Lay a route from the start tile to the end tile: a shuffled run of
    /// right and down steps, each cell holding a straight or corner pipe at
    /// a random rotation. Returns the cells used.
    fn carve_path(&mut self) -> Vec<GridPos> {
        let first = START.step(Direction::Right);
        let last = END.step(Direction::Left);
        let mut steps: Vec<Direction> = std::iter::repeat_n(Direction::Right, (last.x - first.x) as usize)
            .chain(std::iter::repeat_n(Direction::Down, (last.y - first.y) as usize))
            .collect();
        steps.shuffle(&mut self.rng);

        let mut path = Vec::with_capacity(steps.len() + 1);
        let mut pos = first;
        // Side the water comes in from
        let mut entry = Direction::Left;
        for exit in steps.into_iter().chain(std::iter::once(Direction::Right)) {
            let kind = if exit == entry.opposite() {
                PipeKind::Straight
            } else {
                PipeKind::Corner
            };
            let turns = self.rng.random_range(0..4);
            self.set_tile(pos, Some(Tile::new(kind, turns)));
            path.push(pos);
            pos = pos.step(exit);
            entry = exit.opposite();
        }
        path
    }

    /// Water reaches the end through mutually open neighbours
    pub fn is_connected(&self) -> bool {
        let mut seen = HashSet::from([START]);
        let mut queue = VecDeque::from([START]);
        while let Some(pos) = queue.pop_front() {
            if pos == END {
                return true;
            }
            let Some(tile) = self.tile(pos) else {
                continue;
            };
            for dir in Direction::ALL {
                if !tile.opens(dir) {
                    continue;
                }
                let next = pos.step(dir);
                let joined = self
                    .tile(next)
                    .is_some_and(|t| t.opens(dir.opposite()));
                if joined && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    fn rotate_at(&mut self, pos: GridPos, session: &mut Session) {
        let Some(i) = Self::index(pos) else {
            return;
        };
        let Some(tile) = self.tiles[i].as_mut() else {
            return;
        };
        if tile.kind.is_fixed() {
            return;
        }
        tile.rotate();
        session.sound(SoundEffect::Rotate);

        if self.is_connected() {
            session.award(COMPLETE_POINTS);
            session.complete_level();
            self.time_left_ms = Self::time_limit_ms(session.level());
            log::debug!(
                "Pipe Dream level {}, {} s on the clock",
                session.level(),
                self.time_left_ms / 1000
            );
            self.build_board();
        }
    }
}

impl Game for PipeDream {
    fn kind(&self) -> GameKind {
        GameKind::PipeDream
    }

    fn reset(&mut self, _session: &mut Session) {
        self.time_left_ms = Self::time_limit_ms(1);
        self.cursor = START;
        self.commands.clear();
        self.build_board();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let command = match *event {
            InputEvent::PointerDown { x, y } => {
                let pos = GridPos::new((x / TILE).floor() as i32, (y / TILE).floor() as i32);
                Command::RotateAt(pos)
            }
            _ => match event.pressed() {
                Some(Key::Enter) => Command::RotateCursor,
                Some(key) => match key.direction() {
                    Some(dir) => Command::Cursor(dir),
                    None => return,
                },
                None => return,
            },
        };
        self.commands.push(command);
    }

    fn update(&mut self, session: &mut Session, dt: f32) {
        let commands: Vec<Command> = self.commands.drain().collect();
        for command in commands {
            match command {
                Command::RotateAt(pos) => self.rotate_at(pos, session),
                Command::RotateCursor => self.rotate_at(self.cursor, session),
                Command::Cursor(dir) => {
                    let next = self.cursor.step(dir);
                    if next.in_bounds(GRID, GRID) {
                        self.cursor = next;
                    }
                }
            }
        }

        let dt_ms = (dt * 1000.0).round() as u32;
        self.time_left_ms = self.time_left_ms.saturating_sub(dt_ms);
        if self.time_left_ms == 0 {
            session.end_game("Time's Up");
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        for y in 0..GRID {
            for x in 0..GRID {
                let (px, py) = (x as f32 * TILE, y as f32 * TILE);
                frame.stroke_rect(Layer::Background, px, py, TILE, TILE, Color::hex(0x333333), 1.0);

                let Some(tile) = self.tile(GridPos::new(x, y)) else {
                    continue;
                };
                let color = match tile.kind {
                    PipeKind::Start => Color::hex(0x00ff00),
                    PipeKind::End => Color::hex(0xff0000),
                    _ => Color::hex(0x00aaff),
                };
                let center = Vec2::new(px + TILE / 2.0, py + TILE / 2.0);
                for dir in Direction::ALL.into_iter().filter(|d| tile.opens(*d)) {
                    let (dx, dy) = dir.delta();
                    let edge = center + Vec2::new(dx as f32, dy as f32) * TILE / 2.0;
                    frame.line(Layer::Board, center, edge, color, 8.0);
                }
                frame.circle(Layer::Board, center.x, center.y, 5.0, color);
            }
        }

        let (cx, cy) = (self.cursor.x as f32 * TILE, self.cursor.y as f32 * TILE);
        frame.stroke_rect(Layer::Player, cx + 1.0, cy + 1.0, TILE - 2.0, TILE - 2.0, Color::hex(0xffff00), 2.0);

        let board_right = GRID as f32 * TILE + 20.0;
        frame.text(
            Layer::Board,
            board_right,
            30.0,
            format!("Time: {}s", self.time_left_ms.div_ceil(1000)),
            18.0,
            Color::WHITE,
        );
        frame.text(
            Layer::Board,
            board_right,
            60.0,
            "Click a pipe to rotate it",
            14.0,
            Color::hex(0xcccccc),
        );
    }

    fn clear_input(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    const DT: f32 = 0.1;

    fn playing() -> (PipeDream, Session) {
        let mut session = Session::new(None);
        session.begin();
        let mut game = PipeDream::new(12);
        game.reset(&mut session);
        session.drain_events();
        (game, session)
    }

    /// Down column 1, then along the bottom row. The turn at (1,7) is left
    /// one quarter short.
    fn almost_solved(game: &mut PipeDream) {
        game.clear_board();
        game.set_tile(GridPos::new(1, 0), Some(Tile::new(PipeKind::Corner, 0)));
        for y in 1..GRID - 1 {
            game.set_tile(GridPos::new(1, y), Some(Tile::new(PipeKind::Straight, 1)));
        }
        game.set_tile(GridPos::new(1, GRID - 1), Some(Tile::new(PipeKind::Corner, 1)));
        for x in 2..GRID - 1 {
            game.set_tile(GridPos::new(x, GRID - 1), Some(Tile::new(PipeKind::Straight, 0)));
        }
    }

    fn click(game: &mut PipeDream, pos: GridPos) {
        game.handle_input(&InputEvent::PointerDown {
            x: pos.x as f32 * TILE + 5.0,
            y: pos.y as f32 * TILE + 5.0,
        });
    }

    #[test]
    fn test_rotation_turns_openings_clockwise() {
        let mut corner = Tile::new(PipeKind::Corner, 0);
        assert!(corner.opens(Direction::Left) && corner.opens(Direction::Down));
        corner.rotate();
        assert!(corner.opens(Direction::Up) && corner.opens(Direction::Left));
        assert!(!corner.opens(Direction::Down));
        let tee = Tile::new(PipeKind::Tee, 6);
        assert_eq!(tee.turns, 2);
        assert!(tee.opens(Direction::Up) && tee.opens(Direction::Left) && tee.opens(Direction::Right));
    }

    #[test]
    fn test_board_has_fixed_ends() {
        let game = PipeDream::new(3);
        assert_eq!(game.tile(START).map(|t| t.kind), Some(PipeKind::Start));
        assert_eq!(game.tile(END).map(|t| t.kind), Some(PipeKind::End));
    }

    #[test]
    fn test_connection_needs_reciprocal_openings() {
        let (mut game, _) = playing();
        almost_solved(&mut game);
        assert!(!game.is_connected());
        game.set_tile(GridPos::new(1, GRID - 1), Some(Tile::new(PipeKind::Corner, 2)));
        assert!(game.is_connected());
    }

    #[test]
    fn test_click_completing_path_levels_up() {
        let (mut game, mut session) = playing();
        almost_solved(&mut game);
        click(&mut game, GridPos::new(1, GRID - 1));
        game.update(&mut session, DT);
        assert_eq!(session.score(), 1000);
        assert_eq!(session.level(), 2);
        assert_eq!(game.time_left_ms(), 55_000 - 100);
    }

    #[test]
    fn test_keyboard_cursor_rotates() {
        let (mut game, mut session) = playing();
        game.clear_board();
        game.set_tile(GridPos::new(1, 1), Some(Tile::new(PipeKind::Straight, 0)));
        for key in [Key::ArrowRight, Key::ArrowDown, Key::ArrowUp, Key::ArrowUp, Key::ArrowDown] {
            game.handle_input(&InputEvent::KeyDown(key));
        }
        game.handle_input(&InputEvent::KeyDown(Key::Enter));
        game.update(&mut session, DT);
        assert_eq!(game.cursor(), GridPos::new(1, 1));
        assert_eq!(game.tile(GridPos::new(1, 1)).map(|t| t.turns), Some(1));
    }

    #[test]
    fn test_start_and_empty_tiles_do_not_rotate() {
        let (mut game, mut session) = playing();
        game.clear_board();
        click(&mut game, START);
        click(&mut game, GridPos::new(3, 3));
        game.update(&mut session, DT);
        assert_eq!(game.tile(START), Some(Tile::new(PipeKind::Start, 0)));
        assert_eq!(game.tile(GridPos::new(3, 3)), None);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_clicks_off_board_are_ignored() {
        let (mut game, mut session) = playing();
        game.handle_input(&InputEvent::PointerDown { x: 700.0, y: 10.0 });
        game.update(&mut session, DT);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_countdown_ends_game() {
        let (mut game, mut session) = playing();
        for _ in 0..599 {
            game.update(&mut session, DT);
        }
        assert_eq!(session.phase(), GamePhase::Playing);
        game.update(&mut session, DT);
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    /// Whether some choice of rotations lets water run from start to end
    fn solvable(game: &PipeDream) -> bool {
        fn routes(kind: PipeKind, from: Direction, to: Direction) -> bool {
            (0..4).any(|turns| {
                let tile = Tile::new(kind, turns);
                tile.opens(from) && tile.opens(to)
            })
        }

        fn search(game: &PipeDream, pos: GridPos, entry: Direction, seen: &mut HashSet<GridPos>) -> bool {
            let Some(tile) = game.tile(pos) else {
                return false;
            };
            match tile.kind {
                PipeKind::End => return tile.opens(entry),
                PipeKind::Start => return false,
                _ => {}
            }
            for exit in Direction::ALL {
                if exit == entry || !routes(tile.kind, entry, exit) {
                    continue;
                }
                let next = pos.step(exit);
                if seen.insert(next) {
                    if search(game, next, exit.opposite(), seen) {
                        return true;
                    }
                    seen.remove(&next);
                }
            }
            false
        }

        let first = START.step(Direction::Right);
        let mut seen = HashSet::from([START, first]);
        search(game, first, Direction::Left, &mut seen)
    }

    #[test]
    fn test_every_board_can_be_solved() {
        for seed in 0..300 {
            let game = PipeDream::new(seed);
            assert!(solvable(&game), "seed {seed}");
            assert!(!game.is_connected(), "seed {seed} starts solved");
        }
    }

    #[test]
    fn test_new_level_board_is_solvable() {
        let (mut game, mut session) = playing();
        almost_solved(&mut game);
        click(&mut game, GridPos::new(1, GRID - 1));
        game.update(&mut session, DT);
        assert_eq!(session.level(), 2);
        assert!(solvable(&game));
    }

    #[test]
    fn test_time_limit_shrinks_to_floor() {
        assert_eq!(PipeDream::time_limit_ms(1), 60_000);
        assert_eq!(PipeDream::time_limit_ms(3), 50_000);
        assert_eq!(PipeDream::time_limit_ms(20), 30_000);
    }
}
