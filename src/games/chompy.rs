//! Chompy: maze chase
//!
//! The maze comes from a text template, one row per line:
//! `#` wall, `.` dot, `o` power pellet, `P` player start, `G` ghost start,
//! `-` ghost-house door, ` ` empty. Rows whose edge cells are both open are
//! tunnels: leaving one side enters from the other.

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::error::{ArcadeError, Result};
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{Direction, DirectionLatch, Game, GridPos, InputEvent, Session, seeded_rng};

pub const MAZE: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "      .   # GGGG #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

const TILE: f32 = 20.0;
const DOT_POINTS: u64 = 10;
const PELLET_POINTS: u64 = 50;
const GHOST_POINTS: u64 = 200;
const LEVEL_POINTS: u64 = 1000;
const MODE_DURATION_MS: u32 = 7000;
const MIN_MODE_DURATION_MS: u32 = 3000;
const FRIGHTENED_MS: u32 = 6000;

const COLOR_WALL: Color = Color::hex(0x2121ff);
const COLOR_DOOR: Color = Color::hex(0xffb8de);
const COLOR_DOT: Color = Color::hex(0xffff00);
const COLOR_PLAYER: Color = Color::hex(0xffff00);
const COLOR_FRIGHTENED: Color = Color::hex(0x2121ff);
const GHOST_COLORS: [u32; 4] = [0xff0000, 0xffb8ff, 0x00ffff, 0xffb852];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Door,
    Dot,
    Pellet,
    Empty,
}

/// Parsed maze with its consumables
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    tunnels: Vec<bool>,
    player_start: GridPos,
    ghost_starts: Vec<GridPos>,
    /// Cell just outside the ghost-house door
    ghost_exit: Option<GridPos>,
}

impl Board {
    pub fn parse(template: &[&str]) -> Result<Board> {
        let width = template.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ArcadeError::Board {
                row: 0,
                reason: "empty template".into(),
            });
        }

        let mut tiles = Vec::with_capacity(width * template.len());
        let mut player_start = None;
        let mut ghost_starts = Vec::new();
        let mut doors = Vec::new();

        for (y, line) in template.iter().enumerate() {
            if line.chars().count() != width {
                return Err(ArcadeError::Board {
                    row: y,
                    reason: format!("width {} != {}", line.chars().count(), width),
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let pos = GridPos::new(x as i32, y as i32);
                let tile = match ch {
                    '#' => Tile::Wall,
                    '-' => {
                        doors.push(pos);
                        Tile::Door
                    }
                    '.' => Tile::Dot,
                    'o' => Tile::Pellet,
                    ' ' => Tile::Empty,
                    'P' => {
                        if player_start.replace(pos).is_some() {
                            return Err(ArcadeError::Board {
                                row: y,
                                reason: "second player start".into(),
                            });
                        }
                        Tile::Empty
                    }
                    'G' => {
                        ghost_starts.push(pos);
                        Tile::Empty
                    }
                    other => {
                        return Err(ArcadeError::Board {
                            row: y,
                            reason: format!("unknown tile {other:?} at column {x}"),
                        });
                    }
                };
                tiles.push(tile);
            }
        }

        let player_start = player_start.ok_or_else(|| ArcadeError::Board {
            row: template.len(),
            reason: "no player start".into(),
        })?;
        let width = width as i32;
        let tunnels = (0..template.len())
            .map(|y| {
                let row = &tiles[y * width as usize..(y + 1) * width as usize];
                row[0] != Tile::Wall && row[width as usize - 1] != Tile::Wall
            })
            .collect();

        Ok(Board {
            width,
            height: template.len() as i32,
            tiles,
            tunnels,
            player_start,
            ghost_starts,
            ghost_exit: doors.first().map(|d| d.step(Direction::Up)),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn player_start(&self) -> GridPos {
        self.player_start
    }

    pub fn ghost_starts(&self) -> &[GridPos] {
        &self.ghost_starts
    }

    pub fn tile(&self, pos: GridPos) -> Tile {
        if !pos.in_bounds(self.width, self.height) {
            return Tile::Wall;
        }
        self.tiles[(pos.y * self.width + pos.x) as usize]
    }

    pub fn is_tunnel(&self, row: i32) -> bool {
        usize::try_from(row)
            .ok()
            .and_then(|r| self.tunnels.get(r))
            .copied()
            .unwrap_or(false)
    }

    /// Neighbour in `dir` if it can be entered (doors only when `through_doors`)
    pub fn step(&self, pos: GridPos, dir: Direction, through_doors: bool) -> Option<GridPos> {
        let mut next = pos.step(dir);
        if (next.x < 0 || next.x >= self.width) && self.is_tunnel(next.y) {
            next = next.wrapped(self.width, self.height);
        }
        match self.tile(next) {
            Tile::Wall => None,
            Tile::Door if !through_doors => None,
            _ => Some(next),
        }
    }

    /// Consume a dot or pellet
    pub fn take(&mut self, pos: GridPos) -> Option<Tile> {
        if !pos.in_bounds(self.width, self.height) {
            return None;
        }
        let tile = &mut self.tiles[(pos.y * self.width + pos.x) as usize];
        match *tile {
            Tile::Dot | Tile::Pellet => Some(std::mem::replace(tile, Tile::Empty)),
            _ => None,
        }
    }

    /// Dots and pellets left
    pub fn remaining(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| matches!(t, Tile::Dot | Tile::Pellet))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened,
}

#[derive(Debug, Clone)]
pub struct Ghost {
    pub pos: GridPos,
    pub dir: Direction,
    home: GridPos,
    corner: GridPos,
    color: Color,
    /// Still heading out of the ghost house
    leaving: bool,
}

impl Ghost {
    fn respawn(&mut self) {
        self.pos = self.home;
        self.dir = Direction::Up;
        self.leaving = true;
    }
}

pub struct Chompy {
    rng: Pcg32,
    template: Board,
    board: Board,
    player: GridPos,
    heading: Direction,
    latch: DirectionLatch,
    ghosts: Vec<Ghost>,
    /// Scatter or chase; frightened overrides it while `frightened_ms > 0`
    base_mode: GhostMode,
    mode_ms: u32,
    mode_duration_ms: u32,
    frightened_ms: u32,
    ticks: u64,
}

impl Chompy {
    pub fn new(seed: u64) -> Result<Self> {
        Self::with_template(seed, &MAZE)
    }

    pub fn with_template(seed: u64, template: &[&str]) -> Result<Self> {
        let board = Board::parse(template)?;
        let (w, h) = (board.width(), board.height());
        let corners = [
            GridPos::new(w - 2, 1),
            GridPos::new(1, 1),
            GridPos::new(w - 2, h - 2),
            GridPos::new(1, h - 2),
        ];
        let ghosts = board
            .ghost_starts()
            .iter()
            .enumerate()
            .map(|(i, &home)| Ghost {
                pos: home,
                dir: Direction::Up,
                home,
                corner: corners[i % corners.len()],
                color: Color::hex(GHOST_COLORS[i % GHOST_COLORS.len()]),
                leaving: board.ghost_exit.is_some(),
            })
            .collect();

        Ok(Self {
            rng: seeded_rng(seed),
            player: board.player_start(),
            template: board.clone(),
            board,
            heading: Direction::Left,
            latch: DirectionLatch::default(),
            ghosts,
            base_mode: GhostMode::Scatter,
            mode_ms: 0,
            mode_duration_ms: MODE_DURATION_MS,
            frightened_ms: 0,
            ticks: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> GridPos {
        self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn mode(&self) -> GhostMode {
        if self.frightened_ms > 0 {
            GhostMode::Frightened
        } else {
            self.base_mode
        }
    }

    pub fn mode_duration_ms(&self) -> u32 {
        self.mode_duration_ms
    }

    /// Move a ghost to a cell
    pub fn place_ghost(&mut self, index: usize, pos: GridPos, dir: Direction) {
        if let Some(ghost) = self.ghosts.get_mut(index) {
            ghost.pos = pos;
            ghost.dir = dir;
            ghost.leaving = false;
        }
    }

    /// Eat everything but the dot at `keep`
    pub fn clear_board_except(&mut self, keep: GridPos) {
        for y in 0..self.board.height() {
            for x in 0..self.board.width() {
                let pos = GridPos::new(x, y);
                if pos != keep {
                    self.board.take(pos);
                }
            }
        }
    }

    fn reset_positions(&mut self) {
        self.player = self.board.player_start();
        self.heading = Direction::Left;
        self.latch.clear();
        for ghost in &mut self.ghosts {
            ghost.respawn();
            ghost.leaving = self.board.ghost_exit.is_some();
        }
    }

    fn update_mode(&mut self, dt_ms: u32) {
        if self.frightened_ms > 0 {
            self.frightened_ms = self.frightened_ms.saturating_sub(dt_ms);
            return;
        }
        self.mode_ms += dt_ms;
        if self.mode_ms >= self.mode_duration_ms {
            self.mode_ms = 0;
            self.base_mode = match self.base_mode {
                GhostMode::Scatter => GhostMode::Chase,
                _ => GhostMode::Scatter,
            };
            for ghost in &mut self.ghosts {
                ghost.dir = ghost.dir.opposite();
            }
            log::debug!("Ghosts switch to {:?}", self.base_mode);
        }
    }

    fn move_player(&mut self) {
        if let Some(want) = self.latch.peek() {
            if self.board.step(self.player, want, false).is_some() {
                self.heading = want;
                self.latch.clear();
            }
        }
        if let Some(next) = self.board.step(self.player, self.heading, false) {
            self.player = next;
        }
    }

    fn eat(&mut self, session: &mut Session) {
        match self.board.take(self.player) {
            Some(Tile::Dot) => {
                session.award(DOT_POINTS);
                session.sound(SoundEffect::Eat);
            }
            Some(Tile::Pellet) => {
                session.award(PELLET_POINTS);
                session.sound(SoundEffect::PowerUp);
                self.frightened_ms = FRIGHTENED_MS;
                for ghost in &mut self.ghosts {
                    ghost.dir = ghost.dir.opposite();
                }
            }
            _ => {}
        }
    }

    fn move_ghosts(&mut self) {
        let mode = self.mode();
        // Frightened ghosts move at half speed
        if mode == GhostMode::Frightened && self.ticks % 2 == 1 {
            return;
        }
        let exit = self.board.ghost_exit;
        for ghost in &mut self.ghosts {
            let through_doors = ghost.leaving;
            let mut options: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| *d != ghost.dir.opposite())
                .filter(|d| self.board.step(ghost.pos, *d, through_doors).is_some())
                .collect();
            if options.is_empty() {
                // Dead end: the only time a ghost turns back
                options.push(ghost.dir.opposite());
            }

            let target = match (ghost.leaving, exit, mode) {
                (true, Some(exit), _) => Some(exit),
                (_, _, GhostMode::Chase) => Some(self.player),
                (_, _, GhostMode::Scatter) => Some(ghost.corner),
                (_, _, GhostMode::Frightened) => None,
            };
            let choice = match target {
                Some(target) => options.iter().copied().min_by_key(|d| {
                    ghost
                        .pos
                        .step(*d)
                        .wrapped(self.board.width(), self.board.height())
                        .dist_sq(target)
                }),
                None => options.choose(&mut self.rng).copied(),
            };

            if let Some(dir) = choice {
                if let Some(next) = self.board.step(ghost.pos, dir, through_doors) {
                    ghost.dir = dir;
                    ghost.pos = next;
                }
            }
            if ghost.leaving && Some(ghost.pos) == exit {
                ghost.leaving = false;
            }
        }
    }

    /// Resolve player/ghost contacts. Checked after the player moves and
    /// again after the ghosts move, so a swap of cells is always caught.
    /// Returns true when the player was caught.
    fn resolve_contacts(&mut self, session: &mut Session) -> bool {
        let frightened = self.mode() == GhostMode::Frightened;
        for i in 0..self.ghosts.len() {
            if self.ghosts[i].pos != self.player {
                continue;
            }
            if frightened {
                session.award(GHOST_POINTS);
                session.sound(SoundEffect::GhostEaten);
                self.ghosts[i].respawn();
            } else {
                log::debug!("Caught by ghost {i}");
                if !session.lose_life() {
                    self.reset_positions();
                }
                return true;
            }
        }
        false
    }

    fn level_complete(&mut self, session: &mut Session) {
        session.award(LEVEL_POINTS);
        session.complete_level();
        self.mode_duration_ms = self
            .mode_duration_ms
            .saturating_sub(500)
            .max(MIN_MODE_DURATION_MS);
        self.board = self.template.clone();
        self.mode_ms = 0;
        self.frightened_ms = 0;
        self.base_mode = GhostMode::Scatter;
        self.reset_positions();
        log::debug!("Chompy level {} ({} ms modes)", session.level(), self.mode_duration_ms);
    }
}

impl Game for Chompy {
    fn kind(&self) -> GameKind {
        GameKind::Chompy
    }

    fn reset(&mut self, _session: &mut Session) {
        self.board = self.template.clone();
        self.base_mode = GhostMode::Scatter;
        self.mode_ms = 0;
        self.mode_duration_ms = MODE_DURATION_MS;
        self.frightened_ms = 0;
        self.ticks = 0;
        self.reset_positions();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        if let Some(dir) = event.pressed().and_then(|k| k.direction()) {
            self.latch.request(dir);
        }
    }

    fn update(&mut self, session: &mut Session, dt: f32) {
        let dt_ms = (dt * 1000.0).round() as u32;
        self.ticks += 1;
        self.update_mode(dt_ms);

        self.move_player();
        self.eat(session);
        if self.resolve_contacts(session) {
            return;
        }
        self.move_ghosts();
        if self.resolve_contacts(session) {
            return;
        }

        if session.is_playing() && self.board.remaining() == 0 {
            self.level_complete(session);
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        let center = |p: GridPos| ((p.x as f32 + 0.5) * TILE, (p.y as f32 + 0.5) * TILE);

        for y in 0..self.board.height() {
            for x in 0..self.board.width() {
                let pos = GridPos::new(x, y);
                let (px, py) = (x as f32 * TILE, y as f32 * TILE);
                match self.board.tile(pos) {
                    Tile::Wall => frame.rect(Layer::Board, px, py, TILE, TILE, COLOR_WALL),
                    Tile::Door => frame.rect(Layer::Board, px, py + TILE * 0.4, TILE, TILE * 0.2, COLOR_DOOR),
                    Tile::Dot => {
                        let (cx, cy) = center(pos);
                        frame.circle(Layer::Collectibles, cx, cy, 2.0, COLOR_DOT);
                    }
                    Tile::Pellet => {
                        let (cx, cy) = center(pos);
                        frame.circle(Layer::Collectibles, cx, cy, 6.0, COLOR_DOT);
                    }
                    Tile::Empty => {}
                }
            }
        }

        let frightened = self.mode() == GhostMode::Frightened;
        for ghost in &self.ghosts {
            let (cx, cy) = center(ghost.pos);
            let color = if frightened { COLOR_FRIGHTENED } else { ghost.color };
            frame.circle(Layer::Entities, cx, cy, TILE / 2.0 - 2.0, color);
            frame.circle(Layer::Entities, cx - 4.0, cy - 2.0, 2.0, Color::WHITE);
            frame.circle(Layer::Entities, cx + 4.0, cy - 2.0, 2.0, Color::WHITE);
        }

        let (cx, cy) = center(self.player);
        frame.circle(Layer::Player, cx, cy, TILE / 2.0 - 2.0, COLOR_PLAYER);

        let mode = match self.mode() {
            GhostMode::Scatter => "scatter",
            GhostMode::Chase => "chase",
            GhostMode::Frightened => "frightened",
        };
        let y = self.board.height() as f32 * TILE + 14.0;
        frame.text(Layer::Board, 10.0, y, format!("Mode: {mode}"), 14.0, Color::WHITE);
    }

    fn clear_input(&mut self) {
        self.latch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, Key};

    const DT: f32 = 0.125;

    fn playing() -> (Chompy, Session) {
        let mut session = Session::new(Some(3));
        session.begin();
        let mut game = Chompy::new(9).unwrap();
        game.reset(&mut session);
        session.drain_events();
        (game, session)
    }

    fn press(game: &mut Chompy, key: Key) {
        game.handle_input(&InputEvent::KeyDown(key));
    }

    #[test]
    fn test_template_is_well_formed() {
        let board = Board::parse(&MAZE).unwrap();
        assert_eq!((board.width(), board.height()), (28, 31));
        assert_eq!(board.ghost_starts().len(), 4);
        assert_eq!(board.player_start(), GridPos::new(13, 23));
        assert!(board.is_tunnel(14));
        assert!(!board.is_tunnel(1));
    }

    #[test]
    fn test_every_dot_reachable() {
        let board = Board::parse(&MAZE).unwrap();
        let mut seen = vec![board.player_start()];
        let mut queue = std::collections::VecDeque::from([board.player_start()]);
        while let Some(pos) = queue.pop_front() {
            for dir in Direction::ALL {
                if let Some(next) = board.step(pos, dir, false) {
                    if !seen.contains(&next) {
                        seen.push(next);
                        queue.push_back(next);
                    }
                }
            }
        }
        for y in 0..board.height() {
            for x in 0..board.width() {
                let pos = GridPos::new(x, y);
                if matches!(board.tile(pos), Tile::Dot | Tile::Pellet) {
                    assert!(seen.contains(&pos), "unreachable {pos:?}");
                }
            }
        }
    }

    #[test]
    fn test_malformed_templates_rejected() {
        let ragged = Board::parse(&["####", "#P.", "####"]).unwrap_err();
        assert!(matches!(ragged, ArcadeError::Board { row: 1, .. }));
        let no_player = Board::parse(&["###", "#.#", "###"]).unwrap_err();
        assert!(matches!(no_player, ArcadeError::Board { .. }));
        let unknown = Board::parse(&["###", "#P?", "###"]).unwrap_err();
        assert!(matches!(unknown, ArcadeError::Board { row: 1, .. }));
        assert!(Board::parse(&[]).is_err());
    }

    #[test]
    fn test_dot_eaten_once() {
        let (mut game, mut session) = playing();
        let before = game.board().remaining();
        press(&mut game, Key::ArrowLeft);
        game.update(&mut session, DT);
        assert_eq!(game.player(), GridPos::new(12, 23));
        assert_eq!(session.score(), 10);
        assert_eq!(game.board().remaining(), before - 1);

        press(&mut game, Key::ArrowRight);
        game.update(&mut session, DT);
        press(&mut game, Key::ArrowLeft);
        game.update(&mut session, DT);
        assert_eq!(game.player(), GridPos::new(12, 23));
        assert_eq!(session.score(), 10);
        assert_eq!(game.board().remaining(), before - 1);
    }

    #[test]
    fn test_wall_blocks_player() {
        let (mut game, mut session) = playing();
        // Above the start is wall
        game.heading = Direction::Up;
        game.update(&mut session, DT);
        assert_eq!(game.player(), GridPos::new(13, 23));
    }

    #[test]
    fn test_requested_turn_waits_for_opening() {
        let (mut game, mut session) = playing();
        // Heading left along row 23; up opens at column 12
        press(&mut game, Key::ArrowUp);
        game.update(&mut session, DT);
        assert_eq!(game.player(), GridPos::new(12, 23));
        game.update(&mut session, DT);
        assert_eq!(game.player(), GridPos::new(12, 22));
    }

    #[test]
    fn test_tunnel_wraps() {
        let board = Board::parse(&MAZE).unwrap();
        assert_eq!(
            board.step(GridPos::new(0, 14), Direction::Left, false),
            Some(GridPos::new(27, 14))
        );
        assert_eq!(board.step(GridPos::new(1, 1), Direction::Left, false), None);
    }

    #[test]
    fn test_door_only_for_leaving_ghosts() {
        let board = Board::parse(&MAZE).unwrap();
        let below_door = GridPos::new(13, 13);
        assert_eq!(board.step(below_door, Direction::Up, false), None);
        assert_eq!(
            board.step(below_door, Direction::Up, true),
            Some(GridPos::new(13, 12))
        );
    }

    #[test]
    fn test_ghosts_leave_house() {
        let (mut game, mut session) = playing();
        for _ in 0..8 {
            game.update(&mut session, DT);
        }
        assert!(game.ghosts().iter().all(|g| g.pos.y < 13 || !g.leaving));
        assert!(game.ghosts().iter().any(|g| !g.leaving));
    }

    #[test]
    fn test_ghost_contact_costs_life() {
        let (mut game, mut session) = playing();
        game.place_ghost(0, GridPos::new(12, 23), Direction::Right);
        press(&mut game, Key::ArrowLeft);
        game.update(&mut session, DT);
        assert_eq!(session.lives(), 2);
        assert_eq!(game.player(), GridPos::new(13, 23));
    }

    #[test]
    fn test_frightened_ghost_is_eaten() {
        let (mut game, mut session) = playing();
        game.frightened_ms = FRIGHTENED_MS;
        game.place_ghost(0, GridPos::new(11, 23), Direction::Right);
        press(&mut game, Key::ArrowLeft);
        game.update(&mut session, DT);
        game.update(&mut session, DT);
        assert_eq!(session.lives(), 3);
        assert!(session.score() >= GHOST_POINTS);
        assert!(game.ghosts()[0].leaving);
    }

    #[test]
    fn test_mode_swaps_and_reverses() {
        let (mut game, _session) = playing();
        let dirs: Vec<Direction> = game.ghosts().iter().map(|g| g.dir).collect();
        game.update_mode(MODE_DURATION_MS);
        assert_eq!(game.mode(), GhostMode::Chase);
        for (ghost, before) in game.ghosts().iter().zip(dirs) {
            assert_eq!(ghost.dir, before.opposite());
        }
    }

    #[test]
    fn test_level_complete() {
        let (mut game, mut session) = playing();
        game.clear_board_except(GridPos::new(12, 23));
        press(&mut game, Key::ArrowLeft);
        game.update(&mut session, DT);
        assert_eq!(session.level(), 2);
        assert_eq!(session.score(), 10 + LEVEL_POINTS);
        assert_eq!(game.mode_duration_ms(), 6500);
        assert_eq!(game.board().remaining(), Board::parse(&MAZE).unwrap().remaining());
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_mode_duration_floor() {
        let (mut game, mut session) = playing();
        for _ in 0..12 {
            game.clear_board_except(game.board().player_start().step(Direction::Left));
            game.player = game.board().player_start();
            press(&mut game, Key::ArrowLeft);
            game.update(&mut session, DT);
        }
        assert_eq!(game.mode_duration_ms(), MIN_MODE_DURATION_MS);
    }
}
