//! Block Stack: falling tetrominoes on a 10×20 well

use rand::Rng;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{Game, InputEvent, Key, PressQueue, Session, seeded_rng};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
const BLOCK: f32 = 24.0;
const LINE_SCORES: [u64; 4] = [1, 3, 5, 8];
const LINES_PER_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    fn shape(&self) -> Vec<Vec<bool>> {
        let rows: &[&[u8]] = match self {
            PieceKind::I => &[&[1, 1, 1, 1]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        rows.iter()
            .map(|r| r.iter().map(|c| *c == 1).collect())
            .collect()
    }

    fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::hex(0x00f0f0),
            PieceKind::O => Color::hex(0xf0f000),
            PieceKind::T => Color::hex(0xa000f0),
            PieceKind::S => Color::hex(0x00f000),
            PieceKind::Z => Color::hex(0xf00000),
            PieceKind::J => Color::hex(0x0000f0),
            PieceKind::L => Color::hex(0xf0a000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Piece {
    pub kind: PieceKind,
    shape: Vec<Vec<bool>>,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    fn spawn(kind: PieceKind) -> Self {
        let shape = kind.shape();
        let width = shape[0].len() as i32;
        Self {
            kind,
            shape,
            x: COLS as i32 / 2 - width / 2,
            y: 0,
        }
    }

    /// Occupied cells at an offset
    fn cells(&self, dx: i32, dy: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (self.x + c as i32 + dx, self.y + r as i32 + dy))
        })
    }

    /// Cells the piece covers where it stands
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells(0, 0)
    }

    fn rotated_cw(&self) -> Piece {
        let rows = self.shape.len();
        let cols = self.shape[0].len();
        let shape = (0..cols)
            .map(|i| (0..rows).map(|j| self.shape[rows - 1 - j][i]).collect())
            .collect();
        Piece {
            shape,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Left,
    Right,
    Down,
    Rotate,
    HardDrop,
}

type Well = [[Option<PieceKind>; COLS]; ROWS];

pub struct BlockStack {
    rng: Pcg32,
    well: Well,
    current: Piece,
    next: PieceKind,
    presses: PressQueue<Action>,
    lines: u32,
    gravity_ms: u32,
}

impl BlockStack {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let current = Piece::spawn(Self::random_kind(&mut rng));
        let next = Self::random_kind(&mut rng);
        Self {
            rng,
            well: [[None; COLS]; ROWS],
            current,
            next,
            presses: PressQueue::default(),
            lines: 0,
            gravity_ms: 0,
        }
    }

    fn random_kind(rng: &mut Pcg32) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())]
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<PieceKind> {
        self.well.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Replace the falling piece
    pub fn set_current(&mut self, kind: PieceKind) {
        self.current = Piece::spawn(kind);
    }

    /// Lock garbage into row `y`, leaving the listed columns open
    pub fn fill_row(&mut self, y: usize, open: &[usize]) {
        for x in 0..COLS {
            self.well[y][x] = (!open.contains(&x)).then_some(PieceKind::O);
        }
    }

    /// Gravity interval for a level
    pub fn drop_interval_ms(level: u32) -> u32 {
        1000u32
            .saturating_sub(level.saturating_sub(1).saturating_mul(50))
            .max(100)
    }

    fn fits(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece.cells(dx, dy).all(|(x, y)| {
            x >= 0
                && x < COLS as i32
                && y < ROWS as i32
                && (y < 0 || self.well[y as usize][x as usize].is_none())
        })
    }

    fn shift(&mut self, dx: i32, dy: i32) -> bool {
        if self.fits(&self.current, dx, dy) {
            self.current.x += dx;
            self.current.y += dy;
            true
        } else {
            false
        }
    }

    /// Move down one row, locking the piece when it cannot
    fn fall(&mut self, session: &mut Session) -> bool {
        if self.shift(0, 1) {
            return true;
        }
        self.lock(session);
        false
    }

    fn lock(&mut self, session: &mut Session) {
        let kind = self.current.kind;
        let cells: Vec<(i32, i32)> = self.current.cells(0, 0).collect();
        for (x, y) in cells {
            if y >= 0 {
                self.well[y as usize][x as usize] = Some(kind);
            }
        }
        session.sound(SoundEffect::Drop);
        self.clear_lines(session);
        self.spawn(session);
    }

    fn clear_lines(&mut self, session: &mut Session) {
        let kept: Vec<[Option<PieceKind>; COLS]> = self
            .well
            .iter()
            .filter(|row| row.iter().any(|c| c.is_none()))
            .copied()
            .collect();
        let cleared = ROWS - kept.len();
        if cleared == 0 {
            return;
        }

        let mut well = [[None; COLS]; ROWS];
        well[cleared..].copy_from_slice(&kept);
        self.well = well;

        // Score at the level the lines were cleared on
        let base = 100 * LINE_SCORES[cleared.min(4) - 1];
        session.award(base * session.level() as u64);
        session.sound(SoundEffect::LineClear);

        self.lines += cleared as u32;
        let level = self.lines / LINES_PER_LEVEL + 1;
        if level > session.level() {
            session.set_level(level);
            log::debug!("Block Stack level {level}, drop every {} ms", Self::drop_interval_ms(level));
        }
    }

    fn spawn(&mut self, session: &mut Session) {
        self.current = Piece::spawn(self.next);
        self.next = Self::random_kind(&mut self.rng);
        self.gravity_ms = 0;
        if !self.fits(&self.current, 0, 0) {
            session.end_game("Stack Overflow");
        }
    }

    fn apply(&mut self, action: Action, session: &mut Session) {
        match action {
            Action::Left => {
                self.shift(-1, 0);
            }
            Action::Right => {
                self.shift(1, 0);
            }
            Action::Down => {
                self.fall(session);
            }
            Action::Rotate => {
                let rotated = self.current.rotated_cw();
                if self.fits(&rotated, 0, 0) {
                    self.current = rotated;
                    session.sound(SoundEffect::Rotate);
                }
            }
            Action::HardDrop => while self.fall(session) {},
        }
    }

    fn draw_block(frame: &mut Frame, layer: Layer, x: f32, y: f32, size: f32, color: Color) {
        frame.rect(layer, x, y, size - 1.0, size - 1.0, color);
    }
}

impl Game for BlockStack {
    fn kind(&self) -> GameKind {
        GameKind::BlockStack
    }

    fn space_pauses(&self) -> bool {
        false
    }

    fn reset(&mut self, _session: &mut Session) {
        self.well = [[None; COLS]; ROWS];
        self.lines = 0;
        self.gravity_ms = 0;
        self.presses.clear();
        self.current = Piece::spawn(Self::random_kind(&mut self.rng));
        self.next = Self::random_kind(&mut self.rng);
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let action = match event.pressed() {
            Some(Key::ArrowLeft) => Action::Left,
            Some(Key::ArrowRight) => Action::Right,
            Some(Key::ArrowDown) => Action::Down,
            Some(Key::ArrowUp | Key::Char('z')) => Action::Rotate,
            Some(Key::Space) => Action::HardDrop,
            _ => return,
        };
        self.presses.push(action);
    }

    fn update(&mut self, session: &mut Session, dt: f32) {
        let presses: Vec<Action> = self.presses.drain().collect();
        for action in presses {
            if !session.is_playing() {
                return;
            }
            self.apply(action, session);
        }

        self.gravity_ms += (dt * 1000.0).round() as u32;
        if self.gravity_ms >= Self::drop_interval_ms(session.level()) && session.is_playing() {
            self.gravity_ms = 0;
            self.fall(session);
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        for y in 0..ROWS {
            for x in 0..COLS {
                let (px, py) = (x as f32 * BLOCK, y as f32 * BLOCK);
                match self.well[y][x] {
                    Some(kind) => Self::draw_block(frame, Layer::Board, px, py, BLOCK, kind.color()),
                    None => frame.stroke_rect(Layer::Background, px, py, BLOCK, BLOCK, Color::hex(0x222222), 1.0),
                }
            }
        }

        let color = self.current.kind.color();
        for (x, y) in self.current.cells(0, 0).filter(|(_, y)| *y >= 0) {
            Self::draw_block(frame, Layer::Player, x as f32 * BLOCK, y as f32 * BLOCK, BLOCK, color);
        }

        // Next-piece preview, top right
        let preview = Piece::spawn(self.next);
        let mini = BLOCK / 2.0;
        let origin_x = COLS as f32 * BLOCK - 4.0 * mini - 6.0;
        frame.text(Layer::Entities, origin_x, 12.0, "NEXT", 10.0, Color::WHITE);
        for (x, y) in preview.cells(-preview.x, 0) {
            Self::draw_block(
                frame,
                Layer::Entities,
                origin_x + x as f32 * mini,
                18.0 + y as f32 * mini,
                mini,
                self.next.color().with_alpha(200),
            );
        }
    }

    fn clear_input(&mut self) {
        self.presses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, HostEvent};

    const DT: f32 = 0.05;

    fn playing() -> (BlockStack, Session) {
        let mut session = Session::new(None);
        session.begin();
        let mut game = BlockStack::new(3);
        game.reset(&mut session);
        session.drain_events();
        (game, session)
    }

    fn press(game: &mut BlockStack, key: Key) {
        game.handle_input(&InputEvent::KeyDown(key));
    }

    #[test]
    fn test_spawns_centered() {
        let piece = Piece::spawn(PieceKind::I);
        assert_eq!((piece.x, piece.y), (3, 0));
        let piece = Piece::spawn(PieceKind::T);
        assert_eq!(piece.x, 4);
    }

    #[test]
    fn test_single_line_clear() {
        let (mut game, mut session) = playing();
        game.fill_row(ROWS - 1, &[3, 4, 5, 6]);
        game.set_current(PieceKind::I);
        press(&mut game, Key::Space);
        game.update(&mut session, DT);
        assert_eq!(session.score(), 100);
        assert_eq!(game.lines(), 1);
        // Bottom row is empty again
        assert!((0..COLS).all(|x| game.cell(x, ROWS - 1).is_none()));
    }

    #[test]
    fn test_four_lines_with_vertical_bar() {
        let (mut game, mut session) = playing();
        for y in ROWS - 4..ROWS {
            game.fill_row(y, &[0]);
        }
        game.set_current(PieceKind::I);
        press(&mut game, Key::ArrowUp);
        for _ in 0..3 {
            press(&mut game, Key::ArrowLeft);
        }
        press(&mut game, Key::Space);
        game.update(&mut session, DT);
        assert_eq!(game.lines(), 4);
        assert_eq!(session.score(), 800);
        assert!((0..ROWS).all(|y| (0..COLS).all(|x| game.cell(x, y).is_none())));
    }

    #[test]
    fn test_rotation_blocked_by_wall() {
        let (mut game, mut session) = playing();
        game.set_current(PieceKind::I);
        press(&mut game, Key::ArrowUp);
        for _ in 0..6 {
            press(&mut game, Key::ArrowRight);
        }
        game.update(&mut session, DT);
        assert_eq!(game.current().x, 9);
        // Horizontal again would poke out of the right wall
        press(&mut game, Key::Char('z'));
        game.update(&mut session, DT);
        assert_eq!(game.current().cells(0, 0).count(), 4);
        assert!(game.current().cells(0, 0).all(|(x, _)| x == 9));
    }

    #[test]
    fn test_moves_stop_at_walls() {
        let (mut game, mut session) = playing();
        game.set_current(PieceKind::O);
        for _ in 0..10 {
            press(&mut game, Key::ArrowLeft);
        }
        game.update(&mut session, DT);
        assert_eq!(game.current().x, 0);
    }

    #[test]
    fn test_gravity_interval() {
        let (mut game, mut session) = playing();
        game.set_current(PieceKind::O);
        for _ in 0..19 {
            game.update(&mut session, DT);
        }
        assert_eq!(game.current().y, 0);
        game.update(&mut session, DT);
        assert_eq!(game.current().y, 1);
        assert_eq!(BlockStack::drop_interval_ms(5), 800);
        assert_eq!(BlockStack::drop_interval_ms(30), 100);
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let (mut game, mut session) = playing();
        for y in 0..2 {
            game.fill_row(y, &[0]);
        }
        game.spawn(&mut session);
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_level_from_lines() {
        let (mut game, mut session) = playing();
        game.lines = 9;
        game.fill_row(ROWS - 1, &[3, 4, 5, 6]);
        game.set_current(PieceKind::I);
        press(&mut game, Key::Space);
        game.update(&mut session, DT);
        assert_eq!(session.level(), 2);
        assert!(session.drain_events().contains(&HostEvent::Level(2)));
    }
}
