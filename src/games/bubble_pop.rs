//! Bubble Pop: breakout on a 48×24 cell field

use glam::Vec2;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::consts::ACTION_TICK_MS;
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{
    Game, HoldLatch, InputEvent, Key, Rect, Session, Walls, hit_fraction, reflect_in_bounds,
};
use crate::ticks_for_ms;

const SCALE: f32 = 20.0;
pub const COLS: f32 = 48.0;
pub const ROWS: f32 = 24.0;

pub const PADDLE_WIDTH: f32 = 6.0;
const PADDLE_SPEED: f32 = 0.5;
const BALL_SIZE: f32 = 1.0;
const BALL_VEL: Vec2 = Vec2::new(0.15, -0.15);
const SPEEDUP: f32 = 1.1;
const RESPAWN_MS: u32 = 1000;

const BRICK_ROWS: usize = 6;
const BRICK_COLS: usize = 10;
const BRICK_POINTS: u64 = 10;
const BRICK_COLORS: [Color; BRICK_ROWS] = [
    Color::hex(0xff0000),
    Color::hex(0xff8000),
    Color::hex(0xffff00),
    Color::hex(0x00ff00),
    Color::hex(0x00ffff),
    Color::hex(0xff00ff),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Nudge {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Brick {
    pub rect: Rect,
    color: Color,
}

pub struct BubblePop {
    paddle_x: f32,
    ball: Vec2,
    vel: Vec2,
    /// Multiplier on the serve velocity, grows per cleared wall
    speed: f32,
    bricks: Vec<Brick>,
    held: HoldLatch<Nudge>,
    pointer_x: Option<f32>,
    respawn_in: Option<u32>,
}

impl Default for BubblePop {
    fn default() -> Self {
        Self::new()
    }
}

impl BubblePop {
    pub fn new() -> Self {
        let mut game = Self {
            paddle_x: Self::paddle_home(),
            ball: Vec2::ZERO,
            vel: Vec2::ZERO,
            speed: 1.0,
            bricks: Vec::with_capacity(BRICK_ROWS * BRICK_COLS),
            held: HoldLatch::default(),
            pointer_x: None,
            respawn_in: None,
        };
        game.build_wall();
        game.serve();
        game
    }

    fn paddle_home() -> f32 {
        (COLS / 2.0 - PADDLE_WIDTH / 2.0).floor()
    }

    pub fn paddle_y() -> f32 {
        ROWS - 2.0
    }

    pub fn paddle_x(&self) -> f32 {
        self.paddle_x
    }

    pub fn ball(&self) -> Vec2 {
        self.ball
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn_in.is_some()
    }

    /// Put the ball somewhere specific
    pub fn place_ball(&mut self, pos: Vec2, vel: Vec2) {
        self.ball = pos;
        self.vel = vel;
        self.respawn_in = None;
    }

    /// Keep only the first `n` bricks
    pub fn keep_bricks(&mut self, n: usize) {
        self.bricks.truncate(n);
    }

    fn build_wall(&mut self) {
        self.bricks.clear();
        for (r, color) in BRICK_COLORS.iter().enumerate() {
            for c in 0..BRICK_COLS {
                self.bricks.push(Brick {
                    rect: Rect::new(2.0 + c as f32 * 4.0, 2.0 + r as f32 * 2.0, 3.0, 1.0),
                    color: *color,
                });
            }
        }
    }

    fn serve(&mut self) {
        self.ball = Vec2::new(COLS / 2.0, ROWS - 3.0);
        self.vel = BALL_VEL * self.speed;
        self.respawn_in = None;
    }

    fn move_paddle(&mut self) {
        if let Some(x) = self.pointer_x.take() {
            self.paddle_x = x / SCALE - PADDLE_WIDTH / 2.0;
        }
        if self.held.is_held(Nudge::Left) {
            self.paddle_x -= PADDLE_SPEED;
        }
        if self.held.is_held(Nudge::Right) {
            self.paddle_x += PADDLE_SPEED;
        }
        self.paddle_x = self.paddle_x.clamp(0.0, COLS - PADDLE_WIDTH);
    }

    fn hit_paddle(&mut self, session: &mut Session) {
        let on_paddle = self.ball.y + BALL_SIZE >= Self::paddle_y()
            && self.ball.y <= Self::paddle_y() + 1.0
            && self.ball.x >= self.paddle_x
            && self.ball.x < self.paddle_x + PADDLE_WIDTH;
        if on_paddle && self.vel.y > 0.0 {
            self.vel.y = -self.vel.y;
            let hit = hit_fraction(self.ball.x, self.paddle_x, PADDLE_WIDTH);
            self.vel.x = (hit - 0.5) * 0.3;
            session.sound(SoundEffect::PaddleHit);
        }
    }

    fn hit_bricks(&mut self, session: &mut Session) {
        let ball = Rect::new(self.ball.x, self.ball.y, BALL_SIZE, BALL_SIZE);
        // One brick per tick
        if let Some(i) = self.bricks.iter().position(|b| b.rect.overlaps(&ball)) {
            self.bricks.remove(i);
            self.vel.y = -self.vel.y;
            session.award(BRICK_POINTS);
            session.sound(SoundEffect::BrickBreak);
        }

        if self.bricks.is_empty() {
            self.speed *= SPEEDUP;
            session.complete_level();
            log::debug!("Bubble Pop wall cleared, ball speed x{:.2}", self.speed);
            self.build_wall();
            self.serve();
        }
    }
}

impl Game for BubblePop {
    fn kind(&self) -> GameKind {
        GameKind::BubblePop
    }

    fn reset(&mut self, _session: &mut Session) {
        self.speed = 1.0;
        self.paddle_x = Self::paddle_home();
        self.held.clear();
        self.pointer_x = None;
        self.build_wall();
        self.serve();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        if let InputEvent::PointerMove { x, .. } | InputEvent::PointerDown { x, .. } = *event {
            self.pointer_x = Some(x);
            return;
        }
        let nudge = |key: Key| match key {
            Key::ArrowLeft => Some(Nudge::Left),
            Key::ArrowRight => Some(Nudge::Right),
            _ => None,
        };
        if let Some(n) = event.pressed().and_then(nudge) {
            self.held.press(n, event.source());
        } else if let Some(n) = event.released().and_then(nudge) {
            self.held.release(n, event.source());
        }
    }

    fn update(&mut self, session: &mut Session, _dt: f32) {
        self.move_paddle();

        if let Some(left) = self.respawn_in {
            if left <= 1 {
                self.serve();
            } else {
                self.respawn_in = Some(left - 1);
            }
            return;
        }

        self.ball += self.vel;
        let hit = reflect_in_bounds(
            &mut self.ball,
            &mut self.vel,
            Vec2::ZERO,
            Vec2::new(COLS - BALL_SIZE, ROWS),
            Walls::OPEN_FLOOR,
        );
        if hit.bounced {
            session.sound(SoundEffect::WallHit);
        }
        if hit.escaped {
            log::debug!("Bubble Pop ball lost at x={:.1}", self.ball.x);
            if !session.lose_life() {
                self.respawn_in = Some(ticks_for_ms(RESPAWN_MS, ACTION_TICK_MS));
            }
            return;
        }

        self.hit_paddle(session);
        self.hit_bricks(session);
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        for brick in &self.bricks {
            let (min, size) = (brick.rect.min() * SCALE, brick.rect.size * SCALE);
            frame.rect(Layer::Board, min.x, min.y, size.x, size.y, brick.color);
            frame.stroke_rect(Layer::Board, min.x, min.y, size.x, size.y, Color::WHITE, 1.0);
        }

        frame.rect(
            Layer::Player,
            self.paddle_x * SCALE,
            Self::paddle_y() * SCALE,
            PADDLE_WIDTH * SCALE,
            SCALE,
            Color::WHITE,
        );

        if !self.is_respawning() {
            let r = BALL_SIZE * SCALE / 2.0;
            frame.circle(
                Layer::Entities,
                self.ball.x * SCALE + r,
                self.ball.y * SCALE + r,
                r,
                Color::hex(0xffff66),
            );
        }
    }

    fn clear_input(&mut self) {
        self.held.clear();
        self.pointer_x = None;
    }
}
