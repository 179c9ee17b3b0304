//! Paddle Ball: two-player pong, first to 11

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{
    Game, HoldLatch, InputEvent, Key, Rect, ScoreDisplay, Session, Walls, hit_fraction,
    reflect_in_bounds, seeded_rng,
};

const SCALE: f32 = 20.0;
pub const COLS: f32 = 40.0;
pub const ROWS: f32 = 20.0;

pub const PADDLE_HEIGHT: f32 = 4.0;
const PADDLE_SPEED: f32 = 0.5;
const BALL_SIZE: f32 = 1.0;
const SERVE_DX: f32 = 0.3;
const SERVE_DY: f32 = 0.2;
pub const WINNING_SCORE: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Stick {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn paddle_x(&self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => COLS - 2.0,
        }
    }
}

pub struct PaddleBall {
    rng: Pcg32,
    left_y: f32,
    right_y: f32,
    ball: Vec2,
    vel: Vec2,
    points: [u32; 2],
    held: HoldLatch<Stick>,
    reset_requested: bool,
}

impl PaddleBall {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: seeded_rng(seed),
            left_y: Self::paddle_home(),
            right_y: Self::paddle_home(),
            ball: Vec2::ZERO,
            vel: Vec2::ZERO,
            points: [0; 2],
            held: HoldLatch::default(),
            reset_requested: false,
        };
        game.serve();
        game
    }

    fn paddle_home() -> f32 {
        (ROWS / 2.0).floor()
    }

    pub fn paddle_y(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left_y,
            Side::Right => self.right_y,
        }
    }

    pub fn ball(&self) -> Vec2 {
        self.ball
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    /// Match score as (left, right)
    pub fn points(&self) -> (u32, u32) {
        (self.points[0], self.points[1])
    }

    pub fn place_ball(&mut self, pos: Vec2, vel: Vec2) {
        self.ball = pos;
        self.vel = vel;
    }

    pub fn set_points(&mut self, left: u32, right: u32) {
        self.points = [left, right];
    }

    fn paddle_rect(&self, side: Side) -> Rect {
        Rect::new(side.paddle_x(), self.paddle_y(side), 1.0, PADDLE_HEIGHT)
    }

    fn serve(&mut self) {
        self.ball = Vec2::new(COLS / 2.0, ROWS / 2.0);
        let sx = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(sx * SERVE_DX, sy * SERVE_DY);
    }

    fn reset_match(&mut self, session: &mut Session) {
        self.points = [0; 2];
        self.left_y = Self::paddle_home();
        self.right_y = Self::paddle_home();
        session.reset_score(ScoreDisplay::Versus { left: 0, right: 0 });
        self.serve();
    }

    fn move_paddles(&mut self) {
        let max = ROWS - PADDLE_HEIGHT;
        let step = |held: &HoldLatch<Stick>, up, down, y: f32| {
            let mut y = y;
            if held.is_held(up) {
                y -= PADDLE_SPEED;
            }
            if held.is_held(down) {
                y += PADDLE_SPEED;
            }
            y.clamp(0.0, max)
        };
        self.left_y = step(&self.held, Stick::LeftUp, Stick::LeftDown, self.left_y);
        self.right_y = step(&self.held, Stick::RightUp, Stick::RightDown, self.right_y);
    }

    /// Touching counts as a hit, but only when the ball is heading at the paddle
    fn return_ball(&mut self, side: Side, session: &mut Session) {
        let paddle = self.paddle_rect(side);
        let touching = self.ball.x <= paddle.max().x
            && self.ball.x + BALL_SIZE >= paddle.min().x
            && self.ball.y <= paddle.max().y
            && self.ball.y + BALL_SIZE >= paddle.min().y;
        let incoming = match side {
            Side::Left => self.vel.x < 0.0,
            Side::Right => self.vel.x > 0.0,
        };
        if !touching || !incoming {
            return;
        }

        self.ball.x = match side {
            Side::Left => paddle.max().x,
            Side::Right => paddle.min().x - BALL_SIZE,
        };
        self.vel.x = -self.vel.x;
        let hit = hit_fraction(self.ball.y, paddle.min().y, PADDLE_HEIGHT);
        self.vel.y = (hit - 0.5) * 0.4;
        session.sound(SoundEffect::PaddleHit);
    }

    fn point_to(&mut self, side: Side, session: &mut Session) {
        let idx = match side {
            Side::Left => 0,
            Side::Right => 1,
        };
        self.points[idx] += 1;
        let (left, right) = self.points();
        session.award_versus(left, right);
        session.sound(SoundEffect::Point);
        log::debug!("Paddle Ball {left} - {right}");

        if self.points[idx] >= WINNING_SCORE {
            let winner = match side {
                Side::Left => "Left Player Wins!",
                Side::Right => "Right Player Wins!",
            };
            session.end_game(winner);
        } else {
            self.serve();
        }
    }
}

impl Game for PaddleBall {
    fn kind(&self) -> GameKind {
        GameKind::PaddleBall
    }

    fn reset(&mut self, session: &mut Session) {
        self.points = [0; 2];
        self.left_y = Self::paddle_home();
        self.right_y = Self::paddle_home();
        self.held.clear();
        self.reset_requested = false;
        session.report_score(ScoreDisplay::Versus { left: 0, right: 0 });
        self.serve();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let stick = |key: Key| match key {
            Key::Char('w') => Some(Stick::LeftUp),
            Key::Char('s') => Some(Stick::LeftDown),
            Key::ArrowUp => Some(Stick::RightUp),
            Key::ArrowDown => Some(Stick::RightDown),
            _ => None,
        };
        if let Some(s) = event.pressed().and_then(stick) {
            self.held.press(s, event.source());
        } else if let Some(s) = event.released().and_then(stick) {
            self.held.release(s, event.source());
        } else if event.pressed() == Some(Key::Char('r')) {
            self.reset_requested = true;
        }
    }

    fn update(&mut self, session: &mut Session, _dt: f32) {
        if std::mem::take(&mut self.reset_requested) {
            self.reset_match(session);
            return;
        }

        self.move_paddles();

        self.ball += self.vel;
        let hit = reflect_in_bounds(
            &mut self.ball,
            &mut self.vel,
            Vec2::ZERO,
            Vec2::new(COLS, ROWS - BALL_SIZE),
            Walls::HORIZONTAL,
        );
        if hit.bounced {
            session.sound(SoundEffect::WallHit);
        }
        if hit.escaped {
            let scorer = if self.ball.x < 0.0 { Side::Right } else { Side::Left };
            return self.point_to(scorer, session);
        }

        self.return_ball(Side::Left, session);
        self.return_ball(Side::Right, session);
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        let mid = COLS * SCALE / 2.0;
        let mut y = 0.0;
        while y < ROWS * SCALE {
            frame.rect(Layer::Background, mid - 1.0, y, 2.0, SCALE / 2.0, Color::hex(0x444444));
            y += SCALE;
        }

        let (left, right) = self.points();
        frame.centered_text(Layer::Board, 30.0, format!("{left} - {right}"), 24.0, Color::WHITE);

        for side in [Side::Left, Side::Right] {
            let r = self.paddle_rect(side);
            frame.rect(
                Layer::Player,
                r.pos.x * SCALE,
                r.pos.y * SCALE,
                r.size.x * SCALE,
                r.size.y * SCALE,
                Color::WHITE,
            );
        }

        let radius = BALL_SIZE * SCALE / 2.0;
        frame.circle(
            Layer::Entities,
            self.ball.x * SCALE + radius,
            self.ball.y * SCALE + radius,
            radius,
            Color::WHITE,
        );
    }

    fn clear_input(&mut self) {
        self.held.clear();
        self.reset_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, HostEvent};

    fn playing() -> (PaddleBall, Session) {
        let mut session = Session::new(None);
        session.begin();
        let mut game = PaddleBall::new(5);
        game.reset(&mut session);
        session.drain_events();
        (game, session)
    }

    #[test]
    fn test_reset_reports_versus_score() {
        let mut session = Session::new(None);
        session.begin();
        let mut game = PaddleBall::new(5);
        game.reset(&mut session);
        assert_eq!(
            session.drain_events().last(),
            Some(&HostEvent::Score(ScoreDisplay::Versus { left: 0, right: 0 }))
        );
    }

    #[test]
    fn test_serve_is_centered_with_fixed_speed() {
        let game = PaddleBall::new(11);
        assert_eq!(game.ball(), Vec2::new(20.0, 10.0));
        assert_eq!(game.velocity().x.abs(), SERVE_DX);
        assert_eq!(game.velocity().y.abs(), SERVE_DY);
    }

    #[test]
    fn test_ball_reflects_off_top_wall() {
        let (mut game, mut session) = playing();
        game.place_ball(Vec2::new(20.0, 0.1), Vec2::new(0.3, -0.2));
        game.update(&mut session, 0.016);
        assert_eq!(game.ball().y, 0.0);
        assert_eq!(game.velocity().y, 0.2);
    }

    #[test]
    fn test_miss_scores_for_opponent() {
        let (mut game, mut session) = playing();
        game.place_ball(Vec2::new(0.1, 2.0), Vec2::new(-0.3, 0.0));
        game.update(&mut session, 0.016);
        assert_eq!(game.points(), (0, 1));
        assert_eq!(game.ball(), Vec2::new(20.0, 10.0));
        assert!(session
            .drain_events()
            .contains(&HostEvent::Score(ScoreDisplay::Versus { left: 0, right: 1 })));
    }

    #[test]
    fn test_paddle_returns_ball() {
        let (mut game, mut session) = playing();
        game.place_ball(Vec2::new(2.2, 10.0), Vec2::new(-0.3, 0.0));
        game.update(&mut session, 0.016);
        assert_eq!(game.ball().x, 2.0);
        assert_eq!(game.velocity().x, 0.3);
        assert!((game.velocity().y - -0.2).abs() < 1e-6);
        assert_eq!(game.points(), (0, 0));
    }

    #[test]
    fn test_paddles_move_and_clamp() {
        let (mut game, mut session) = playing();
        game.place_ball(Vec2::new(20.0, 10.0), Vec2::ZERO);
        game.handle_input(&InputEvent::KeyDown(Key::Char('w')));
        game.handle_input(&InputEvent::KeyDown(Key::ArrowDown));
        game.update(&mut session, 0.016);
        assert_eq!(game.paddle_y(Side::Left), 9.5);
        assert_eq!(game.paddle_y(Side::Right), 10.5);
        for _ in 0..40 {
            game.update(&mut session, 0.016);
        }
        assert_eq!(game.paddle_y(Side::Left), 0.0);
        assert_eq!(game.paddle_y(Side::Right), ROWS - PADDLE_HEIGHT);
    }

    #[test]
    fn test_eleventh_point_ends_match() {
        let (mut game, mut session) = playing();
        game.set_points(3, 10);
        game.place_ball(Vec2::new(0.1, 2.0), Vec2::new(-0.3, 0.0));
        game.update(&mut session, 0.016);
        assert_eq!(game.points(), (3, 11));
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_r_resets_match() {
        let (mut game, mut session) = playing();
        game.set_points(4, 2);
        game.handle_input(&InputEvent::KeyDown(Key::Char('r')));
        game.update(&mut session, 0.016);
        assert_eq!(game.points(), (0, 0));
        assert_eq!(session.score(), 0);
        assert!(session
            .drain_events()
            .contains(&HostEvent::Score(ScoreDisplay::Versus { left: 0, right: 0 })));
    }
}
