//! Number Defenders: solve falling sums before they land

use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::renderer::{Align, Color, Frame, Layer, Shape};
use crate::settings::MathMode;
use crate::sim::{Game, InputEvent, Key, Particles, PressQueue, Session, seeded_rng};

const SCALE: f32 = 20.0;
pub const COLS: f32 = 40.0;
pub const ROWS: f32 = 30.0;
pub const LANES: usize = 4;
const LANE_WIDTH: f32 = COLS / LANES as f32;
/// Cells per second
const FALL_SPEED: f32 = 4.0;
const SPAWN_Y: f32 = -2.0;
const PLAYER_WIDTH: f32 = 2.0;
const PLAYER_HEIGHT: f32 = 2.0;
const MAX_DIGITS: usize = 3;
const MAX_OPERAND: u32 = 20;
const CORRECT_POINTS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Problem {
    pub a: u32,
    pub b: u32,
    pub op: Op,
    pub y: f32,
}

impl Problem {
    pub fn answer(&self) -> u32 {
        match self.op {
            Op::Add => self.a + self.b,
            Op::Sub => self.a - self.b,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.op {
            Op::Add => '+',
            Op::Sub => '-',
        };
        write!(f, "{} {} {}", self.a, sign, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(i32),
    Digit(u32),
    Erase,
    Clear,
    /// Deal a fresh problem to every lane
    NewProblems,
}

pub struct NumberDefenders {
    rng: Pcg32,
    mode: MathMode,
    time_limit_ms: Option<u32>,
    elapsed_ms: u32,
    lanes: [Problem; LANES],
    player_x: f32,
    typed: String,
    commands: PressQueue<Command>,
    particles: Particles,
}

impl NumberDefenders {
    /// `time_limit_secs` of 0 plays untimed
    pub fn new(seed: u64, mode: MathMode, time_limit_secs: u32) -> Self {
        let mut rng = seeded_rng(seed);
        let lanes = std::array::from_fn(|_| Self::generate(&mut rng, mode));
        Self {
            rng,
            mode,
            time_limit_ms: (time_limit_secs > 0).then(|| time_limit_secs.saturating_mul(1000)),
            elapsed_ms: 0,
            lanes,
            player_x: Self::player_home(),
            typed: String::new(),
            commands: PressQueue::default(),
            particles: Particles::default(),
        }
    }

    fn player_home() -> f32 {
        (COLS / 2.0).floor()
    }

    pub fn player_y() -> f32 {
        ROWS - 2.0
    }

    pub fn generate(rng: &mut Pcg32, mode: MathMode) -> Problem {
        let op = match mode {
            MathMode::Add => Op::Add,
            MathMode::Sub => Op::Sub,
            MathMode::Both if rng.random_bool(0.5) => Op::Add,
            MathMode::Both => Op::Sub,
        };
        let a = rng.random_range(1..=MAX_OPERAND);
        let b = match op {
            Op::Add => rng.random_range(1..=MAX_OPERAND),
            // Never below zero
            Op::Sub => rng.random_range(1..=a),
        };
        Problem { a, b, op, y: SPAWN_Y }
    }

    pub fn problem(&self, lane: usize) -> Option<&Problem> {
        self.lanes.get(lane)
    }

    pub fn set_problem(&mut self, lane: usize, problem: Problem) {
        if let Some(slot) = self.lanes.get_mut(lane) {
            *slot = problem;
        }
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn player_x(&self) -> f32 {
        self.player_x
    }

    pub fn player_lane(&self) -> usize {
        ((self.player_x / LANE_WIDTH) as usize).min(LANES - 1)
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    /// Milliseconds left on the clock, if timed
    pub fn time_left_ms(&self) -> Option<u32> {
        self.time_limit_ms
            .map(|limit| limit.saturating_sub(self.elapsed_ms))
    }

    fn lane_center(lane: usize) -> f32 {
        lane as f32 * LANE_WIDTH + LANE_WIDTH / 2.0
    }

    fn respawn(&mut self, lane: usize) {
        self.lanes[lane] = Self::generate(&mut self.rng, self.mode);
    }

    fn apply(&mut self, command: Command, session: &mut Session) {
        match command {
            Command::Move(dx) => {
                let x = self.player_x + dx as f32;
                if (0.0..=COLS - PLAYER_WIDTH).contains(&x) {
                    self.player_x = x;
                }
            }
            Command::Digit(d) => {
                self.typed.push(char::from_digit(d, 10).unwrap_or('0'));
                if self.typed.len() > MAX_DIGITS {
                    self.typed.clear();
                } else {
                    self.check_answer(session);
                }
            }
            Command::Erase => {
                self.typed.pop();
            }
            Command::Clear => self.typed.clear(),
            // The clock keeps running
            Command::NewProblems => {
                self.typed.clear();
                for lane in 0..LANES {
                    self.respawn(lane);
                }
            }
        }
    }

    fn check_answer(&mut self, session: &mut Session) {
        let Ok(guess) = self.typed.parse::<u32>() else {
            return;
        };
        let lane = self.player_lane();
        let problem = self.lanes[lane];
        if guess != problem.answer() {
            return;
        }

        log::debug!("Number Defenders solved {problem} = {guess}");
        session.award(CORRECT_POINTS);
        session.sound(SoundEffect::Correct);

        let target = Vec2::new(Self::lane_center(lane), problem.y.max(0.0));
        let launch = Vec2::new(self.player_x + PLAYER_WIDTH / 2.0, Self::player_y());
        self.particles.rocket(&mut self.rng, launch, target, 0.3, 0xff3333);
        self.particles.burst(&mut self.rng, target, 10, 6.0, 0xffdd44);
        session.celebrate(target.x * SCALE, target.y * SCALE);

        self.typed.clear();
        self.respawn(lane);
    }

    fn reaches_player(&self, lane: usize) -> bool {
        let y = self.lanes[lane].y;
        lane == self.player_lane()
            && y + 1.0 >= Self::player_y()
            && y <= Self::player_y() + PLAYER_HEIGHT
    }
}

impl Game for NumberDefenders {
    fn kind(&self) -> GameKind {
        GameKind::NumberDefenders
    }

    fn letter_input(&self) -> bool {
        true
    }

    fn reset(&mut self, _session: &mut Session) {
        self.elapsed_ms = 0;
        self.player_x = Self::player_home();
        self.typed.clear();
        self.commands.clear();
        self.particles.clear();
        for lane in 0..LANES {
            self.respawn(lane);
        }
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let Some(key) = event.pressed() else {
            return;
        };
        let command = match key {
            Key::ArrowLeft => Command::Move(-1),
            Key::ArrowRight => Command::Move(1),
            Key::Backspace => Command::Erase,
            Key::Enter => Command::Clear,
            Key::Char('r') => Command::NewProblems,
            other => match other.digit() {
                Some(d) => Command::Digit(d),
                None => return,
            },
        };
        self.commands.push(command);
    }

    fn update(&mut self, session: &mut Session, dt: f32) {
        if let Some(limit) = self.time_limit_ms {
            self.elapsed_ms = self.elapsed_ms.saturating_add((dt * 1000.0).round() as u32);
            if self.elapsed_ms >= limit {
                return session.end_game("Time's Up");
            }
        }

        let commands: Vec<Command> = self.commands.drain().collect();
        for command in commands {
            self.apply(command, session);
        }

        for lane in 0..LANES {
            if !session.is_playing() {
                break;
            }
            self.lanes[lane].y += FALL_SPEED * dt;
            if self.lanes[lane].y > ROWS || self.reaches_player(lane) {
                log::debug!("Number Defenders missed {}", self.lanes[lane]);
                if !session.lose_life() {
                    self.respawn(lane);
                }
            }
        }

        self.particles.update(dt);
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        for i in 1..LANES {
            let x = i as f32 * LANE_WIDTH * SCALE;
            frame.line(
                Layer::Background,
                Vec2::new(x, 0.0),
                Vec2::new(x, ROWS * SCALE),
                Color::hex(0x333333),
                1.0,
            );
        }

        for (lane, problem) in self.lanes.iter().enumerate() {
            frame.push(
                Layer::Entities,
                Shape::Text {
                    pos: Vec2::new(Self::lane_center(lane) * SCALE, problem.y * SCALE),
                    text: problem.to_string(),
                    color: Color::hex(0xff4444),
                    size: 16.0,
                    align: Align::Center,
                },
            );
        }

        for p in self.particles.iter() {
            frame.circle(
                Layer::Collectibles,
                p.pos.x * SCALE,
                p.pos.y * SCALE,
                p.size * SCALE / 2.0,
                Color::hex(p.color).with_alpha((p.life.clamp(0.0, 1.0) * 255.0) as u8),
            );
        }

        frame.rect(
            Layer::Player,
            self.player_x * SCALE,
            Self::player_y() * SCALE,
            PLAYER_WIDTH * SCALE,
            PLAYER_HEIGHT * SCALE,
            Color::hex(0x00ff88),
        );

        frame.text(Layer::Board, 10.0, 20.0, format!("Answer: {}", self.typed), 16.0, Color::WHITE);
        frame.text(Layer::Board, 10.0, 40.0, format!("Mode: {}", self.mode.as_str()), 12.0, Color::WHITE);
        if let Some(left) = self.time_left_ms() {
            frame.text(
                Layer::Board,
                COLS * SCALE - 110.0,
                20.0,
                format!("Time: {}s", left.div_ceil(1000)),
                16.0,
                Color::WHITE,
            );
        }
    }

    fn clear_input(&mut self) {
        self.commands.clear();
    }
}
