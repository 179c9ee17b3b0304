//! Road Dash: hop the frog across lanes of traffic

use rand::Rng;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{Direction, Game, GridPos, InputEvent, Key, PressQueue, Rect, Session, seeded_rng};

const SCALE: f32 = 20.0;
pub const COLS: i32 = 20;
pub const ROWS: i32 = 30;
/// Base traffic speed in cells per second
pub const BASE_VEHICLE_SPEED: f32 = 6.0;
const SPEEDUP: f32 = 1.2;

const VEHICLE_COLORS: [Color; 4] = [
    Color::hex(0xff4444),
    Color::hex(0x4488ff),
    Color::hex(0xffcc00),
    Color::hex(0xff88ff),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub x: f32,
    pub row: i32,
    pub width: f32,
    /// Cells per second, always positive
    pub speed: f32,
    /// +1 drives right, -1 drives left
    pub heading: f32,
}

impl Vehicle {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.row as f32, self.width, 1.0)
    }

    fn drive(&mut self, dt: f32) {
        self.x += self.speed * self.heading * dt;
        if self.heading > 0.0 && self.x > COLS as f32 {
            self.x = -self.width;
        } else if self.heading < 0.0 && self.x + self.width < 0.0 {
            self.x = COLS as f32;
        }
    }
}

pub struct RoadDash {
    rng: Pcg32,
    frog: GridPos,
    vehicles: Vec<Vehicle>,
    vehicle_speed: f32,
    hops: PressQueue<Direction>,
    reset_requested: bool,
}

impl RoadDash {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: seeded_rng(seed),
            frog: Self::frog_home(),
            vehicles: Vec::new(),
            vehicle_speed: BASE_VEHICLE_SPEED,
            hops: PressQueue::default(),
            reset_requested: false,
        };
        game.spawn_traffic();
        game
    }

    fn frog_home() -> GridPos {
        GridPos::new(COLS / 2, ROWS - 1)
    }

    pub fn frog(&self) -> GridPos {
        self.frog
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle_speed(&self) -> f32 {
        self.vehicle_speed
    }

    pub fn place_frog(&mut self, pos: GridPos) {
        self.frog = pos;
    }

    /// Replace the traffic with a fixed set of vehicles
    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) {
        self.vehicles = vehicles;
    }

    fn spawn_traffic(&mut self) {
        self.vehicles.clear();
        for row in 1..ROWS - 1 {
            let count = self.rng.random_range(1..=3);
            for _ in 0..count {
                let vehicle = Vehicle {
                    x: self.rng.random_range(0.0..COLS as f32),
                    row,
                    width: self.rng.random_range(2..=4) as f32,
                    speed: self.rng.random_range(0.5..1.0) * self.vehicle_speed,
                    heading: if self.rng.random_bool(0.5) { 1.0 } else { -1.0 },
                };
                self.vehicles.push(vehicle);
            }
        }
    }

    fn hop(&mut self, dir: Direction, session: &mut Session) {
        let next = self.frog.step(dir);
        if !next.in_bounds(COLS, ROWS) {
            return;
        }
        self.frog = next;
        session.sound(SoundEffect::Hop);

        if self.frog.y == 0 {
            session.complete_level();
            session.award(100 * session.level() as u64);
            self.vehicle_speed *= SPEEDUP;
            log::debug!("Road Dash level {}, traffic at {:.1} cells/s", session.level(), self.vehicle_speed);
            self.frog = Self::frog_home();
            self.spawn_traffic();
        }
    }

    fn frog_hit(&self) -> bool {
        let frog = Rect::new(self.frog.x as f32, self.frog.y as f32, 1.0, 1.0);
        self.vehicles.iter().any(|v| v.rect().overlaps(&frog))
    }

    fn squash(&mut self, session: &mut Session) {
        log::debug!("Road Dash frog hit at {:?}", self.frog);
        if !session.lose_life() {
            self.frog = Self::frog_home();
        }
    }
}

impl Game for RoadDash {
    fn kind(&self) -> GameKind {
        GameKind::RoadDash
    }

    fn reset(&mut self, _session: &mut Session) {
        self.vehicle_speed = BASE_VEHICLE_SPEED;
        self.frog = Self::frog_home();
        self.hops.clear();
        self.reset_requested = false;
        self.spawn_traffic();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        match event.pressed() {
            Some(Key::Char('r')) => self.reset_requested = true,
            Some(key) => {
                if let Some(dir) = key.direction() {
                    self.hops.push(dir);
                }
            }
            None => {}
        }
    }

    fn update(&mut self, session: &mut Session, dt: f32) {
        if std::mem::take(&mut self.reset_requested) {
            self.frog = Self::frog_home();
            self.hops.clear();
        }

        let hops: Vec<Direction> = self.hops.drain().collect();
        for dir in hops {
            self.hop(dir, session);
            if self.frog_hit() {
                return self.squash(session);
            }
        }

        for vehicle in self.vehicles.iter_mut() {
            vehicle.drive(dt);
        }
        if self.frog_hit() {
            self.squash(session);
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        let width = COLS as f32 * SCALE;
        // Safe strips at the top and bottom
        frame.rect(Layer::Background, 0.0, 0.0, width, SCALE, Color::hex(0x1f6b1f));
        frame.rect(Layer::Background, 0.0, (ROWS - 1) as f32 * SCALE, width, SCALE, Color::hex(0x1f6b1f));
        for row in 1..ROWS - 1 {
            frame.rect(Layer::Background, 0.0, row as f32 * SCALE + SCALE / 2.0, width, 1.0, Color::hex(0x555555));
        }

        for (i, v) in self.vehicles.iter().enumerate() {
            let color = VEHICLE_COLORS[i % VEHICLE_COLORS.len()];
            frame.rect(
                Layer::Entities,
                v.x * SCALE,
                v.row as f32 * SCALE + 2.0,
                v.width * SCALE,
                SCALE - 4.0,
                color,
            );
        }

        frame.rect(
            Layer::Player,
            self.frog.x as f32 * SCALE + 2.0,
            self.frog.y as f32 * SCALE + 2.0,
            SCALE - 4.0,
            SCALE - 4.0,
            Color::hex(0x44ff44),
        );
        frame.centered_text(
            Layer::Board,
            ROWS as f32 * SCALE - 6.0,
            "Reach the top to complete the level",
            12.0,
            Color::WHITE,
        );
    }

    fn clear_input(&mut self) {
        self.hops.clear();
        self.reset_requested = false;
    }
}
