//! Short-lived visual particles (rocket trails, sparks)
//!
//! Purely cosmetic: particles never affect scoring or collisions, but they
//! are advanced on the fixed tick with the seeded RNG so runs stay reproducible.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Maximum live particles per game
pub const MAX_PARTICLES: usize = 256;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32, // 0xRRGGBB
    pub life: f32,  // 0-1, decreases over time
    pub size: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Particles {
    list: Vec<Particle>,
}

impl Particles {
    fn push(&mut self, particle: Particle) {
        if self.list.len() >= MAX_PARTICLES {
            // Oldest go first
            self.list.remove(0);
        }
        self.list.push(particle);
    }

    /// Radial burst of `count` sparks around `at`
    pub fn burst(&mut self, rng: &mut Pcg32, at: Vec2, count: usize, speed: f32, color: u32) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = speed * rng.random_range(0.5..1.0);
            self.push(Particle {
                pos: at,
                vel: Vec2::from_angle(angle) * speed,
                color,
                life: 1.0,
                size: rng.random_range(0.15..0.35),
            });
        }
    }

    /// A rocket fired from `from` toward `to`, arriving in `secs`, with a spark trail
    pub fn rocket(&mut self, rng: &mut Pcg32, from: Vec2, to: Vec2, secs: f32, color: u32) {
        let vel = (to - from) / secs.max(0.01);
        self.push(Particle {
            pos: from,
            vel,
            color,
            life: 1.0,
            size: 0.5,
        });
        for _ in 0..8 {
            let jitter = Vec2::new(rng.random_range(-0.3..0.3), rng.random_range(0.0..0.6));
            self.push(Particle {
                pos: from + jitter,
                vel: vel * rng.random_range(0.3..0.7),
                color: 0xffaa33,
                life: rng.random_range(0.4..0.8),
                size: 0.2,
            });
        }
    }

    /// Integrate and fade
    pub fn update(&mut self, dt: f32) {
        for particle in self.list.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel *= 0.98;
            particle.life -= dt * 1.5;
            particle.size *= 0.995;
        }
        self.list.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}
