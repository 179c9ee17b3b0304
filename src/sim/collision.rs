//! Collision detection and response for axis-aligned arcade shapes
//!
//! Everything in these games is a box or a ball treated as a box, so the
//! checks are plain AABB overlaps plus wall reflection that clamps the
//! position back inside the playfield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.pos
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min().x < other.max().x
            && self.max().x > other.min().x
            && self.min().y < other.max().y
            && self.max().y > other.min().y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min().x
            && point.x < self.max().x
            && point.y >= self.min().y
            && point.y < self.max().y
    }
}

/// Which playfield edges reflect the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Walls {
    /// Pong: only the top and bottom bounce
    pub const HORIZONTAL: Walls = Walls {
        left: false,
        right: false,
        top: true,
        bottom: true,
    };
    /// Breakout: everything but the floor bounces
    pub const OPEN_FLOOR: Walls = Walls {
        left: true,
        right: true,
        top: true,
        bottom: false,
    };
}

/// Result of a wall check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    /// Reflected off a wall
    pub bounced: bool,
    /// Crossed an open edge
    pub escaped: bool,
}

/// Reflect one axis: a position past `min` or `max` is clamped back onto the
/// boundary and the velocity component points back inside.
/// Returns true when a reflection happened.
pub fn reflect_axis(pos: &mut f32, vel: &mut f32, min: f32, max: f32) -> bool {
    if *pos < min {
        *pos = min;
        *vel = vel.abs();
        true
    } else if *pos > max {
        *pos = max;
        *vel = -vel.abs();
        true
    } else {
        false
    }
}

/// Bounce `pos`/`vel` inside `[min, max]` on the walls that are closed
pub fn reflect_in_bounds(pos: &mut Vec2, vel: &mut Vec2, min: Vec2, max: Vec2, walls: Walls) -> WallHit {
    let mut hit = WallHit::default();

    if (pos.x < min.x && walls.left) || (pos.x > max.x && walls.right) {
        hit.bounced |= reflect_axis(&mut pos.x, &mut vel.x, min.x, max.x);
    } else if pos.x < min.x || pos.x > max.x {
        hit.escaped = true;
    }

    if (pos.y < min.y && walls.top) || (pos.y > max.y && walls.bottom) {
        hit.bounced |= reflect_axis(&mut pos.y, &mut vel.y, min.y, max.y);
    } else if pos.y < min.y || pos.y > max.y {
        hit.escaped = true;
    }

    hit
}

/// Where along a paddle the ball struck, 0.0 (top/left end) to 1.0
pub fn hit_fraction(ball: f32, paddle_start: f32, paddle_len: f32) -> f32 {
    if paddle_len <= 0.0 {
        return 0.5;
    }
    ((ball - paddle_start) / paddle_len).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_wall_reflection_clamps() {
        // Ball at y=0.1 moving up 0.2 per tick lands at y=-0.1 after Euler
        let mut pos = Vec2::new(10.0, 0.1);
        let mut vel = Vec2::new(0.3, -0.2);
        pos += vel;
        let hit = reflect_in_bounds(&mut pos, &mut vel, Vec2::ZERO, Vec2::new(39.0, 19.0), Walls::HORIZONTAL);
        assert!(hit.bounced);
        assert_eq!(pos.y, 0.0);
        assert!((vel.y - 0.2).abs() < 1e-6);
        assert!((vel.x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_open_edge_escapes() {
        let mut pos = Vec2::new(-0.5, 5.0);
        let mut vel = Vec2::new(-0.3, 0.0);
        let hit = reflect_in_bounds(&mut pos, &mut vel, Vec2::ZERO, Vec2::new(39.0, 19.0), Walls::HORIZONTAL);
        assert!(hit.escaped);
        assert!(!hit.bounced);
        assert_eq!(vel.x, -0.3);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(a.overlaps(&Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!a.overlaps(&Rect::new(2.0, 0.0, 2.0, 2.0)));
        assert!(a.contains(Vec2::new(1.9, 0.0)));
        assert!(!a.contains(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_hit_fraction_clamped() {
        assert_eq!(hit_fraction(5.0, 4.0, 4.0), 0.25);
        assert_eq!(hit_fraction(-3.0, 4.0, 4.0), 0.0);
        assert_eq!(hit_fraction(30.0, 4.0, 4.0), 1.0);
    }
}
