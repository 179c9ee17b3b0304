//! Integer grid positions and directions

use serde::{Deserialize, Serialize};

/// Cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// A quarter turn clockwise
    pub fn clockwise(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Cell offset, +y pointing down the screen
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// What happens at the board edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// The edge is a wall
    #[default]
    Solid,
    /// Leaving one side enters from the opposite side
    Wrap,
}

/// Cell coordinate on a grid board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell (may be outside the board)
    pub fn step(self, dir: Direction) -> GridPos {
        let (dx, dy) = dir.delta();
        GridPos::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }

    /// Same cell folded back onto a `width × height` torus
    pub fn wrapped(self, width: i32, height: i32) -> GridPos {
        GridPos::new(self.x.rem_euclid(width), self.y.rem_euclid(height))
    }

    pub fn manhattan(self, other: GridPos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Squared euclidean distance, for target-seeking
    pub fn dist_sq(self, other: GridPos) -> i32 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_four_clockwise_turns_return() {
        for dir in Direction::ALL {
            assert_eq!(dir.clockwise().clockwise(), dir.opposite());
            assert_eq!(dir.clockwise().clockwise().clockwise().clockwise(), dir);
        }
        assert_eq!(Direction::Left.clockwise(), Direction::Up);
    }

    #[test]
    fn test_wrap_negative() {
        assert_eq!(GridPos::new(-1, 20).wrapped(20, 20), GridPos::new(19, 0));
        assert!(!GridPos::new(-1, 0).in_bounds(20, 20));
        assert!(GridPos::new(19, 19).in_bounds(20, 20));
    }
}
