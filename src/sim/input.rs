//! Input events and the latches games read them through
//!
//! Events arrive asynchronously from the host; games never act on them
//! directly. They are recorded in one of three latches and resolved at the
//! start of the next tick:
//! - [`DirectionLatch`]: latest requested direction (maze and snake)
//! - [`HoldLatch`]: actions held down, keyed by source (paddles)
//! - [`PressQueue`]: discrete presses in arrival order (everything else)

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::grid::Direction;

/// Logical key, named the way browsers name `KeyboardEvent.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    Backspace,
    Escape,
    /// Printable character, letters lowercased
    Char(char),
}

impl Key {
    /// Parse a logical key name (`"ArrowUp"`, `" "`, `"a"`...). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            " " | "Space" | "Spacebar" => Key::Space,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Escape" | "Esc" => Key::Escape,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Arrow keys as grid directions
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::ArrowUp => Some(Direction::Up),
            Key::ArrowDown => Some(Direction::Down),
            Key::ArrowLeft => Some(Direction::Left),
            Key::ArrowRight => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if *k == c)
    }

    pub fn digit(&self) -> Option<u32> {
        match self {
            Key::Char(c) => c.to_digit(10),
            _ => None,
        }
    }
}

/// Where an input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Keyboard,
    Touch,
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Down,
    Up,
}

/// One raw input from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// On-screen control button
    Touch { key: Key, phase: TouchPhase },
    /// Pointer press in canvas pixels
    PointerDown { x: f32, y: f32 },
    /// Pointer movement in canvas pixels
    PointerMove { x: f32, y: f32 },
}

impl InputEvent {
    /// Build a touch-control event from host strings. The `"click"` control
    /// and unknown phases are ignored.
    pub fn touch(key: &str, kind: &str) -> Option<InputEvent> {
        if key == "click" {
            return None;
        }
        let phase = match kind {
            "start" | "down" | "touchstart" | "mousedown" => TouchPhase::Down,
            "end" | "up" | "cancel" | "touchend" | "touchcancel" | "mouseup" => TouchPhase::Up,
            _ => return None,
        };
        Some(InputEvent::Touch {
            key: Key::from_name(key)?,
            phase,
        })
    }

    /// Key that went down, from keyboard or touch
    pub fn pressed(&self) -> Option<Key> {
        match *self {
            InputEvent::KeyDown(key) => Some(key),
            InputEvent::Touch {
                key,
                phase: TouchPhase::Down,
            } => Some(key),
            _ => None,
        }
    }

    /// Key that was released, from keyboard or touch
    pub fn released(&self) -> Option<Key> {
        match *self {
            InputEvent::KeyUp(key) => Some(key),
            InputEvent::Touch {
                key,
                phase: TouchPhase::Up,
            } => Some(key),
            _ => None,
        }
    }

    pub fn source(&self) -> Source {
        match self {
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => Source::Keyboard,
            InputEvent::Touch { .. } => Source::Touch,
            InputEvent::PointerDown { .. } | InputEvent::PointerMove { .. } => Source::Pointer,
        }
    }
}

/// Latest requested direction, applied (or dropped) by the next tick
#[derive(Debug, Clone, Default)]
pub struct DirectionLatch {
    requested: Option<Direction>,
}

impl DirectionLatch {
    pub fn request(&mut self, dir: Direction) {
        self.requested = Some(dir);
    }

    pub fn take(&mut self) -> Option<Direction> {
        self.requested.take()
    }

    pub fn peek(&self) -> Option<Direction> {
        self.requested
    }

    pub fn clear(&mut self) {
        self.requested = None;
    }
}

/// Set of held actions. A hold lasts from its down event to the matching
/// up event from the same source.
#[derive(Debug, Clone)]
pub struct HoldLatch<A> {
    held: HashSet<(A, Source)>,
}

impl<A> Default for HoldLatch<A> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
        }
    }
}

impl<A: Copy + Eq + Hash> HoldLatch<A> {
    pub fn press(&mut self, action: A, source: Source) {
        self.held.insert((action, source));
    }

    pub fn release(&mut self, action: A, source: Source) {
        self.held.remove(&(action, source));
    }

    /// Held from any source
    pub fn is_held(&self, action: A) -> bool {
        self.held.iter().any(|(a, _)| *a == action)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Discrete presses in arrival order, drained at the start of a tick
#[derive(Debug, Clone)]
pub struct PressQueue<A> {
    presses: VecDeque<A>,
}

impl<A> Default for PressQueue<A> {
    fn default() -> Self {
        Self {
            presses: VecDeque::new(),
        }
    }
}

impl<A> PressQueue<A> {
    /// Bound on queued presses; older presses are dropped past it
    pub const CAPACITY: usize = 16;

    pub fn push(&mut self, action: A) {
        if self.presses.len() == Self::CAPACITY {
            self.presses.pop_front();
        }
        self.presses.push_back(action);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = A> + '_ {
        self.presses.drain(..)
    }

    pub fn clear(&mut self) {
        self.presses.clear();
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}
