//! Draw-command frames
//!
//! A game's `render` records shapes into a [`Frame`]; a [`super::Surface`]
//! presents it. Commands are tagged with a [`Layer`] and sorted (stably) by
//! layer before presenting, so a game may record in any order.

use glam::Vec2;
use serde::Serialize;

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::hex(0x000000);
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const SHADE: Color = Color::rgba(0, 0, 0, 180);

    /// Opaque color from 0xRRGGBB
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 255,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS color string for Canvas2D
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Layer {
    Background,
    Board,
    Collectibles,
    Entities,
    Player,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Rect { pos: Vec2, size: Vec2, color: Color },
    StrokeRect { pos: Vec2, size: Vec2, color: Color, width: f32 },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, color: Color, width: f32 },
    Text { pos: Vec2, text: String, color: Color, size: f32, align: Align },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCmd {
    pub layer: Layer,
    pub shape: Shape,
}

/// One full redraw, in canvas pixels
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    width: f32,
    height: f32,
    background: Color,
    cmds: Vec<DrawCmd>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            background: Color::BLACK,
            cmds: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Start a new redraw
    pub fn clear(&mut self, background: Color) {
        self.background = background;
        self.cmds.clear();
    }

    pub fn push(&mut self, layer: Layer, shape: Shape) {
        self.cmds.push(DrawCmd { layer, shape });
    }

    pub fn rect(&mut self, layer: Layer, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.push(
            layer,
            Shape::Rect {
                pos: Vec2::new(x, y),
                size: Vec2::new(w, h),
                color,
            },
        );
    }

    pub fn stroke_rect(&mut self, layer: Layer, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32) {
        self.push(
            layer,
            Shape::StrokeRect {
                pos: Vec2::new(x, y),
                size: Vec2::new(w, h),
                color,
                width,
            },
        );
    }

    pub fn circle(&mut self, layer: Layer, x: f32, y: f32, radius: f32, color: Color) {
        self.push(
            layer,
            Shape::Circle {
                center: Vec2::new(x, y),
                radius,
                color,
            },
        );
    }

    pub fn line(&mut self, layer: Layer, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.push(layer, Shape::Line { from, to, color, width });
    }

    pub fn text(&mut self, layer: Layer, x: f32, y: f32, text: impl Into<String>, size: f32, color: Color) {
        self.push(
            layer,
            Shape::Text {
                pos: Vec2::new(x, y),
                text: text.into(),
                color,
                size,
                align: Align::Left,
            },
        );
    }

    pub fn centered_text(&mut self, layer: Layer, y: f32, text: impl Into<String>, size: f32, color: Color) {
        self.push(
            layer,
            Shape::Text {
                pos: Vec2::new(self.width / 2.0, y),
                text: text.into(),
                color,
                size,
                align: Align::Center,
            },
        );
    }

    /// Darken the board and show a title with an optional hint line
    pub fn banner(&mut self, title: &str, hint: Option<&str>) {
        let (w, h) = (self.width, self.height);
        self.rect(Layer::Overlay, 0.0, 0.0, w, h, Color::SHADE);
        self.centered_text(Layer::Overlay, h / 2.0 - 12.0, title, 28.0, Color::WHITE);
        if let Some(hint) = hint {
            self.centered_text(Layer::Overlay, h / 2.0 + 24.0, hint, 16.0, Color::hex(0xcccccc));
        }
    }

    /// Stable sort by layer; recording order is kept within a layer
    pub fn sort(&mut self) {
        self.cmds.sort_by_key(|cmd| cmd.layer);
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Any text command containing `needle` (used by tests and the CLI)
    pub fn has_text(&self, needle: &str) -> bool {
        self.cmds
            .iter()
            .any(|cmd| matches!(&cmd.shape, Shape::Text { text, .. } if text.contains(needle)))
    }
}
