//! ASCII surface for the headless CLI and tests
//!
//! Rasterizes a frame onto a character grid. Each filled shape writes the
//! glyph of its layer; text is written verbatim.

use std::fmt;

use super::Surface;
use super::frame::{Align, Frame, Layer, Shape};
use crate::error::{ArcadeError, Result};

pub struct TextSurface {
    cols: usize,
    rows: usize,
    grid: Vec<Vec<char>>,
}

impl TextSurface {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            grid: vec![vec![' '; cols]; rows],
        }
    }

    fn glyph(layer: Layer) -> char {
        match layer {
            Layer::Background => ' ',
            Layer::Board => '#',
            Layer::Collectibles => '.',
            Layer::Entities => 'x',
            Layer::Player => '@',
            Layer::Overlay => ':',
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.grid.iter().map(|row| row.iter().collect()).collect()
    }

    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }

    fn fill(&mut self, (c0, r0): (isize, isize), (c1, r1): (isize, isize), glyph: char) {
        let clamp_c = |c: isize| c.clamp(0, self.cols as isize) as usize;
        let clamp_r = |r: isize| r.clamp(0, self.rows as isize) as usize;
        let (c0, c1, r0, r1) = (clamp_c(c0), clamp_c(c1), clamp_r(r0), clamp_r(r1));
        for row in &mut self.grid[r0..r1] {
            for cell in &mut row[c0..c1] {
                *cell = glyph;
            }
        }
    }
}

impl Surface for TextSurface {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ArcadeError::Surface("text surface has no cells".into()));
        }
        let sx = self.cols as f32 / frame.width().max(1.0);
        let sy = self.rows as f32 / frame.height().max(1.0);
        let to_cell = |x: f32, y: f32| ((x * sx).floor() as isize, (y * sy).floor() as isize);

        for row in &mut self.grid {
            row.fill(' ');
        }

        for cmd in frame.commands() {
            let glyph = Self::glyph(cmd.layer);
            match &cmd.shape {
                Shape::Rect { pos, size, .. } => {
                    // Shading overlays keep the board readable underneath
                    if cmd.layer == Layer::Overlay {
                        continue;
                    }
                    let start = to_cell(pos.x, pos.y);
                    let end = to_cell(pos.x + size.x, pos.y + size.y);
                    let end = (end.0.max(start.0 + 1), end.1.max(start.1 + 1));
                    self.fill(start, end, glyph);
                }
                Shape::StrokeRect { .. } | Shape::Line { .. } => {}
                Shape::Circle { center, .. } => {
                    let (c, r) = to_cell(center.x, center.y);
                    self.fill((c, r), (c + 1, r + 1), glyph);
                }
                Shape::Text { pos, text, align, .. } => {
                    let (c, r) = to_cell(pos.x, pos.y);
                    if r < 0 || r as usize >= self.rows {
                        continue;
                    }
                    let len = text.chars().count() as isize;
                    let start = match align {
                        Align::Left => c,
                        Align::Center => c - len / 2,
                    };
                    for (i, ch) in text.chars().enumerate() {
                        let col = start + i as isize;
                        if (0..self.cols as isize).contains(&col) {
                            self.grid[r as usize][col as usize] = ch;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Color;

    #[test]
    fn test_rasterizes_layers() {
        let mut frame = Frame::new(100, 100);
        frame.rect(Layer::Board, 0.0, 0.0, 100.0, 10.0, Color::WHITE);
        frame.rect(Layer::Player, 50.0, 50.0, 10.0, 10.0, Color::WHITE);
        frame.sort();
        let mut surface = TextSurface::new(10, 10);
        surface.present(&frame).unwrap();
        assert_eq!(surface.lines()[0], "##########");
        assert_eq!(surface.char_at(5, 5), Some('@'));
    }

    #[test]
    fn test_centered_text() {
        let mut frame = Frame::new(100, 100);
        frame.centered_text(Layer::Overlay, 50.0, "HI", 10.0, Color::WHITE);
        let mut surface = TextSurface::new(10, 10);
        surface.present(&frame).unwrap();
        assert_eq!(surface.char_at(4, 5), Some('H'));
        assert_eq!(surface.char_at(5, 5), Some('I'));
    }

    #[test]
    fn test_empty_surface_errors() {
        let mut surface = TextSurface::new(0, 0);
        assert!(surface.present(&Frame::new(10, 10)).is_err());
    }
}
