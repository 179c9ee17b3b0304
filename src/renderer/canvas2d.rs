//! Canvas2D surface for the browser

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use super::frame::{Align, Frame, Shape};
use crate::error::{ArcadeError, Result};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `canvas_id` and size it for the game
    pub fn new(canvas_id: &str, width: u32, height: u32) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ArcadeError::Platform("no document".into()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| ArcadeError::Platform(format!("canvas #{canvas_id} not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ArcadeError::Platform(format!("#{canvas_id} is not a canvas")))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| ArcadeError::Surface(format!("{e:?}")))?
            .ok_or_else(|| ArcadeError::Surface("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ArcadeError::Surface("2d context has the wrong type".into()))?;

        // Crisp pixels
        ctx.set_image_smoothing_enabled(false);

        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&frame.background().to_css());
        ctx.fill_rect(0.0, 0.0, frame.width() as f64, frame.height() as f64);

        for cmd in frame.commands() {
            match &cmd.shape {
                Shape::Rect { pos, size, color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                Shape::StrokeRect {
                    pos,
                    size,
                    color,
                    width,
                } => {
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                Shape::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    )
                    .map_err(|e| ArcadeError::Surface(format!("{e:?}")))?;
                    ctx.fill();
                }
                Shape::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                Shape::Text {
                    pos,
                    text,
                    color,
                    size,
                    align,
                } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.set_font(&format!("{size}px monospace"));
                    ctx.set_text_align(match align {
                        Align::Left => "left",
                        Align::Center => "center",
                    });
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)
                        .map_err(|e| ArcadeError::Surface(format!("{e:?}")))?;
                }
            }
        }
        Ok(())
    }
}
