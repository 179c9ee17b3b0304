//! Rendering: frames of draw commands and the surfaces that present them

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod frame;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::CanvasSurface;
pub use frame::{Align, Color, DrawCmd, Frame, Layer, Shape};
pub use text::TextSurface;

use crate::error::Result;

/// Something a finished frame can be drawn onto
pub trait Surface {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}
