//! Rendering contract
//!
//! The engine only ever hands a renderer the full [`GameState`]; what ends up
//! on screen is the renderer's business.

pub mod ascii;

pub use ascii::AsciiRenderer;

use crate::error::RenderError;
use crate::sim::GameState;

/// Something that can show a frame
pub trait Renderer {
    /// Bind to a drawing surface of the given size (once, at init)
    fn attach(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn draw(&mut self, state: &GameState) -> Result<(), RenderError>;
}

/// Renders nothing; counts frames
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessRenderer {
    frames: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for HeadlessRenderer {
    fn attach(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::NoSurface);
        }
        Ok(())
    }

    fn draw(&mut self, _state: &GameState) -> Result<(), RenderError> {
        self.frames += 1;
        Ok(())
    }
}
