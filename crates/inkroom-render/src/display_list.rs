//! Recording backend.
//!
//! Keeps the draw commands of the last frame instead of rasterizing them.
//! Used by the headless app and by tests.

use crate::renderer::{PathStyle, RenderResult, Renderer, RendererError, TextStyle};
use kurbo::{BezPath, Point, Size};
use peniko::Color;

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear { color: Color, viewport: Size },
    Path { path: BezPath, style: PathStyle },
    Text { position: Point, text: String, style: TextStyle },
}

/// Renderer that records draw commands.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    attached: bool,
    frames: u64,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            attached: true,
            frames: 0,
        }
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of path commands recorded since the last clear.
    pub fn path_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Path { .. }))
            .count()
    }

    /// Number of frames started so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulate the surface going away. Every call fails until reattached.
    pub fn detach(&mut self) {
        log::debug!("Display list detached");
        self.attached = false;
        self.commands.clear();
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    fn ensure_attached(&self) -> RenderResult<()> {
        if self.attached {
            Ok(())
        } else {
            Err(RendererError::SurfaceLost)
        }
    }
}

impl Renderer for DisplayList {
    fn is_available(&self) -> bool {
        self.attached
    }

    fn clear(&mut self, background: Color, viewport: Size) -> RenderResult<()> {
        self.ensure_attached()?;
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear {
            color: background,
            viewport,
        });
        Ok(())
    }

    fn draw_path(&mut self, path: &BezPath, style: &PathStyle) -> RenderResult<()> {
        self.ensure_attached()?;
        if !(style.width.is_finite() && style.width > 0.0) {
            return Err(RendererError::RenderFailed(format!(
                "invalid stroke width {}",
                style.width
            )));
        }
        self.commands.push(DrawCommand::Path {
            path: path.clone(),
            style: *style,
        });
        Ok(())
    }

    fn draw_text(&mut self, position: Point, text: &str, style: &TextStyle) -> RenderResult<()> {
        self.ensure_attached()?;
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            style: style.clone(),
        });
        Ok(())
    }
}
