//! Renderer trait abstraction.

use inkroom_core::input::Preview;
use inkroom_core::records::Stroke as InkStroke;
use inkroom_core::state::DrawingState;
use kurbo::{BezPath, Cap, Join, Point, Size, Stroke};
use peniko::{Color, Compose};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Drawing surface is no longer available")]
    SurfaceLost,
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// How a path is painted.
#[derive(Debug, Clone, Copy)]
pub struct PathStyle {
    pub color: Color,
    pub width: f64,
    /// `DestOut` removes paint underneath instead of adding it.
    pub compose: Compose,
    pub filled: bool,
}

impl PathStyle {
    /// Plain outline with round caps and joins.
    pub fn outline(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            compose: Compose::SrcOver,
            filled: false,
        }
    }

    /// Style that erases whatever lies beneath the path.
    pub fn eraser(color: Color, width: f64) -> Self {
        Self {
            compose: Compose::DestOut,
            ..Self::outline(color, width)
        }
    }

    pub fn with_fill(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    pub fn is_erasing(&self) -> bool {
        matches!(self.compose, Compose::DestOut)
    }

    /// Stroke parameters for backends built on kurbo strokes.
    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.width)
            .with_caps(Cap::Round)
            .with_join(Join::Round)
    }
}

/// How text is painted. Text is left-aligned and vertically centred on its
/// position.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f64,
    pub font_family: String,
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The committed drawing to paint.
    pub state: &'a DrawingState,
    /// Transient outline of an in-progress shape, painted last.
    pub preview: Option<Preview>,
    /// Pen or eraser stroke still being drawn.
    pub live_stroke: Option<InkStroke>,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(state: &'a DrawingState, viewport_size: Size) -> Self {
        Self {
            state,
            preview: None,
            live_stroke: None,
            viewport_size,
            background_color: Color::WHITE,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the in-progress shape preview.
    pub fn with_preview(mut self, preview: Option<Preview>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_live_stroke(mut self, stroke: Option<InkStroke>) -> Self {
        self.live_stroke = stroke;
        self
    }
}

/// Trait for rendering backends.
///
/// Backends only need primitive operations; frame composition lives in
/// [`render_frame`](crate::render_frame).
pub trait Renderer {
    /// Whether the drawing surface still exists.
    fn is_available(&self) -> bool {
        true
    }

    /// Fill the whole surface with `background`, dropping everything painted.
    fn clear(&mut self, background: Color, viewport: Size) -> RenderResult<()>;

    /// Paint a path.
    fn draw_path(&mut self, path: &BezPath, style: &PathStyle) -> RenderResult<()>;

    /// Paint a line of text.
    fn draw_text(&mut self, position: Point, text: &str, style: &TextStyle) -> RenderResult<()>;
}
