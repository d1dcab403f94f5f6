//! Frame composition: committed records in paint order, then the live preview.

use crate::renderer::{PathStyle, RenderContext, RenderResult, Renderer, RendererError, TextStyle};
use inkroom_core::input::Preview;
use inkroom_core::records::{RecordRef, Shape, Stroke, TextElement};
use inkroom_core::state::DrawingState;

/// Repaint the whole surface.
///
/// Clears to the background, paints the committed state, then the stroke
/// being drawn and the preview outline if set. Neither transient ever
/// reaches the drawing state.
pub fn render_frame<R: Renderer + ?Sized>(renderer: &mut R, ctx: &RenderContext) -> RenderResult<()> {
    if !renderer.is_available() {
        return Err(RendererError::SurfaceLost);
    }

    renderer.clear(ctx.background_color, ctx.viewport_size)?;
    paint_state(renderer, ctx.state)?;
    if let Some(stroke) = &ctx.live_stroke {
        paint_stroke(renderer, stroke)?;
    }
    if let Some(preview) = &ctx.preview {
        paint_preview(renderer, preview)?;
    }
    Ok(())
}

/// Paint every committed record: strokes, then shapes, then text.
pub fn paint_state<R: Renderer + ?Sized>(renderer: &mut R, state: &DrawingState) -> RenderResult<()> {
    for record in state.paint_order() {
        paint_record(renderer, record)?;
    }
    Ok(())
}

pub fn paint_record<R: Renderer + ?Sized>(renderer: &mut R, record: RecordRef<'_>) -> RenderResult<()> {
    match record {
        RecordRef::Stroke(stroke) => paint_stroke(renderer, stroke),
        RecordRef::Shape(shape) => paint_shape(renderer, shape),
        RecordRef::Text(text) => paint_text(renderer, text),
    }
}

fn paint_stroke<R: Renderer + ?Sized>(renderer: &mut R, stroke: &Stroke) -> RenderResult<()> {
    let style = if stroke.is_eraser() {
        PathStyle::eraser(stroke.color.into(), stroke.width)
    } else {
        PathStyle::outline(stroke.color.into(), stroke.width)
    };
    renderer.draw_path(&stroke.to_path(), &style)
}

fn paint_shape<R: Renderer + ?Sized>(renderer: &mut R, shape: &Shape) -> RenderResult<()> {
    let style = PathStyle::outline(shape.color.into(), shape.width).with_fill(shape.filled);
    renderer.draw_path(&shape.to_path(), &style)
}

fn paint_text<R: Renderer + ?Sized>(renderer: &mut R, text: &TextElement) -> RenderResult<()> {
    let style = TextStyle {
        color: text.color.into(),
        font_size: text.font_size,
        font_family: text.font_family.clone(),
    };
    renderer.draw_text(text.position, &text.text, &style)
}

/// Paint the transient outline of an in-progress shape.
pub fn paint_preview<R: Renderer + ?Sized>(renderer: &mut R, preview: &Preview) -> RenderResult<()> {
    let style = PathStyle::outline(preview.color.into(), preview.width);
    renderer.draw_path(&preview.outline(), &style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::{DisplayList, DrawCommand};
    use inkroom_core::records::{SerializableColor, ShapeKind, StrokePoint, StrokeTool};
    use kurbo::{Point, Shape as KurboShape, Size};

    fn stroke(tool: StrokeTool) -> Stroke {
        Stroke::new(
            vec![
                StrokePoint::new(Point::new(0.0, 0.0)),
                StrokePoint::new(Point::new(10.0, 0.0)),
            ],
            SerializableColor::new(255, 0, 0, 255),
            4.0,
            tool,
        )
        .unwrap()
    }

    fn sample_state() -> DrawingState {
        let text = TextElement::new(
            Point::new(5.0, 5.0),
            "hi",
            SerializableColor::black(),
            16.0,
            "serif",
        )
        .unwrap();
        let shape = Shape::new(
            ShapeKind::Rectangle,
            Point::ZERO,
            Point::new(10.0, 10.0),
            SerializableColor::black(),
            2.0,
        )
        .unwrap();
        let mut state = DrawingState::new();
        state.push(text.into());
        state.push(shape.into());
        state.push(stroke(StrokeTool::Pen).into());
        state
    }

    #[test]
    fn test_frame_paints_in_paint_order() {
        let state = sample_state();
        let mut list = DisplayList::new();
        let ctx = RenderContext::new(&state, Size::new(100.0, 100.0));
        render_frame(&mut list, &ctx).unwrap();

        let commands = list.commands();
        assert_eq!(commands.len(), 4);
        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
        // Stroke path is a polyline, shape path is a closed rectangle
        assert!(matches!(&commands[1], DrawCommand::Path { style, .. } if (style.width - 4.0).abs() < f64::EPSILON));
        assert!(matches!(&commands[2], DrawCommand::Path { style, .. } if (style.width - 2.0).abs() < f64::EPSILON));
        assert!(matches!(&commands[3], DrawCommand::Text { text, .. } if text == "hi"));
    }

    #[test]
    fn test_eraser_stroke_uses_dest_out() {
        let state = DrawingState::new().with_record(stroke(StrokeTool::Eraser).into());
        let mut list = DisplayList::new();
        paint_state(&mut list, &state).unwrap();

        let DrawCommand::Path { style, .. } = &list.commands()[0] else {
            panic!("expected a path");
        };
        assert!(style.is_erasing());
        assert_eq!(SerializableColor::from(style.color), SerializableColor::white());
    }

    #[test]
    fn test_preview_painted_last_and_not_committed() {
        let state = sample_state();
        let before = state.clone();
        let preview = Preview {
            kind: ShapeKind::Circle,
            start: Point::new(50.0, 50.0),
            end: Point::new(53.0, 54.0),
            color: SerializableColor::new(0, 0, 255, 255),
            width: 3.0,
        };
        let mut list = DisplayList::new();
        let ctx = RenderContext::new(&state, Size::new(100.0, 100.0)).with_preview(Some(preview));
        render_frame(&mut list, &ctx).unwrap();

        let DrawCommand::Path { path, style } = list.commands().last().unwrap() else {
            panic!("expected the preview path last");
        };
        let bounds = path.bounding_box();
        assert!((bounds.width() - 10.0).abs() < 1e-6);
        assert_eq!(SerializableColor::from(style.color), preview.color);
        assert_eq!(state, before);
    }

    #[test]
    fn test_live_stroke_painted_above_state() {
        let state = sample_state();
        let before = state.clone();
        let live = stroke(StrokeTool::Eraser);
        let mut list = DisplayList::new();
        let ctx = RenderContext::new(&state, Size::new(100.0, 100.0))
            .with_live_stroke(Some(live.clone()));
        render_frame(&mut list, &ctx).unwrap();

        assert_eq!(list.commands().len(), 5);
        let DrawCommand::Path { path, style } = list.commands().last().unwrap() else {
            panic!("expected the live stroke last");
        };
        assert!(style.is_erasing());
        assert_eq!(path, &live.to_path());
        assert_eq!(state, before);
    }

    #[test]
    fn test_repaint_is_idempotent() {
        let state = sample_state();
        let ctx = RenderContext::new(&state, Size::new(100.0, 100.0));
        let mut list = DisplayList::new();
        render_frame(&mut list, &ctx).unwrap();
        let first = list.commands().len();
        render_frame(&mut list, &ctx).unwrap();
        assert_eq!(list.commands().len(), first);
    }

    #[test]
    fn test_lost_surface_is_reported() {
        let state = sample_state();
        let mut list = DisplayList::new();
        list.detach();
        let ctx = RenderContext::new(&state, Size::new(100.0, 100.0));
        assert!(matches!(
            render_frame(&mut list, &ctx),
            Err(RendererError::SurfaceLost)
        ));
    }
}
