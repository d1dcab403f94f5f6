//! Canvas: the single mutation path from input to committed state.

use crate::history::{History, HistoryConfig};
use crate::input::{CaptureOutcome, InputCapture, PointerEvent, Preview};
use crate::records::{Record, Shape, Stroke, TextElement};
use crate::state::DrawingState;
use crate::text_entry::{TextEntryEvent, TextEntrySurface};
use crate::tools::ToolManager;

/// Notified once for every record committed to the canvas.
pub trait CanvasListener {
    fn on_stroke_complete(&mut self, _stroke: &Stroke) {}
    fn on_shape_complete(&mut self, _shape: &Shape) {}
    fn on_text_complete(&mut self, _text: &TextElement) {}
}

/// Drawing surface state: tool settings, gesture capture and history.
pub struct Canvas {
    /// Tool manager.
    pub tool_manager: ToolManager,
    capture: InputCapture,
    history: History,
    listeners: Vec<Box<dyn CanvasListener>>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty drawing.
    pub fn new() -> Self {
        Self::with_config(ToolManager::new(), HistoryConfig::default())
    }

    pub fn with_config(tool_manager: ToolManager, history: HistoryConfig) -> Self {
        Self {
            tool_manager,
            capture: InputCapture::new(),
            history: History::with_config(history),
            listeners: Vec::new(),
        }
    }

    /// Register a completion listener.
    pub fn add_listener(&mut self, listener: Box<dyn CanvasListener>) {
        self.listeners.push(listener);
    }

    /// Feed one pointer event.
    ///
    /// Text requests open `surface`; a completed gesture is committed to
    /// history before this returns.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        surface: &mut dyn TextEntrySurface,
    ) -> CaptureOutcome {
        let pending = self.capture.pending_text_id();
        let outcome = self.capture.handle(event, self.tool_manager.settings());
        match &outcome {
            CaptureOutcome::TextRequested(request) => surface.open(request),
            CaptureOutcome::Completed(record) => self.commit_record(record.clone()),
            CaptureOutcome::Cancelled => {
                if let Some(id) = pending {
                    surface.close(id);
                }
            }
            _ => {}
        }
        outcome
    }

    /// Apply a completion from the text-entry surface.
    ///
    /// The surface is always torn down. Returns the committed text element,
    /// if any.
    pub fn complete_text(
        &mut self,
        event: &TextEntryEvent,
        surface: &mut dyn TextEntrySurface,
    ) -> Option<TextElement> {
        surface.close(event.id());
        match self.capture.complete_text(event.id(), event.text()) {
            CaptureOutcome::Completed(Record::Text(text)) => {
                self.commit_record(Record::Text(text.clone()));
                Some(text)
            }
            _ => None,
        }
    }

    /// Drop any in-progress gesture or text entry, e.g. when the drawing
    /// surface goes away. Returns whether anything was aborted.
    pub fn abort_gesture(&mut self, surface: &mut dyn TextEntrySurface) -> bool {
        let pending = self.capture.pending_text_id();
        let aborted = self.capture.cancel() == CaptureOutcome::Cancelled;
        if let Some(id) = pending {
            surface.close(id);
        }
        aborted
    }

    /// Undo the last change.
    pub fn undo(&mut self) -> Option<&DrawingState> {
        self.history.undo()
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> Option<&DrawingState> {
        self.history.redo()
    }

    /// Replace the drawing with the empty state. Undoable.
    pub fn clear(&mut self) -> &DrawingState {
        log::info!("Clearing canvas");
        self.history.clear()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The committed drawing state.
    pub fn state(&self) -> &DrawingState {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn capture(&self) -> &InputCapture {
        &self.capture
    }

    /// Outline of the in-progress shape gesture, if any.
    pub fn preview(&self) -> Option<Preview> {
        self.capture.preview()
    }

    /// Freehand stroke being drawn, if any.
    pub fn live_stroke(&self) -> Option<Stroke> {
        self.capture.live_stroke()
    }

    fn commit_record(&mut self, record: Record) {
        let next = self.history.current().with_record(record.clone());
        self.history.commit(next);

        for listener in &mut self.listeners {
            match &record {
                Record::Stroke(stroke) => listener.on_stroke_complete(stroke),
                Record::Shape(shape) => listener.on_shape_complete(shape),
                Record::Text(text) => listener.on_text_complete(text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ShapeKind;
    use crate::text_entry::{TextField, TextKey};
    use crate::tools::ToolKind;
    use kurbo::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        strokes: usize,
        shapes: usize,
        texts: usize,
    }

    struct Recorder(Rc<RefCell<Counts>>);

    impl CanvasListener for Recorder {
        fn on_stroke_complete(&mut self, _stroke: &Stroke) {
            self.0.borrow_mut().strokes += 1;
        }

        fn on_shape_complete(&mut self, _shape: &Shape) {
            self.0.borrow_mut().shapes += 1;
        }

        fn on_text_complete(&mut self, _text: &TextElement) {
            self.0.borrow_mut().texts += 1;
        }
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            pressure: None,
        }
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
            pressure: None,
        }
    }

    fn up() -> PointerEvent {
        PointerEvent::Up { position: None }
    }

    fn draw_stroke(canvas: &mut Canvas, field: &mut TextField) {
        canvas.tool_manager.set_tool(ToolKind::Pen);
        canvas.handle_pointer(down(0.0, 0.0), field);
        canvas.handle_pointer(mv(10.0, 10.0), field);
        canvas.handle_pointer(up(), field);
    }

    fn draw_rect(canvas: &mut Canvas, field: &mut TextField) {
        canvas.tool_manager.set_tool(ToolKind::Rectangle);
        canvas.handle_pointer(down(0.0, 0.0), field);
        canvas.handle_pointer(mv(20.0, 20.0), field);
        canvas.handle_pointer(up(), field);
    }

    #[test]
    fn test_gestures_commit_snapshots() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        for n in 1..=3 {
            draw_stroke(&mut canvas, &mut field);
            assert_eq!(canvas.history().snapshot_count(), n + 1);
            assert_eq!(canvas.history().cursor(), n);
        }
        assert_eq!(canvas.state().strokes.len(), 3);
    }

    #[test]
    fn test_preview_never_commits() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        canvas.tool_manager.set_tool(ToolKind::Circle);
        canvas.handle_pointer(down(0.0, 0.0), &mut field);
        for i in 1..10 {
            let outcome = canvas.handle_pointer(mv(i as f64, 0.0), &mut field);
            assert!(matches!(outcome, CaptureOutcome::Preview(_)));
        }
        assert!(canvas.state().shapes.is_empty());
        assert_eq!(canvas.history().snapshot_count(), 1);
        assert_eq!(canvas.preview().map(|p| p.kind), Some(ShapeKind::Circle));

        canvas.handle_pointer(up(), &mut field);
        assert_eq!(canvas.state().shapes.len(), 1);
        assert!(canvas.preview().is_none());
    }

    #[test]
    fn test_undo_walk_after_stroke_and_shape() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        draw_stroke(&mut canvas, &mut field);
        draw_rect(&mut canvas, &mut field);

        let state = canvas.undo().unwrap();
        assert_eq!(state.strokes.len(), 1);
        assert!(state.shapes.is_empty());
        assert!(canvas.undo().unwrap().is_empty());
        assert!(canvas.undo().is_none());
        assert_eq!(canvas.redo().unwrap().strokes.len(), 1);
    }

    #[test]
    fn test_new_gesture_after_undo_discards_redo() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        draw_stroke(&mut canvas, &mut field);
        canvas.undo();
        draw_rect(&mut canvas, &mut field);

        assert!(!canvas.can_redo());
        assert_eq!(canvas.history().snapshot_count(), 2);
        assert_eq!(canvas.history().cursor(), 1);
        assert!(canvas.state().strokes.is_empty());
        assert_eq!(canvas.state().shapes.len(), 1);
    }

    #[test]
    fn test_tool_change_mid_gesture_keeps_captured_tool() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        canvas.handle_pointer(down(0.0, 0.0), &mut field);
        canvas.tool_manager.set_tool(ToolKind::Line);
        canvas.handle_pointer(mv(5.0, 5.0), &mut field);
        canvas.handle_pointer(up(), &mut field);

        assert_eq!(canvas.state().strokes.len(), 1);
        assert!(canvas.state().shapes.is_empty());
    }

    #[test]
    fn test_text_entry_flow() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        canvas.tool_manager.set_tool(ToolKind::Text);
        let outcome = canvas.handle_pointer(down(40.0, 50.0), &mut field);
        assert!(matches!(outcome, CaptureOutcome::TextRequested(_)));
        assert!(field.is_open());

        field.key(TextKey::Character("Hello".into()));
        let event = field.key(TextKey::Enter).unwrap();
        let text = canvas.complete_text(&event, &mut field).unwrap();
        assert_eq!(text.text, "Hello");
        assert_eq!(text.position, Point::new(40.0, 50.0));
        assert!(!field.is_open());

        // The trailing blur from the same field changes nothing
        assert!(field.blur().is_none());
        assert!(canvas.complete_text(&event, &mut field).is_none());
        assert_eq!(canvas.state().text_elements.len(), 1);
        assert_eq!(canvas.history().snapshot_count(), 2);
    }

    #[test]
    fn test_whitespace_text_leaves_state_unchanged() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        canvas.tool_manager.set_tool(ToolKind::Text);
        canvas.handle_pointer(down(0.0, 0.0), &mut field);
        field.key(TextKey::Character("   ".into()));
        let event = field.blur().unwrap();

        assert!(canvas.complete_text(&event, &mut field).is_none());
        assert!(canvas.state().is_empty());
        assert_eq!(canvas.history().snapshot_count(), 1);
        assert!(!field.is_open());
        assert!(canvas.capture().is_idle());
    }

    #[test]
    fn test_abort_closes_pending_text() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        canvas.tool_manager.set_tool(ToolKind::Text);
        canvas.handle_pointer(down(0.0, 0.0), &mut field);
        assert!(field.is_open());

        assert!(canvas.abort_gesture(&mut field));
        assert!(!field.is_open());
        assert!(canvas.capture().is_idle());
        assert!(!canvas.abort_gesture(&mut field));
    }

    #[test]
    fn test_listeners_fire_once_per_record() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut canvas = Canvas::new();
        canvas.add_listener(Box::new(Recorder(counts.clone())));
        let mut field = TextField::new();

        draw_stroke(&mut canvas, &mut field);
        draw_rect(&mut canvas, &mut field);
        canvas.tool_manager.set_tool(ToolKind::Text);
        canvas.handle_pointer(down(0.0, 0.0), &mut field);
        field.key(TextKey::Character("x".into()));
        let event = field.key(TextKey::Enter).unwrap();
        canvas.complete_text(&event, &mut field);
        canvas.complete_text(&event, &mut field);

        // Undo and clear are not completions
        canvas.undo();
        canvas.clear();

        let counts = counts.borrow();
        assert_eq!(counts.strokes, 1);
        assert_eq!(counts.shapes, 1);
        assert_eq!(counts.texts, 1);
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut canvas = Canvas::new();
        let mut field = TextField::new();
        draw_stroke(&mut canvas, &mut field);
        assert!(canvas.clear().is_empty());
        assert_eq!(canvas.undo().unwrap().strokes.len(), 1);
    }
}
