//! Pointer input capture.
//!
//! [`InputCapture`] turns a stream of pointer events into finalized drawing
//! records. It owns only transient gesture data; committing records is the
//! caller's job.

use crate::records::{Record, SerializableColor, Shape, ShapeKind, Stroke, StrokePoint, TextElement};
use crate::text_entry::{TextEntryId, TextEntryRequest};
use crate::tools::ToolSettings;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        pressure: Option<f64>,
    },
    Move {
        position: Point,
        #[serde(default)]
        pressure: Option<f64>,
    },
    /// Touch-end carries no position.
    Up {
        #[serde(default)]
        position: Option<Point>,
    },
    Cancel,
}

/// Gesture-specific data collected between down and up.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureBuffer {
    /// Every sampled point, in input order.
    Freehand(Vec<StrokePoint>),
    Geometric(ShapeKind),
}

/// An in-progress pen, eraser or shape gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    /// Tool configuration at pointer-down.
    pub settings: ToolSettings,
    pub start: Point,
    /// Last tracked pointer position.
    pub current: Point,
    pub buffer: GestureBuffer,
}

impl Gesture {
    /// Transient outline for geometric gestures.
    pub fn preview(&self) -> Option<Preview> {
        match self.buffer {
            GestureBuffer::Geometric(kind) => Some(Preview {
                kind,
                start: self.start,
                end: self.current,
                color: self.settings.color,
                width: self.settings.stroke_width,
            }),
            GestureBuffer::Freehand(_) => None,
        }
    }

    /// Points sampled so far by a pen or eraser gesture, styled with the
    /// captured settings. Not committed.
    pub fn live_stroke(&self) -> Option<Stroke> {
        let GestureBuffer::Freehand(points) = &self.buffer else {
            return None;
        };
        let tool = self.settings.tool.stroke_tool()?;
        Stroke::new(
            points.clone(),
            self.settings.color,
            self.settings.stroke_width,
            tool,
        )
    }

    fn finish(self, end: Point) -> Option<Record> {
        let settings = self.settings;
        match self.buffer {
            GestureBuffer::Freehand(points) => {
                let tool = settings.tool.stroke_tool()?;
                Stroke::new(points, settings.color, settings.stroke_width, tool).map(Record::from)
            }
            GestureBuffer::Geometric(kind) => {
                Shape::new(kind, self.start, end, settings.color, settings.stroke_width)
                    .map(Record::from)
            }
        }
    }
}

/// Capture state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CaptureState {
    #[default]
    Idle,
    Drawing(Gesture),
    /// Waiting for the text-entry surface to report back.
    TextPending(TextEntryRequest),
}

/// Transient outline of an in-progress shape. Never committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
    pub color: SerializableColor,
    pub width: f64,
}

impl Preview {
    pub fn outline(&self) -> BezPath {
        self.kind.outline(self.start, self.end)
    }
}

/// Result of feeding one event to the capture machine.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Nothing changed.
    Ignored,
    /// A pen, eraser or shape gesture began.
    Started,
    /// A point was appended to a freehand gesture.
    Extended,
    /// A shape gesture moved; the preview should be repainted.
    Preview(Preview),
    /// The text tool wants a value from the text-entry surface.
    TextRequested(TextEntryRequest),
    /// A gesture finished and produced a record.
    Completed(Record),
    /// The gesture or text entry ended without a record.
    Cancelled,
}

/// Pointer input state machine.
#[derive(Debug, Clone, Default)]
pub struct InputCapture {
    state: CaptureState,
    next_text_id: u64,
}

impl InputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one pointer event. `settings` is only read on pointer-down.
    pub fn handle(&mut self, event: PointerEvent, settings: &ToolSettings) -> CaptureOutcome {
        match event {
            PointerEvent::Down { position, pressure } => {
                self.pointer_down(position, pressure, settings)
            }
            PointerEvent::Move { position, pressure } => self.pointer_move(position, pressure),
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    /// Start a gesture with a copy of the current tool settings.
    pub fn pointer_down(
        &mut self,
        position: Point,
        pressure: Option<f64>,
        settings: &ToolSettings,
    ) -> CaptureOutcome {
        if !self.is_idle() {
            log::warn!("Ignoring pointer-down at {:?}: a gesture is already active", position);
            return CaptureOutcome::Ignored;
        }

        let tool = settings.tool;
        let buffer = if tool.is_freehand() {
            GestureBuffer::Freehand(vec![StrokePoint::with_pressure(position, pressure)])
        } else if let Some(kind) = tool.shape_kind() {
            GestureBuffer::Geometric(kind)
        } else {
            let request = TextEntryRequest {
                id: TextEntryId(self.next_text_id),
                position,
                color: settings.color,
                font_size: settings.font_size,
                font_family: settings.font_family.clone(),
            };
            self.next_text_id += 1;
            log::debug!("Requesting {} at {:?}", request.id, position);
            self.state = CaptureState::TextPending(request.clone());
            return CaptureOutcome::TextRequested(request);
        };

        log::debug!("Starting {} gesture at {:?}", tool.display_name(), position);
        self.state = CaptureState::Drawing(Gesture {
            settings: settings.clone(),
            start: position,
            current: position,
            buffer,
        });
        CaptureOutcome::Started
    }

    /// Track the pointer while drawing.
    pub fn pointer_move(&mut self, position: Point, pressure: Option<f64>) -> CaptureOutcome {
        let CaptureState::Drawing(gesture) = &mut self.state else {
            return CaptureOutcome::Ignored;
        };

        gesture.current = position;
        if let GestureBuffer::Freehand(points) = &mut gesture.buffer {
            points.push(StrokePoint::with_pressure(position, pressure));
            return CaptureOutcome::Extended;
        }
        gesture
            .preview()
            .map_or(CaptureOutcome::Ignored, CaptureOutcome::Preview)
    }

    /// Finish the gesture. Without an up position the last tracked one is used.
    pub fn pointer_up(&mut self, position: Option<Point>) -> CaptureOutcome {
        if !matches!(self.state, CaptureState::Drawing(_)) {
            return CaptureOutcome::Ignored;
        }
        let CaptureState::Drawing(gesture) = std::mem::take(&mut self.state) else {
            return CaptureOutcome::Ignored;
        };

        let end = position.unwrap_or(gesture.current);
        match gesture.finish(end) {
            Some(record) => CaptureOutcome::Completed(record),
            None => {
                log::warn!("Gesture produced no record");
                CaptureOutcome::Cancelled
            }
        }
    }

    /// Abort whatever is in progress. No record is produced.
    pub fn cancel(&mut self) -> CaptureOutcome {
        match std::mem::take(&mut self.state) {
            CaptureState::Idle => CaptureOutcome::Ignored,
            CaptureState::Drawing(_) => {
                log::debug!("Gesture cancelled");
                CaptureOutcome::Cancelled
            }
            CaptureState::TextPending(request) => {
                log::debug!("{} cancelled", request.id);
                CaptureOutcome::Cancelled
            }
        }
    }

    /// Finish a pending text entry.
    ///
    /// Completions for any id other than the pending one are ignored, so each
    /// request completes at most once. `None` or whitespace-only text ends the
    /// entry without a record.
    pub fn complete_text(&mut self, id: TextEntryId, text: Option<&str>) -> CaptureOutcome {
        if self.pending_text_id() != Some(id) {
            log::debug!("Ignoring stale completion for {}", id);
            return CaptureOutcome::Ignored;
        }
        let CaptureState::TextPending(request) = std::mem::take(&mut self.state) else {
            return CaptureOutcome::Ignored;
        };

        text.and_then(|text| {
            TextElement::new(
                request.position,
                text,
                request.color,
                request.font_size,
                request.font_family,
            )
        })
        .map_or(CaptureOutcome::Cancelled, |element| {
            CaptureOutcome::Completed(element.into())
        })
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, CaptureState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing(_))
    }

    /// Id of the text entry currently awaited, if any.
    pub fn pending_text_id(&self) -> Option<TextEntryId> {
        match &self.state {
            CaptureState::TextPending(request) => Some(request.id),
            _ => None,
        }
    }

    /// Preview of the in-progress shape gesture, if any.
    pub fn preview(&self) -> Option<Preview> {
        match &self.state {
            CaptureState::Drawing(gesture) => gesture.preview(),
            _ => None,
        }
    }

    /// The in-progress pen or eraser stroke, if any.
    pub fn live_stroke(&self) -> Option<Stroke> {
        match &self.state {
            CaptureState::Drawing(gesture) => gesture.live_stroke(),
            _ => None,
        }
    }
}
