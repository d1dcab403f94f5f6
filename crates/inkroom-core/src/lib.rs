//! InkRoom Core Library
//!
//! Platform-agnostic drawing records, input capture, history and rooms for
//! the InkRoom whiteboard.

pub mod canvas;
pub mod history;
pub mod input;
pub mod records;
pub mod room;
pub mod state;
pub mod text_entry;
pub mod tools;

pub use canvas::{Canvas, CanvasListener};
pub use history::{History, HistoryConfig};
pub use input::{CaptureOutcome, CaptureState, InputCapture, Modifiers, PointerEvent, Preview};
pub use records::{
    ColorParseError, Record, RecordId, RecordRef, SerializableColor, Shape, ShapeKind, Stroke,
    StrokePoint, StrokeTool, TextElement,
};
pub use room::{Room, RoomError, RoomId, RoomManager, User};
pub use state::DrawingState;
pub use text_entry::{TextEntryEvent, TextEntryId, TextEntryRequest, TextEntrySurface, TextField, TextKey};
pub use tools::{ToolError, ToolKind, ToolManager, ToolSettings};
