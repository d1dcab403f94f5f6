//! Scripted event replay.
//!
//! A script is a JSON array of events fed to a [`Session`] in order, with a
//! virtual clock that only moves on `wait` events.

use crate::session::Session;
use inkroom_core::input::{CaptureOutcome, Modifiers, PointerEvent};
use inkroom_core::room::RoomError;
use inkroom_core::tools::{ToolError, ToolKind, ToolManager};
use inkroom_render::DisplayList;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Event {index}: {source}")]
    Tool {
        index: usize,
        #[source]
        source: ToolError,
    },
    #[error("Event {index}: {source}")]
    Room {
        index: usize,
        #[source]
        source: RoomError,
    },
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        pressure: Option<f64>,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        pressure: Option<f64>,
    },
    /// Pointer release; omit the position for a touch-end.
    Up {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    Cancel,
    Tool {
        tool: ToolKind,
    },
    Color {
        color: String,
    },
    StrokeWidth {
        width: f64,
    },
    FontSize {
        size: f64,
    },
    FontFamily {
        family: String,
    },
    /// Type into the open text entry.
    Type {
        text: String,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Blur,
    Undo,
    Redo,
    Clear,
    CreateRoom {
        name: String,
        #[serde(default)]
        private: bool,
    },
    /// Join by room id or share link.
    JoinRoom {
        room: String,
    },
    LeaveRoom,
    /// Advance the virtual clock.
    Wait {
        ms: u64,
    },
    DetachSurface,
    AttachSurface,
}

impl ScriptEvent {
    fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            ScriptEvent::Down { x, y, pressure } => Some(PointerEvent::Down {
                position: Point::new(x, y),
                pressure,
            }),
            ScriptEvent::Move { x, y, pressure } => Some(PointerEvent::Move {
                position: Point::new(x, y),
                pressure,
            }),
            ScriptEvent::Up { x, y } => Some(PointerEvent::Up {
                position: x.zip(y).map(|(x, y)| Point::new(x, y)),
            }),
            ScriptEvent::Cancel => Some(PointerEvent::Cancel),
            _ => None,
        }
    }
}

/// Parse a script from JSON.
pub fn parse(json: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a script file.
pub fn load(path: &Path) -> Result<Vec<ScriptEvent>, ScriptError> {
    let json = std::fs::read_to_string(path)?;
    parse(&json)
}

/// What a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    /// Records produced by completed gestures.
    pub records: usize,
    /// Simulated participants that joined.
    pub joins: usize,
    /// Virtual time elapsed.
    pub elapsed: Duration,
}

/// Replay `events` through `session`, starting the virtual clock at `start`.
pub fn run(
    session: &mut Session<DisplayList>,
    events: &[ScriptEvent],
    start: Instant,
) -> Result<ReplaySummary, ScriptError> {
    let mut summary = ReplaySummary::default();

    for (index, event) in events.iter().enumerate() {
        log::debug!("Event {}: {:?}", index, event);
        summary.events += 1;

        if let Some(pointer) = event.pointer_event() {
            if let CaptureOutcome::Completed(_) = session.pointer(pointer) {
                summary.records += 1;
            }
            continue;
        }

        let tool_err = |source| ScriptError::Tool { index, source };
        let room_err = |source| ScriptError::Room { index, source };
        let texts_before = session.state().text_elements.len();
        match event {
            ScriptEvent::Tool { tool } => tools(session).set_tool(*tool),
            ScriptEvent::Color { color } => tools(session).set_color_hex(color).map_err(tool_err)?,
            ScriptEvent::StrokeWidth { width } => {
                tools(session).set_stroke_width(*width).map_err(tool_err)?
            }
            ScriptEvent::FontSize { size } => tools(session).set_font_size(*size).map_err(tool_err)?,
            ScriptEvent::FontFamily { family } => {
                tools(session).set_font_family(family).map_err(tool_err)?
            }
            ScriptEvent::Type { text } => session.type_text(text),
            ScriptEvent::Key { key, modifiers } => {
                session.key(key, *modifiers);
            }
            ScriptEvent::Blur => session.blur(),
            ScriptEvent::Undo => {
                session.undo();
            }
            ScriptEvent::Redo => {
                session.redo();
            }
            ScriptEvent::Clear => session.clear(),
            ScriptEvent::CreateRoom { name, private } => {
                session.create_room(name, *private).map_err(room_err)?;
            }
            ScriptEvent::JoinRoom { room } => {
                session
                    .join_room(room, start + summary.elapsed)
                    .map_err(room_err)?;
            }
            ScriptEvent::LeaveRoom => {
                session.leave_room().map_err(room_err)?;
            }
            ScriptEvent::Wait { ms } => {
                summary.elapsed += Duration::from_millis(*ms);
                if session.tick(start + summary.elapsed).is_some() {
                    summary.joins += 1;
                }
            }
            ScriptEvent::DetachSurface => session.renderer_mut().detach(),
            ScriptEvent::AttachSurface => session.renderer_mut().attach(),
            ScriptEvent::Down { .. }
            | ScriptEvent::Move { .. }
            | ScriptEvent::Up { .. }
            | ScriptEvent::Cancel => {}
        }

        // Text entries finish on keys and blur rather than pointer events
        if matches!(event, ScriptEvent::Key { .. } | ScriptEvent::Blur)
            && session.state().text_elements.len() > texts_before
        {
            summary.records += 1;
        }
    }

    log::info!(
        "Replayed {} events: {} records, {} participant(s) joined",
        summary.events,
        summary.records,
        summary.joins
    );
    Ok(summary)
}

fn tools(session: &mut Session<DisplayList>) -> &mut ToolManager {
    &mut session.canvas_mut().tool_manager
}
