//! Text entry requests and the headless text field.
//!
//! When the text tool is pressed on the surface, the capture machine issues a
//! [`TextEntryRequest`] and waits. A [`TextEntrySurface`] shows an input at the
//! requested position and eventually reports one [`TextEntryEvent`]. Each
//! request carries a fresh [`TextEntryId`]; completions for any other id are
//! ignored, so a blur racing an Enter can only finish the entry once.

use crate::records::SerializableColor;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one text-entry request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextEntryId(pub u64);

impl fmt::Display for TextEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text-entry-{}", self.0)
    }
}

/// What the text-entry surface needs to show an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEntryRequest {
    pub id: TextEntryId,
    pub position: Point,
    pub color: SerializableColor,
    pub font_size: f64,
    pub font_family: String,
}

/// How a text entry finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TextEntryEvent {
    /// Enter was pressed.
    Submitted { id: TextEntryId, text: String },
    /// The input lost focus; whatever was typed is kept.
    Blurred { id: TextEntryId, text: String },
    /// Escape was pressed; nothing is kept.
    Cancelled { id: TextEntryId },
}

impl TextEntryEvent {
    pub fn id(&self) -> TextEntryId {
        match self {
            TextEntryEvent::Submitted { id, .. }
            | TextEntryEvent::Blurred { id, .. }
            | TextEntryEvent::Cancelled { id } => *id,
        }
    }

    /// The entered text, if the entry was not cancelled.
    pub fn text(&self) -> Option<&str> {
        match self {
            TextEntryEvent::Submitted { text, .. } | TextEntryEvent::Blurred { text, .. } => {
                Some(text)
            }
            TextEntryEvent::Cancelled { .. } => None,
        }
    }
}

/// Provider of text input UI.
///
/// `close` must be idempotent: it is called after every completion, after
/// aborted gestures, and possibly for an id that is already closed.
pub trait TextEntrySurface {
    /// Show an input for the request.
    fn open(&mut self, request: &TextEntryRequest);

    /// Tear down the input for `id`, if it is still shown.
    fn close(&mut self, id: TextEntryId);
}

/// Key presses understood by [`TextField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
pub enum TextKey {
    Character(String),
    Backspace,
    Enter,
    Escape,
}

#[derive(Debug, Clone)]
struct OpenField {
    request: TextEntryRequest,
    buffer: String,
    finished: bool,
}

/// Headless single-line text input.
///
/// Emits at most one [`TextEntryEvent`] per opened request; keys and blurs
/// after that are swallowed until the field is closed and reopened.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    active: Option<OpenField>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// The request currently being edited.
    pub fn request(&self) -> Option<&TextEntryRequest> {
        self.active.as_ref().map(|field| &field.request)
    }

    /// Text typed so far.
    pub fn buffer(&self) -> Option<&str> {
        self.active.as_ref().map(|field| field.buffer.as_str())
    }

    /// Feed one key press. Returns the completion event on Enter or Escape.
    pub fn key(&mut self, key: TextKey) -> Option<TextEntryEvent> {
        let field = self.active.as_mut().filter(|field| !field.finished)?;
        match key {
            TextKey::Character(s) => {
                field.buffer.push_str(&s);
                None
            }
            TextKey::Backspace => {
                field.buffer.pop();
                None
            }
            TextKey::Enter => {
                field.finished = true;
                Some(TextEntryEvent::Submitted {
                    id: field.request.id,
                    text: field.buffer.clone(),
                })
            }
            TextKey::Escape => {
                field.finished = true;
                Some(TextEntryEvent::Cancelled {
                    id: field.request.id,
                })
            }
        }
    }

    /// Focus left the field.
    pub fn blur(&mut self) -> Option<TextEntryEvent> {
        let field = self.active.as_mut().filter(|field| !field.finished)?;
        field.finished = true;
        Some(TextEntryEvent::Blurred {
            id: field.request.id,
            text: field.buffer.clone(),
        })
    }
}

impl TextEntrySurface for TextField {
    fn open(&mut self, request: &TextEntryRequest) {
        if let Some(previous) = &self.active {
            log::debug!("Replacing open text field {}", previous.request.id);
        }
        self.active = Some(OpenField {
            request: request.clone(),
            buffer: String::new(),
            finished: false,
        });
    }

    fn close(&mut self, id: TextEntryId) {
        if self.active.as_ref().is_some_and(|field| field.request.id == id) {
            self.active = None;
        }
    }
}
