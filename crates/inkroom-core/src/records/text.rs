//! Text elements.

use super::{RecordId, RecordTrait, SerializableColor, now_millis};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed text element.
///
/// `position` is the left edge of the text, vertically centred on the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub(crate) id: RecordId,
    pub position: Point,
    /// Trimmed, never empty.
    pub text: String,
    pub color: SerializableColor,
    pub font_size: f64,
    pub font_family: String,
    pub timestamp: u64,
}

impl TextElement {
    /// Default font size in pixels.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    /// Default font family.
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial, sans-serif";

    /// Create a text element from raw entered text.
    ///
    /// The text is trimmed first; whitespace-only input yields `None`, as does a
    /// non-positive font size.
    pub fn new(
        position: Point,
        text: &str,
        color: SerializableColor,
        font_size: f64,
        font_family: impl Into<String>,
    ) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || !(font_size.is_finite() && font_size > 0.0) {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            position,
            text: text.to_string(),
            color,
            font_size,
            font_family: font_family.into(),
            timestamp: now_millis(),
        })
    }
}

impl RecordTrait for TextElement {
    fn id(&self) -> RecordId {
        self.id
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    // Approximate: without font metrics assume 0.6em per character.
    fn bounds(&self) -> Rect {
        let width = self.text.chars().count() as f64 * self.font_size * 0.6;
        let height = self.font_size * 1.2;
        Rect::new(
            self.position.x,
            self.position.y - height / 2.0,
            self.position.x + width,
            self.position.y + height / 2.0,
        )
    }

    fn color(&self) -> SerializableColor {
        self.color
    }
}
