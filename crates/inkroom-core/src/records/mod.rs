//! Drawing record definitions.
//!
//! Records are created exactly once, when a gesture completes, and are never
//! mutated afterwards. The committed drawing state and every history snapshot
//! hold them by value.

mod shape;
mod stroke;
mod text;

pub use shape::{Shape, ShapeKind};
pub use stroke::{Stroke, StrokePoint, StrokeTool};
pub use text::TextElement;

use kurbo::Rect;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// Use web-time on WASM, std::time otherwise
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for drawing records.
pub type RecordId = Uuid;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Errors produced when parsing a CSS-style hex color.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Invalid color length: {0}")]
    InvalidLength(String),
    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// Serializable color representation (RGBA8).
///
/// Serialized as a hex string (`#RRGGBB`, or `#RRGGBBAA` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(hex.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(hex.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidDigit(hex.to_string()))
        };

        match digits.len() {
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Self::new(short(0)?, short(1)?, short(2)?, 255))
            }
            6 | 8 => {
                let alpha = if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    255
                };
                Ok(Self::new(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                    alpha,
                ))
            }
            _ => Err(ColorParseError::InvalidLength(hex.to_string())),
        }
    }

    /// Format as an uppercase hex string.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Common behaviour of all committed records.
pub trait RecordTrait {
    /// Get the unique identifier.
    fn id(&self) -> RecordId;

    /// Creation time in milliseconds since the Unix epoch.
    fn timestamp(&self) -> u64;

    /// Get the bounding box in surface coordinates.
    fn bounds(&self) -> Rect;

    /// The color the record is painted with.
    fn color(&self) -> SerializableColor;
}

/// A finalized drawing record, as emitted by one completed gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Record {
    Stroke(Stroke),
    Shape(Shape),
    Text(TextElement),
}

impl Record {
    pub fn id(&self) -> RecordId {
        self.as_record_ref().id()
    }

    pub fn timestamp(&self) -> u64 {
        self.as_record_ref().timestamp()
    }

    pub fn bounds(&self) -> Rect {
        self.as_record_ref().bounds()
    }

    /// Borrow this record as a [`RecordRef`].
    pub fn as_record_ref(&self) -> RecordRef<'_> {
        match self {
            Record::Stroke(s) => RecordRef::Stroke(s),
            Record::Shape(s) => RecordRef::Shape(s),
            Record::Text(t) => RecordRef::Text(t),
        }
    }
}

impl From<Stroke> for Record {
    fn from(stroke: Stroke) -> Self {
        Record::Stroke(stroke)
    }
}

impl From<Shape> for Record {
    fn from(shape: Shape) -> Self {
        Record::Shape(shape)
    }
}

impl From<TextElement> for Record {
    fn from(text: TextElement) -> Self {
        Record::Text(text)
    }
}

/// Borrowed view of a record inside a drawing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordRef<'a> {
    Stroke(&'a Stroke),
    Shape(&'a Shape),
    Text(&'a TextElement),
}

impl RecordRef<'_> {
    fn inner(&self) -> &dyn RecordTrait {
        match self {
            RecordRef::Stroke(s) => *s,
            RecordRef::Shape(s) => *s,
            RecordRef::Text(t) => *t,
        }
    }

    pub fn id(&self) -> RecordId {
        self.inner().id()
    }

    pub fn timestamp(&self) -> u64 {
        self.inner().timestamp()
    }

    pub fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    pub fn color(&self) -> SerializableColor {
        self.inner().color()
    }
}
