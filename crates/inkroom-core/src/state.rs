//! Committed drawing state.

use crate::records::{Record, RecordId, RecordRef, Shape, Stroke, TextElement};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// The canonical content of the drawing surface.
///
/// Grows by appending during normal drawing and is replaced wholesale on
/// undo, redo and clear. History snapshots are whole `DrawingState` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingState {
    pub strokes: Vec<Stroke>,
    pub shapes: Vec<Shape>,
    pub text_elements: Vec<TextElement>,
}

impl DrawingState {
    /// Create an empty drawing state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the state holds no records.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.shapes.is_empty() && self.text_elements.is_empty()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.strokes.len() + self.shapes.len() + self.text_elements.len()
    }

    /// Append a record.
    pub fn push(&mut self, record: Record) {
        match record {
            Record::Stroke(stroke) => self.strokes.push(stroke),
            Record::Shape(shape) => self.shapes.push(shape),
            Record::Text(text) => self.text_elements.push(text),
        }
    }

    /// Copy of this state with one more record appended.
    pub fn with_record(&self, record: Record) -> Self {
        let mut next = self.clone();
        next.push(record);
        next
    }

    /// Get a record by ID.
    pub fn get(&self, id: RecordId) -> Option<RecordRef<'_>> {
        self.paint_order().find(|record| record.id() == id)
    }

    /// Records in paint order: strokes by timestamp, then shapes, then text.
    ///
    /// Repainting in this order is idempotent, so text always sits above
    /// shapes and shapes above strokes.
    pub fn paint_order(&self) -> impl Iterator<Item = RecordRef<'_>> {
        let mut strokes: Vec<&Stroke> = self.strokes.iter().collect();
        strokes.sort_by_key(|stroke| stroke.timestamp);

        strokes
            .into_iter()
            .map(RecordRef::Stroke)
            .chain(self.shapes.iter().map(RecordRef::Shape))
            .chain(self.text_elements.iter().map(RecordRef::Text))
    }

    /// Get the bounding box of all records.
    pub fn bounds(&self) -> Option<Rect> {
        self.paint_order()
            .map(|record| record.bounds())
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Serialize the state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
