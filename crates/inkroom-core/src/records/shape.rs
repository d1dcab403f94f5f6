//! Geometric shapes: rectangles, circles and lines.

use super::{RecordId, RecordTrait, SerializableColor, now_millis};
use kurbo::{BezPath, Circle, Line, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flattening tolerance used when converting curves to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Kind of geometric shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
}

impl ShapeKind {
    /// Outline spanned by a start and end point.
    ///
    /// Rectangles span both corners, circles are centred on `start` with the
    /// radius reaching `end`, and lines join the two points. Live previews
    /// and committed shapes share this geometry.
    pub fn outline(self, start: Point, end: Point) -> BezPath {
        match self {
            ShapeKind::Rectangle => Rect::from_points(start, end).to_path(PATH_TOLERANCE),
            ShapeKind::Circle => Circle::new(start, start.distance(end)).to_path(PATH_TOLERANCE),
            ShapeKind::Line => Line::new(start, end).to_path(PATH_TOLERANCE),
        }
    }

    /// Bounding box of the outline spanned by `start` and `end`.
    pub fn extent(self, start: Point, end: Point) -> Rect {
        match self {
            ShapeKind::Rectangle | ShapeKind::Line => Rect::from_points(start, end),
            ShapeKind::Circle => Circle::new(start, start.distance(end)).bounding_box(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
        }
    }
}

/// A completed geometric shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub(crate) id: RecordId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub start_point: Point,
    pub end_point: Point,
    pub color: SerializableColor,
    pub width: f64,
    pub filled: bool,
    pub timestamp: u64,
}

impl Shape {
    /// Create an unfilled shape stamped with the current time.
    ///
    /// Zero-extent shapes (start equals end) are accepted. Returns `None` for a
    /// non-positive width.
    pub fn new(
        kind: ShapeKind,
        start_point: Point,
        end_point: Point,
        color: SerializableColor,
        width: f64,
    ) -> Option<Self> {
        if !(width.is_finite() && width > 0.0) {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            kind,
            start_point,
            end_point,
            color,
            width,
            filled: false,
            timestamp: now_millis(),
        })
    }

    /// Check whether the pointer never moved away from the start point.
    pub fn is_degenerate(&self) -> bool {
        self.start_point == self.end_point
    }

    pub fn to_path(&self) -> BezPath {
        self.kind.outline(self.start_point, self.end_point)
    }
}

impl RecordTrait for Shape {
    fn id(&self) -> RecordId {
        self.id
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn bounds(&self) -> Rect {
        let half = self.width / 2.0;
        self.kind
            .extent(self.start_point, self.end_point)
            .inflate(half, half)
    }

    fn color(&self) -> SerializableColor {
        self.color
    }
}
