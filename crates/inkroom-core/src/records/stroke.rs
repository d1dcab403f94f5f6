//! Freehand strokes.

use super::{RecordId, RecordTrait, SerializableColor, now_millis};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sampled pointer position with optional pen pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    /// Pressure in `[0, 1]`, when the input device reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

impl StrokePoint {
    pub fn new(position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            pressure: None,
        }
    }

    /// Create a point with pressure, clamped to `[0, 1]`.
    pub fn with_pressure(position: Point, pressure: Option<f64>) -> Self {
        Self {
            x: position.x,
            y: position.y,
            pressure: pressure.filter(|p| p.is_finite()).map(|p| p.clamp(0.0, 1.0)),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for StrokePoint {
    fn from(position: Point) -> Self {
        Self::new(position)
    }
}

/// Freehand tool that produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    Pen,
    /// Removes paint instead of adding it. Still recorded so undo can restore it.
    Eraser,
}

/// A completed freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: RecordId,
    /// Points in input order; never empty.
    pub points: Vec<StrokePoint>,
    pub color: SerializableColor,
    pub width: f64,
    pub tool: StrokeTool,
    pub timestamp: u64,
}

impl Stroke {
    /// Color recorded for eraser strokes.
    pub const ERASE_COLOR: SerializableColor = SerializableColor::white();

    /// Create a stroke stamped with the current time.
    ///
    /// Returns `None` for an empty point list or a non-positive width.
    /// Eraser strokes always carry [`Stroke::ERASE_COLOR`].
    pub fn new(
        points: Vec<StrokePoint>,
        color: SerializableColor,
        width: f64,
        tool: StrokeTool,
    ) -> Option<Self> {
        if points.is_empty() || !(width.is_finite() && width > 0.0) {
            return None;
        }
        let color = match tool {
            StrokeTool::Pen => color,
            StrokeTool::Eraser => Self::ERASE_COLOR,
        };
        Some(Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
            tool,
            timestamp: now_millis(),
        })
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed stroke.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == StrokeTool::Eraser
    }

    /// Polyline through every point. A single-point stroke becomes a
    /// zero-length segment so round caps still paint a dot.
    pub fn to_path(&self) -> BezPath {
        polyline(&self.points)
    }
}

/// Build a polyline path through stroke points.
fn polyline(points: &[StrokePoint]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };

    path.move_to(first.position());
    if points.len() == 1 {
        path.line_to(first.position());
    } else {
        for point in &points[1..] {
            path.line_to(point.position());
        }
    }
    path
}

impl RecordTrait for Stroke {
    fn id(&self) -> RecordId {
        self.id
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };

        let half = self.width / 2.0;
        self.points
            .iter()
            .fold(Rect::from_points(first.position(), first.position()), |rect, p| {
                rect.union_pt(p.position())
            })
            .inflate(half, half)
    }

    fn color(&self) -> SerializableColor {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(f64, f64)]) -> Vec<StrokePoint> {
        coords
            .iter()
            .map(|&(x, y)| StrokePoint::new(Point::new(x, y)))
            .collect()
    }

    #[test]
    fn test_stroke_creation() {
        let stroke = Stroke::new(
            points(&[(0.0, 0.0), (10.0, 10.0)]),
            SerializableColor::black(),
            3.0,
            StrokeTool::Pen,
        )
        .unwrap();
        assert_eq!(stroke.len(), 2);
        assert_eq!(stroke.color, SerializableColor::black());
        assert!(!stroke.is_eraser());
    }

    #[test]
    fn test_rejects_empty_or_zero_width() {
        assert!(Stroke::new(Vec::new(), SerializableColor::black(), 3.0, StrokeTool::Pen).is_none());
        assert!(
            Stroke::new(points(&[(0.0, 0.0)]), SerializableColor::black(), 0.0, StrokeTool::Pen)
                .is_none()
        );
        assert!(
            Stroke::new(points(&[(0.0, 0.0)]), SerializableColor::black(), f64::NAN, StrokeTool::Pen)
                .is_none()
        );
    }

    #[test]
    fn test_eraser_forces_erase_color() {
        let red = SerializableColor::new(255, 0, 0, 255);
        let stroke = Stroke::new(points(&[(0.0, 0.0)]), red, 8.0, StrokeTool::Eraser).unwrap();
        assert_eq!(stroke.color, Stroke::ERASE_COLOR);
        assert!(stroke.is_eraser());
    }

    #[test]
    fn test_pressure_is_clamped() {
        let p = StrokePoint::with_pressure(Point::new(1.0, 2.0), Some(1.7));
        assert_eq!(p.pressure, Some(1.0));
        let p = StrokePoint::with_pressure(Point::new(1.0, 2.0), Some(-0.5));
        assert_eq!(p.pressure, Some(0.0));
        let p = StrokePoint::with_pressure(Point::new(1.0, 2.0), Some(f64::NAN));
        assert_eq!(p.pressure, None);
    }

    #[test]
    fn test_bounds() {
        let stroke = Stroke::new(
            points(&[(0.0, 0.0), (100.0, 50.0), (50.0, 100.0)]),
            SerializableColor::black(),
            2.0,
            StrokeTool::Pen,
        )
        .unwrap();

        let bounds = stroke.bounds();
        assert!((bounds.x0 + 1.0).abs() < f64::EPSILON);
        assert!((bounds.y0 + 1.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 101.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_point_path_is_a_dot() {
        let stroke = Stroke::new(
            points(&[(5.0, 5.0)]),
            SerializableColor::black(),
            4.0,
            StrokeTool::Pen,
        )
        .unwrap();
        assert_eq!(stroke.to_path().elements().len(), 2);
    }
}
