//! Tool system for the whiteboard.

use crate::records::{ColorParseError, SerializableColor, ShapeKind, StrokeTool, TextElement};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected tool configuration change.
#[derive(Debug, Error, PartialEq)]
pub enum ToolError {
    #[error("Stroke width must be positive and finite, got {0}")]
    InvalidStrokeWidth(f64),
    #[error("Font size must be positive and finite, got {0}")]
    InvalidFontSize(f64),
    #[error("Font family must not be empty")]
    EmptyFontFamily,
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Rectangle,
    Circle,
    Line,
    Text,
}

impl ToolKind {
    /// Get all tools, in palette order.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Pen,
            ToolKind::Eraser,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Line,
            ToolKind::Text,
        ]
    }

    /// Freehand tools accumulate every pointer sample.
    pub fn is_freehand(self) -> bool {
        self.stroke_tool().is_some()
    }

    /// Geometric tools keep only a start and a live end point.
    pub fn is_geometric(self) -> bool {
        self.shape_kind().is_some()
    }

    pub fn stroke_tool(self) -> Option<StrokeTool> {
        match self {
            ToolKind::Pen => Some(StrokeTool::Pen),
            ToolKind::Eraser => Some(StrokeTool::Eraser),
            _ => None,
        }
    }

    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Line => Some(ShapeKind::Line),
            _ => None,
        }
    }

    /// Get display name for UI.
    pub fn display_name(self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Eraser => "Eraser",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Line => "Line",
            ToolKind::Text => "Text",
        }
    }
}

/// Tool configuration applied to new gestures.
///
/// Captured by value when a gesture starts, so later changes never reach a
/// gesture already in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: SerializableColor,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Pen,
            color: SerializableColor::black(),
            stroke_width: 3.0,
            font_size: TextElement::DEFAULT_FONT_SIZE,
            font_family: TextElement::DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl ToolSettings {
    /// Check every field against the record invariants.
    pub fn validate(&self) -> Result<(), ToolError> {
        check_stroke_width(self.stroke_width)?;
        check_font_size(self.font_size)?;
        if self.font_family.trim().is_empty() {
            return Err(ToolError::EmptyFontFamily);
        }
        Ok(())
    }
}

fn check_stroke_width(width: f64) -> Result<(), ToolError> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(ToolError::InvalidStrokeWidth(width))
    }
}

fn check_font_size(size: f64) -> Result<(), ToolError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(ToolError::InvalidFontSize(size))
    }
}

/// Owns the current tool configuration and validates change requests.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    settings: ToolSettings,
}

impl ToolManager {
    /// Create a new tool manager with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tool manager from validated settings.
    pub fn with_settings(settings: ToolSettings) -> Result<Self, ToolError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn current_tool(&self) -> ToolKind {
        self.settings.tool
    }

    /// Set the current tool. Does not affect a gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("Tool changed to {}", tool.display_name());
        self.settings.tool = tool;
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.settings.color = color;
    }

    /// Set the color from a hex string such as `#FF0000`.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ToolError> {
        self.settings.color = SerializableColor::from_hex(hex)?;
        Ok(())
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<(), ToolError> {
        check_stroke_width(width)?;
        self.settings.stroke_width = width;
        Ok(())
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<(), ToolError> {
        check_font_size(size)?;
        self.settings.font_size = size;
        Ok(())
    }

    pub fn set_font_family(&mut self, family: &str) -> Result<(), ToolError> {
        let family = family.trim();
        if family.is_empty() {
            return Err(ToolError::EmptyFontFamily);
        }
        self.settings.font_family = family.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tm = ToolManager::new();
        assert_eq!(tm.current_tool(), ToolKind::Pen);
        assert_eq!(tm.settings().color, SerializableColor::black());
        assert!((tm.settings().stroke_width - 3.0).abs() < f64::EPSILON);
        assert!((tm.settings().font_size - 16.0).abs() < f64::EPSILON);
        assert_eq!(tm.settings().font_family, "Arial, sans-serif");
    }

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool(), ToolKind::Rectangle);
    }

    #[test]
    fn test_tool_categories() {
        assert!(ToolKind::Pen.is_freehand());
        assert!(ToolKind::Eraser.is_freehand());
        assert!(ToolKind::Circle.is_geometric());
        assert!(!ToolKind::Text.is_freehand());
        assert!(!ToolKind::Text.is_geometric());
        assert_eq!(ToolKind::Line.shape_kind(), Some(ShapeKind::Line));
        assert_eq!(ToolKind::all().len(), 6);
    }

    #[test]
    fn test_rejects_invalid_changes() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.set_stroke_width(0.0), Err(ToolError::InvalidStrokeWidth(0.0)));
        assert!(tm.set_stroke_width(f64::INFINITY).is_err());
        assert_eq!(tm.set_font_size(-4.0), Err(ToolError::InvalidFontSize(-4.0)));
        assert_eq!(tm.set_font_family("  "), Err(ToolError::EmptyFontFamily));
        assert!(matches!(tm.set_color_hex("red"), Err(ToolError::Color(_))));

        // Nothing changed
        assert_eq!(tm.settings(), &ToolSettings::default());
    }

    #[test]
    fn test_accepts_valid_changes() {
        let mut tm = ToolManager::new();
        tm.set_stroke_width(12.0).unwrap();
        tm.set_font_size(24.0).unwrap();
        tm.set_font_family("Georgia, serif").unwrap();
        tm.set_color_hex("#FF0000").unwrap();

        let settings = tm.settings();
        assert!((settings.stroke_width - 12.0).abs() < f64::EPSILON);
        assert!((settings.font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(settings.font_family, "Georgia, serif");
        assert_eq!(settings.color, SerializableColor::new(255, 0, 0, 255));
    }

    #[test]
    fn test_with_settings_validates() {
        let settings = ToolSettings {
            stroke_width: -1.0,
            ..ToolSettings::default()
        };
        assert!(ToolManager::with_settings(settings).is_err());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: ToolSettings = serde_json::from_str(r##"{"tool":"circle","color":"#00FF00"}"##).unwrap();
        assert_eq!(settings.tool, ToolKind::Circle);
        assert_eq!(settings.color, SerializableColor::new(0, 255, 0, 255));
        assert!((settings.stroke_width - 3.0).abs() < f64::EPSILON);
    }
}
