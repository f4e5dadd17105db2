//! Scene element types for annotating a photo
//!
//! All elements store coordinates in surface-pixel coordinates.

use uuid::Uuid;

use super::geometry::Point;
use crate::config::ShapeColor;

/// How a freehand stroke is composited
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrokeTool {
    #[default]
    Pen,
    /// Removes ink drawn earlier in the stroke pass instead of adding color
    Eraser,
}

/// Freehand stroke, immutable once committed
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Points in the order they were recorded
    pub points: Vec<Point>,
    pub color: ShapeColor,
    pub width: f32,
    pub tool: StrokeTool,
}

impl Stroke {
    /// Strokes with fewer than two points or no width render nothing
    pub fn is_visible(&self) -> bool {
        self.points.len() >= 2 && self.width > 0.0
    }
}

/// Geometric shape kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    /// Centered on `start`, radius is the distance from `start` to `end`
    Circle,
    Arrow,
}

/// Outline shape defined by the gesture's press and release points
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: Uuid,
    pub kind: ShapeKind,
    /// Press point
    pub start: Point,
    /// Release point (may lie above/left of `start`)
    pub end: Point,
    pub color: ShapeColor,
    pub width: f32,
}

impl Shape {
    pub fn new(kind: ShapeKind, start: Point, end: Point, color: ShapeColor, width: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start,
            end,
            color,
            width,
        }
    }
}

/// Text label placed at a point
#[derive(Clone, Debug, PartialEq)]
pub struct TextAnnotation {
    pub id: Uuid,
    /// Baseline origin of the first glyph
    pub position: Point,
    pub text: String,
    pub color: ShapeColor,
    pub font_size: f32,
}

impl TextAnnotation {
    /// Build a text annotation from raw prompt input
    ///
    /// Returns `None` when the input is empty after trimming.
    pub fn from_input(position: Point, input: &str, color: ShapeColor, font_size: f32) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            position,
            text: text.to_string(),
            color,
            font_size,
        })
    }
}
