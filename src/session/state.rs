//! Gesture and tool state for an editor session

use crate::config::{EditorConfig, ShapeColor, Tool};
use crate::domain::{Point, ShapeKind, StrokeTool};

/// Settings consumed by the next gesture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolSettings {
    pub tool: Tool,
    pub color: ShapeColor,
    pub width: f32,
    pub font_size: f32,
}

impl From<&EditorConfig> for ToolSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            tool: config.tool,
            color: config.color,
            width: config.stroke_width,
            font_size: config.font_size,
        }
    }
}

/// Uncommitted gesture in progress
///
/// Nothing here is part of the scene; it only becomes a scene element on commit.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Freehand points recorded so far (not rendered until release),
    /// with pen or eraser fixed at press time
    DraggingStroke { tool: StrokeTool, points: Vec<Point> },
    /// Shape drag started at `start`, previewed on every drag tick
    DraggingShape { kind: ShapeKind, start: Point },
    /// Text prompt open, anchored at the press point
    AwaitingText(Point),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }
}
