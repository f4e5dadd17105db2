//! Message types for an editor session
//!
//! This module contains:
//! - EditorMsg enum with nested sub-enums for organized message handling
//! - Convenience constructors for the common messages
//!
//! Messages deserialize from JSON so a session can be replayed from a script.

use serde::{Deserialize, Serialize};

use crate::config::{ShapeColor, Tool};
use crate::domain::Point;

// ============================================================================
// Pointer Gesture Types
// ============================================================================

/// The three phases of a pointer gesture, in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    /// Pointer pressed
    Press(Point),
    /// Pointer moved while pressed
    Drag(Point),
    /// Pointer released
    Release(Point),
}

/// Inline text prompt messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMsg {
    /// Confirm the prompt with the typed input
    Submit(String),
    /// Close the prompt without adding anything
    Cancel,
}

/// Tool configuration messages (never repaint on their own)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMsg {
    /// Switch the active tool
    Select(Tool),
    /// Cycle to the next tool
    Next,
    /// Set drawing color
    Color(ShapeColor),
    /// Set stroke/shape width
    Width(f32),
    /// Set text size
    FontSize(f32),
}

// ============================================================================
// Main Message Enum
// ============================================================================

/// All messages an editor session understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMsg {
    /// Pointer gesture phases
    Pointer(PointerAction),
    /// Text prompt messages
    Text(TextMsg),
    /// Tool configuration messages
    Tool(ToolMsg),
    /// Replace the caption
    Caption(String),
    /// Clear every committed element, only when confirmed
    ClearAll { confirmed: bool },
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl EditorMsg {
    pub fn press(x: f32, y: f32) -> Self {
        Self::Pointer(PointerAction::Press(Point::new(x, y)))
    }
    pub fn drag(x: f32, y: f32) -> Self {
        Self::Pointer(PointerAction::Drag(Point::new(x, y)))
    }
    pub fn release(x: f32, y: f32) -> Self {
        Self::Pointer(PointerAction::Release(Point::new(x, y)))
    }
    pub fn select_tool(tool: Tool) -> Self {
        Self::Tool(ToolMsg::Select(tool))
    }
    pub fn submit_text(text: impl Into<String>) -> Self {
        Self::Text(TextMsg::Submit(text.into()))
    }
    pub fn cancel_text() -> Self {
        Self::Text(TextMsg::Cancel)
    }
}
