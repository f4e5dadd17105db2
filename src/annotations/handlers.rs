//! Gesture handlers
//!
//! Turns pointer and text prompt messages into scene commits or shape
//! previews, according to the active tool.

use crate::config::Tool;
use crate::domain::{Point, Shape, Stroke, StrokeTool, TextAnnotation};
use crate::session::EditorSession;
use crate::session::messages::{PointerAction, TextMsg};
use crate::session::state::GestureState;

/// Handle one phase of a pointer gesture
pub fn handle_pointer(session: &mut EditorSession, action: PointerAction) {
    match action {
        PointerAction::Press(p) => handle_press(session, p),
        PointerAction::Drag(p) => handle_drag(session, p),
        PointerAction::Release(p) => handle_release(session, p),
    }
}

/// Handle the inline text prompt
pub fn handle_text(session: &mut EditorSession, msg: TextMsg) {
    let GestureState::AwaitingText(position) = session.gesture else {
        log::debug!("Text message with no open prompt: {:?}", msg);
        return;
    };
    session.gesture = GestureState::Idle;

    match msg {
        TextMsg::Submit(input) => {
            let settings = session.settings;
            match TextAnnotation::from_input(position, &input, settings.color, settings.font_size) {
                Some(text) => session.add_text(text),
                None => log::debug!("Empty text submitted, prompt closed"),
            }
        }
        TextMsg::Cancel => log::debug!("Text prompt cancelled"),
    }
}

// ============================================================================
// Pointer phases
// ============================================================================

fn handle_press(session: &mut EditorSession, p: Point) {
    if !session.gesture.is_idle() {
        log::debug!("Press replaces unfinished gesture {:?}", session.gesture);
    }

    let tool = session.settings.tool;
    session.gesture = match tool {
        Tool::Text => GestureState::AwaitingText(p),
        Tool::Pen => GestureState::DraggingStroke {
            tool: StrokeTool::Pen,
            points: vec![p],
        },
        Tool::Eraser => GestureState::DraggingStroke {
            tool: StrokeTool::Eraser,
            points: vec![p],
        },
        Tool::Rectangle | Tool::Circle | Tool::Arrow => match tool.shape_kind() {
            Some(kind) => GestureState::DraggingShape { kind, start: p },
            None => GestureState::Idle,
        },
    };
}

fn handle_drag(session: &mut EditorSession, p: Point) {
    let settings = session.settings;
    let preview = match &mut session.gesture {
        GestureState::DraggingStroke { points, .. } => {
            points.push(p);
            None
        }
        GestureState::DraggingShape { kind, start } => {
            Some(Shape::new(*kind, *start, p, settings.color, settings.width))
        }
        GestureState::Idle | GestureState::AwaitingText(_) => None,
    };

    if let Some(preview) = preview {
        session.repaint_with_preview(&preview);
    }
}

fn handle_release(session: &mut EditorSession, p: Point) {
    let settings = session.settings;
    match std::mem::take(&mut session.gesture) {
        GestureState::DraggingStroke { tool, points } => {
            session.add_stroke(Stroke {
                points,
                color: settings.color,
                width: settings.width,
                tool,
            });
        }
        GestureState::DraggingShape { kind, start } => {
            session.add_shape(Shape::new(kind, start, p, settings.color, settings.width));
        }
        // The prompt stays open past the release of the press that opened it
        GestureState::AwaitingText(position) => {
            session.gesture = GestureState::AwaitingText(position);
        }
        GestureState::Idle => {}
    }
}
