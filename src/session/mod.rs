//! Editor session management module
//!
//! This module contains:
//! - The editor session aggregate (scene, surface, caption, callbacks)
//! - Gesture and tool state
//! - Message types for editor interactions

pub mod editor;
pub mod messages;
pub mod state;

pub use editor::{CommitCallback, DiscardCallback, EditorSession};
