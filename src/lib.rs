//! Photo annotation editor core
//!
//! A session takes one decoded photo, lets pointer gestures add freehand
//! strokes, outline shapes and text labels on top of it, and finally
//! flattens everything into encoded image bytes.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod domain;
pub mod export;
pub mod render;
pub mod session;

pub use session::EditorSession;
