//! Pure domain types with minimal dependencies
//!
//! This module contains the scene element types used throughout the editor.
//! Types here should have no rendering dependencies (tiny-skia, image, etc.)
//! so the scene model stays independent of how it is painted.

pub mod annotation;
pub mod geometry;
pub mod scene;

pub use annotation::*;
pub use geometry::*;
pub use scene::*;
