//! Scene rendering module
//!
//! This module contains:
//! - Geometry calculations shared by the element renderers
//! - Element rendering using tiny-skia
//! - Text rasterization using ab_glyph
//! - The surface and its full-repaint compositor

pub mod geometry;
pub mod image;
pub mod surface;
pub mod text;
