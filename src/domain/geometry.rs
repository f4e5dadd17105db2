//! Geometric types for surface coordinates and surface sizing

use serde::{Deserialize, Serialize};

/// A point in surface-pixel coordinates (origin top-left, Y down)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the drawing surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero (no surface can be allocated)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fit an image of `width`x`height` inside `max_width`x`max_height`
    ///
    /// Aspect ratio is preserved. Images that already fit keep their native
    /// size; nothing is ever scaled up. An image with a zero dimension
    /// gives an empty size.
    pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::new(0, 0);
        }
        if width <= max_width && height <= max_height {
            return Self { width, height };
        }

        let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
        let scaled_w = (width as f64 * ratio).round().max(1.0) as u32;
        let scaled_h = (height as f64 * ratio).round().max(1.0) as u32;

        Self {
            width: scaled_w.min(max_width),
            height: scaled_h.min(max_height),
        }
    }
}
