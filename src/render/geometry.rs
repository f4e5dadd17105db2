//! Shared geometry calculations for scene elements
//!
//! This module contains constants and math used by the compositor
//! and by anything that needs to reason about element extents.

use crate::domain::Point;

/// Arrow geometry constants
pub mod arrow {
    use crate::domain::Point;

    /// Length of each arrowhead segment in surface pixels
    pub const HEAD_LENGTH: f32 = 15.0;
    /// Arrowhead angle from shaft in radians (30 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// Calculate arrow head points given start, end, and head length
    ///
    /// Both head segments are anchored at `end` and point back along the
    /// shaft, rotated by +/- [`HEAD_ANGLE`]. Returns `None` for a zero-length
    /// arrow, which has no direction.
    pub fn head_points(start: Point, end: Point, head_length: f32) -> Option<(Point, Point)> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let angle = dy.atan2(dx);

        let head1 = Point::new(
            end.x - head_length * (angle - HEAD_ANGLE).cos(),
            end.y - head_length * (angle - HEAD_ANGLE).sin(),
        );
        let head2 = Point::new(
            end.x - head_length * (angle + HEAD_ANGLE).cos(),
            end.y - head_length * (angle + HEAD_ANGLE).sin(),
        );

        Some((head1, head2))
    }
}

/// Shape (rectangle/circle) geometry constants
pub mod shape {
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
}

/// Freehand stroke constants
pub mod stroke {
    /// Extra reach of an eraser on each side, in surface pixels
    ///
    /// Eraser strokes are rasterized without anti-aliasing; the margin
    /// swallows the anti-aliased fringe of pen strokes under the same path.
    pub const ERASER_FEATHER: f32 = 1.5;
}

/// Text rendering constants
pub mod text {
    /// Width of the white outline drawn beneath text, in surface pixels
    pub const OUTLINE_WIDTH: f32 = 2.0;
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Radius of a circle centered on `start` passing through `end`
#[inline]
pub fn circle_radius(start: Point, end: Point) -> f32 {
    start.distance(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_circle_radius_three_four_five() {
        assert_eq!(circle_radius(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_arrow_head_points_horizontal() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);
        let (h1, h2) = arrow::head_points(start, end, arrow::HEAD_LENGTH).unwrap();

        // Each head segment is 15 long and anchored at the tip
        assert_close(end.distance(h1), 15.0);
        assert_close(end.distance(h2), 15.0);

        // +/- 30 degrees from the reversed shaft direction
        let cos30 = 30.0_f32.to_radians().cos();
        assert_close(h1.x, 10.0 - 15.0 * cos30);
        assert_close(h2.x, 10.0 - 15.0 * cos30);
        assert_close(h1.y, 7.5);
        assert_close(h2.y, -7.5);
    }

    #[test]
    fn test_arrow_head_angle_relative_to_shaft() {
        let start = Point::new(5.0, 5.0);
        let end = Point::new(25.0, 40.0);
        let (h1, h2) = arrow::head_points(start, end, arrow::HEAD_LENGTH).unwrap();

        let back = ((start.x - end.x), (start.y - end.y));
        let back_len = start.distance(end);
        for h in [h1, h2] {
            let seg = (h.x - end.x, h.y - end.y);
            let cos = (back.0 * seg.0 + back.1 * seg.1) / (back_len * end.distance(h));
            assert_close(cos, 30.0_f32.to_radians().cos());
        }
    }

    #[test]
    fn test_zero_length_arrow_has_no_head() {
        let p = Point::new(3.0, 3.0);
        assert!(arrow::head_points(p, p, arrow::HEAD_LENGTH).is_none());
    }

    #[test]
    fn test_normalize_rect_flips() {
        assert_eq!(normalize_rect(10.0, 10.0, 5.0, 5.0), (5.0, 5.0, 10.0, 10.0));
        assert_eq!(normalize_rect(5.0, 10.0, 10.0, 5.0), (5.0, 5.0, 10.0, 10.0));
    }
}
