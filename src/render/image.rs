//! Element rendering using tiny-skia
//!
//! These functions draw individual scene elements onto a [`Pixmap`].
//! Ordering between elements is decided by the surface, not here.

use tiny_skia::{BlendMode, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use super::geometry::{self, arrow, shape};
use crate::config::ShapeColor;
use crate::domain::{Point, Shape, ShapeKind, Stroke, StrokeTool};

fn color_paint(color: ShapeColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Build a connected polyline through the points
fn build_polyline_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

/// Build an arrow path as stroked lines (shaft + two angled head lines)
fn build_arrow_path(start: Point, end: Point) -> Option<tiny_skia::Path> {
    let (head1, head2) = arrow::head_points(start, end, arrow::HEAD_LENGTH)?;

    let mut pb = PathBuilder::new();

    // Shaft line from start to end
    pb.move_to(start.x, start.y);
    pb.line_to(end.x, end.y);

    // First head line
    pb.move_to(end.x, end.y);
    pb.line_to(head1.x, head1.y);

    // Second head line
    pb.move_to(end.x, end.y);
    pb.line_to(head2.x, head2.y);

    pb.finish()
}

/// Build a rectangle outline from two opposite corners in any order
fn build_rect_path(start: Point, end: Point) -> Option<tiny_skia::Path> {
    let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(start.x, start.y, end.x, end.y);
    if min_x == max_x && min_y == max_y {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<tiny_skia::Path> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

/// Build the outline path for a shape, `None` for degenerate shapes
fn build_shape_path(s: &Shape) -> Option<tiny_skia::Path> {
    match s.kind {
        ShapeKind::Rectangle => build_rect_path(s.start, s.end),
        ShapeKind::Circle => {
            let radius = geometry::circle_radius(s.start, s.end);
            build_ellipse_path(s.start.x, s.start.y, radius, radius)
        }
        ShapeKind::Arrow => build_arrow_path(s.start, s.end),
    }
}

/// Draw a freehand stroke onto the ink layer
///
/// Pen strokes paint over existing ink. Eraser strokes clear ink instead,
/// without anti-aliasing and slightly wider so no fringe survives.
pub fn draw_stroke(ink: &mut Pixmap, stroke: &Stroke) {
    if !stroke.is_visible() {
        return;
    }
    let Some(path) = build_polyline_path(&stroke.points) else {
        return;
    };

    match stroke.tool {
        StrokeTool::Pen => {
            ink.stroke_path(
                &path,
                &color_paint(stroke.color),
                &round_stroke(stroke.width),
                Transform::identity(),
                None,
            );
        }
        StrokeTool::Eraser => {
            let paint = Paint {
                blend_mode: BlendMode::Clear,
                anti_alias: false,
                ..Paint::default()
            };
            let width = stroke.width + geometry::stroke::ERASER_FEATHER * 2.0;
            ink.stroke_path(
                &path,
                &paint,
                &round_stroke(width),
                Transform::identity(),
                None,
            );
        }
    }
}

/// Draw a shape outline (no fill)
pub fn draw_shape(pixmap: &mut Pixmap, s: &Shape) {
    // tiny-skia treats width 0 as a hairline
    if s.width <= 0.0 {
        return;
    }
    let Some(path) = build_shape_path(s) else {
        return;
    };
    pixmap.stroke_path(
        &path,
        &color_paint(s.color),
        &round_stroke(s.width),
        Transform::identity(),
        None,
    );
}
