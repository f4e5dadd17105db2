//! Committed scene elements, grouped by category

use super::annotation::{Shape, Stroke, TextAnnotation};

/// Authoritative record of committed strokes, shapes and text
///
/// Each category is append-only and keeps commit order. The only removal is
/// [`SceneModel::clear_all`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneModel {
    strokes: Vec<Stroke>,
    shapes: Vec<Shape>,
    texts: Vec<TextAnnotation>,
}

impl SceneModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn add_text(&mut self, text: TextAnnotation) {
        self.texts.push(text);
    }

    /// Drop every committed element
    pub fn clear_all(&mut self) {
        self.strokes.clear();
        self.shapes.clear();
        self.texts.clear();
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn texts(&self) -> &[TextAnnotation] {
        &self.texts
    }

    /// Total number of committed elements
    pub fn len(&self) -> usize {
        self.strokes.len() + self.shapes.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
