//! The raster surface and the full-repaint compositor
//!
//! A repaint always starts from scratch and draws in category order:
//! base image, strokes, shapes, text. Strokes go through a separate ink
//! layer so eraser strokes only remove what the stroke pass drew.

use image::RgbaImage;
use tiny_skia::{Color, ColorU8, Pixmap, PixmapPaint, Transform};

use super::image::{draw_shape, draw_stroke};
use super::text::TextRasterizer;
use crate::domain::{SceneModel, Shape, SurfaceSize};

/// Fixed-size drawing target derived from the base image
pub struct Surface {
    size: SurfaceSize,
    /// Base image already scaled to the surface size
    base: Pixmap,
    /// What the user sees and what gets exported
    pixmap: Pixmap,
    /// Scratch layer for the stroke pass
    ink: Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("size", &self.size).finish()
    }
}

impl Surface {
    /// Create a surface the size of `base`, showing only the base image
    ///
    /// Returns `None` when `base` has a zero dimension.
    pub fn new(base: &RgbaImage) -> Option<Self> {
        let size = SurfaceSize::new(base.width(), base.height());
        let base = rgba_to_pixmap(base)?;
        let pixmap = Pixmap::new(size.width, size.height)?;
        let ink = Pixmap::new(size.width, size.height)?;

        let mut surface = Self {
            size,
            base,
            pixmap,
            ink,
        };
        surface.repaint(&SceneModel::default(), &TextRasterizer::without_font());
        Some(surface)
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Current visible pixels (premultiplied RGBA)
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Repaint everything from the base image and the committed scene
    pub fn repaint(&mut self, scene: &SceneModel, text: &TextRasterizer) {
        // 1. Clear
        self.pixmap.fill(Color::TRANSPARENT);

        // 2. Base image
        self.pixmap.draw_pixmap(
            0,
            0,
            self.base.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        // 3. Strokes, composited as one layer
        if !scene.strokes().is_empty() {
            self.ink.fill(Color::TRANSPARENT);
            for stroke in scene.strokes() {
                draw_stroke(&mut self.ink, stroke);
            }
            self.pixmap.draw_pixmap(
                0,
                0,
                self.ink.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }

        // 4. Shapes
        for shape in scene.shapes() {
            draw_shape(&mut self.pixmap, shape);
        }

        // 5. Text
        for annotation in scene.texts() {
            text.draw(&mut self.pixmap, annotation);
        }
    }

    /// Repaint, then draw an uncommitted shape on top
    pub fn repaint_with_preview(&mut self, scene: &SceneModel, text: &TextRasterizer, preview: &Shape) {
        self.repaint(scene, text);
        draw_shape(&mut self.pixmap, preview);
    }
}

/// Convert straight-alpha RGBA into a premultiplied pixmap
fn rgba_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}
