//! Text rasterization for text annotations using ab_glyph
//!
//! Glyph coverage is accumulated into a tiny-skia [`Mask`]; the outline
//! pass uses a dilated copy of the same mask so both passes line up exactly.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, OutlinedGlyph, PxScale, ScaleFont, point};
use tiny_skia::{Mask, Paint, Pixmap, PixmapPaint, Transform};

use super::geometry;
use crate::config::ShapeColor;
use crate::domain::TextAnnotation;

/// Fonts tried in order when no font is configured
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Rasterizes text annotations onto a pixmap
pub struct TextRasterizer {
    font: Option<FontVec>,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl TextRasterizer {
    /// Load the configured font, falling back to well-known system fonts
    ///
    /// Without any usable font the rasterizer still works but draws nothing.
    pub fn load(font_path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match font_path {
            Some(path) => vec![path.to_path_buf()],
            None => SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            match load_font(path) {
                Ok(font) => {
                    log::debug!("Loaded text font from {:?}", path);
                    return Self { font: Some(font) };
                }
                Err(err) => log::debug!("Skipping font {:?}: {}", path, err),
            }
        }

        log::warn!("No usable font found, text annotations will not be drawn");
        Self::without_font()
    }

    /// A rasterizer that draws nothing
    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw a text annotation: white outline pass, then the colored fill pass
    ///
    /// Both passes are rendered into a scratch pixmap covering only the glyph
    /// bounds (plus outline), which is then composited at its offset.
    pub fn draw(&self, pixmap: &mut Pixmap, text: &TextAnnotation) {
        let Some(font) = self.font.as_ref() else {
            return;
        };
        let Some(glyphs) = coverage_mask(font, text, pixmap.width(), pixmap.height()) else {
            return;
        };
        let outline = dilate(&glyphs.mask, geometry::text::OUTLINE_WIDTH / 2.0);

        let (w, h) = (glyphs.mask.width(), glyphs.mask.height());
        let (Some(mut patch), Some(area)) = (
            Pixmap::new(w, h),
            tiny_skia::Rect::from_xywh(0.0, 0.0, w as f32, h as f32),
        ) else {
            return;
        };

        patch.fill_rect(
            area,
            &solid_paint(ShapeColor::WHITE),
            Transform::identity(),
            Some(&outline),
        );
        patch.fill_rect(
            area,
            &solid_paint(text.color),
            Transform::identity(),
            Some(&glyphs.mask),
        );
        pixmap.draw_pixmap(
            glyphs.x,
            glyphs.y,
            patch.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

fn load_font(path: &Path) -> anyhow::Result<FontVec> {
    let data = std::fs::read(path)?;
    Ok(FontVec::try_from_vec(data)?)
}

fn solid_paint(color: ShapeColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Glyph coverage for the pixel region at (`x`, `y`) of the target
struct GlyphMask {
    mask: Mask,
    x: i32,
    y: i32,
}

/// Accumulate glyph coverage for a single line of text with its baseline at `position`
///
/// The mask covers the glyph bounds grown by the outline width, clipped to
/// the `width`x`height` target. None when nothing would be visible.
fn coverage_mask(
    font: &FontVec,
    text: &TextAnnotation,
    width: u32,
    height: u32,
) -> Option<GlyphMask> {
    let scale = PxScale::from(text.font_size);
    let scaled = font.as_scaled(scale);

    let mut caret = text.position.x;
    let mut prev = None;
    let mut outlined: Vec<OutlinedGlyph> = Vec::new();

    for c in text.text.chars().filter(|c| !c.is_control()) {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, text.position.y));
        caret += scaled.h_advance(id);
        prev = Some(id);

        if let Some(g) = font.outline_glyph(glyph) {
            outlined.push(g);
        }
    }

    let first = outlined.first()?.px_bounds();
    let bounds = outlined.iter().skip(1).fold(first, |acc, g| {
        let b = g.px_bounds();
        ab_glyph::Rect {
            min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
            max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
        }
    });

    let pad = geometry::text::OUTLINE_WIDTH.ceil() as i32;
    let x0 = (bounds.min.x.floor() as i32 - pad).max(0);
    let y0 = (bounds.min.y.floor() as i32 - pad).max(0);
    let x1 = (bounds.max.x.ceil() as i32 + pad).min(width as i32);
    let y1 = (bounds.max.y.ceil() as i32 + pad).min(height as i32);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let (mw, mh) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let mut mask = Mask::new(mw, mh)?;
    let data = mask.data_mut();
    for glyph in &outlined {
        let b = glyph.px_bounds();
        glyph.draw(|gx, gy, coverage| {
            let x = b.min.x as i32 + gx as i32 - x0;
            let y = b.min.y as i32 + gy as i32 - y0;
            if x < 0 || y < 0 || x >= mw as i32 || y >= mh as i32 {
                return;
            }
            let idx = y as usize * mw as usize + x as usize;
            let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            data[idx] = data[idx].max(value);
        });
    }

    Some(GlyphMask { mask, x: x0, y: y0 })
}

/// Grow a coverage mask by `radius` pixels (max filter over a disk)
fn dilate(mask: &Mask, radius: f32) -> Mask {
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    let reach = radius.ceil() as i32;
    let limit = (radius + 0.5) * (radius + 0.5);
    let offsets: Vec<(i32, i32)> = (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| (dx * dx + dy * dy) as f32 <= limit)
        .collect();

    let src = mask.data();
    let mut out = mask.clone();
    let dst = out.data_mut();
    for y in 0..h {
        for x in 0..w {
            let mut value = 0u8;
            for &(dx, dy) in &offsets {
                let (sx, sy) = (x + dx, y + dy);
                if sx >= 0 && sy >= 0 && sx < w && sy < h {
                    value = value.max(src[(sy * w + sx) as usize]);
                }
            }
            dst[(y * w + x) as usize] = value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    fn text_at(x: f32, y: f32, s: &str) -> TextAnnotation {
        TextAnnotation::from_input(Point::new(x, y), s, ShapeColor::BLACK, 24.0).unwrap()
    }

    #[test]
    fn test_without_font_draws_nothing() {
        let mut pixmap = Pixmap::new(64, 64).unwrap();
        let before = pixmap.clone();
        TextRasterizer::without_font().draw(&mut pixmap, &text_at(4.0, 40.0, "Hi"));
        assert_eq!(pixmap.data(), before.data());
    }

    #[test]
    fn test_missing_font_path_falls_back_to_none() {
        let rasterizer = TextRasterizer::load(Some(Path::new("/nonexistent/font.ttf")));
        assert!(!rasterizer.has_font());
    }

    #[test]
    fn test_dilate_grows_single_pixel() {
        let mut mask = Mask::new(5, 5).unwrap();
        mask.data_mut()[2 * 5 + 2] = 255;
        let grown = dilate(&mask, 1.0);
        let data = grown.data();
        assert_eq!(data[2 * 5 + 2], 255);
        assert_eq!(data[2 * 5 + 1], 255);
        assert_eq!(data[1 * 5 + 2], 255);
        assert_eq!(data[1 * 5 + 1], 255);
        assert_eq!(data[0], 0);
        assert_eq!(data[2 * 5], 0);
    }

    #[test]
    fn test_text_draws_outline_and_fill_with_system_font() {
        // Skipped on systems without any of the fallback fonts
        let rasterizer = TextRasterizer::load(None);
        if !rasterizer.has_font() {
            return;
        }

        let mut pixmap = Pixmap::new(200, 60).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        rasterizer.draw(&mut pixmap, &text_at(10.0, 40.0, "Hello"));

        // Background is pure blue: black fill darkens blue, white outline adds red
        let dark = pixmap.pixels().iter().filter(|px| px.blue() < 64).count();
        let light = pixmap.pixels().iter().filter(|px| px.red() > 128).count();
        assert!(dark > 0, "fill pass drew nothing");
        assert!(light > 0, "outline pass drew nothing");
    }

    #[test]
    fn test_text_mask_covers_only_glyph_region() {
        let rasterizer = TextRasterizer::load(None);
        let Some(font) = rasterizer.font.as_ref() else {
            return;
        };

        let glyphs = coverage_mask(font, &text_at(100.0, 200.0, "ab"), 800, 600).unwrap();
        assert!(glyphs.mask.width() < 100);
        assert!(glyphs.mask.height() < 60);
        assert!(glyphs.x > 90 && glyphs.y > 160);
        assert!(glyphs.mask.data().iter().any(|&v| v > 0));

        // Entirely off the surface
        assert!(coverage_mask(font, &text_at(900.0, 200.0, "ab"), 800, 600).is_none());
    }

    #[test]
    fn test_text_clipped_at_surface_edge() {
        let rasterizer = TextRasterizer::load(None);
        if !rasterizer.has_font() {
            return;
        }

        let mut pixmap = Pixmap::new(40, 40).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        rasterizer.draw(&mut pixmap, &text_at(-6.0, 10.0, "Wide text"));
        assert!(pixmap.pixels().iter().any(|px| px.blue() < 64));
    }
}
