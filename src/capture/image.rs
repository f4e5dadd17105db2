//! Source image type for the photo being annotated

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use image::imageops::FilterType;

use crate::domain::SurfaceSize;

/// A decoded source image in straight-alpha RGBA
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub rgba: RgbaImage,
}

impl SourceImage {
    /// Wrap already-decoded pixels
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Self { rgba }
    }

    /// Decode an image from encoded bytes (format is sniffed)
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let rgba = image::load_from_memory(bytes)
            .context("decoding source image")?
            .to_rgba8();
        log::debug!("SourceImage decoded: {}x{} pixels", rgba.width(), rgba.height());
        Ok(Self { rgba })
    }

    /// Decode an image file
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let rgba = image::open(path)
            .with_context(|| format!("opening source image {:?}", path))?
            .to_rgba8();
        log::debug!(
            "SourceImage loaded from {:?}: {}x{} pixels",
            path,
            rgba.width(),
            rgba.height()
        );
        Ok(Self { rgba })
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Surface size for this image within the given bound
    pub fn surface_size(&self, max_width: u32, max_height: u32) -> SurfaceSize {
        SurfaceSize::fit_within(self.width(), self.height(), max_width, max_height)
    }

    /// Pixels resampled to `size` (a plain copy when the size already matches)
    pub fn scaled_to(&self, size: SurfaceSize) -> RgbaImage {
        if (self.width(), self.height()) == (size.width, size.height) {
            return self.rgba.clone();
        }
        image::imageops::resize(&self.rgba, size.width, size.height, FilterType::Lanczos3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_landscape_source_scales_to_bound() {
        let source = SourceImage::from_rgba(RgbaImage::new(1600, 1200));
        let size = source.surface_size(800, 600);
        assert_eq!(size, SurfaceSize::new(800, 600));
        let scaled = source.scaled_to(size);
        assert_eq!(scaled.dimensions(), (800, 600));
    }

    #[test]
    fn test_portrait_source_scales_to_bound() {
        let source = SourceImage::from_rgba(RgbaImage::new(600, 1200));
        let size = source.surface_size(800, 600);
        assert_eq!(size, SurfaceSize::new(300, 600));
        assert_eq!(source.scaled_to(size).dimensions(), (300, 600));
    }

    #[test]
    fn test_small_source_is_not_resampled() {
        let rgba = RgbaImage::from_pixel(10, 5, image::Rgba([1, 2, 3, 255]));
        let source = SourceImage::from_rgba(rgba.clone());
        let size = source.surface_size(800, 600);
        assert_eq!(source.scaled_to(size), rgba);
    }

    #[test]
    fn test_decode_png_bytes() {
        let rgba = RgbaImage::from_pixel(4, 3, image::Rgba([9, 8, 7, 255]));
        let mut bytes = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let source = SourceImage::from_bytes(&bytes).unwrap();
        assert_eq!((source.width(), source.height()), (4, 3));
        assert_eq!(source.rgba.get_pixel(2, 1).0, [9, 8, 7, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(SourceImage::from_bytes(b"definitely not an image").is_err());
        assert!(SourceImage::open(Path::new("/nonexistent/photo.jpg")).is_err());
    }
}
