//! Flattening the surface into encoded image bytes

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::{RgbImage, RgbaImage};
use tiny_skia::Pixmap;

use crate::config::ExportFormat;

/// Encode the surface pixels in the requested format
///
/// JPEG has no alpha channel: transparent pixels come out black, the same
/// as compositing the surface over black.
pub fn flatten(pixmap: &Pixmap, format: ExportFormat, jpeg_quality: u8) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        ExportFormat::Jpeg => {
            let rgb = opaque_rgb(pixmap);
            let quality = jpeg_quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut buffer, quality)
                .encode_image(&rgb)
                .context("encoding JPEG")?;
        }
        ExportFormat::Png => {
            write_png(&mut buffer, &straight_rgba(pixmap)).context("encoding PNG")?;
        }
    }
    log::debug!(
        "Flattened {}x{} surface to {} bytes of {}",
        pixmap.width(),
        pixmap.height(),
        buffer.len(),
        format.mime_type()
    );
    Ok(buffer)
}

/// Wrap encoded bytes as a `data:` URL ready to embed
pub fn to_data_url(format: ExportFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

/// Write encoded bytes to `dir/file_name`, creating `dir` if needed
pub fn write_download(bytes: &[u8], dir: &Path, file_name: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating download directory {:?}", dir))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).with_context(|| format!("writing {:?}", path))?;
    Ok(path)
}

/// Premultiplied color channels, i.e. the surface composited over black
fn opaque_rgb(pixmap: &Pixmap) -> RgbImage {
    let mut rgb = RgbImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in rgb.pixels_mut().zip(pixmap.pixels()) {
        *dst = image::Rgb([src.red(), src.green(), src.blue()]);
    }
    rgb
}

fn straight_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut rgba = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in rgba.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    rgba
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
