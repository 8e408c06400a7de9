//! Image output for rendered frames.
//!
//! Frames are tightly packed row-major RGBA bytes. Two encoders are
//! provided:
//! - Plain text PPM (`P3`), alpha dropped
//! - PNG via the `image` crate
//!
//! Writer errors are returned unchanged to the caller. A buffer whose
//! length does not match `width * height * 4` is rejected before anything
//! is written.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};

use crate::camera::BYTES_PER_PIXEL;
use crate::error::{OutputError, OutputResult};

fn check_buffer(pixels: &[u8], width: usize, height: usize) -> OutputResult<()> {
    let expected = width.saturating_mul(height).saturating_mul(BYTES_PER_PIXEL);
    if pixels.len() != expected {
        return Err(OutputError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Write an RGBA frame as plain text PPM (`P3`).
///
/// The header is `P3\n<width> <height>\n255\n`, followed by one `R G B`
/// line per pixel in row-major order.
pub fn write_ppm<W: Write>(writer: &mut W, pixels: &[u8], width: usize, height: usize) -> OutputResult<()> {
    check_buffer(pixels, width, height)?;

    write!(writer, "P3\n{} {}\n255\n", width, height)?;
    for rgba in pixels.chunks_exact(BYTES_PER_PIXEL) {
        writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write an RGBA frame as PNG.
pub fn write_png<W: Write>(writer: W, pixels: &[u8], width: usize, height: usize) -> OutputResult<()> {
    check_buffer(pixels, width, height)?;

    PngEncoder::new(writer).write_image(pixels, width as u32, height as u32, ColorType::Rgba8)?;
    Ok(())
}

/// Save a frame as a PPM file.
pub fn save_ppm(path: impl AsRef<Path>, pixels: &[u8], width: usize, height: usize) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_ppm(&mut writer, pixels, width, height)
}

/// Save a frame as a PNG file.
pub fn save_png(path: impl AsRef<Path>, pixels: &[u8], width: usize, height: usize) -> OutputResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    write_png(writer, pixels, width, height)
}

/// Save a frame, choosing the encoder from the file extension.
pub fn save_image(path: &Path, pixels: &[u8], width: usize, height: usize) -> OutputResult<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => save_ppm(path, pixels, width, height)?,
        "png" => save_png(path, pixels, width, height)?,
        _ => return Err(OutputError::UnsupportedFormat(path.display().to_string())),
    }

    log::info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}
