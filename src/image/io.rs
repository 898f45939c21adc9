//! I/O helpers for RGBA images and JSON.
//!
//! - `load_rgba_image`: read a PNG/JPEG into an owned float RGBA buffer.
//! - `load_texture`: same, wrapped as a shareable [`Texture`].
//! - `save_rgba_png`: write an `ImageRgbaF32` to an 8-bit RGBA PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageRgbaF32, ImageView, Texture};
use crate::types::PixelFormat;
use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert it to float RGBA in `[0, 1]`.
pub fn load_rgba_image(path: &Path) -> Result<ImageRgbaF32, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    Ok(from_rgba8(&img))
}

pub fn load_texture(path: &Path) -> Result<Texture, String> {
    load_rgba_image(path).map(ImageRgbaF32::into_texture)
}

/// Convert an 8-bit RGBA buffer; the result keeps the `Rgba8` format tag.
pub fn from_rgba8(img: &RgbaImage) -> ImageRgbaF32 {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut out = ImageRgbaF32::with_format(w, h, PixelFormat::Rgba8);
    for (dst, src) in out.data.iter_mut().zip(img.pixels()) {
        for c in 0..4 {
            dst[c] = src.0[c] as f32 / 255.0;
        }
    }
    out
}

/// Quantize to 8-bit RGBA, clamping each channel to `[0, 1]`.
pub fn to_rgba8(image: &ImageRgbaF32) -> RgbaImage {
    let mut out = RgbaImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            out.put_pixel(x as u32, y as u32, Rgba([q(px[0]), q(px[1]), q(px[2]), q(px[3])]));
        }
    }
    out
}

/// Save a float image to an RGBA PNG.
pub fn save_rgba_png(image: &ImageRgbaF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    to_rgba8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
