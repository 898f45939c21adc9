//! Owned RGBA f32 image in row-major layout (stride == width).
//!
//! Serves both as the CPU backend's image handle and as the storage behind
//! host textures. Texture lookups use normalised `(u, v)` coordinates with
//! nearest-texel sampling; `u` grows rightwards and `v` downwards.
use super::traits::{ImageView, ImageViewMut};
use crate::backend::ImageHandle;
use crate::types::PixelFormat;
use std::sync::Arc;

/// Shared read-only image bound to a program as an auxiliary input.
pub type Texture = Arc<ImageRgbaF32>;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageRgbaF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Format the image was requested with; storage is always f32.
    pub format: PixelFormat,
    /// Backing storage in row-major order
    pub data: Vec<[f32; 4]>,
}

impl ImageRgbaF32 {
    /// Zero-initialized (transparent black) float image of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::with_format(w, h, PixelFormat::RgbaF32)
    }

    pub fn with_format(w: usize, h: usize, format: PixelFormat) -> Self {
        Self {
            w,
            h,
            format,
            data: vec![[0.0; 4]; w * h],
        }
    }

    /// Image where every pixel equals `px`.
    pub fn filled(w: usize, h: usize, px: [f32; 4]) -> Self {
        Self {
            w,
            h,
            format: PixelFormat::RgbaF32,
            data: vec![px; w * h],
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> [f32; 4]) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self {
            w,
            h,
            format: PixelFormat::RgbaF32,
            data,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 4] {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: [f32; 4]) {
        let i = self.idx(x, y);
        self.data[i] = px;
    }

    pub fn into_texture(self) -> Texture {
        Arc::new(self)
    }

    /// Nearest texel at `(u, v)`, wrapping outside `[0, 1)` (repeat addressing).
    pub fn sample_wrap(&self, u: f32, v: f32) -> [f32; 4] {
        if self.w == 0 || self.h == 0 {
            return [0.0; 4];
        }
        let x = (u.rem_euclid(1.0) * self.w as f32) as usize;
        let y = (v.rem_euclid(1.0) * self.h as f32) as usize;
        self.get(x.min(self.w - 1), y.min(self.h - 1))
    }

    /// Nearest texel at `(u, v)`, clamping to the edge texels.
    pub fn sample_clamp(&self, u: f32, v: f32) -> [f32; 4] {
        if self.w == 0 || self.h == 0 {
            return [0.0; 4];
        }
        let x = (u.clamp(0.0, 1.0) * self.w as f32) as usize;
        let y = (v.clamp(0.0, 1.0) * self.h as f32) as usize;
        self.get(x.min(self.w - 1), y.min(self.h - 1))
    }
}

impl ImageView for ImageRgbaF32 {
    type Pixel = [f32; 4];

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[[f32; 4]] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageRgbaF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [[f32; 4]] {
        let start = y * self.w;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

impl ImageHandle for ImageRgbaF32 {
    fn width(&self) -> usize {
        self.w
    }
    fn height(&self) -> usize {
        self.h
    }
    fn format(&self) -> PixelFormat {
        self.format
    }
}
