//! Shared convolution helpers for the CPU passes.
//!
//! - 3×3 derivative kernel pairs (Sobel, Prewitt, Scharr), normalised so a
//!   unit step yields a unit derivative.
//! - Separable 1D filters with border clamping (Gaussian 5-tap, box 3-tap).
//! - Row-wise pixel evaluation, parallel over rows with the `parallel`
//!   feature.
use crate::image::{ImageRgbaF32, ImageView};
use crate::params::GradientOperator;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const PREWITT_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]];
const PREWITT_KERNEL_Y: Kernel3 = [[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

const SCHARR_KERNEL_X: Kernel3 = [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]];
const SCHARR_KERNEL_Y: Kernel3 = [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]];

/// Kernel pair plus the factor mapping a unit step to a unit response.
#[derive(Clone, Copy, Debug)]
pub struct GradientKernel {
    pub x: &'static Kernel3,
    pub y: &'static Kernel3,
    pub norm: f32,
}

impl GradientKernel {
    pub fn for_operator(operator: GradientOperator) -> Self {
        match operator {
            GradientOperator::Sobel => Self {
                x: &SOBEL_KERNEL_X,
                y: &SOBEL_KERNEL_Y,
                norm: 1.0 / 4.0,
            },
            GradientOperator::Prewitt => Self {
                x: &PREWITT_KERNEL_X,
                y: &PREWITT_KERNEL_Y,
                norm: 1.0 / 3.0,
            },
            GradientOperator::Scharr => Self {
                x: &SCHARR_KERNEL_X,
                y: &SCHARR_KERNEL_Y,
                norm: 1.0 / 16.0,
            },
        }
    }

    /// `(gx, gy)` of `channel` at `(x, y)` with border replication.
    #[inline]
    pub fn apply(
        &self,
        image: &ImageRgbaF32,
        x: usize,
        y: usize,
        channel: impl Fn([f32; 4]) -> f32,
    ) -> (f32, f32) {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for (ky, dy) in (-1isize..=1).enumerate() {
            for (kx, dx) in (-1isize..=1).enumerate() {
                let v = channel(image.fetch_clamped(x as isize + dx, y as isize + dy));
                sum_x += v * self.x[ky][kx];
                sum_y += v * self.y[ky][kx];
            }
        }
        (sum_x * self.norm, sum_y * self.norm)
    }
}

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order).
    fn taps(&self) -> &[f32];
}

#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 5-tap Gaussian filter `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

/// 3-tap box filter.
pub const BOX_3TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]);

/// Horizontal then vertical pass of `filter` over every channel of `src`.
pub fn separable_blur(src: &ImageRgbaF32, dst: &mut ImageRgbaF32, filter: &dyn SeparableFilter) {
    let taps = filter.taps();
    if src.w == 0 || src.h == 0 || taps.is_empty() {
        return;
    }
    let radius = (taps.len() / 2) as isize;

    let mut horiz = ImageRgbaF32::with_format(src.w, src.h, src.format);
    fill_rows(&mut horiz, |x, y| {
        let mut acc = [0.0f32; 4];
        for (i, tap) in taps.iter().enumerate() {
            let sx = clamp_index(x as isize + i as isize - radius, src.w);
            let px = src.get(sx, y);
            for c in 0..4 {
                acc[c] += px[c] * tap;
            }
        }
        acc
    });

    fill_rows(dst, |x, y| {
        let mut acc = [0.0f32; 4];
        for (i, tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + i as isize - radius, horiz.h);
            let px = horiz.get(x, sy);
            for c in 0..4 {
                acc[c] += px[c] * tap;
            }
        }
        acc
    });
}

/// Evaluate `f(x, y)` for every pixel of `out`.
pub fn fill_rows<F>(out: &mut ImageRgbaF32, f: F)
where
    F: Fn(usize, usize) -> [f32; 4] + Sync,
{
    let w = out.w;
    if w == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    {
        out.data
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| fill_row(row, y, &f));
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.data
            .chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| fill_row(row, y, &f));
    }
}

#[inline]
fn fill_row<F: Fn(usize, usize) -> [f32; 4]>(row: &mut [[f32; 4]], y: usize, f: &F) {
    for (x, px) in row.iter_mut().enumerate() {
        *px = f(x, y);
    }
}

#[inline]
pub fn clamp_index(idx: isize, upper: usize) -> usize {
    idx.clamp(0, upper as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sobel_unit_step_has_unit_gx() {
        let img = ImageRgbaF32::from_fn(5, 5, |x, _| {
            let v = if x >= 2 { 1.0 } else { 0.0 };
            [v, v, v, 1.0]
        });
        let kernel = GradientKernel::for_operator(GradientOperator::Sobel);
        let (gx, gy) = kernel.apply(&img, 2, 2, |px| px[0]);
        assert!((gx - 1.0).abs() < 1e-6, "gx={gx}");
        assert!(gy.abs() < 1e-6);

        let (gx, _) = kernel.apply(&img, 0, 2, |px| px[0]);
        assert!(gx.abs() < 1e-6);
    }

    #[test]
    fn blur_preserves_flat_image() {
        let src = ImageRgbaF32::filled(6, 4, [0.3, 0.4, 0.5, 1.0]);
        let mut dst = ImageRgbaF32::new(6, 4);
        separable_blur(&src, &mut dst, &GAUSSIAN_5TAP);
        for px in &dst.data {
            for c in 0..4 {
                assert!((px[c] - src.data[0][c]).abs() < 1e-5);
            }
        }
    }
}
