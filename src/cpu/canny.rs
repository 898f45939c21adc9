//! CPU passes of the `Hidden/Manga` program.
//!
//! Channel conventions between passes:
//!
//! | pass                | output                                   |
//! |---------------------|------------------------------------------|
//! | luminance, blur     | `(l, l, l, 1)`                           |
//! | gradient            | `(gx, gy, atan2(gy, gx), magnitude)`     |
//! | magnitude threshold | tri-state `(c, c, c, 1)`, c ∈ {0, ½, 1}  |
//! | double threshold    | tri-state, weak next to strong promoted  |
//! | hysteresis          | binary `(e, e, e, 1)`                    |
//! | color               | final RGBA                               |
//!
//! Non-maximum suppression ignores the outermost 1-pixel frame, which is
//! always classified as background.
use super::kernels::{fill_rows, separable_blur, GradientKernel, BOX_3TAP, GAUSSIAN_5TAP};
use crate::compositor::LuminanceBand;
use crate::image::{ImageRgbaF32, ImageView};
use crate::params::{GradientOperator, LuminanceBands};
use crate::program::{Binding, Keyword, MangaPass, Param};
use crate::types::{luminance, Color};

pub const STRONG: f32 = 1.0;
pub const WEAK: f32 = 0.5;

const TAN_22_5_DEG: f32 = 0.414_213_57;

pub(crate) fn run(pass: MangaPass, inputs: &[&ImageRgbaF32], out: &mut ImageRgbaF32, b: &Binding) {
    let src = inputs[0];
    match pass {
        MangaPass::Luminance => luminance_pass(src, out),
        MangaPass::Blur => blur_pass(src, out, b),
        MangaPass::Gradient => gradient_pass(src, out, b),
        MangaPass::MagnitudeThreshold => magnitude_threshold_pass(src, out, b),
        MangaPass::DoubleThreshold => double_threshold_pass(src, out),
        MangaPass::Hysteresis => hysteresis_pass(src, out),
        MangaPass::Color => color_pass(src, inputs[1], out, b),
    }
}

fn luminance_pass(src: &ImageRgbaF32, out: &mut ImageRgbaF32) {
    fill_rows(out, |x, y| {
        let l = luminance(src.get(x, y));
        [l, l, l, 1.0]
    });
}

fn blur_pass(src: &ImageRgbaF32, out: &mut ImageRgbaF32, b: &Binding) {
    if b.is_enabled(Keyword::GaussianBlur) {
        separable_blur(src, out, &GAUSSIAN_5TAP);
    } else if b.is_enabled(Keyword::BoxBlur) {
        separable_blur(src, out, &BOX_3TAP);
    } else {
        out.data.copy_from_slice(&src.data);
    }
}

fn gradient_operator(b: &Binding) -> GradientOperator {
    if b.is_enabled(Keyword::Scharr) {
        GradientOperator::Scharr
    } else if b.is_enabled(Keyword::Prewitt) {
        GradientOperator::Prewitt
    } else {
        GradientOperator::Sobel
    }
}

fn gradient_pass(src: &ImageRgbaF32, out: &mut ImageRgbaF32, b: &Binding) {
    let kernel = GradientKernel::for_operator(gradient_operator(b));
    let gx_only = b.is_enabled(Keyword::Gx);
    let gx_and_gy = b.is_enabled(Keyword::GxAndGy);
    fill_rows(out, |x, y| {
        let (gx, gy) = kernel.apply(src, x, y, |px| px[0]);
        let magnitude = if gx_only {
            gx.abs()
        } else if gx_and_gy {
            gx.abs() + gy.abs()
        } else {
            (gx * gx + gy * gy).sqrt()
        };
        [gx, gy, gy.atan2(gx), magnitude]
    });
}

/// Magnitudes of the two neighbours along the gradient direction.
#[inline]
fn nms_neighbors(grad: &ImageRgbaF32, x: usize, y: usize) -> (f32, f32) {
    let [gx, gy, _, _] = grad.get(x, y);
    let mag = |xx: usize, yy: usize| grad.get(xx, yy)[3];
    let abs_gx = gx.abs();
    let abs_gy = gy.abs();
    let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

    if abs_gx >= abs_gy {
        if abs_gy <= abs_gx * TAN_22_5_DEG {
            (mag(x - 1, y), mag(x + 1, y))
        } else if same_sign {
            (mag(x - 1, y - 1), mag(x + 1, y + 1))
        } else {
            (mag(x + 1, y - 1), mag(x - 1, y + 1))
        }
    } else if abs_gx <= abs_gy * TAN_22_5_DEG {
        (mag(x, y - 1), mag(x, y + 1))
    } else if same_sign {
        (mag(x - 1, y - 1), mag(x + 1, y + 1))
    } else {
        (mag(x + 1, y - 1), mag(x - 1, y + 1))
    }
}

fn magnitude_threshold_pass(grad: &ImageRgbaF32, out: &mut ImageRgbaF32, b: &Binding) {
    let high = b.scalar(Param::HighThreshold).unwrap_or(0.8);
    let low = b.scalar(Param::LowThreshold).unwrap_or(0.1);
    let (w, h) = (grad.w, grad.h);
    fill_rows(out, |x, y| {
        if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
            return [0.0, 0.0, 0.0, 1.0];
        }
        let mag = grad.get(x, y)[3];
        let (n1, n2) = nms_neighbors(grad, x, y);
        // Ties toward the second neighbour keep plateau edges one pixel wide.
        let class = if mag <= n1 || mag < n2 {
            0.0
        } else if mag >= high {
            STRONG
        } else if mag >= low {
            WEAK
        } else {
            0.0
        };
        [class, class, class, 1.0]
    });
}

#[inline]
fn has_strong_neighbor(class: &ImageRgbaF32, x: usize, y: usize) -> bool {
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if class.fetch_clamped(x as isize + dx, y as isize + dy)[0] > 0.75 {
                return true;
            }
        }
    }
    false
}

fn double_threshold_pass(class: &ImageRgbaF32, out: &mut ImageRgbaF32) {
    fill_rows(out, |x, y| {
        let c = class.get(x, y)[0];
        let refined = if c > 0.75 {
            STRONG
        } else if c > 0.25 && has_strong_neighbor(class, x, y) {
            STRONG
        } else if c > 0.25 {
            WEAK
        } else {
            0.0
        };
        [refined, refined, refined, 1.0]
    });
}

fn hysteresis_pass(class: &ImageRgbaF32, out: &mut ImageRgbaF32) {
    fill_rows(out, |x, y| {
        let c = class.get(x, y)[0];
        let edge = if c > 0.75 || (c > 0.25 && has_strong_neighbor(class, x, y)) {
            1.0
        } else {
            0.0
        };
        [edge, edge, edge, 1.0]
    });
}

/// One hatch layer: rotation in degrees, tiling, colour and blend threshold.
struct HatchLayer {
    cos: f32,
    sin: f32,
    tiling: (f32, f32),
    color: [f32; 4],
    threshold: f32,
}

impl HatchLayer {
    fn new(rotation_deg: f32, tiling: (f32, f32), color: Color, threshold: f32) -> Self {
        let (sin, cos) = rotation_deg.to_radians().sin_cos();
        Self {
            cos,
            sin,
            tiling,
            color: color.to_array(),
            threshold,
        }
    }

    /// Layer colour where the hatch texel is darker than the threshold.
    fn shade(&self, hatch: &ImageRgbaF32, u: f32, v: f32, base: [f32; 4]) -> [f32; 4] {
        let (cu, cv) = (u - 0.5, v - 0.5);
        let ru = cu * self.cos - cv * self.sin + 0.5;
        let rv = cu * self.sin + cv * self.cos + 0.5;
        let texel = hatch.sample_wrap(ru * self.tiling.0, rv * self.tiling.1);
        if luminance(texel) < self.threshold {
            self.color
        } else {
            base
        }
    }
}

fn color_pass(
    edges: &ImageRgbaF32,
    source: &ImageRgbaF32,
    out: &mut ImageRgbaF32,
    b: &Binding,
) {
    let bands = b
        .vector(Param::LuminanceBands)
        .map(LuminanceBands::from_vector)
        .unwrap_or_default();
    let outline = b.color(Param::OutlineColor).unwrap_or(Color::BLACK).to_array();
    let background = b
        .color(Param::BackgroundColor)
        .unwrap_or(Color::WHITE)
        .to_array();
    let shadow = b.color(Param::ShadowColor).unwrap_or(Color::BLACK).to_array();
    let paper = b.texture(Param::PaperTex);
    let hatch = b.texture(Param::HatchTex);
    let tiling = b
        .vector(Param::HatchTiling)
        .map(|v| (v.x, v.y))
        .unwrap_or((1.0, 1.0));
    let main = HatchLayer::new(
        b.scalar(Param::HatchRotation).unwrap_or(0.0),
        tiling,
        b.color(Param::MainHatchColor).unwrap_or(Color::GRAY),
        b.scalar(Param::HatchBlendThreshold).unwrap_or(0.8),
    );
    let secondary = HatchLayer::new(
        b.scalar(Param::SecondaryHatchRotation).unwrap_or(0.0),
        tiling,
        b.color(Param::SecondaryHatchColor).unwrap_or(Color::BLACK),
        b.scalar(Param::SecondaryHatchBlendThreshold).unwrap_or(0.2),
    );

    let (w, h) = (out.w as f32, out.h as f32);
    fill_rows(out, |x, y| {
        let u = (x as f32 + 0.5) / w;
        let v = (y as f32 + 0.5) / h;

        let mut px = match LuminanceBand::classify(luminance(source.get(x, y)), &bands) {
            LuminanceBand::Light => background,
            LuminanceBand::Shadow => shadow,
            LuminanceBand::MainHatch => match hatch {
                Some(tex) => main.shade(tex, u, v, background),
                None => background,
            },
            LuminanceBand::SecondaryHatch => match hatch {
                Some(tex) => {
                    let base = main.shade(tex, u, v, background);
                    secondary.shade(tex, u, v, base)
                }
                None => background,
            },
        };
        if edges.get(x, y)[0] > 0.5 {
            px = outline;
        }
        if let Some(paper) = paper {
            let texel = paper.sample_wrap(u, v);
            for c in 0..3 {
                px[c] *= texel[c];
            }
        }
        px
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BindParams, MangaParams};

    fn manga_binding() -> Binding {
        let mut binding = Binding::new(MangaPass::PROGRAM);
        MangaParams::default().bind(&mut binding);
        binding
    }

    fn gray(w: usize, h: usize, l: f32) -> ImageRgbaF32 {
        ImageRgbaF32::filled(w, h, [l, l, l, 1.0])
    }

    fn hatched_binding(hatch: ImageRgbaF32) -> Binding {
        let mut params = MangaParams::default();
        params.hatch.texture = Some(hatch.into_texture());
        params.hatch.main_color = Color::RED;
        params.hatch.secondary_color = Color::BLUE;
        let mut binding = Binding::new(MangaPass::PROGRAM);
        params.bind(&mut binding);
        binding
    }

    fn composite(source: &ImageRgbaF32, binding: &Binding) -> ImageRgbaF32 {
        let edges = gray(source.w, source.h, 0.0);
        let mut out = ImageRgbaF32::new(source.w, source.h);
        color_pass(&edges, source, &mut out, binding);
        out
    }

    #[test]
    fn hysteresis_promotes_only_connected_weak_pixels() {
        let mut class = ImageRgbaF32::filled(9, 5, [0.0, 0.0, 0.0, 1.0]);
        class.set(2, 2, [STRONG, STRONG, STRONG, 1.0]);
        class.set(3, 2, [WEAK, WEAK, WEAK, 1.0]);
        class.set(7, 2, [WEAK, WEAK, WEAK, 1.0]);
        let mut out = ImageRgbaF32::new(9, 5);
        hysteresis_pass(&class, &mut out);
        assert_eq!(out.get(2, 2)[0], 1.0);
        assert_eq!(out.get(3, 2)[0], 1.0);
        assert_eq!(out.get(7, 2)[0], 0.0);
    }

    #[test]
    fn flat_gradient_is_zero() {
        let lum = ImageRgbaF32::filled(6, 6, [0.5, 0.5, 0.5, 1.0]);
        let mut grad = ImageRgbaF32::new(6, 6);
        gradient_pass(&lum, &mut grad, &manga_binding());
        assert!(grad.data.iter().all(|px| px[3].abs() < 1e-6));
    }

    #[test]
    fn magnitude_modes_follow_keywords() {
        let lum = ImageRgbaF32::from_fn(6, 6, |x, y| {
            let column = if x >= 3 { 1.0 } else { 0.0 };
            let row = if y >= 3 { 1.0 } else { 0.5 };
            let v = column * row;
            [v, v, v, 1.0]
        });
        let mut binding = manga_binding();
        let mut alpha = ImageRgbaF32::new(6, 6);
        gradient_pass(&lum, &mut alpha, &binding);

        binding.set_flag(Keyword::GxAndGy, true);
        let mut sum = ImageRgbaF32::new(6, 6);
        gradient_pass(&lum, &mut sum, &binding);

        let [gx, gy, _, mag] = sum.get(3, 3);
        assert!((mag - (gx.abs() + gy.abs())).abs() < 1e-6);
        assert!((alpha.get(3, 3)[3] - (gx * gx + gy * gy).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn main_hatch_band_takes_main_colour_on_dark_texels() {
        let binding = hatched_binding(gray(2, 2, 0.0));
        let out = composite(&gray(4, 4, 0.6), &binding);
        assert!(out.data.iter().all(|&px| px == Color::RED.to_array()));
    }

    #[test]
    fn secondary_band_layers_secondary_over_main() {
        let out = composite(&gray(4, 4, 0.4), &hatched_binding(gray(2, 2, 0.0)));
        assert!(out.data.iter().all(|&px| px == Color::BLUE.to_array()));

        // Mid texel: below the main threshold only.
        let out = composite(&gray(4, 4, 0.4), &hatched_binding(gray(2, 2, 0.5)));
        assert!(out.data.iter().all(|&px| px == Color::RED.to_array()));
    }

    #[test]
    fn hatch_bands_fall_back_to_background_without_texture() {
        let binding = manga_binding();
        let background = MangaParams::default().background_color.to_array();
        let out = composite(&gray(4, 4, 0.6), &binding);
        assert!(out.data.iter().all(|&px| px == background));
    }

    #[test]
    fn paper_texture_multiplies_result() {
        let mut binding = hatched_binding(gray(2, 2, 0.0));
        binding.set_texture(Param::PaperTex, Some(gray(2, 2, 0.5).into_texture()));
        let out = composite(&gray(4, 4, 0.6), &binding);
        assert!(out.data.iter().all(|&px| px == [0.5, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn hatch_rotation_changes_sampled_texels() {
        // Dark left half, bright right half.
        let stripes = ImageRgbaF32::from_fn(2, 1, |x, _| {
            let v = x as f32;
            [v, v, v, 1.0]
        });
        let source = gray(4, 4, 0.6);
        let mut binding = hatched_binding(stripes);
        binding.set_vector(Param::HatchTiling, nalgebra::Vector4::new(1.0, 1.0, 0.0, 0.0));

        let upright = composite(&source, &binding);
        let main = Color::RED.to_array();
        for y in 0..4 {
            assert_eq!(upright.get(0, y), main);
            assert_ne!(upright.get(3, y), main);
        }

        binding.set_scalar(Param::HatchRotation, 90.0);
        let rotated = composite(&source, &binding);
        for x in 0..4 {
            assert_ne!(rotated.get(x, 0), main);
            assert_eq!(rotated.get(x, 3), main);
        }
    }
}
