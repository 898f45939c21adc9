//! CPU passes of the outline, Sobel angle and sharpness programs.
use super::kernels::{fill_rows, GradientKernel};
use super::CameraBuffers;
use crate::image::{ImageRgbaF32, ImageView};
use crate::params::GradientOperator;
use crate::program::{
    Binding, DepthOutlinePass, Keyword, NormalDepthOutlinePass, OutlinePass, Param,
    SharpnessPass, SobelAnglePass,
};
use crate::types::{luminance, Color};

fn base_color(b: &Binding, source: &ImageRgbaF32, x: usize, y: usize) -> [f32; 4] {
    if b.is_enabled(Keyword::EdgeChecker) {
        b.color(Param::BackgroundColor)
            .unwrap_or(Color::YELLOW)
            .to_array()
    } else {
        source.get(x, y)
    }
}

fn lerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn sample_distance(b: &Binding) -> isize {
    b.scalar(Param::SampleDistance).unwrap_or(1.0).max(0.0).round() as isize
}

/// Roberts cross magnitude of `value` with diagonal offset `d`.
fn roberts<F: Fn(isize, isize) -> f32>(value: F, x: isize, y: isize, d: isize) -> f32 {
    let a = value(x, y) - value(x + d, y + d);
    let c = value(x + d, y) - value(x, y + d);
    (a * a + c * c).sqrt()
}

pub(crate) fn outline(
    _pass: OutlinePass,
    source: &ImageRgbaF32,
    out: &mut ImageRgbaF32,
    b: &Binding,
    camera: &CameraBuffers,
) {
    let (w, h) = (source.w, source.h);
    let depth = camera.depth_image(w, h);
    let normals = camera.normal_image(w, h);
    let d = sample_distance(b);
    let strength = b
        .vector(Param::SampleStrength)
        .map(|v| (v.x, v.y, v.z))
        .unwrap_or((1.0, 1.0, 1.0));
    let outline_color = b.color(Param::OutlineColor).unwrap_or(Color::BLACK).to_array();

    fill_rows(out, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let depth_edge = roberts(|sx, sy| depth.fetch_clamped(sx, sy)[0], xi, yi, d);
        let luma_edge = roberts(|sx, sy| luminance(source.fetch_clamped(sx, sy)), xi, yi, d);
        let normal_edge = {
            let n = |sx, sy| normals.fetch_clamped(sx, sy);
            let diff = |p: [f32; 4], q: [f32; 4]| {
                let (dx, dy, dz) = (p[0] - q[0], p[1] - q[1], p[2] - q[2]);
                dx * dx + dy * dy + dz * dz
            };
            (diff(n(xi, yi), n(xi + d, yi + d)) + diff(n(xi + d, yi), n(xi, yi + d))).sqrt()
        };
        let edge = (depth_edge * strength.0)
            .max(luma_edge * strength.1)
            .max(normal_edge * strength.2)
            .clamp(0.0, 1.0);
        lerp(base_color(b, source, x, y), outline_color, edge)
    });
}

pub(crate) fn depth_outline(
    pass: DepthOutlinePass,
    inputs: &[&ImageRgbaF32],
    out: &mut ImageRgbaF32,
    b: &Binding,
    camera: &CameraBuffers,
) {
    match pass {
        DepthOutlinePass::Sobel => {
            let depth = camera.depth_image(out.w, out.h);
            let threshold = b.scalar(Param::DepthThreshold).unwrap_or(0.0001);
            let kernel = GradientKernel::for_operator(GradientOperator::Sobel);
            fill_rows(out, |x, y| {
                let (gx, gy) = kernel.apply(&depth, x, y, |px| px[0]);
                let e = if (gx * gx + gy * gy).sqrt() > threshold {
                    1.0
                } else {
                    0.0
                };
                [e, e, e, 1.0]
            });
        }
        DepthOutlinePass::LineWidth => {
            let (mask, source) = (inputs[0], inputs[1]);
            let d = sample_distance(b).max(1);
            let outline_color = b.color(Param::OutlineColor).unwrap_or(Color::BLACK).to_array();
            fill_rows(out, |x, y| {
                let (xi, yi) = (x as isize, y as isize);
                for dy in -d..=d {
                    for dx in -d..=d {
                        if dx * dx + dy * dy > d * d {
                            continue;
                        }
                        if mask.fetch_clamped(xi + dx, yi + dy)[0] > 0.5 {
                            return outline_color;
                        }
                    }
                }
                source.get(x, y)
            });
        }
    }
}

pub(crate) fn normal_depth_outline(
    _pass: NormalDepthOutlinePass,
    source: &ImageRgbaF32,
    out: &mut ImageRgbaF32,
    b: &Binding,
    camera: &CameraBuffers,
) {
    let (w, h) = (source.w, source.h);
    let depth = camera.depth_image(w, h);
    let normals = camera.normal_image(w, h);
    let d = sample_distance(b);
    let (depth_threshold, normal_threshold) = b
        .vector(Param::SampleThresholds)
        .map(|v| (v.x, v.y))
        .unwrap_or((0.5, 0.995));
    let distortion = b.texture(Param::DistortionTex);
    let power = b.scalar(Param::DistortionPower).unwrap_or(0.0);
    let outline_color = b.color(Param::OutlineColor).unwrap_or(Color::BLACK).to_array();

    fill_rows(out, |x, y| {
        let (ox, oy) = match distortion {
            Some(tex) => {
                let t = tex.sample_wrap((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32);
                ((t[0] * 2.0 - 1.0) * power, (t[1] * 2.0 - 1.0) * power)
            }
            None => (0.0, 0.0),
        };
        let cx = (x as f32 + ox).round() as isize;
        let cy = (y as f32 + oy).round() as isize;
        let depth_c = depth.fetch_clamped(cx, cy)[0];
        let normal_c = normals.fetch_clamped(cx, cy);

        let is_edge = [(d, 0), (-d, 0), (0, d), (0, -d)].iter().any(|&(dx, dy)| {
            let depth_n = depth.fetch_clamped(cx + dx, cy + dy)[0];
            let normal_n = normals.fetch_clamped(cx + dx, cy + dy);
            let dot = normal_c[0] * normal_n[0] + normal_c[1] * normal_n[1] + normal_c[2] * normal_n[2];
            (depth_c - depth_n).abs() > depth_threshold || dot < normal_threshold
        });
        if is_edge {
            outline_color
        } else {
            base_color(b, source, x, y)
        }
    });
}

pub(crate) fn sobel_angle(
    pass: SobelAnglePass,
    source: &ImageRgbaF32,
    out: &mut ImageRgbaF32,
    b: &Binding,
) {
    match pass {
        SobelAnglePass::Sobel => {
            let kernel = GradientKernel::for_operator(GradientOperator::Sobel);
            fill_rows(out, |x, y| {
                let (gx, gy) = kernel.apply(source, x, y, luminance);
                [gx, gy, (gx * gx + gy * gy).sqrt(), 1.0]
            });
        }
        SobelAnglePass::Visualizer => {
            let up = b.color(Param::UpColor).unwrap_or(Color::BLUE).to_array();
            let down = b.color(Param::DownColor).unwrap_or(Color::RED).to_array();
            let right = b.color(Param::RightColor).unwrap_or(Color::YELLOW).to_array();
            let left = b.color(Param::LeftColor).unwrap_or(Color::GREEN).to_array();
            fill_rows(out, |x, y| {
                let [gx, gy, mag, _] = source.get(x, y);
                let color = if gx.abs() >= gy.abs() {
                    if gx >= 0.0 {
                        right
                    } else {
                        left
                    }
                } else if gy >= 0.0 {
                    down
                } else {
                    up
                };
                let k = mag.clamp(0.0, 1.0);
                [color[0] * k, color[1] * k, color[2] * k, 1.0]
            });
        }
    }
}

pub(crate) fn sharpen(_pass: SharpnessPass, source: &ImageRgbaF32, out: &mut ImageRgbaF32, b: &Binding) {
    let sharpness = b.scalar(Param::Sharpness).unwrap_or(1.0);
    fill_rows(out, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let c = source.get(x, y);
        let north = source.fetch_clamped(xi, yi - 1);
        let south = source.fetch_clamped(xi, yi + 1);
        let east = source.fetch_clamped(xi + 1, yi);
        let west = source.fetch_clamped(xi - 1, yi);
        let mut px = c;
        for ch in 0..3 {
            let laplacian = 4.0 * c[ch] - north[ch] - south[ch] - east[ch] - west[ch];
            px[ch] = (c[ch] + laplacian * sharpness).clamp(0.0, 1.0);
        }
        px
    });
}
