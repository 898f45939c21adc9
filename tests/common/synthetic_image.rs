use manga_fx::image::ImageRgbaF32;

pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Uniform image of the given grey level.
pub fn flat_gray(width: usize, height: usize, level: f32) -> ImageRgbaF32 {
    ImageRgbaF32::filled(width, height, [level, level, level, 1.0])
}

/// Black left of column `split`, white from `split` on.
pub fn vertical_step(width: usize, height: usize, split: usize) -> ImageRgbaF32 {
    assert!(split > 0 && split < width, "split must fall inside the image");
    ImageRgbaF32::from_fn(width, height, |x, _| if x >= split { WHITE } else { BLACK })
}

/// Dark/light checkerboard with square cells.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> ImageRgbaF32 {
    assert!(cell > 0, "cell size must be positive");
    ImageRgbaF32::from_fn(width, height, |x, y| {
        let v = if ((x / cell) + (y / cell)) & 1 == 0 {
            0.125
        } else {
            0.86
        };
        [v, v, v, 1.0]
    })
}

/// Pixels whose first channel marks an edge.
pub fn edge_pixels(image: &ImageRgbaF32) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for y in 0..image.h {
        for x in 0..image.w {
            if image.get(x, y)[0] > 0.5 {
                out.push((x, y));
            }
        }
    }
    out
}
