//! CPU reference backend.
//!
//! [`CpuExecutor`] implements every built-in program over [`ImageRgbaF32`]
//! and [`CpuImagePool`] hands out scratch images from a free list while
//! counting acquisitions. Camera depth and normals are executor state, in
//! the way an engine exposes them as global textures to every program.
//!
//! Depth is read from the red channel in `[0, 1]`; normals from `rgb` as
//! signed unit vectors. Missing buffers read as depth `0` and normal
//! `(0, 0, 1)`, so the corresponding outline terms vanish.

pub mod canny;
pub mod filters;
pub mod kernels;

use crate::backend::{ImagePool, PassExecutor};
use crate::error::{FxError, FxResult};
use crate::image::{ImageRgbaF32, Texture};
use crate::program::{
    Binding, DepthOutlinePass, MangaPass, NormalDepthOutlinePass, OutlinePass, ProgramId,
    SharpnessPass, SobelAnglePass,
};
use crate::types::PixelFormat;
use log::debug;
use serde::Serialize;

/// Programs the CPU executor knows how to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinProgram {
    Manga,
    Outline,
    DepthOutline,
    NormalDepthOutline,
    SobelAngle,
    Sharpness,
}

impl BuiltinProgram {
    pub const ALL: [BuiltinProgram; 6] = [
        BuiltinProgram::Manga,
        BuiltinProgram::Outline,
        BuiltinProgram::DepthOutline,
        BuiltinProgram::NormalDepthOutline,
        BuiltinProgram::SobelAngle,
        BuiltinProgram::Sharpness,
    ];

    pub fn id(self) -> ProgramId {
        match self {
            BuiltinProgram::Manga => MangaPass::PROGRAM,
            BuiltinProgram::Outline => OutlinePass::PROGRAM,
            BuiltinProgram::DepthOutline => DepthOutlinePass::PROGRAM,
            BuiltinProgram::NormalDepthOutline => NormalDepthOutlinePass::PROGRAM,
            BuiltinProgram::SobelAngle => SobelAnglePass::PROGRAM,
            BuiltinProgram::Sharpness => SharpnessPass::PROGRAM,
        }
    }

    pub fn from_id(id: &ProgramId) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == *id)
    }

    pub fn pass_count(self) -> usize {
        match self {
            BuiltinProgram::Manga => MangaPass::ALL.len(),
            BuiltinProgram::Outline => OutlinePass::ALL.len(),
            BuiltinProgram::DepthOutline => DepthOutlinePass::ALL.len(),
            BuiltinProgram::NormalDepthOutline => NormalDepthOutlinePass::ALL.len(),
            BuiltinProgram::SobelAngle => SobelAnglePass::ALL.len(),
            BuiltinProgram::Sharpness => SharpnessPass::ALL.len(),
        }
    }

    /// Number of input images pass `pass` reads.
    pub fn input_count(self, pass: usize) -> usize {
        match (self, pass) {
            (BuiltinProgram::Manga, p) if p == MangaPass::Color as usize => 2,
            (BuiltinProgram::DepthOutline, p) if p == DepthOutlinePass::LineWidth as usize => 2,
            _ => 1,
        }
    }
}

/// Camera buffers sampled by the outline programs.
#[derive(Clone, Debug, Default)]
pub struct CameraBuffers {
    pub depth: Option<Texture>,
    pub normals: Option<Texture>,
}

impl CameraBuffers {
    fn resample(texture: Option<&Texture>, w: usize, h: usize, fallback: [f32; 4]) -> ImageRgbaF32 {
        match texture {
            Some(tex) if tex.w == w && tex.h == h => (**tex).clone(),
            Some(tex) => ImageRgbaF32::from_fn(w, h, |x, y| {
                tex.sample_clamp((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32)
            }),
            None => ImageRgbaF32::filled(w, h, fallback),
        }
    }

    /// Depth at `w × h`, nearest-sampled from the camera buffer.
    pub fn depth_image(&self, w: usize, h: usize) -> ImageRgbaF32 {
        Self::resample(self.depth.as_ref(), w, h, [0.0, 0.0, 0.0, 1.0])
    }

    pub fn normal_image(&self, w: usize, h: usize) -> ImageRgbaF32 {
        Self::resample(self.normals.as_ref(), w, h, [0.0, 0.0, 1.0, 1.0])
    }
}

/// Single-threaded executor over [`ImageRgbaF32`] (rows may run in
/// parallel with the `parallel` feature).
#[derive(Debug, Default)]
pub struct CpuExecutor {
    camera: CameraBuffers,
    passes_run: usize,
    bindings_created: usize,
}

impl CpuExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(camera: CameraBuffers) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn camera(&self) -> &CameraBuffers {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraBuffers {
        &mut self.camera
    }

    /// Total passes executed, blits and uploads excluded.
    pub fn passes_run(&self) -> usize {
        self.passes_run
    }

    pub fn bindings_created(&self) -> usize {
        self.bindings_created
    }
}

impl PassExecutor for CpuExecutor {
    type Image = ImageRgbaF32;

    fn create_binding(&mut self, program: &ProgramId) -> FxResult<Binding> {
        BuiltinProgram::from_id(program)
            .ok_or_else(|| FxError::UnknownProgram(program.to_string()))?;
        self.bindings_created += 1;
        Ok(Binding::new(program.clone()))
    }

    fn run_pass(
        &mut self,
        pass: usize,
        inputs: &[&ImageRgbaF32],
        output: &mut ImageRgbaF32,
        binding: &Binding,
    ) -> FxResult<()> {
        let id = binding.program();
        let program = BuiltinProgram::from_id(id)
            .ok_or_else(|| FxError::UnknownProgram(id.to_string()))?;
        let count = program.pass_count();
        if pass >= count {
            return Err(FxError::PassOutOfRange {
                program: id.to_string(),
                pass,
                count,
            });
        }
        let expected = program.input_count(pass);
        if inputs.len() != expected {
            return Err(FxError::InputCount {
                program: id.to_string(),
                pass,
                expected,
                actual: inputs.len(),
            });
        }
        let dims = (output.w, output.h);
        for input in inputs {
            FxError::check_dims(dims, (input.w, input.h))?;
        }

        match program {
            BuiltinProgram::Manga => {
                if let Some(p) = MangaPass::from_index(pass) {
                    canny::run(p, inputs, output, binding);
                }
            }
            BuiltinProgram::Outline => {
                if let Some(p) = OutlinePass::from_index(pass) {
                    filters::outline(p, inputs[0], output, binding, &self.camera);
                }
            }
            BuiltinProgram::DepthOutline => {
                if let Some(p) = DepthOutlinePass::from_index(pass) {
                    filters::depth_outline(p, inputs, output, binding, &self.camera);
                }
            }
            BuiltinProgram::NormalDepthOutline => {
                if let Some(p) = NormalDepthOutlinePass::from_index(pass) {
                    filters::normal_depth_outline(p, inputs[0], output, binding, &self.camera);
                }
            }
            BuiltinProgram::SobelAngle => {
                if let Some(p) = SobelAnglePass::from_index(pass) {
                    filters::sobel_angle(p, inputs[0], output, binding);
                }
            }
            BuiltinProgram::Sharpness => {
                if let Some(p) = SharpnessPass::from_index(pass) {
                    filters::sharpen(p, inputs[0], output, binding);
                }
            }
        }
        self.passes_run += 1;
        Ok(())
    }

    fn blit(&mut self, source: &ImageRgbaF32, destination: &mut ImageRgbaF32) -> FxResult<()> {
        FxError::check_dims((destination.w, destination.h), (source.w, source.h))?;
        destination.data.copy_from_slice(&source.data);
        Ok(())
    }

    fn blit_scaled(
        &mut self,
        source: &ImageRgbaF32,
        destination: &mut ImageRgbaF32,
    ) -> FxResult<()> {
        if (source.w, source.h) == (destination.w, destination.h) {
            return self.blit(source, destination);
        }
        if source.w == 0 || source.h == 0 {
            return Err(FxError::InvalidDimensions {
                width: source.w,
                height: source.h,
            });
        }
        let (w, h) = (destination.w as f32, destination.h as f32);
        kernels::fill_rows(destination, |x, y| {
            source.sample_clamp((x as f32 + 0.5) / w, (y as f32 + 0.5) / h)
        });
        Ok(())
    }

    fn upload(&mut self, texture: &ImageRgbaF32, destination: &mut ImageRgbaF32) -> FxResult<()> {
        FxError::check_dims((destination.w, destination.h), (texture.w, texture.h))?;
        destination.data.copy_from_slice(&texture.data);
        Ok(())
    }
}

/// Scratch allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub acquired: usize,
    pub released: usize,
    /// Images handed out and not yet returned.
    pub live: usize,
    pub peak_live: usize,
}

/// Free-list pool of [`ImageRgbaF32`] scratch images.
#[derive(Debug, Default)]
pub struct CpuImagePool {
    free: Vec<ImageRgbaF32>,
    stats: PoolStats,
}

impl CpuImagePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Images parked on the free list.
    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

impl ImagePool for CpuImagePool {
    type Image = ImageRgbaF32;

    fn acquire(&mut self, width: usize, height: usize, format: PixelFormat) -> FxResult<ImageRgbaF32> {
        if width == 0 || height == 0 {
            return Err(FxError::InvalidDimensions { width, height });
        }
        let reused = self
            .free
            .iter()
            .position(|img| img.w == width && img.h == height && img.format == format);
        let image = match reused {
            Some(i) => self.free.swap_remove(i),
            None => {
                debug!("CpuImagePool::acquire new w={} h={} format={:?}", width, height, format);
                ImageRgbaF32::with_format(width, height, format)
            }
        };
        self.stats.acquired += 1;
        self.stats.live += 1;
        self.stats.peak_live = self.stats.peak_live.max(self.stats.live);
        Ok(image)
    }

    fn release(&mut self, image: ImageRgbaF32) {
        self.stats.released += 1;
        self.stats.live = self.stats.live.saturating_sub(1);
        self.free.push(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_rejects_zero_dimensions() {
        let mut pool = CpuImagePool::new();
        let err = pool.acquire(0, 4, PixelFormat::RgbaF32).unwrap_err();
        assert!(matches!(err, FxError::InvalidDimensions { width: 0, height: 4 }));
        assert_eq!(pool.stats().acquired, 0);
    }

    #[test]
    fn pool_reuses_released_images() {
        let mut pool = CpuImagePool::new();
        let a = pool.acquire(8, 4, PixelFormat::RgbaF32).unwrap();
        pool.release(a);
        let b = pool.acquire(8, 4, PixelFormat::RgbaF32).unwrap();
        assert_eq!(pool.idle(), 0);
        pool.release(b);
        let stats = pool.stats();
        assert_eq!(stats.acquired, 2);
        assert_eq!(stats.released, 2);
        assert_eq!(stats.live, 0);
        assert_eq!(stats.peak_live, 1);
    }

    #[test]
    fn run_pass_validates_range_and_inputs() {
        let mut exec = CpuExecutor::new();
        let binding = exec.create_binding(&MangaPass::PROGRAM).unwrap();
        let src = ImageRgbaF32::new(4, 4);
        let mut out = ImageRgbaF32::new(4, 4);

        let err = exec.run_pass(7, &[&src], &mut out, &binding).unwrap_err();
        assert!(matches!(err, FxError::PassOutOfRange { pass: 7, count: 7, .. }));

        let err = exec
            .run_pass(MangaPass::Color as usize, &[&src], &mut out, &binding)
            .unwrap_err();
        assert!(matches!(err, FxError::InputCount { expected: 2, actual: 1, .. }));

        let small = ImageRgbaF32::new(2, 2);
        let err = exec
            .run_pass(MangaPass::Luminance as usize, &[&small], &mut out, &binding)
            .unwrap_err();
        assert!(matches!(err, FxError::DimensionMismatch { .. }));
        assert_eq!(exec.passes_run(), 0);
    }

    #[test]
    fn blit_scaled_resamples_to_destination() {
        let mut exec = CpuExecutor::new();
        let source = ImageRgbaF32::from_fn(2, 1, |x, _| {
            let v = x as f32;
            [v, v, v, 1.0]
        });
        let mut destination = ImageRgbaF32::new(4, 2);
        exec.blit_scaled(&source, &mut destination).unwrap();
        assert_eq!(destination.get(0, 1), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(destination.get(3, 0), [1.0, 1.0, 1.0, 1.0]);

        let mut same = ImageRgbaF32::new(2, 1);
        exec.blit_scaled(&source, &mut same).unwrap();
        assert_eq!(same.data, source.data);
    }

    #[test]
    fn unknown_program_is_refused() {
        let mut exec = CpuExecutor::new();
        let err = exec
            .create_binding(&ProgramId::new("Hidden/Missing"))
            .unwrap_err();
        assert!(matches!(err, FxError::UnknownProgram(_)));
    }
}
