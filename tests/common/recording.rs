//! Collaborator wrappers recording what the effects ask of them.
use manga_fx::backend::{ImagePool, PassExecutor};
use manga_fx::cpu::{CpuExecutor, CpuImagePool};
use manga_fx::image::ImageRgbaF32;
use manga_fx::program::{Binding, ProgramId};
use manga_fx::types::PixelFormat;
use manga_fx::{FxError, FxResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassCall {
    pub pass: usize,
    pub inputs: Vec<(usize, usize)>,
    pub output: (usize, usize),
}

#[derive(Default)]
pub struct RecordingExecutor {
    pub inner: CpuExecutor,
    pub calls: Vec<PassCall>,
    pub blits: usize,
    pub scaled_blits: usize,
    pub binding_attempts: usize,
    /// Fail when this pass index is issued.
    pub fail_on_pass: Option<usize>,
    /// Refuse every binding request.
    pub refuse_bindings: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass_order(&self) -> Vec<usize> {
        self.calls.iter().map(|c| c.pass).collect()
    }
}

impl PassExecutor for RecordingExecutor {
    type Image = ImageRgbaF32;

    fn create_binding(&mut self, program: &ProgramId) -> FxResult<Binding> {
        self.binding_attempts += 1;
        if self.refuse_bindings {
            return Err(FxError::backend("binding refused"));
        }
        self.inner.create_binding(program)
    }

    fn run_pass(
        &mut self,
        pass: usize,
        inputs: &[&ImageRgbaF32],
        output: &mut ImageRgbaF32,
        binding: &Binding,
    ) -> FxResult<()> {
        self.calls.push(PassCall {
            pass,
            inputs: inputs.iter().map(|i| (i.w, i.h)).collect(),
            output: (output.w, output.h),
        });
        if self.fail_on_pass == Some(pass) {
            return Err(FxError::backend(format!("injected failure on pass {pass}")));
        }
        self.inner.run_pass(pass, inputs, output, binding)
    }

    fn blit(&mut self, source: &ImageRgbaF32, destination: &mut ImageRgbaF32) -> FxResult<()> {
        self.blits += 1;
        self.inner.blit(source, destination)
    }

    fn blit_scaled(
        &mut self,
        source: &ImageRgbaF32,
        destination: &mut ImageRgbaF32,
    ) -> FxResult<()> {
        self.scaled_blits += 1;
        self.inner.blit_scaled(source, destination)
    }

    fn upload(&mut self, texture: &ImageRgbaF32, destination: &mut ImageRgbaF32) -> FxResult<()> {
        self.inner.upload(texture, destination)
    }
}

#[derive(Default)]
pub struct RecordingPool {
    pub inner: CpuImagePool,
    pub acquired_sizes: Vec<(usize, usize)>,
}

impl RecordingPool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImagePool for RecordingPool {
    type Image = ImageRgbaF32;

    fn acquire(&mut self, width: usize, height: usize, format: PixelFormat) -> FxResult<ImageRgbaF32> {
        self.acquired_sizes.push((width, height));
        self.inner.acquire(width, height, format)
    }

    fn release(&mut self, image: ImageRgbaF32) {
        self.inner.release(image)
    }
}
