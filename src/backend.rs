//! Collaborator seams: image handles, the scratch pool and the pass executor.
//!
//! The effects in this crate never touch pixels. Every frame is expressed as
//! a sequence of [`PassExecutor::run_pass`] calls over images handed out by
//! an [`ImagePool`]. A GPU host implements these traits over its own render
//! targets; [`crate::cpu`] provides a reference implementation.
use crate::error::FxResult;
use crate::image::ImageRgbaF32;
use crate::program::{Binding, ProgramId};
use crate::types::PixelFormat;

/// Opaque 2D image owned by the host.
pub trait ImageHandle {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn format(&self) -> PixelFormat;

    fn resolution(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

/// Pool of temporary render targets.
///
/// Not thread-safe by contract: one effect instance drives it from a single
/// frame callback.
pub trait ImagePool {
    type Image: ImageHandle;

    /// Fails with [`FxError::InvalidDimensions`](crate::FxError) when either
    /// dimension is zero.
    fn acquire(&mut self, width: usize, height: usize, format: PixelFormat)
        -> FxResult<Self::Image>;

    fn release(&mut self, image: Self::Image);
}

/// Applies program passes to images.
pub trait PassExecutor {
    type Image: ImageHandle;

    /// Allocate the parameter binding for `program`. Failure leaves the
    /// owning effect in pass-through mode for the frame.
    fn create_binding(&mut self, program: &ProgramId) -> FxResult<Binding>;

    /// Run pass `pass` of `binding`'s program reading `inputs` (one or two
    /// images) and writing `output`.
    fn run_pass(
        &mut self,
        pass: usize,
        inputs: &[&Self::Image],
        output: &mut Self::Image,
        binding: &Binding,
    ) -> FxResult<()>;

    /// Identity copy between images of equal resolution.
    fn blit(&mut self, source: &Self::Image, destination: &mut Self::Image) -> FxResult<()>;

    /// Copy `source` into `destination`, resampling to `destination`'s
    /// resolution.
    fn blit_scaled(&mut self, source: &Self::Image, destination: &mut Self::Image)
        -> FxResult<()>;

    /// Copy a host texture into an image of the same resolution.
    fn upload(&mut self, texture: &ImageRgbaF32, destination: &mut Self::Image) -> FxResult<()>;
}

/// Run `f` with a scratch image acquired from `pool`, releasing it afterwards
/// whether `f` succeeds or fails.
pub fn with_scratch<P, T>(
    pool: &mut P,
    width: usize,
    height: usize,
    format: PixelFormat,
    f: impl FnOnce(&mut P::Image, &mut P) -> FxResult<T>,
) -> FxResult<T>
where
    P: ImagePool,
{
    let mut scratch = pool.acquire(width, height, format)?;
    let result = f(&mut scratch, pool);
    pool.release(scratch);
    result
}
