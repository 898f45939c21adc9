//! Outline effects driven by camera depth, normals and luminance.
//!
//! The executor owns the camera buffers; these effects only select the
//! program, push parameters and order the passes.
use super::{render_single, run_traced, ApplyOutcome, Effect, EffectController};
use crate::backend::{with_scratch, ImageHandle, ImagePool, PassExecutor};
use crate::diagnostics::TimingBreakdown;
use crate::error::FxResult;
use crate::params::{BindParams, DepthOutlineParams, NormalDepthOutlineParams, OutlineParams};
use crate::program::{DepthOutlinePass, NormalDepthOutlinePass, OutlinePass, ProgramId};

pub struct OutlineEffect {
    controller: EffectController,
}

impl Default for OutlineEffect {
    fn default() -> Self {
        Self::new(Some(OutlinePass::PROGRAM))
    }
}

impl OutlineEffect {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            controller: EffectController::new(program),
        }
    }
}

impl Effect for OutlineEffect {
    type Params = OutlineParams;

    fn name(&self) -> &'static str {
        "outline"
    }

    fn controller_mut(&mut self) -> &mut EffectController {
        &mut self.controller
    }

    fn apply<E, P>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        params: &OutlineParams,
        exec: &mut E,
        pool: &mut P,
    ) -> FxResult<ApplyOutcome>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>,
    {
        self.controller.run(
            source,
            destination,
            exec,
            pool,
            |binding| params.bind(binding),
            |binding, exec, _, source, destination| {
                render_single(OutlinePass::Outline, binding, exec, source, destination)
            },
        )
    }
}

/// Depth Sobel into a scratch mask, then line-width dilation over the source.
pub struct DepthOutlineEffect {
    controller: EffectController,
}

impl Default for DepthOutlineEffect {
    fn default() -> Self {
        Self::new(Some(DepthOutlinePass::PROGRAM))
    }
}

impl DepthOutlineEffect {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            controller: EffectController::new(program),
        }
    }
}

impl Effect for DepthOutlineEffect {
    type Params = DepthOutlineParams;

    fn name(&self) -> &'static str {
        "depth_outline"
    }

    fn controller_mut(&mut self) -> &mut EffectController {
        &mut self.controller
    }

    fn apply<E, P>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        params: &DepthOutlineParams,
        exec: &mut E,
        pool: &mut P,
    ) -> FxResult<ApplyOutcome>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>,
    {
        self.controller.run(
            source,
            destination,
            exec,
            pool,
            |binding| params.bind(binding),
            |binding, exec, pool, source, destination| {
                let (width, height) = source.resolution();
                with_scratch(pool, width, height, source.format(), |mask, _| {
                    let mut trace = TimingBreakdown::new(width, height);
                    run_traced(
                        DepthOutlinePass::Sobel,
                        &[source],
                        mask,
                        binding,
                        exec,
                        &mut trace,
                    )?;
                    run_traced(
                        DepthOutlinePass::LineWidth,
                        &[&*mask, source],
                        destination,
                        binding,
                        exec,
                        &mut trace,
                    )?;
                    Ok(ApplyOutcome::Rendered(trace))
                })
            },
        )
    }
}

pub struct NormalDepthOutlineEffect {
    controller: EffectController,
}

impl Default for NormalDepthOutlineEffect {
    fn default() -> Self {
        Self::new(Some(NormalDepthOutlinePass::PROGRAM))
    }
}

impl NormalDepthOutlineEffect {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            controller: EffectController::new(program),
        }
    }
}

impl Effect for NormalDepthOutlineEffect {
    type Params = NormalDepthOutlineParams;

    fn name(&self) -> &'static str {
        "normal_depth_outline"
    }

    fn controller_mut(&mut self) -> &mut EffectController {
        &mut self.controller
    }

    fn apply<E, P>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        params: &NormalDepthOutlineParams,
        exec: &mut E,
        pool: &mut P,
    ) -> FxResult<ApplyOutcome>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>,
    {
        self.controller.run(
            source,
            destination,
            exec,
            pool,
            |binding| params.bind(binding),
            |binding, exec, _, source, destination| {
                render_single(
                    NormalDepthOutlinePass::Outline,
                    binding,
                    exec,
                    source,
                    destination,
                )
            },
        )
    }
}
