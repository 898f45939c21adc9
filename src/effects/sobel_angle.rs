//! Debug view colouring each pixel by its dominant gradient direction.
use super::{run_traced, ApplyOutcome, Effect, EffectController};
use crate::backend::{with_scratch, ImageHandle, ImagePool, PassExecutor};
use crate::diagnostics::TimingBreakdown;
use crate::error::FxResult;
use crate::params::{BindParams, SobelAngleParams};
use crate::program::{ProgramId, SobelAnglePass};
use crate::types::PixelFormat;

pub struct SobelAngleEffect {
    controller: EffectController,
}

impl Default for SobelAngleEffect {
    fn default() -> Self {
        Self::new(Some(SobelAnglePass::PROGRAM))
    }
}

impl SobelAngleEffect {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            controller: EffectController::new(program),
        }
    }
}

impl Effect for SobelAngleEffect {
    type Params = SobelAngleParams;

    fn name(&self) -> &'static str {
        "sobel_angle"
    }

    fn controller_mut(&mut self) -> &mut EffectController {
        &mut self.controller
    }

    fn apply<E, P>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        params: &SobelAngleParams,
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
                // Signed gradients need a float target.
                with_scratch(pool, width, height, PixelFormat::RgbaF32, |gradient, _| {
                    let mut trace = TimingBreakdown::new(width, height);
                    run_traced(
                        SobelAnglePass::Sobel,
                        &[source],
                        gradient,
                        binding,
                        exec,
                        &mut trace,
                    )?;
                    run_traced(
                        SobelAnglePass::Visualizer,
                        &[&*gradient],
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
