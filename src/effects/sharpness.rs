use super::{render_single, ApplyOutcome, Effect, EffectController};
use crate::backend::{ImagePool, PassExecutor};
use crate::error::FxResult;
use crate::params::{BindParams, SharpnessParams};
use crate::program::{ProgramId, SharpnessPass};

/// Single-pass unsharp filter.
pub struct SharpnessEffect {
    controller: EffectController,
}

impl Default for SharpnessEffect {
    fn default() -> Self {
        Self::new(Some(SharpnessPass::PROGRAM))
    }
}

impl SharpnessEffect {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            controller: EffectController::new(program),
        }
    }
}

impl Effect for SharpnessEffect {
    type Params = SharpnessParams;

    fn name(&self) -> &'static str {
        "sharpness"
    }

    fn controller_mut(&mut self) -> &mut EffectController {
        &mut self.controller
    }

    fn apply<E, P>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        params: &SharpnessParams,
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
                render_single(SharpnessPass::Sharpen, binding, exec, source, destination)
            },
        )
    }
}
