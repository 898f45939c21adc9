//! Per-frame effect entry points.
//!
//! Every effect follows the same frame contract, implemented once by
//! [`EffectController::run`]:
//!
//! - make the program binding ready (created lazily, kept afterwards);
//! - if it cannot be made ready, blit source to destination and report
//!   [`ApplyOutcome::PassThrough`], never an error;
//! - otherwise push the complete parameter snapshot into the binding and
//!   issue the effect's passes.
//!
//! Collaborator failures during the passes are returned unchanged.

pub mod manga;
pub mod outline;
pub mod sharpness;
pub mod sobel_angle;

pub use manga::MangaEffect;
pub use outline::{DepthOutlineEffect, NormalDepthOutlineEffect, OutlineEffect};
pub use sharpness::SharpnessEffect;
pub use sobel_angle::SobelAngleEffect;

use crate::backend::{ImageHandle, ImagePool, PassExecutor};
use crate::diagnostics::TimingBreakdown;
use crate::error::FxResult;
use crate::program::{Binding, ProgramId, ProgramPass, ProgramSlot};
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Why a frame was copied through instead of rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassThroughReason {
    /// No program identity is set.
    ProgramUnset,
    /// The executor refused to create a binding for the program.
    BindingUnavailable,
    /// The effect was asked to hide itself.
    Hidden,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Rendered(TimingBreakdown),
    PassThrough(PassThroughReason),
}

impl ApplyOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, ApplyOutcome::Rendered(_))
    }

    pub fn timings(&self) -> Option<&TimingBreakdown> {
        match self {
            ApplyOutcome::Rendered(trace) => Some(trace),
            ApplyOutcome::PassThrough(_) => None,
        }
    }
}

/// A screen-space effect driven once per frame by the host.
pub trait Effect {
    type Params;

    fn name(&self) -> &'static str;

    fn controller_mut(&mut self) -> &mut EffectController;

    /// Render `source` into `destination` with the given parameter snapshot.
    fn apply<E, P>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        params: &Self::Params,
        exec: &mut E,
        pool: &mut P,
    ) -> FxResult<ApplyOutcome>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>;

    /// Drop the program binding; the next frame recreates it.
    fn disable(&mut self) {
        self.controller_mut().slot_mut().reset();
    }
}

/// Binding lifecycle and identity fallback shared by all effects.
pub struct EffectController {
    slot: ProgramSlot,
}

impl EffectController {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            slot: ProgramSlot::new(program),
        }
    }

    pub fn slot(&self) -> &ProgramSlot {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut ProgramSlot {
        &mut self.slot
    }

    /// Run one frame: `push` writes parameters into the ready binding, then
    /// `render` issues passes reading that binding.
    pub fn run<E, P, B, R>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        exec: &mut E,
        pool: &mut P,
        push: B,
        render: R,
    ) -> FxResult<ApplyOutcome>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>,
        B: FnOnce(&mut Binding),
        R: FnOnce(&Binding, &mut E, &mut P, &E::Image, &mut E::Image) -> FxResult<ApplyOutcome>,
    {
        let reason = if self.slot.program().is_none() {
            PassThroughReason::ProgramUnset
        } else {
            PassThroughReason::BindingUnavailable
        };
        let Some(binding) = self.slot.try_get_binding(exec) else {
            debug!("EffectController pass-through ({reason:?})");
            exec.blit(source, destination)?;
            return Ok(ApplyOutcome::PassThrough(reason));
        };
        push(&mut *binding);
        render(&*binding, exec, pool, source, destination)
    }
}

/// Issue one pass and record its timing.
pub(crate) fn run_traced<E: PassExecutor, Q: ProgramPass>(
    pass: Q,
    inputs: &[&E::Image],
    output: &mut E::Image,
    binding: &Binding,
    exec: &mut E,
    trace: &mut TimingBreakdown,
) -> FxResult<()> {
    let start = Instant::now();
    exec.run_pass(pass.index(), inputs, output, binding)?;
    trace.record(pass.label(), Some(pass.index()), start);
    Ok(())
}

/// Single-pass render used by the simpler effects.
pub(crate) fn render_single<E: PassExecutor, Q: ProgramPass>(
    pass: Q,
    binding: &Binding,
    exec: &mut E,
    source: &E::Image,
    destination: &mut E::Image,
) -> FxResult<ApplyOutcome> {
    let (width, height) = source.resolution();
    let mut trace = TimingBreakdown::new(width, height);
    run_traced(pass, &[source], destination, binding, exec, &mut trace)?;
    Ok(ApplyOutcome::Rendered(trace))
}
