#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod backend;
pub mod compositor;
pub mod diagnostics;
pub mod edges;
pub mod effects;
pub mod error;
pub mod image;
pub mod params;
pub mod program;
pub mod types;

// Reference backend and tooling.
pub mod capture;
pub mod config;
pub mod cpu;

// --- High-level re-exports -------------------------------------------------

pub use crate::backend::{with_scratch, ImageHandle, ImagePool, PassExecutor};
pub use crate::effects::{ApplyOutcome, Effect, EffectController, PassThroughReason};
pub use crate::error::{FxError, FxResult};
pub use crate::program::{Binding, ProgramId, ProgramSlot};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use manga_fx::prelude::*;
///
/// # fn main() {
/// let source = ImageRgbaF32::filled(64, 64, [0.5, 0.5, 0.5, 1.0]);
/// let mut destination = ImageRgbaF32::new(64, 64);
/// let mut exec = CpuExecutor::new();
/// let mut pool = CpuImagePool::new();
///
/// let mut effect = SharpnessEffect::default();
/// let params = SharpnessParams { sharpness: 2.0 };
/// let outcome = effect.apply(&source, &mut destination, &params, &mut exec, &mut pool);
/// println!("rendered={}", outcome.map(|o| o.is_rendered()).unwrap_or(false));
/// # }
/// ```
pub mod prelude {
    pub use crate::cpu::{CpuExecutor, CpuImagePool};
    pub use crate::effects::{
        ApplyOutcome, DepthOutlineEffect, Effect, MangaEffect, NormalDepthOutlineEffect,
        OutlineEffect, SharpnessEffect, SobelAngleEffect,
    };
    pub use crate::image::ImageRgbaF32;
    pub use crate::params::{
        CannyParams, DepthOutlineParams, MangaParams, NormalDepthOutlineParams, OutlineParams,
        SharpnessParams, SobelAngleParams,
    };
    pub use crate::types::Color;
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::compositor::{LuminanceBand, StylizedCompositor};
    pub use crate::diagnostics::{StageTiming, TimingBreakdown};
    pub use crate::edges::{CannyStage, EdgeDetectionPipeline, StageLayout};
}
