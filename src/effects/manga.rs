//! Manga effect: Canny outlines over tone-banded hatching.
//!
//! Frame layout:
//!
//! ```text
//! start ──Luminance─▶ A ──Blur─▶ B ──Gradient─▶ A ──MagThreshold─▶ B
//!       ──DoubleThreshold─▶ A ──Hysteresis─▶ edges ──Color(edges, start)─▶ destination
//! ```
//!
//! `start` is the frame source, or the image override uploaded into a
//! scratch image of the override's resolution. An override frame renders
//! into a second scratch image at that resolution, which is then resampled
//! into `destination`.
use super::{ApplyOutcome, Effect, EffectController, PassThroughReason};
use crate::backend::{with_scratch, ImageHandle, ImagePool, PassExecutor};
use crate::compositor::StylizedCompositor;
use crate::edges::EdgeDetectionPipeline;
use crate::error::FxResult;
use crate::params::{BindParams, MangaParams};
use crate::program::{Binding, MangaPass, ProgramId};
use crate::types::PixelFormat;
use std::time::Instant;

pub struct MangaEffect {
    controller: EffectController,
    pipeline: EdgeDetectionPipeline,
    compositor: StylizedCompositor,
}

impl Default for MangaEffect {
    fn default() -> Self {
        Self::new(Some(MangaPass::PROGRAM))
    }
}

impl MangaEffect {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            controller: EffectController::new(program),
            pipeline: EdgeDetectionPipeline::default(),
            compositor: StylizedCompositor::default(),
        }
    }

    pub fn controller(&self) -> &EffectController {
        &self.controller
    }
}

impl Effect for MangaEffect {
    type Params = MangaParams;

    fn name(&self) -> &'static str {
        "manga"
    }

    fn controller_mut(&mut self) -> &mut EffectController {
        &mut self.controller
    }

    fn apply<E, P>(
        &mut self,
        source: &E::Image,
        destination: &mut E::Image,
        params: &MangaParams,
        exec: &mut E,
        pool: &mut P,
    ) -> FxResult<ApplyOutcome>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>,
    {
        let stages = Stages {
            pipeline: self.pipeline,
            compositor: self.compositor,
        };
        self.controller.run(
            source,
            destination,
            exec,
            pool,
            |binding| params.bind(binding),
            |binding, exec, pool, source, destination| match &params.image_override {
                Some(texture) => {
                    let format = source.format();
                    with_scratch(pool, texture.w, texture.h, format, |start, pool| {
                        exec.upload(texture, start)?;
                        with_scratch(pool, texture.w, texture.h, format, |rendered, pool| {
                            let mut outcome =
                                stages.render(params, start, rendered, binding, exec, pool)?;
                            let blit_start = Instant::now();
                            exec.blit_scaled(rendered, destination)?;
                            if let ApplyOutcome::Rendered(trace) = &mut outcome {
                                trace.record("override_blit", None, blit_start);
                            }
                            Ok(outcome)
                        })
                    })
                }
                None => stages.render(params, source, destination, binding, exec, pool),
            },
        )
    }
}

#[derive(Clone, Copy)]
struct Stages {
    pipeline: EdgeDetectionPipeline,
    compositor: StylizedCompositor,
}

impl Stages {
    fn render<E, P>(
        &self,
        params: &MangaParams,
        start: &E::Image,
        destination: &mut E::Image,
        binding: &Binding,
        exec: &mut E,
        pool: &mut P,
    ) -> FxResult<ApplyOutcome>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>,
    {
        if params.hide_effect {
            exec.blit(start, destination)?;
            return Ok(ApplyOutcome::PassThrough(PassThroughReason::Hidden));
        }

        let (width, height) = start.resolution();
        with_scratch(pool, width, height, PixelFormat::RgbaF32, |edges, pool| {
            let mut trace = self
                .pipeline
                .detect_edges(start, edges, binding, exec, pool)?;
            if params.edges_only {
                let blit_start = Instant::now();
                exec.blit(edges, destination)?;
                trace.record("edges_blit", None, blit_start);
            } else {
                let composite = self
                    .compositor
                    .composite(edges, start, destination, binding, exec)?;
                trace.absorb(composite);
            }
            Ok(ApplyOutcome::Rendered(trace))
        })
    }
}
