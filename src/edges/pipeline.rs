use super::stages::{CannyStage, StageLayout};
use crate::backend::{with_scratch, ImageHandle, ImagePool, PassExecutor};
use crate::diagnostics::TimingBreakdown;
use crate::error::FxResult;
use crate::program::{Binding, Param};
use crate::types::PixelFormat;
use log::debug;
use std::time::Instant;

/// Issues the Canny stage sequence for one frame.
///
/// Only two scratch images are ever live: stages ping-pong between them and
/// the final hysteresis stage writes straight into the caller's output. Both
/// scratch images take the input's resolution and are released before
/// [`detect_edges`](Self::detect_edges) returns, on success and on error.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetectionPipeline {
    layout: StageLayout,
}

impl EdgeDetectionPipeline {
    pub fn new(layout: StageLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &StageLayout {
        &self.layout
    }

    /// Run every stage over `input`, leaving the edge classification in
    /// `output` (1.0 edge, 0.0 background in every colour channel).
    ///
    /// `output` must share `input`'s resolution. Executor and pool failures
    /// are returned as-is; no stage is retried.
    pub fn detect_edges<E, P>(
        &self,
        input: &E::Image,
        output: &mut E::Image,
        binding: &Binding,
        exec: &mut E,
        pool: &mut P,
    ) -> FxResult<TimingBreakdown>
    where
        E: PassExecutor,
        P: ImagePool<Image = E::Image>,
    {
        let (width, height) = input.resolution();
        debug!(
            "EdgeDetectionPipeline::detect_edges start w={} h={} program={}",
            width,
            height,
            binding.program()
        );
        if let (Some(high), Some(low)) = (
            binding.scalar(Param::HighThreshold),
            binding.scalar(Param::LowThreshold),
        ) {
            if high < low {
                debug!("EdgeDetectionPipeline high threshold {high} below low threshold {low}");
            }
        }

        with_scratch(pool, width, height, PixelFormat::RgbaF32, |ping, pool| {
            with_scratch(pool, width, height, PixelFormat::RgbaF32, |pong, _| {
                let mut trace = TimingBreakdown::new(width, height);
                self.run_stage(CannyStage::Luminance, input, ping, binding, exec, &mut trace)?;
                self.run_stage(CannyStage::Blur, ping, pong, binding, exec, &mut trace)?;
                self.run_stage(CannyStage::Gradient, pong, ping, binding, exec, &mut trace)?;
                self.run_stage(
                    CannyStage::MagnitudeThreshold,
                    ping,
                    pong,
                    binding,
                    exec,
                    &mut trace,
                )?;
                self.run_stage(
                    CannyStage::DoubleThreshold,
                    pong,
                    ping,
                    binding,
                    exec,
                    &mut trace,
                )?;
                self.run_stage(CannyStage::Hysteresis, ping, output, binding, exec, &mut trace)?;
                debug!(
                    "EdgeDetectionPipeline::detect_edges done in {:.3} ms",
                    trace.total_ms
                );
                Ok(trace)
            })
        })
    }

    fn run_stage<E: PassExecutor>(
        &self,
        stage: CannyStage,
        src: &E::Image,
        dst: &mut E::Image,
        binding: &Binding,
        exec: &mut E,
        trace: &mut TimingBreakdown,
    ) -> FxResult<()> {
        let pass = self.layout.pass(stage);
        let start = Instant::now();
        exec.run_pass(pass, &[src], dst, binding)?;
        trace.record(self.layout.label(stage), Some(pass), start);
        Ok(())
    }
}
