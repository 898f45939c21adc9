//! Stylized compositing: tone bands, hatching, outlines, paper.
//!
//! The compositor runs the program's colour pass with two inputs, the edge
//! classification and the starting source. Per pixel, the executor:
//!
//! 1. classifies the source luminance into a [`LuminanceBand`];
//! 2. picks the band colour, sampling the rotated, tiled hatch texture in
//!    the two hatch bands (no hatch texture ⇒ background colour);
//! 3. replaces edge pixels (classification > 0.5) with the outline colour;
//! 4. multiplies by the paper texture when one is bound.
use crate::backend::{ImageHandle, PassExecutor};
use crate::diagnostics::TimingBreakdown;
use crate::error::{FxError, FxResult};
use crate::params::LuminanceBands;
use crate::program::{Binding, MangaPass, ProgramPass};
use serde::Serialize;
use std::time::Instant;

/// Tone band a pixel falls into. Lower bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LuminanceBand {
    /// `l >= high`: background colour.
    Light,
    /// `mid <= l < high`: main hatch layer.
    MainHatch,
    /// `low <= l < mid`: main and secondary hatch layers.
    SecondaryHatch,
    /// `l < low`: shadow colour.
    Shadow,
}

impl LuminanceBand {
    pub fn classify(luminance: f32, bands: &LuminanceBands) -> Self {
        if luminance >= bands.high {
            LuminanceBand::Light
        } else if luminance >= bands.mid {
            LuminanceBand::MainHatch
        } else if luminance >= bands.low {
            LuminanceBand::SecondaryHatch
        } else {
            LuminanceBand::Shadow
        }
    }
}

/// Issues the final colour pass of the manga program.
#[derive(Clone, Copy, Debug)]
pub struct StylizedCompositor {
    pass: usize,
}

impl Default for StylizedCompositor {
    fn default() -> Self {
        Self {
            pass: MangaPass::Color.index(),
        }
    }
}

impl StylizedCompositor {
    pub fn new(pass: usize) -> Self {
        Self { pass }
    }

    /// Composite into `destination`.
    ///
    /// `classification`, `source` and `destination` must share a resolution;
    /// a mismatch is a caller bug and is reported before any pass runs.
    pub fn composite<E: PassExecutor>(
        &self,
        classification: &E::Image,
        source: &E::Image,
        destination: &mut E::Image,
        binding: &Binding,
        exec: &mut E,
    ) -> FxResult<TimingBreakdown> {
        let (width, height) = classification.resolution();
        FxError::check_dims((width, height), source.resolution())?;
        FxError::check_dims((width, height), destination.resolution())?;

        let mut trace = TimingBreakdown::new(width, height);
        let start = Instant::now();
        exec.run_pass(self.pass, &[classification, source], destination, binding)?;
        trace.record(MangaPass::Color.label(), Some(self.pass), start);
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_respects_band_order() {
        let bands = LuminanceBands {
            high: 0.75,
            mid: 0.5,
            low: 0.25,
        };
        assert_eq!(LuminanceBand::classify(0.9, &bands), LuminanceBand::Light);
        assert_eq!(LuminanceBand::classify(0.6, &bands), LuminanceBand::MainHatch);
        assert_eq!(
            LuminanceBand::classify(0.3, &bands),
            LuminanceBand::SecondaryHatch
        );
        assert_eq!(LuminanceBand::classify(0.1, &bands), LuminanceBand::Shadow);
    }

    #[test]
    fn classify_lower_bounds_are_inclusive() {
        let bands = LuminanceBands::default();
        assert_eq!(LuminanceBand::classify(0.75, &bands), LuminanceBand::Light);
        assert_eq!(LuminanceBand::classify(0.5, &bands), LuminanceBand::MainHatch);
        assert_eq!(
            LuminanceBand::classify(0.25, &bands),
            LuminanceBand::SecondaryHatch
        );
    }

    #[test]
    fn unordered_bands_still_classify_deterministically() {
        let bands = LuminanceBands {
            high: 0.2,
            mid: 0.6,
            low: 0.4,
        };
        assert!(!bands.is_ordered());
        assert_eq!(LuminanceBand::classify(0.3, &bands), LuminanceBand::Light);
        assert_eq!(LuminanceBand::classify(0.1, &bands), LuminanceBand::Shadow);
    }
}
