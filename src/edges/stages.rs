use crate::program::{MangaPass, ProgramPass};

/// One step of the edge detection chain, independent of any program layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CannyStage {
    Luminance,
    Blur,
    Gradient,
    MagnitudeThreshold,
    DoubleThreshold,
    Hysteresis,
}

impl CannyStage {
    /// Execution order.
    pub const ORDER: [CannyStage; 6] = [
        CannyStage::Luminance,
        CannyStage::Blur,
        CannyStage::Gradient,
        CannyStage::MagnitudeThreshold,
        CannyStage::DoubleThreshold,
        CannyStage::Hysteresis,
    ];

    pub fn position(self) -> usize {
        self as usize
    }
}

impl From<CannyStage> for MangaPass {
    fn from(stage: CannyStage) -> Self {
        match stage {
            CannyStage::Luminance => MangaPass::Luminance,
            CannyStage::Blur => MangaPass::Blur,
            CannyStage::Gradient => MangaPass::Gradient,
            CannyStage::MagnitudeThreshold => MangaPass::MagnitudeThreshold,
            CannyStage::DoubleThreshold => MangaPass::DoubleThreshold,
            CannyStage::Hysteresis => MangaPass::Hysteresis,
        }
    }
}

/// Maps each stage to a pass index of the program that implements it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageLayout {
    passes: [usize; 6],
    labels: [&'static str; 6],
}

impl StageLayout {
    pub fn from_program<P>() -> Self
    where
        P: ProgramPass + From<CannyStage>,
    {
        let mut passes = [0usize; 6];
        let mut labels = [""; 6];
        for stage in CannyStage::ORDER {
            let pass = P::from(stage);
            passes[stage.position()] = pass.index();
            labels[stage.position()] = pass.label();
        }
        Self { passes, labels }
    }

    pub fn pass(&self, stage: CannyStage) -> usize {
        self.passes[stage.position()]
    }

    pub fn label(&self, stage: CannyStage) -> &'static str {
        self.labels[stage.position()]
    }
}

impl Default for StageLayout {
    fn default() -> Self {
        Self::from_program::<MangaPass>()
    }
}
