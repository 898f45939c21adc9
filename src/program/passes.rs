//! Pass layouts of the built-in programs.
//!
//! Discriminants are the pass indices of each program and encode the data
//! dependency chain: a pass reads what the previous one wrote.
use super::{ProgramId, ProgramPass};

/// Canny edge detection followed by the manga compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MangaPass {
    Blur = 0,
    Luminance = 1,
    Gradient = 2,
    MagnitudeThreshold = 3,
    DoubleThreshold = 4,
    Hysteresis = 5,
    /// Two inputs: hysteresis output, starting source.
    Color = 6,
}

impl MangaPass {
    pub const PROGRAM: ProgramId = ProgramId::from_static("Hidden/Manga");
    pub const ALL: [MangaPass; 7] = [
        MangaPass::Blur,
        MangaPass::Luminance,
        MangaPass::Gradient,
        MangaPass::MagnitudeThreshold,
        MangaPass::DoubleThreshold,
        MangaPass::Hysteresis,
        MangaPass::Color,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl ProgramPass for MangaPass {
    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            MangaPass::Blur => "blur",
            MangaPass::Luminance => "luminance",
            MangaPass::Gradient => "gradient",
            MangaPass::MagnitudeThreshold => "magnitude_threshold",
            MangaPass::DoubleThreshold => "double_threshold",
            MangaPass::Hysteresis => "hysteresis",
            MangaPass::Color => "color",
        }
    }
}

/// Single pass combining depth, luminance and normal discontinuities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutlinePass {
    Outline = 0,
}

impl OutlinePass {
    pub const PROGRAM: ProgramId = ProgramId::from_static("Hidden/Outline");
    pub const ALL: [OutlinePass; 1] = [OutlinePass::Outline];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl ProgramPass for OutlinePass {
    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        "outline"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthOutlinePass {
    Sobel = 0,
    /// Two inputs: Sobel edge mask, frame source.
    LineWidth = 1,
}

impl DepthOutlinePass {
    pub const PROGRAM: ProgramId = ProgramId::from_static("Hidden/DepthOutline");
    pub const ALL: [DepthOutlinePass; 2] = [DepthOutlinePass::Sobel, DepthOutlinePass::LineWidth];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl ProgramPass for DepthOutlinePass {
    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            DepthOutlinePass::Sobel => "depth_sobel",
            DepthOutlinePass::LineWidth => "line_width",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalDepthOutlinePass {
    Outline = 0,
}

impl NormalDepthOutlinePass {
    pub const PROGRAM: ProgramId = ProgramId::from_static("Hidden/NormalDepthOutline");
    pub const ALL: [NormalDepthOutlinePass; 1] = [NormalDepthOutlinePass::Outline];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl ProgramPass for NormalDepthOutlinePass {
    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        "normal_depth_outline"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SobelAnglePass {
    Sobel = 0,
    Visualizer = 1,
}

impl SobelAnglePass {
    pub const PROGRAM: ProgramId = ProgramId::from_static("Hidden/SobelAngleVisualizer");
    pub const ALL: [SobelAnglePass; 2] = [SobelAnglePass::Sobel, SobelAnglePass::Visualizer];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl ProgramPass for SobelAnglePass {
    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            SobelAnglePass::Sobel => "sobel",
            SobelAnglePass::Visualizer => "angle_visualizer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SharpnessPass {
    Sharpen = 0,
}

impl SharpnessPass {
    pub const PROGRAM: ProgramId = ProgramId::from_static("Hidden/Sharpness");
    pub const ALL: [SharpnessPass; 1] = [SharpnessPass::Sharpen];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl ProgramPass for SharpnessPass {
    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        "sharpen"
    }
}
