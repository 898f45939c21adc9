//! Per-effect parameter snapshots.
//!
//! Every effect receives one of these by reference each frame; the host owns
//! mutation between frames. Defaults match the stock look of each effect.
//! Textures are not serialized: config loaders attach them after parsing.
//!
//! Ordering constraints (`high_threshold >= low_threshold`,
//! `bands.high >= bands.mid >= bands.low`) are preconditions. Values are
//! never clamped; [`CannyParams::is_ordered`] and [`LuminanceBands::is_ordered`]
//! let callers check them. Outline sampling distances are clamped to their
//! pixel ranges when bound.

use crate::image::Texture;
use crate::program::{Binding, Keyword, KeywordGroup, Param};
use crate::types::Color;
use nalgebra::{Vector2, Vector4};
use serde::{Deserialize, Serialize};

/// Pushes a parameter snapshot into a program binding.
pub trait BindParams {
    fn bind(&self, binding: &mut Binding);
}

/// Noise suppression applied to the luminance image before gradients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurKind {
    #[default]
    None,
    Box,
    /// Kept for parity with textbook Canny; it softens thin lines noticeably.
    Gaussian,
}

impl KeywordGroup for BlurKind {
    const KEYWORDS: &'static [Keyword] = &[Keyword::BoxBlur, Keyword::GaussianBlur];

    fn keyword(self) -> Option<Keyword> {
        match self {
            BlurKind::None => None,
            BlurKind::Box => Some(Keyword::BoxBlur),
            BlurKind::Gaussian => Some(Keyword::GaussianBlur),
        }
    }
}

/// 3×3 derivative kernel pair used by the gradient stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientOperator {
    #[default]
    Sobel,
    Prewitt,
    Scharr,
}

impl KeywordGroup for GradientOperator {
    const KEYWORDS: &'static [Keyword] = &[Keyword::Prewitt, Keyword::Scharr];

    fn keyword(self) -> Option<Keyword> {
        match self {
            GradientOperator::Sobel => None,
            GradientOperator::Prewitt => Some(Keyword::Prewitt),
            GradientOperator::Scharr => Some(Keyword::Scharr),
        }
    }
}

/// Magnitude formula written by the gradient stage and thresholded later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeMode {
    /// Euclidean `sqrt(gx² + gy²)`, stored in the alpha channel.
    #[default]
    Alpha,
    /// `|gx|` only.
    Gx,
    /// `|gx| + |gy|`.
    GxAndGy,
}

impl KeywordGroup for MagnitudeMode {
    const KEYWORDS: &'static [Keyword] = &[Keyword::Gx, Keyword::GxAndGy];

    fn keyword(self) -> Option<Keyword> {
        match self {
            MagnitudeMode::Alpha => None,
            MagnitudeMode::Gx => Some(Keyword::Gx),
            MagnitudeMode::GxAndGy => Some(Keyword::GxAndGy),
        }
    }
}

/// Canny edge detection knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub blur: BlurKind,
    pub operator: GradientOperator,
    pub magnitude: MagnitudeMode,
    /// Magnitude at or above which a pixel is a strong edge, in (0, 1].
    pub high_threshold: f32,
    /// Magnitude at or above which a pixel is a weak candidate, in (0, 1].
    pub low_threshold: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            blur: BlurKind::None,
            operator: GradientOperator::Sobel,
            magnitude: MagnitudeMode::Alpha,
            high_threshold: 0.8,
            low_threshold: 0.1,
        }
    }
}

impl CannyParams {
    pub fn is_ordered(&self) -> bool {
        self.high_threshold >= self.low_threshold
    }
}

impl BindParams for CannyParams {
    fn bind(&self, binding: &mut Binding) {
        binding.select(self.blur);
        binding.select(self.operator);
        binding.select(self.magnitude);
        binding.set_scalar(Param::HighThreshold, self.high_threshold);
        binding.set_scalar(Param::LowThreshold, self.low_threshold);
    }
}

/// Luminance thresholds splitting the frame into four tone bands.
///
/// Each band includes its lower bound: `l >= high` is light,
/// `mid <= l < high` main hatch, `low <= l < mid` secondary hatch and
/// `l < low` shadow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuminanceBands {
    pub high: f32,
    pub mid: f32,
    pub low: f32,
}

impl Default for LuminanceBands {
    fn default() -> Self {
        Self {
            high: 0.75,
            mid: 0.5,
            low: 0.25,
        }
    }
}

impl LuminanceBands {
    pub fn is_ordered(&self) -> bool {
        self.high >= self.mid && self.mid >= self.low
    }

    pub fn to_vector(self) -> Vector4<f32> {
        Vector4::new(self.high, self.mid, self.low, 0.0)
    }

    pub fn from_vector(v: Vector4<f32>) -> Self {
        Self {
            high: v.x,
            mid: v.y,
            low: v.z,
        }
    }
}

/// Cross-hatching pattern drawn in the two middle tone bands.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HatchParams {
    #[serde(skip)]
    pub texture: Option<Texture>,
    /// Per-axis repeat count before `tiling_scale` is applied.
    pub tiling: Vector2<f32>,
    pub tiling_scale: f32,
    /// Main layer rotation in degrees, [0, 360].
    pub rotation_deg: f32,
    /// Secondary layer rotation in degrees, [0, 360].
    pub secondary_rotation_deg: f32,
    pub main_color: Color,
    pub secondary_color: Color,
    /// Hatch texels darker than this take the main colour.
    pub main_blend_threshold: f32,
    /// Hatch texels darker than this take the secondary colour.
    pub secondary_blend_threshold: f32,
}

impl Default for HatchParams {
    fn default() -> Self {
        Self {
            texture: None,
            tiling: Vector2::new(1.777_778, 1.0),
            tiling_scale: 5.0,
            rotation_deg: 0.0,
            secondary_rotation_deg: 0.0,
            main_color: Color::GRAY,
            secondary_color: Color::BLACK,
            main_blend_threshold: 0.8,
            secondary_blend_threshold: 0.2,
        }
    }
}

impl BindParams for HatchParams {
    fn bind(&self, binding: &mut Binding) {
        let tiling = self.tiling * self.tiling_scale;
        binding.set_texture(Param::HatchTex, self.texture.clone());
        binding.set_vector(Param::HatchTiling, Vector4::new(tiling.x, tiling.y, 0.0, 0.0));
        binding.set_scalar(Param::HatchRotation, self.rotation_deg);
        binding.set_scalar(Param::SecondaryHatchRotation, self.secondary_rotation_deg);
        binding.set_color(Param::MainHatchColor, self.main_color);
        binding.set_color(Param::SecondaryHatchColor, self.secondary_color);
        binding.set_scalar(Param::HatchBlendThreshold, self.main_blend_threshold);
        binding.set_scalar(
            Param::SecondaryHatchBlendThreshold,
            self.secondary_blend_threshold,
        );
    }
}

/// Manga effect: Canny outlines over tone-banded hatching.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MangaParams {
    pub canny: CannyParams,
    pub outline_color: Color,
    pub bands: LuminanceBands,
    pub background_color: Color,
    pub shadow_color: Color,
    #[serde(skip)]
    pub paper_texture: Option<Texture>,
    pub hatch: HatchParams,
    /// Run the effect over this texture instead of the frame source.
    #[serde(skip)]
    pub image_override: Option<Texture>,
    /// Pass the starting image through untouched.
    pub hide_effect: bool,
    /// Write the hysteresis output instead of the composited frame.
    pub edges_only: bool,
}

impl Default for MangaParams {
    fn default() -> Self {
        Self {
            canny: CannyParams::default(),
            outline_color: Color::BLACK,
            bands: LuminanceBands::default(),
            background_color: Color::new(1.0, 0.765_967_5, 0.0, 0.0),
            shadow_color: Color::BLACK,
            paper_texture: None,
            hatch: HatchParams::default(),
            image_override: None,
            hide_effect: false,
            edges_only: false,
        }
    }
}

impl BindParams for MangaParams {
    fn bind(&self, binding: &mut Binding) {
        self.canny.bind(binding);
        binding.set_color(Param::OutlineColor, self.outline_color);
        binding.set_vector(Param::LuminanceBands, self.bands.to_vector());
        binding.set_color(Param::BackgroundColor, self.background_color);
        binding.set_color(Param::ShadowColor, self.shadow_color);
        binding.set_texture(Param::PaperTex, self.paper_texture.clone());
        self.hatch.bind(binding);
    }
}

/// Debug mode replacing the base image with a flat colour so only the
/// outlines remain visible.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeChecker {
    pub enabled: bool,
    pub background_color: Color,
}

impl Default for EdgeChecker {
    fn default() -> Self {
        Self {
            enabled: false,
            background_color: Color::YELLOW,
        }
    }
}

impl BindParams for EdgeChecker {
    fn bind(&self, binding: &mut Binding) {
        binding.set_flag(Keyword::EdgeChecker, false);
        if self.enabled {
            binding.set_color(Param::BackgroundColor, self.background_color);
            binding.set_flag(Keyword::EdgeChecker, true);
        }
    }
}

/// Depth, luminance and normal discontinuity outlines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineParams {
    pub outline_color: Color,
    /// Sampling offset in pixels, clamped to [0, 10] when bound.
    pub sample_distance: u32,
    pub depth_strength: f32,
    pub luminance_strength: f32,
    pub normal_strength: f32,
    pub edge_checker: EdgeChecker,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            outline_color: Color::BLACK,
            sample_distance: 1,
            depth_strength: 1.0,
            luminance_strength: 1.0,
            normal_strength: 1.0,
            edge_checker: EdgeChecker::default(),
        }
    }
}

impl BindParams for OutlineParams {
    fn bind(&self, binding: &mut Binding) {
        binding.set_color(Param::OutlineColor, self.outline_color);
        binding.set_scalar(Param::SampleDistance, self.sample_distance.min(10) as f32);
        binding.set_vector(
            Param::SampleStrength,
            Vector4::new(
                self.depth_strength,
                self.luminance_strength,
                self.normal_strength,
                0.0,
            ),
        );
        self.edge_checker.bind(binding);
    }
}

/// Two-pass depth outline: Sobel on depth, then line-width dilation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthOutlineParams {
    pub outline_color: Color,
    /// Line half-width in pixels, clamped to [1, 7] when bound.
    pub sample_distance: u32,
    pub depth_threshold: f32,
}

impl Default for DepthOutlineParams {
    fn default() -> Self {
        Self {
            outline_color: Color::BLACK,
            sample_distance: 1,
            depth_threshold: 0.0001,
        }
    }
}

impl BindParams for DepthOutlineParams {
    fn bind(&self, binding: &mut Binding) {
        binding.set_color(Param::OutlineColor, self.outline_color);
        binding.set_int(Param::SampleDistance, self.sample_distance.clamp(1, 7) as i32);
        binding.set_scalar(Param::DepthThreshold, self.depth_threshold);
    }
}

/// Single-pass outline from depth and normal thresholds with optional
/// texture-driven distortion of the sample positions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalDepthOutlineParams {
    pub outline_color: Color,
    /// Sampling offset in pixels, clamped to [1, 5] when bound.
    pub sample_distance: u32,
    pub depth_threshold: f32,
    /// Neighbouring normals with a dot product below this form an edge.
    pub normal_threshold: f32,
    #[serde(skip)]
    pub distortion_texture: Option<Texture>,
    /// Distortion offset in pixels at full texture intensity, [0, 20].
    pub distortion_power: f32,
    pub edge_checker: EdgeChecker,
}

impl Default for NormalDepthOutlineParams {
    fn default() -> Self {
        Self {
            outline_color: Color::BLACK,
            sample_distance: 1,
            depth_threshold: 0.5,
            normal_threshold: 0.995,
            distortion_texture: None,
            distortion_power: 0.1,
            edge_checker: EdgeChecker::default(),
        }
    }
}

impl BindParams for NormalDepthOutlineParams {
    fn bind(&self, binding: &mut Binding) {
        binding.set_color(Param::OutlineColor, self.outline_color);
        binding.set_int(Param::SampleDistance, self.sample_distance.clamp(1, 5) as i32);
        binding.set_vector(
            Param::SampleThresholds,
            Vector4::new(self.depth_threshold, self.normal_threshold, 0.0, 0.0),
        );
        binding.set_texture(Param::DistortionTex, self.distortion_texture.clone());
        binding.set_scalar(Param::DistortionPower, self.distortion_power);
        self.edge_checker.bind(binding);
    }
}

/// Colours for the dominant gradient direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SobelAngleParams {
    pub up: Color,
    pub down: Color,
    pub right: Color,
    pub left: Color,
}

impl Default for SobelAngleParams {
    fn default() -> Self {
        Self {
            up: Color::BLUE,
            down: Color::RED,
            right: Color::YELLOW,
            left: Color::GREEN,
        }
    }
}

impl BindParams for SobelAngleParams {
    fn bind(&self, binding: &mut Binding) {
        binding.set_color(Param::UpColor, self.up);
        binding.set_color(Param::DownColor, self.down);
        binding.set_color(Param::RightColor, self.right);
        binding.set_color(Param::LeftColor, self.left);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpnessParams {
    /// Unsharp strength, [0, 10].
    pub sharpness: f32,
}

impl Default for SharpnessParams {
    fn default() -> Self {
        Self { sharpness: 1.0 }
    }
}

impl BindParams for SharpnessParams {
    fn bind(&self, binding: &mut Binding) {
        binding.set_scalar(Param::Sharpness, self.sharpness);
    }
}
