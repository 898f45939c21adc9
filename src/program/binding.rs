//! Typed parameter binding handed to the executor with every pass.
//!
//! Parameters are keyed by [`Param`] and shader variants by [`Keyword`].
//! Both carry a stable shader-facing name for hosts that forward them to a
//! string-keyed material; an executor simply ignores keys it never reads.
use super::ProgramId;
use crate::image::Texture;
use crate::types::Color;
use nalgebra::Vector4;
use std::collections::{BTreeMap, BTreeSet};

/// Parameter slots understood by the built-in programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    HighThreshold,
    LowThreshold,
    OutlineColor,
    /// `(high, mid, low, 0)` lower bounds of the light, main hatch and
    /// secondary hatch bands. Distinct from the four-threshold
    /// `_LuminanceThresholds` vector of light/hatching/shadow materials.
    LuminanceBands,
    BackgroundColor,
    ShadowColor,
    PaperTex,
    HatchTex,
    /// `(tile_x, tile_y, 0, 0)` after the tiling scale has been applied.
    HatchTiling,
    HatchRotation,
    SecondaryHatchRotation,
    MainHatchColor,
    SecondaryHatchColor,
    HatchBlendThreshold,
    SecondaryHatchBlendThreshold,
    SampleDistance,
    /// `(depth, luminance, normal, 0)` outline strengths.
    SampleStrength,
    /// `(depth, normal, 0, 0)` outline thresholds.
    SampleThresholds,
    DepthThreshold,
    DistortionTex,
    DistortionPower,
    UpColor,
    DownColor,
    RightColor,
    LeftColor,
    Sharpness,
}

impl Param {
    pub fn name(self) -> &'static str {
        match self {
            Param::HighThreshold => "_HighThreshold",
            Param::LowThreshold => "_LowThreshold",
            Param::OutlineColor => "_OutlineColor",
            Param::LuminanceBands => "_LuminanceBands",
            Param::BackgroundColor => "_BackgroundColor",
            Param::ShadowColor => "_ShadowColor",
            Param::PaperTex => "_PaperTex",
            Param::HatchTex => "_HatchTex",
            Param::HatchTiling => "_HatchTiling",
            Param::HatchRotation => "_HatchRotation",
            Param::SecondaryHatchRotation => "_SecondaryHatchRotation",
            Param::MainHatchColor => "_MainHatchColor",
            Param::SecondaryHatchColor => "_SecondaryHatchColor",
            Param::HatchBlendThreshold => "_HatchBlendingTreshold",
            Param::SecondaryHatchBlendThreshold => "_SecondaryHatchBlendingTreshold",
            Param::SampleDistance => "_SampleDistance",
            Param::SampleStrength => "_SampleStrenght",
            Param::SampleThresholds => "_SampleThresholds",
            Param::DepthThreshold => "_DepthThreshold",
            Param::DistortionTex => "_DistortionTex",
            Param::DistortionPower => "_DistortionPower",
            Param::UpColor => "_UpCol",
            Param::DownColor => "_DownCol",
            Param::RightColor => "_RightCol",
            Param::LeftColor => "_LeftCol",
            Param::Sharpness => "_Sharpness",
        }
    }
}

#[derive(Clone, Debug)]
pub enum ParamValue {
    Scalar(f32),
    Int(i32),
    Color(Color),
    Vector(Vector4<f32>),
    /// `None` means "unbound"; the program skips the dependent contribution.
    Texture(Option<Texture>),
}

/// Shader variant switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    BoxBlur,
    GaussianBlur,
    Prewitt,
    Scharr,
    Gx,
    GxAndGy,
    EdgeChecker,
}

impl Keyword {
    pub fn name(self) -> &'static str {
        match self {
            Keyword::BoxBlur => "BOX_BLUR",
            Keyword::GaussianBlur => "GAUSSIAN_BLUR",
            Keyword::Prewitt => "PREWITT",
            Keyword::Scharr => "SCHARR",
            Keyword::Gx => "GX",
            Keyword::GxAndGy => "GX_N_GY",
            Keyword::EdgeChecker => "EDGE_CHECKER",
        }
    }
}

/// A family of mutually exclusive keywords selected by one enum value.
///
/// The default variant of a group maps to no keyword at all.
pub trait KeywordGroup: Copy {
    /// Every keyword that belongs to the group.
    const KEYWORDS: &'static [Keyword];

    fn keyword(self) -> Option<Keyword>;
}

/// Mutable parameter state for one program instance.
#[derive(Clone, Debug)]
pub struct Binding {
    program: ProgramId,
    values: BTreeMap<Param, ParamValue>,
    keywords: BTreeSet<Keyword>,
}

impl Binding {
    pub fn new(program: ProgramId) -> Self {
        Self {
            program,
            values: BTreeMap::new(),
            keywords: BTreeSet::new(),
        }
    }

    pub fn program(&self) -> &ProgramId {
        &self.program
    }

    pub fn set_scalar(&mut self, param: Param, value: f32) {
        self.values.insert(param, ParamValue::Scalar(value));
    }

    pub fn set_int(&mut self, param: Param, value: i32) {
        self.values.insert(param, ParamValue::Int(value));
    }

    pub fn set_color(&mut self, param: Param, value: Color) {
        self.values.insert(param, ParamValue::Color(value));
    }

    pub fn set_vector(&mut self, param: Param, value: Vector4<f32>) {
        self.values.insert(param, ParamValue::Vector(value));
    }

    pub fn set_texture(&mut self, param: Param, value: Option<Texture>) {
        self.values.insert(param, ParamValue::Texture(value));
    }

    pub fn set_flag(&mut self, keyword: Keyword, enabled: bool) {
        if enabled {
            self.keywords.insert(keyword);
        } else {
            self.keywords.remove(&keyword);
        }
    }

    /// Clear every keyword of `G`, then enable the one `value` maps to.
    pub fn select<G: KeywordGroup>(&mut self, value: G) {
        for keyword in G::KEYWORDS {
            self.keywords.remove(keyword);
        }
        if let Some(keyword) = value.keyword() {
            self.keywords.insert(keyword);
        }
    }

    pub fn value(&self, param: Param) -> Option<&ParamValue> {
        self.values.get(&param)
    }

    /// Scalar value; integer slots are widened.
    pub fn scalar(&self, param: Param) -> Option<f32> {
        match self.values.get(&param)? {
            ParamValue::Scalar(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn int(&self, param: Param) -> Option<i32> {
        match self.values.get(&param)? {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn color(&self, param: Param) -> Option<Color> {
        match self.values.get(&param)? {
            ParamValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn vector(&self, param: Param) -> Option<Vector4<f32>> {
        match self.values.get(&param)? {
            ParamValue::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn texture(&self, param: Param) -> Option<&Texture> {
        match self.values.get(&param)? {
            ParamValue::Texture(t) => t.as_ref(),
            _ => None,
        }
    }

    pub fn is_enabled(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    pub fn active_keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.keywords.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Shade {
        Flat,
        Soft,
        Hard,
    }

    impl KeywordGroup for Shade {
        const KEYWORDS: &'static [Keyword] = &[Keyword::BoxBlur, Keyword::GaussianBlur];

        fn keyword(self) -> Option<Keyword> {
            match self {
                Shade::Flat => None,
                Shade::Soft => Some(Keyword::GaussianBlur),
                Shade::Hard => Some(Keyword::BoxBlur),
            }
        }
    }

    fn binding() -> Binding {
        Binding::new(ProgramId::new("Test/Program"))
    }

    #[test]
    fn select_clears_siblings() {
        let mut b = binding();
        b.select(Shade::Soft);
        b.select(Shade::Hard);
        let active: Vec<_> = b.active_keywords().collect();
        assert_eq!(active, vec![Keyword::BoxBlur]);

        b.select(Shade::Flat);
        assert_eq!(b.active_keywords().count(), 0);
    }

    #[test]
    fn select_leaves_other_groups_alone() {
        let mut b = binding();
        b.set_flag(Keyword::EdgeChecker, true);
        b.select(Shade::Hard);
        assert!(b.is_enabled(Keyword::EdgeChecker));
        assert!(b.is_enabled(Keyword::BoxBlur));
    }

    #[test]
    fn unset_texture_reads_as_none() {
        let mut b = binding();
        b.set_texture(Param::PaperTex, None);
        assert!(b.texture(Param::PaperTex).is_none());
        assert!(b.texture(Param::HatchTex).is_none());
    }

    #[test]
    fn int_slots_widen_to_scalar() {
        let mut b = binding();
        b.set_int(Param::SampleDistance, 3);
        assert_eq!(b.scalar(Param::SampleDistance), Some(3.0));
        assert_eq!(b.color(Param::SampleDistance), None);
    }
}
