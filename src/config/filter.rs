use super::{read_json_config, OutputConfig};
use crate::cpu::CameraBuffers;
use crate::image::io::{load_rgba_image, load_texture};
use crate::image::Texture;
use crate::params::{
    DepthOutlineParams, NormalDepthOutlineParams, OutlineParams, SharpnessParams,
    SobelAngleParams,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Effect selected by `filter_demo`, tagged by `kind`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectConfig {
    Outline(OutlineParams),
    DepthOutline(DepthOutlineParams),
    NormalDepthOutline(NormalDepthOutlineParams),
    SobelAngle(SobelAngleParams),
    Sharpness(SharpnessParams),
}

impl EffectConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            EffectConfig::Outline(_) => "outline",
            EffectConfig::DepthOutline(_) => "depth_outline",
            EffectConfig::NormalDepthOutline(_) => "normal_depth_outline",
            EffectConfig::SobelAngle(_) => "sobel_angle",
            EffectConfig::Sharpness(_) => "sharpness",
        }
    }
}

/// Camera buffers stored as images; normals are encoded as `n * 0.5 + 0.5`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub depth: Option<PathBuf>,
    pub normals: Option<PathBuf>,
}

impl CameraConfig {
    pub fn load(&self) -> Result<CameraBuffers, String> {
        let depth = self.depth.as_deref().map(load_texture).transpose()?;
        let normals = self.normals.as_deref().map(load_normals).transpose()?;
        Ok(CameraBuffers { depth, normals })
    }
}

fn load_normals(path: &Path) -> Result<Texture, String> {
    let mut image = load_rgba_image(path)?;
    for px in &mut image.data {
        for c in px.iter_mut().take(3) {
            *c = *c * 2.0 - 1.0;
        }
    }
    Ok(image.into_texture())
}

#[derive(Clone, Debug, Deserialize)]
pub struct FilterToolConfig {
    pub input: PathBuf,
    pub effect: EffectConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Distortion texture for `normal_depth_outline`.
    #[serde(default)]
    pub distortion_texture: Option<PathBuf>,
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<FilterToolConfig, String> {
    read_json_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_is_selected_by_kind() {
        let json = r#"{
            "input": "frame.png",
            "effect": { "kind": "sharpness", "sharpness": 2.5 },
            "output": { "image": "sharp.png" }
        }"#;
        let config: FilterToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.effect.kind(), "sharpness");
        match config.effect {
            EffectConfig::Sharpness(p) => assert_eq!(p.sharpness, 2.5),
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn omitted_fields_take_effect_defaults() {
        let json = r#"{
            "input": "frame.png",
            "effect": { "kind": "depth_outline" },
            "output": { "image": "out.png" }
        }"#;
        let config: FilterToolConfig = serde_json::from_str(json).unwrap();
        match config.effect {
            EffectConfig::DepthOutline(p) => assert_eq!(p, DepthOutlineParams::default()),
            other => panic!("unexpected effect {other:?}"),
        }
        assert!(config.camera.depth.is_none());
    }
}
