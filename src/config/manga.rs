use super::{read_json_config, OutputConfig};
use crate::image::io::load_texture;
use crate::params::MangaParams;
use crate::program::ProgramId;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MangaTextureConfig {
    pub paper: Option<PathBuf>,
    pub hatch: Option<PathBuf>,
    /// Image rendered instead of the input frame.
    pub image_override: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MangaToolConfig {
    pub input: PathBuf,
    /// Program name; `null` exercises the pass-through path.
    #[serde(default = "default_program")]
    pub program: Option<ProgramId>,
    #[serde(default)]
    pub params: MangaParams,
    #[serde(default)]
    pub textures: MangaTextureConfig,
    /// Frames to render; later frames reuse the binding.
    #[serde(default = "default_frames")]
    pub frames: usize,
    pub output: OutputConfig,
}

fn default_program() -> Option<ProgramId> {
    Some(crate::program::MangaPass::PROGRAM)
}

fn default_frames() -> usize {
    1
}

impl MangaToolConfig {
    /// Parameter snapshot with every configured texture loaded.
    pub fn resolve_params(&self) -> Result<MangaParams, String> {
        let mut params = self.params.clone();
        if let Some(path) = &self.textures.paper {
            params.paper_texture = Some(load_texture(path)?);
        }
        if let Some(path) = &self.textures.hatch {
            params.hatch.texture = Some(load_texture(path)?);
        }
        if let Some(path) = &self.textures.image_override {
            params.image_override = Some(load_texture(path)?);
        }
        Ok(params)
    }
}

pub fn load_config(path: &Path) -> Result<MangaToolConfig, String> {
    read_json_config(path)
}
