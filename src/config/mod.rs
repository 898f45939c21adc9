//! JSON configuration for the demo binaries.
//!
//! Parameter structs deserialize with `#[serde(default)]`, so a config only
//! lists what it changes. Texture paths are resolved after parsing.
pub mod filter;
pub mod manga;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a demo writes its results.
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Rendered frame as PNG.
    pub image: PathBuf,
    /// Optional JSON with the apply outcome and pool statistics.
    #[serde(default)]
    pub trace_json: Option<PathBuf>,
    /// Optional directory receiving a timestamped debug capture.
    #[serde(default)]
    pub capture_dir: Option<PathBuf>,
}

pub(crate) fn read_json_config<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
