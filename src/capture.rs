//! Debug frame capture.
//!
//! Persists a rendered frame as `<prefix>_<HH-MM-SS>.png`. The stamp is the
//! UTC time of day, not local time; no timezone database is consulted.
//! Diagnostic only; nothing in the effect pipeline depends on it.
use crate::image::io::save_rgba_png;
use crate::image::ImageRgbaF32;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_CAPTURE_PREFIX: &str = "mangaEffect";

/// `HH-MM-SS` of the current UTC time of day.
pub fn time_of_day_stamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    stamp_from_secs(secs)
}

fn stamp_from_secs(secs: u64) -> String {
    let day_secs = secs % 86_400;
    format!(
        "{:02}-{:02}-{:02}",
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60
    )
}

pub fn capture_file_name(prefix: &str, stamp: &str) -> String {
    format!("{prefix}_{stamp}.png")
}

/// Write `image` into `dir` and return the path written.
pub fn save_capture(image: &ImageRgbaF32, dir: &Path, prefix: &str) -> Result<PathBuf, String> {
    let path = dir.join(capture_file_name(prefix, &time_of_day_stamp()));
    save_rgba_png(image, &path)?;
    log::debug!("capture saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_formats_time_of_day() {
        // 1970-01-02 13:05:09 UTC
        assert_eq!(stamp_from_secs(86_400 + 13 * 3600 + 5 * 60 + 9), "13-05-09");
        assert_eq!(stamp_from_secs(0), "00-00-00");
    }

    #[test]
    fn file_name_uses_prefix_and_stamp() {
        assert_eq!(
            capture_file_name(DEFAULT_CAPTURE_PREFIX, "08-30-00"),
            "mangaEffect_08-30-00.png"
        );
    }
}
