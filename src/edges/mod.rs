//! Canny edge detection expressed as a chain of full-screen passes.
//!
//! The stage order is fixed and each stage reads only the previous stage's
//! output:
//!
//! 1. luminance: colour to single-channel intensity;
//! 2. blur: box/Gaussian noise suppression, or a straight copy;
//! 3. gradient: 3×3 derivative (Sobel/Prewitt/Scharr) and magnitude;
//! 4. magnitude threshold: non-maximum suppression along the gradient
//!    direction, then strong (1.0) / weak (0.5) / none (0.0) against the
//!    high and low thresholds;
//! 5. double threshold: weak pixels touching a strong one are promoted, the
//!    rest stay weak for hysteresis;
//! 6. hysteresis: weak pixels survive only next to a strong pixel.
//!
//! The pipeline issues passes and juggles scratch images; the pixel math
//! lives in the executor (see [`crate::cpu`] for the reference version).

pub mod pipeline;
pub mod stages;

pub use pipeline::EdgeDetectionPipeline;
pub use stages::{CannyStage, StageLayout};
