//! Image buffers used by the CPU reference backend and host-side textures.
//!
//! - [`ImageRgbaF32`]: owned four-channel float image in row-major layout.
//! - [`Texture`]: shared, read-only image bound as an auxiliary pass input
//!   (paper, hatch, distortion, image override, camera buffers).
//! - [`io`]: PNG/JPEG loading and saving, JSON helpers.

pub mod io;
pub mod rgba;
pub mod traits;

pub use self::rgba::{ImageRgbaF32, Texture};
pub use self::traits::{ImageView, ImageViewMut, Rows};
