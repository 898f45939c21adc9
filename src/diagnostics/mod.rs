//! Per-frame diagnostics: which passes ran, at what resolution, and how long
//! each took. Everything here is serde-serializable so the demo tools can
//! dump a frame trace next to the rendered image.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};
