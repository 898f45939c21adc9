use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Timing entry describing a single pass issued during a frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    /// Pass index within the program, `None` for blits and uploads.
    pub pass: Option<usize>,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, pass: Option<usize>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            pass,
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one effect invocation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub width: usize,
    pub height: usize,
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            total_ms: 0.0,
            stages: Vec::new(),
        }
    }

    /// Record a stage that started at `start`; also accumulates `total_ms`.
    pub fn record(&mut self, label: impl Into<String>, pass: Option<usize>, start: Instant) {
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.total_ms += elapsed_ms;
        self.stages.push(StageTiming::new(label, pass, elapsed_ms));
    }

    /// Append the stages of `other`, keeping this trace's resolution.
    pub fn absorb(&mut self, other: TimingBreakdown) {
        self.total_ms += other.total_ms;
        self.stages.extend(other.stages);
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.stages.iter().map(|s| s.label.as_str())
    }
}
