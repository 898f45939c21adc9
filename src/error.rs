//! Error type shared by the effect pipeline and its collaborators.
//!
//! The pipeline itself never fails: every error originates in a
//! [`PassExecutor`](crate::backend::PassExecutor) or
//! [`ImagePool`](crate::backend::ImagePool) and is propagated unchanged.

/// Failures reported by pass execution and scratch image allocation.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("unknown program `{0}`")]
    UnknownProgram(String),

    #[error("pass {pass} out of range for program `{program}` ({count} passes)")]
    PassOutOfRange {
        program: String,
        pass: usize,
        count: usize,
    },

    #[error("pass {pass} of `{program}` expects {expected} input(s), got {actual}")]
    InputCount {
        program: String,
        pass: usize,
        expected: usize,
        actual: usize,
    },

    #[error("image size mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("backend error: {0}")]
    Backend(String),
}

impl FxError {
    pub fn backend<T: ToString>(msg: T) -> Self {
        FxError::Backend(msg.to_string())
    }

    /// Checks that two images share a resolution.
    pub fn check_dims(expected: (usize, usize), actual: (usize, usize)) -> FxResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(FxError::DimensionMismatch { expected, actual })
        }
    }
}

pub type FxResult<T> = Result<T, FxError>;
