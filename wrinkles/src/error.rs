//! Error types for the detection pipeline

use thiserror::Error;

/// Failures surfaced by the detection pipeline.
///
/// Every variant is a recoverable, reported failure. Validation runs at the
/// pipeline entry before any kernel construction or convolution, so a failed
/// call performs no partial computation and retrying with identical inputs
/// is pointless; only corrected inputs can change the outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// A filter parameter is outside its numeric contract
    #[error("invalid parameter {name}: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// Buffer dimensions disagree with the stated frame dimensions
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The image buffer is missing or shorter than height * width * 4
    #[error("image buffer empty or too short: got {actual} bytes, need {required}")]
    NullOrEmptyBuffer { actual: usize, required: usize },

    /// The run was aborted through the caller's cancellation flag
    #[error("detection cancelled")]
    Cancelled,
}
