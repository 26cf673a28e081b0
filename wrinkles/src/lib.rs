//! Gabor filter-bank engine for skin wrinkle texture detection
//!
//! Applies a bank of oriented Gabor filters to a captured ARGB frame and
//! combines the per-orientation responses into a single intensity map,
//! optionally weighted by an externally supplied skin segmentation mask.
//! The pipeline is a pure function of its inputs: no state survives a
//! call, and identical inputs produce byte-identical output, so separate
//! invocations may run concurrently on their own buffers without any
//! synchronization.
//!
//! The capture side (webcam plumbing, parameter entry, display) lives
//! outside this crate; see `src/bin/wrinkle_tool.rs` for a file-based
//! stand-in for that host.

pub mod aggregate;
pub mod convolve;
pub mod error;
pub mod frame;
pub mod image_size;
pub mod kernel;
pub mod mask;
pub mod params;
pub mod pipeline;

// Re-export the call boundary and its supporting types
pub use error::DetectError;
pub use frame::{compose_argb, set_alpha, ArgbFrame};
pub use image_size::ImageSize;
pub use kernel::{build_filter_bank, GaborKernel, HALF_KERNEL, KERNEL_SIZE};
pub use params::GaborParams;
pub use pipeline::{detect, detect_with_cancel};
