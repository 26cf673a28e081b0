//! The detection pipeline
//!
//! A single detection call is a pure, synchronous, stateless
//! transformation:
//!
//! ```text
//! image + mask + parameters
//!   -> grayscale projection
//!   -> per-orientation convolution against the kernel bank
//!   -> max-abs aggregation + min-max normalization
//!   -> mask weighting
//!   -> ARGB output
//! ```
//!
//! Identical inputs always produce byte-identical output, and nothing is
//! retained between calls. All validation happens up front, before any
//! kernel construction or buffer allocation.

use std::sync::atomic::AtomicBool;

use log::debug;
use ndarray::Array2;
use rayon::prelude::*;

use crate::aggregate::{max_abs_response, normalize_to_output_range};
use crate::convolve::convolve2d_clamped;
use crate::error::DetectError;
use crate::frame::{compose_argb, ArgbFrame};
use crate::image_size::ImageSize;
use crate::kernel::{build_filter_bank, GaborKernel};
use crate::mask::apply_mask;
use crate::params::GaborParams;

/// Run the Gabor filter bank over one captured frame.
///
/// `image` is `size.height * size.width * 4` bytes of interleaved A,R,G,B;
/// the returned buffer has the same length and layout. `mask`, when
/// present, is a single-channel 8-bit weight map of the same dimensions;
/// `None` means no masking.
///
/// # Errors
/// * [`DetectError::DimensionMismatch`] for zero dimensions or a mask that
///   does not match the frame
/// * [`DetectError::NullOrEmptyBuffer`] for an image buffer shorter than
///   the stated dimensions require
/// * [`DetectError::InvalidParameter`] for out-of-contract parameters
pub fn detect(
    image: &[u8],
    mask: Option<&[u8]>,
    size: ImageSize,
    params: &GaborParams,
) -> Result<Vec<u8>, DetectError> {
    let never_cancelled = AtomicBool::new(false);
    detect_with_cancel(image, mask, size, params, &never_cancelled)
}

/// [`detect`] with a cooperative cancellation flag.
///
/// A full-resolution, multi-orientation pass takes non-trivial wall-clock
/// time; a caller that no longer wants the result can set `cancel` and the
/// pipeline returns [`DetectError::Cancelled`] at the next row-batch
/// boundary instead of finishing the frame.
pub fn detect_with_cancel(
    image: &[u8],
    mask: Option<&[u8]>,
    size: ImageSize,
    params: &GaborParams,
    cancel: &AtomicBool,
) -> Result<Vec<u8>, DetectError> {
    // Fail fast: every contract is checked before any computation begins
    let frame = ArgbFrame::new(image, size)?;
    if let Some(mask) = mask {
        if mask.len() != size.pixel_count() {
            return Err(DetectError::DimensionMismatch(format!(
                "mask has {} pixels, frame is {}",
                mask.len(),
                size
            )));
        }
    }
    params.validate()?;

    debug!(
        "detect: frame {}, sigma={}, lambda={}, num_angles={}, psi={}",
        size, params.sigma, params.lambda, params.num_angles, params.psi_degrees
    );

    let bank = build_filter_bank(params)?;
    let (gray, alpha) = frame.to_gray();

    let responses = convolve_bank(&gray, &bank, cancel)?;

    let mut intensity = max_abs_response(&responses)?;
    normalize_to_output_range(&mut intensity);
    apply_mask(&mut intensity, mask, size)?;

    compose_argb(&intensity, &alpha)
}

/// Convolve the grayscale plane against every kernel of the bank.
///
/// Orientations are independent, so they run in parallel on top of the
/// row-parallel convolution itself.
fn convolve_bank(
    gray: &Array2<f64>,
    bank: &[GaborKernel],
    cancel: &AtomicBool,
) -> Result<Vec<Array2<f64>>, DetectError> {
    bank.par_iter()
        .map(|kernel| {
            debug!("convolving orientation theta={} deg", kernel.theta_degrees);
            convolve2d_clamped(gray.view(), kernel.coefficients.view(), Some(cancel))
        })
        .collect()
}
