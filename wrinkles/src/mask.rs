//! Segmentation-mask weighting
//!
//! The mask is an externally supplied per-pixel weight map, 8-bit, with
//! 255 meaning full weight. Absence of a mask is equivalent to a mask of
//! all 255: the intensity passes through unchanged.

use ndarray::Array2;

use crate::error::DetectError;
use crate::image_size::ImageSize;

/// Scale the aggregated intensity by `mask / 255` elementwise, in place.
///
/// `mask` is a flat row-major buffer of `size.pixel_count()` bytes; `None`
/// leaves the intensity untouched.
///
/// # Errors
/// [`DetectError::DimensionMismatch`] if the mask length or the intensity
/// shape disagrees with `size`.
pub fn apply_mask(
    intensity: &mut Array2<f64>,
    mask: Option<&[u8]>,
    size: ImageSize,
) -> Result<(), DetectError> {
    let Some(mask) = mask else {
        return Ok(());
    };

    if mask.len() != size.pixel_count() {
        return Err(DetectError::DimensionMismatch(format!(
            "mask has {} pixels, frame is {}",
            mask.len(),
            size
        )));
    }
    if intensity.dim() != (size.height, size.width) {
        return Err(DetectError::DimensionMismatch(format!(
            "intensity plane is {:?}, frame is {}",
            intensity.dim(),
            size
        )));
    }

    // Both sides are row-major, so a flat zip lines up pixel for pixel
    for (value, &weight) in intensity.iter_mut().zip(mask) {
        *value *= weight as f64 / 255.0;
    }

    Ok(())
}
