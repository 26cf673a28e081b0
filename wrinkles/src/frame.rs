//! Interleaved ARGB frame handling
//!
//! The capture boundary hands the pipeline a flat byte buffer, 4 bytes per
//! pixel in (A,R,G,B) order, row-major. This module wraps that buffer in a
//! bounds-checked view, projects it to a single-channel intensity plane for
//! filtering, and repacks the filtered intensity (plus the untouched alpha
//! plane) into an output buffer of the identical layout.

use ndarray::Array2;

use crate::error::DetectError;
use crate::image_size::ImageSize;

/// Byte offsets of each channel within a 4-byte A,R,G,B pixel
const ALPHA: usize = 0;
const RED: usize = 1;
const GREEN: usize = 2;
const BLUE: usize = 3;

/// Rec.601 luma weights, matching the RGB-to-gray conversion used on the
/// capture side of the boundary
const LUMA_RED: f64 = 0.299;
const LUMA_GREEN: f64 = 0.587;
const LUMA_BLUE: f64 = 0.114;

/// Borrowed, bounds-checked view of an interleaved ARGB byte buffer.
///
/// Construction validates the stated dimensions against the buffer length,
/// so downstream stages never index past the data. Extra trailing bytes are
/// ignored; a buffer shorter than `height * width * 4` is rejected.
#[derive(Debug, Clone, Copy)]
pub struct ArgbFrame<'a> {
    data: &'a [u8],
    size: ImageSize,
}

impl<'a> ArgbFrame<'a> {
    /// Wrap a raw ARGB buffer.
    ///
    /// # Errors
    /// * [`DetectError::DimensionMismatch`] if width or height is zero
    /// * [`DetectError::NullOrEmptyBuffer`] if the buffer is shorter than
    ///   `height * width * 4`
    pub fn new(data: &'a [u8], size: ImageSize) -> Result<Self, DetectError> {
        if size.width == 0 || size.height == 0 {
            return Err(DetectError::DimensionMismatch(format!(
                "frame dimensions must be positive, got {}",
                size
            )));
        }
        let required = size.argb_byte_len();
        if data.len() < required {
            return Err(DetectError::NullOrEmptyBuffer {
                actual: data.len(),
                required,
            });
        }
        Ok(Self {
            data: &data[..required],
            size,
        })
    }

    /// Frame dimensions
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Project the color channels to a single intensity plane.
    ///
    /// Returns the luma plane for filtering and the alpha plane unchanged,
    /// for reconstruction by [`compose_argb`]. Purely computed; the source
    /// buffer is not modified.
    pub fn to_gray(&self) -> (Array2<f64>, Array2<u8>) {
        let (height, width) = (self.size.height, self.size.width);
        let mut gray = Array2::zeros((height, width));
        let mut alpha = Array2::zeros((height, width));

        for (i, pixel) in self.data.chunks_exact(4).enumerate() {
            let (row, col) = (i / width, i % width);
            alpha[[row, col]] = pixel[ALPHA];
            gray[[row, col]] = LUMA_RED * pixel[RED] as f64
                + LUMA_GREEN * pixel[GREEN] as f64
                + LUMA_BLUE * pixel[BLUE] as f64;
        }

        (gray, alpha)
    }
}

/// Repack a filtered intensity plane into an ARGB buffer.
///
/// Each output pixel replicates the rounded, [0, 255]-clamped intensity
/// across the three color channels and copies the corresponding alpha value
/// unchanged, producing a buffer with the same dimensions and channel
/// layout as the original input.
pub fn compose_argb(intensity: &Array2<f64>, alpha: &Array2<u8>) -> Result<Vec<u8>, DetectError> {
    if intensity.dim() != alpha.dim() {
        return Err(DetectError::DimensionMismatch(format!(
            "intensity plane is {:?} but alpha plane is {:?}",
            intensity.dim(),
            alpha.dim()
        )));
    }

    let mut output = vec![0u8; intensity.len() * 4];
    for ((value, &a), pixel) in intensity
        .iter()
        .zip(alpha.iter())
        .zip(output.chunks_exact_mut(4))
    {
        let v = value.round().clamp(0.0, 255.0) as u8;
        pixel[ALPHA] = a;
        pixel[RED] = v;
        pixel[GREEN] = v;
        pixel[BLUE] = v;
    }

    Ok(output)
}

/// Overwrite the alpha byte of every pixel in an ARGB buffer.
///
/// Trailing bytes that do not form a whole pixel are left untouched.
pub fn set_alpha(data: &mut [u8], value: u8) {
    for pixel in data.chunks_exact_mut(4) {
        pixel[ALPHA] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn test_rejects_zero_dimensions() {
        let data = [0u8; 16];
        let err = ArgbFrame::new(&data, ImageSize::from_width_height(0, 4)).unwrap_err();
        assert!(matches!(err, DetectError::DimensionMismatch(_)));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let data = [0u8; 15];
        let err = ArgbFrame::new(&data, ImageSize::from_width_height(2, 2)).unwrap_err();
        assert_eq!(
            err,
            DetectError::NullOrEmptyBuffer {
                actual: 15,
                required: 16
            }
        );
    }

    #[test]
    fn test_tolerates_trailing_bytes() {
        let data = [7u8; 20];
        let frame = ArgbFrame::new(&data, ImageSize::from_width_height(2, 2)).unwrap();
        assert_eq!(frame.size().pixel_count(), 4);
    }

    #[test]
    fn test_gray_projection_weights() {
        // One pixel: A=200, R=255, G=0, B=0
        let data = [200u8, 255, 0, 0];
        let frame = ArgbFrame::new(&data, ImageSize::from_width_height(1, 1)).unwrap();
        let (gray, alpha) = frame.to_gray();

        assert_relative_eq!(gray[[0, 0]], 0.299 * 255.0);
        assert_eq!(alpha[[0, 0]], 200);
    }

    #[test]
    fn test_gray_of_neutral_pixel() {
        // Equal channels: weights sum to 1, so gray equals the channel value
        let data = [255u8, 128, 128, 128];
        let frame = ArgbFrame::new(&data, ImageSize::from_width_height(1, 1)).unwrap();
        let (gray, _) = frame.to_gray();
        assert_relative_eq!(gray[[0, 0]], 128.0, epsilon = 1e-9);
    }

    #[test]
    fn test_row_major_layout() {
        // 2x1 frame: left pixel red, right pixel blue
        let data = [255u8, 255, 0, 0, 255, 0, 0, 255];
        let frame = ArgbFrame::new(&data, ImageSize::from_width_height(2, 1)).unwrap();
        let (gray, _) = frame.to_gray();

        assert_relative_eq!(gray[[0, 0]], 0.299 * 255.0);
        assert_relative_eq!(gray[[0, 1]], 0.114 * 255.0);
    }

    #[test]
    fn test_compose_rounds_and_clamps() {
        let intensity = arr2(&[[-4.0, 17.4], [17.5, 300.0]]);
        let alpha = arr2(&[[1u8, 2], [3, 4]]);

        let output = compose_argb(&intensity, &alpha).unwrap();
        assert_eq!(output.len(), 16);

        // pixel 0: clamped up to 0
        assert_eq!(&output[0..4], &[1, 0, 0, 0]);
        // pixel 1: rounds down
        assert_eq!(&output[4..8], &[2, 17, 17, 17]);
        // pixel 2: rounds up
        assert_eq!(&output[8..12], &[3, 18, 18, 18]);
        // pixel 3: clamped down to 255
        assert_eq!(&output[12..16], &[4, 255, 255, 255]);
    }

    #[test]
    fn test_compose_dimension_check() {
        let intensity = arr2(&[[0.0, 0.0]]);
        let alpha = arr2(&[[0u8]]);
        assert!(compose_argb(&intensity, &alpha).is_err());
    }

    #[test]
    fn test_set_alpha() {
        let mut data = [0u8; 9];
        set_alpha(&mut data, 255);
        assert_eq!(data, [255, 0, 0, 0, 255, 0, 0, 0, 0]);
    }
}
