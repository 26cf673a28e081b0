//! Frame dimensions and size utilities

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensions of one captured frame
///
/// Represents the width and height shared by the input image, the optional
/// segmentation mask and the output image of a single detection call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Frame width in pixels
    pub width: usize,
    /// Frame height in pixels
    pub height: usize,
}

impl ImageSize {
    /// Create a new ImageSize
    pub fn from_width_height(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Get total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Byte length of an interleaved 4-channel (A,R,G,B) buffer of this size
    pub fn argb_byte_len(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Create a zeroed single-channel plane with shape (height, width)
    ///
    /// Note the row-major ordering convention: rows (height) come first.
    pub fn empty_plane(&self) -> Array2<f64> {
        Array2::zeros((self.height, self.width))
    }

    /// Convert to tuple (width, height)
    pub fn to_tuple(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl From<(usize, usize)> for ImageSize {
    fn from(dimensions: (usize, usize)) -> Self {
        Self {
            width: dimensions.0,
            height: dimensions.1,
        }
    }
}

impl From<ImageSize> for (usize, usize) {
    fn from(size: ImageSize) -> Self {
        size.to_tuple()
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
