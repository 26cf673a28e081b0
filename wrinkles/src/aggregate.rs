//! Response aggregation and output-range normalization
//!
//! A wrinkle may run along any orientation, so the per-pixel aggregate is
//! the maximum absolute response across the bank: only the best-aligned
//! filter should dominate. The aggregate is then min-max scaled onto the
//! output range across the whole frame (never per row) so contrast stays
//! consistent from edge to edge.

use ndarray::{Array2, Zip};

use crate::error::DetectError;

/// Upper end of the output intensity range
pub const OUTPUT_MAX: f64 = 255.0;

/// Collapse per-orientation responses to one `max |response|` per pixel.
///
/// # Errors
/// [`DetectError::DimensionMismatch`] if the response list is empty or the
/// buffers disagree in shape.
pub fn max_abs_response(responses: &[Array2<f64>]) -> Result<Array2<f64>, DetectError> {
    let first = responses.first().ok_or_else(|| {
        DetectError::DimensionMismatch("no response buffers to aggregate".to_string())
    })?;

    let mut aggregate = first.mapv(f64::abs);
    for response in &responses[1..] {
        if response.dim() != aggregate.dim() {
            return Err(DetectError::DimensionMismatch(format!(
                "response buffer is {:?}, expected {:?}",
                response.dim(),
                aggregate.dim()
            )));
        }
        Zip::from(&mut aggregate).and(response).for_each(|acc, &v| {
            let magnitude = v.abs();
            if magnitude > *acc {
                *acc = magnitude;
            }
        });
    }

    Ok(aggregate)
}

/// Min-max scale the whole buffer onto [0, OUTPUT_MAX] in place.
///
/// A constant buffer (max == min) maps to all zeros, the minimum encodable
/// output value, rather than dividing by zero.
pub fn normalize_to_output_range(intensity: &mut Array2<f64>) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in intensity.iter() {
        min = min.min(v);
        max = max.max(v);
    }

    let span = max - min;
    if !(span > 0.0) {
        intensity.fill(0.0);
        return;
    }

    intensity.mapv_inplace(|v| (v - min) / span * OUTPUT_MAX);
}
