//! Gabor kernel synthesis
//!
//! Builds the bank of oriented kernels the convolution stage runs against.
//! The kernel footprint is a structural constant: 21x21 taps regardless of
//! sigma and lambda, so only coefficient magnitudes vary with the
//! parameters. Each kernel is the product of a Gaussian envelope and an
//! oriented sinusoidal carrier:
//!
//! ```text
//! x' =  x*cos(theta) + y*sin(theta)
//! y' = -x*sin(theta) + y*cos(theta)
//! k(x, y) = exp(-(x'^2 + y'^2) / (2*sigma^2)) * cos(2*pi*x'/lambda + psi)
//! ```
//!
//! with x, y in pixel offsets from the kernel center.

use ndarray::Array2;

use crate::error::DetectError;
use crate::params::GaborParams;

/// Kernel footprint in pixels, fixed regardless of sigma and lambda
pub const KERNEL_SIZE: usize = 21;

/// Half the kernel extent; taps span [-HALF_KERNEL, HALF_KERNEL] per axis
pub const HALF_KERNEL: i64 = 10;

/// One oriented kernel of the bank, tagged with its orientation so a
/// caller can tell which angle produced the winning response.
#[derive(Debug, Clone)]
pub struct GaborKernel {
    /// Orientation of the carrier normal, in degrees
    pub theta_degrees: f64,
    /// 21x21 coefficient grid, indexed [y + HALF_KERNEL, x + HALF_KERNEL]
    pub coefficients: Array2<f64>,
}

/// Build the oriented filter bank for the given parameters.
///
/// Produces `num_angles` kernels with theta_i = i * 180 / num_angles
/// degrees. The ordering matters only for reproducibility of which
/// orientation contributed a maximal response; the aggregate itself is
/// order-independent.
///
/// # Errors
/// [`DetectError::InvalidParameter`] if sigma is outside [0, 21],
/// lambda is not positive, or num_angles is zero.
pub fn build_filter_bank(params: &GaborParams) -> Result<Vec<GaborKernel>, DetectError> {
    params.validate()?;

    let psi_rad = params.psi_normalized_degrees().to_radians();
    let bank = (0..params.num_angles)
        .map(|i| {
            let theta_degrees = params.theta_degrees(i);
            GaborKernel {
                theta_degrees,
                coefficients: make_kernel(params.sigma, theta_degrees, params.lambda, psi_rad),
            }
        })
        .collect();
    Ok(bank)
}

/// Synthesize one 21x21 kernel. `psi_rad` is already in radians.
fn make_kernel(sigma: f64, theta_degrees: f64, lambda: f64, psi_rad: f64) -> Array2<f64> {
    let mut kernel = Array2::zeros((KERNEL_SIZE, KERNEL_SIZE));

    // A zero-width envelope degenerates to an impulse at the origin; the
    // carrier contributes only its phase there.
    if sigma == 0.0 {
        kernel[[HALF_KERNEL as usize, HALF_KERNEL as usize]] = psi_rad.cos();
        return kernel;
    }

    let theta = theta_degrees.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    let two_sigma_sq = 2.0 * sigma * sigma;

    for y in -HALF_KERNEL..=HALF_KERNEL {
        for x in -HALF_KERNEL..=HALF_KERNEL {
            let xr = x as f64 * cos_t + y as f64 * sin_t;
            let yr = -(x as f64) * sin_t + y as f64 * cos_t;

            let envelope = (-(xr * xr + yr * yr) / two_sigma_sq).exp();
            let carrier = (std::f64::consts::TAU * xr / lambda + psi_rad).cos();

            kernel[[(y + HALF_KERNEL) as usize, (x + HALF_KERNEL) as usize]] = envelope * carrier;
        }
    }

    kernel
}
