//! Filter-bank parameters and their numeric contracts

use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::kernel::KERNEL_SIZE;

/// Parameters of the oriented Gabor filter bank.
///
/// The caller-facing boundary clamps interactively entered values; the core
/// still validates every field and fails with
/// [`DetectError::InvalidParameter`] rather than trusting the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaborParams {
    /// Standard deviation of the Gaussian envelope, in pixels.
    /// Must lie in [0, 21]; values beyond the fixed kernel extent have no
    /// spatial support.
    pub sigma: f64,
    /// Wavelength of the sinusoidal carrier, in pixels. Must be positive.
    pub lambda: f64,
    /// Number of equally spaced orientations in the bank;
    /// theta_i = i * 180 / num_angles degrees for 0 <= i < num_angles.
    pub num_angles: usize,
    /// Phase offset of the carrier, in degrees, interpreted modulo 360.
    pub psi_degrees: f64,
}

impl Default for GaborParams {
    fn default() -> Self {
        Self {
            sigma: 5.0,
            lambda: 8.0,
            num_angles: 4,
            psi_degrees: 90.0,
        }
    }
}

impl GaborParams {
    /// Check every field against its contract.
    ///
    /// Negated comparisons are deliberate so that NaN inputs fail rather
    /// than slip through.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(self.sigma >= 0.0 && self.sigma <= KERNEL_SIZE as f64) {
            return Err(DetectError::InvalidParameter {
                name: "sigma",
                value: self.sigma,
                expected: "0 <= sigma <= 21",
            });
        }
        if !(self.lambda > 0.0) {
            return Err(DetectError::InvalidParameter {
                name: "lambda",
                value: self.lambda,
                expected: "lambda > 0",
            });
        }
        if self.num_angles < 1 {
            return Err(DetectError::InvalidParameter {
                name: "num_angles",
                value: self.num_angles as f64,
                expected: "num_angles >= 1",
            });
        }
        Ok(())
    }

    /// Phase offset reduced to [0, 360) degrees.
    ///
    /// Reducing before the degree-to-radian conversion makes psi and
    /// psi + 360 build bit-identical kernels instead of kernels that agree
    /// only up to rounding.
    pub fn psi_normalized_degrees(&self) -> f64 {
        self.psi_degrees.rem_euclid(360.0)
    }

    /// Orientation of kernel `index` in the bank, in degrees
    pub fn theta_degrees(&self, index: usize) -> f64 {
        index as f64 * 180.0 / self.num_angles as f64
    }
}
