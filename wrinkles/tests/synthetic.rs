//! End-to-end tests of the detection pipeline on synthetic ARGB frames

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wrinkles::{
    build_filter_bank, detect, DetectError, GaborParams, ImageSize, KERNEL_SIZE,
};
use wrinkles::convolve::convolve2d_clamped;
use wrinkles::frame::ArgbFrame;

/// Build an ARGB frame where every pixel has the same gray value and alpha
fn solid_frame(size: ImageSize, gray: u8, alpha: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(size.argb_byte_len());
    for _ in 0..size.pixel_count() {
        data.extend_from_slice(&[alpha, gray, gray, gray]);
    }
    data
}

/// Build an ARGB frame of seeded per-pixel noise, alpha 255
fn noise_frame(size: ImageSize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size.argb_byte_len());
    for _ in 0..size.pixel_count() {
        let gray: u8 = rng.gen();
        data.extend_from_slice(&[255, gray, gray, gray]);
    }
    data
}

/// Build an ARGB frame of vertical sinusoidal stripes with the given
/// period in pixels (intensity varies along x, constant along y)
fn vertical_stripe_frame(size: ImageSize, period: f64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size.argb_byte_len());
    for _row in 0..size.height {
        for col in 0..size.width {
            let phase = std::f64::consts::TAU * col as f64 / period;
            let gray = (128.0 + 100.0 * phase.sin()).round().clamp(0.0, 255.0) as u8;
            data.extend_from_slice(&[255, gray, gray, gray]);
        }
    }
    data
}

#[test]
fn test_determinism() {
    let size = ImageSize::from_width_height(32, 24);
    let image = noise_frame(size, 42);
    let params = GaborParams {
        sigma: 4.0,
        lambda: 6.0,
        num_angles: 3,
        psi_degrees: 45.0,
    };

    let first = detect(&image, None, size, &params).unwrap();
    let second = detect(&image, None, size, &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_full_mask_equals_absent_mask() {
    let size = ImageSize::from_width_height(16, 16);
    let image = noise_frame(size, 7);
    let params = GaborParams::default();

    let mask = vec![255u8; size.pixel_count()];
    let with_mask = detect(&image, Some(&mask), size, &params).unwrap();
    let without_mask = detect(&image, None, size, &params).unwrap();
    assert_eq!(with_mask, without_mask);
}

#[test]
fn test_zero_mask_zeroes_output() {
    let size = ImageSize::from_width_height(16, 16);
    let image = noise_frame(size, 99);
    let params = GaborParams::default();

    let mask = vec![0u8; size.pixel_count()];
    let output = detect(&image, Some(&mask), size, &params).unwrap();

    for pixel in output.chunks_exact(4) {
        assert_eq!(pixel[0], 255, "alpha must survive masking");
        assert_eq!(&pixel[1..], &[0, 0, 0]);
    }
}

#[test]
fn test_flat_image_normalizes_to_uniform_zero() {
    // Edge-clamped sampling makes every window of a constant image sum the
    // same, so the aggregate is constant and normalization maps it to the
    // minimum encodable value everywhere.
    let size = ImageSize::from_width_height(12, 9);
    let image = solid_frame(size, 200, 255);

    let output = detect(&image, None, size, &GaborParams::default()).unwrap();
    for pixel in output.chunks_exact(4) {
        assert_eq!(pixel, &[255, 0, 0, 0]);
    }
}

#[test]
fn test_phase_periodicity() {
    let size = ImageSize::from_width_height(16, 16);
    let image = noise_frame(size, 3);

    let base = GaborParams {
        sigma: 3.0,
        lambda: 5.0,
        num_angles: 2,
        psi_degrees: 30.0,
    };
    let wrapped = GaborParams {
        psi_degrees: 30.0 + 360.0,
        ..base
    };
    let negative = GaborParams {
        psi_degrees: 30.0 - 360.0,
        ..base
    };

    let reference = detect(&image, None, size, &base).unwrap();
    assert_eq!(reference, detect(&image, None, size, &wrapped).unwrap());
    assert_eq!(reference, detect(&image, None, size, &negative).unwrap());
}

#[test]
fn test_kernel_footprint_invariant() {
    for &(sigma, lambda) in &[(0.0, 1.0), (1.0, 0.5), (10.0, 30.0), (21.0, 2.0)] {
        let bank = build_filter_bank(&GaborParams {
            sigma,
            lambda,
            num_angles: 2,
            psi_degrees: 0.0,
        })
        .unwrap();
        for kernel in &bank {
            assert_eq!(kernel.coefficients.dim(), (KERNEL_SIZE, KERNEL_SIZE));
        }
    }
}

#[test]
fn test_mismatched_mask_is_rejected() {
    let size = ImageSize::from_width_height(8, 8);
    let image = noise_frame(size, 1);

    // One row short
    let mask = vec![255u8; 8 * 7];
    let err = detect(&image, Some(&mask), size, &GaborParams::default()).unwrap_err();
    assert!(matches!(err, DetectError::DimensionMismatch(_)));
}

#[test]
fn test_short_image_buffer_is_rejected() {
    let size = ImageSize::from_width_height(8, 8);
    let image = vec![0u8; size.argb_byte_len() - 1];

    let err = detect(&image, None, size, &GaborParams::default()).unwrap_err();
    assert!(matches!(err, DetectError::NullOrEmptyBuffer { .. }));
}

#[test]
fn test_orientation_selectivity() {
    // Vertical stripes with period matching lambda: the theta = 0 kernel
    // (carrier along x, normal to the stripes) must out-respond every
    // other orientation in the bank.
    let lambda = 8.0;
    let size = ImageSize::from_width_height(64, 64);
    let image = vertical_stripe_frame(size, lambda);

    let params = GaborParams {
        sigma: 4.0,
        lambda,
        num_angles: 4,
        psi_degrees: 0.0,
    };
    let bank = build_filter_bank(&params).unwrap();

    let frame = ArgbFrame::new(&image, size).unwrap();
    let (gray, _alpha) = frame.to_gray();

    let peaks: Vec<f64> = bank
        .iter()
        .map(|kernel| {
            let response =
                convolve2d_clamped(gray.view(), kernel.coefficients.view(), None).unwrap();
            response.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()))
        })
        .collect();

    for (i, &peak) in peaks.iter().enumerate().skip(1) {
        assert!(
            peaks[0] > peak,
            "theta=0 peak {} not above theta={} peak {}",
            peaks[0],
            bank[i].theta_degrees,
            peak
        );
    }
}

#[test]
fn test_uniform_gray_single_orientation_scenario() {
    let size = ImageSize::from_width_height(8, 8);
    let image = solid_frame(size, 128, 255);
    let params = GaborParams {
        sigma: 3.0,
        lambda: 2.0,
        num_angles: 1,
        psi_degrees: 0.0,
    };

    let output = detect(&image, None, size, &params).unwrap();
    assert_eq!(output.len(), size.argb_byte_len());

    let first = &output[0..4];
    for pixel in output.chunks_exact(4) {
        assert_eq!(pixel[0], 255, "alpha unchanged");
        assert_eq!(pixel, first, "output must be uniform");
    }
    // Uniform and at the minimum output value
    assert_eq!(&first[1..], &[0, 0, 0]);
}

#[test]
fn test_half_masked_scenario() {
    let size = ImageSize::from_width_height(4, 4);
    let image = noise_frame(size, 1234);

    // Left two columns full weight, right two columns zero
    let mut mask = vec![0u8; size.pixel_count()];
    for row in 0..4 {
        mask[row * 4] = 255;
        mask[row * 4 + 1] = 255;
    }

    let output = detect(&image, Some(&mask), size, &GaborParams::default()).unwrap();

    for row in 0..4 {
        for col in 2..4 {
            let offset = (row * 4 + col) * 4;
            assert_eq!(
                &output[offset + 1..offset + 4],
                &[0, 0, 0],
                "masked-out pixel ({}, {}) must be the minimum value",
                row,
                col
            );
        }
    }
}
