//! File-based harness for the wrinkle detection pipeline
//!
//! Stands in for the capture host: loads a still image instead of a webcam
//! frame, runs the Gabor filter bank, and writes the detection map next to
//! it. Parameter handling mirrors the interactive host's behavior: values
//! are clamped into range here, in the caller, while the core library
//! validates and fails on anything still out of contract.
//!
//! # Usage
//!
//! ```bash
//! # Default bank (sigma 5, lambda 8, 4 orientations, psi 90)
//! cargo run --release --bin wrinkle_tool -- face.png
//!
//! # Custom parameters and a skin segmentation mask
//! cargo run --release --bin wrinkle_tool -- face.png \
//!     --sigma 3 --lambda 6 --num-angles 8 --psi 0 \
//!     --mask skin_mask.png -o wrinkle_map.png
//!
//! # Force fully opaque output
//! cargo run --release --bin wrinkle_tool -- face.png --opaque
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::info;

use wrinkles::{detect, set_alpha, GaborParams, ImageSize, KERNEL_SIZE};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input image (any format the image crate decodes)
    input: PathBuf,

    /// Output path for the detection map
    #[arg(short, long, default_value = "wrinkles.png")]
    output: PathBuf,

    /// Optional single-channel segmentation mask, same dimensions as the input
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Standard deviation of the Gaussian envelope, in pixels
    #[arg(long, default_value_t = 5.0)]
    sigma: f64,

    /// Wavelength of the sinusoidal carrier, in pixels
    #[arg(long, default_value_t = 8.0)]
    lambda: f64,

    /// Number of equally spaced filter orientations
    #[arg(long, default_value_t = 4)]
    num_angles: usize,

    /// Ceiling for --num-angles
    #[arg(long, default_value_t = 16)]
    max_angles: usize,

    /// Phase offset of the carrier, in degrees
    #[arg(long, default_value_t = 90.0)]
    psi: f64,

    /// Set every output pixel's alpha to 255
    #[arg(long)]
    opaque: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // Clamp like the interactive host's input fields; lambda and psi are
    // passed through and left to core validation.
    let params = GaborParams {
        sigma: cli.sigma.clamp(0.0, KERNEL_SIZE as f64),
        lambda: cli.lambda,
        num_angles: cli.num_angles.clamp(1, cli.max_angles.max(1)),
        psi_degrees: cli.psi,
    };

    let input = image::open(&cli.input)?.to_rgba8();
    let (width, height) = input.dimensions();
    let size = ImageSize::from_width_height(width as usize, height as usize);

    // Repack RGBA into the pipeline's ARGB layout
    let mut argb = vec![0u8; size.argb_byte_len()];
    for (pixel, out) in input.pixels().zip(argb.chunks_exact_mut(4)) {
        let [r, g, b, a] = pixel.0;
        out.copy_from_slice(&[a, r, g, b]);
    }

    let mask_bytes = match &cli.mask {
        Some(path) => {
            let mask = image::open(path)?.to_luma8();
            if mask.dimensions() != (width, height) {
                return Err(format!(
                    "mask is {}x{} but input is {}x{}",
                    mask.width(),
                    mask.height(),
                    width,
                    height
                )
                .into());
            }
            Some(mask.into_raw())
        }
        None => None,
    };

    info!(
        "running {} orientation(s) over {} frame",
        params.num_angles, size
    );
    let mut output = detect(&argb, mask_bytes.as_deref(), size, &params)?;

    if cli.opaque {
        set_alpha(&mut output, 255);
    }

    // Back to RGBA for encoding
    let mut rgba = vec![0u8; output.len()];
    for (pixel, out) in output.chunks_exact(4).zip(rgba.chunks_exact_mut(4)) {
        let [a, r, g, b] = [pixel[0], pixel[1], pixel[2], pixel[3]];
        out.copy_from_slice(&[r, g, b, a]);
    }

    image::RgbaImage::from_raw(width, height, rgba)
        .ok_or("output buffer does not match frame dimensions")?
        .save(&cli.output)?;

    info!("wrote detection map to {}", cli.output.display());
    Ok(())
}
