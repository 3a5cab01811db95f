//! Point (per-pixel) intensity transforms.

use super::map_pixels;
use crate::buffer::{blue, green, pack_rgb, red, PixelBuffer};
use crate::cancel::CancelToken;
use crate::error::{ProcessError, ProcessResult};

/// Default exponent of the power-law transform.
pub const DEFAULT_GAMMA: f64 = 0.5;

/// Power-law transform `255 * (c / 255)^gamma` on each color channel.
///
/// Results are truncated and capped at 255. A gamma below 1 brightens
/// shadows, above 1 darkens them.
pub fn gamma_transform(
    image: &PixelBuffer,
    gamma: f64,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(ProcessError::InvalidParameter(format!(
            "gamma must be a positive finite number, got {gamma}"
        )));
    }

    let lut = gamma_lut(gamma);
    map_pixels(
        image,
        |p| {
            pack_rgb(
                lut[red(p) as usize],
                lut[green(p) as usize],
                lut[blue(p) as usize],
            )
        },
        cancel,
    )
}

fn gamma_lut(gamma: f64) -> [u32; 256] {
    let mut lut = [0u32; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        let out = 255.0 * (i as f64 / 255.0).powf(gamma);
        *v = (out as u32).min(255);
    }
    lut
}
