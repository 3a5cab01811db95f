//! Ideal circular low-pass and high-pass filtering in the frequency domain.
//!
//! The image is converted to gray, zero-padded to power-of-two dimensions and
//! transformed. The magnitude spectrum is centered with a quadrant shift,
//! multiplied by a binary disc, shifted back and recombined with the
//! untouched phase before the inverse transform.

use serde::{Deserialize, Serialize};

use super::fft::{fft_2d, next_power_of_two, Complex, Direction};
use super::{render_log_magnitude, Plane};
use crate::buffer::{red, with_alpha_of, PixelBuffer, Staged};
use crate::cancel::CancelToken;
use crate::color::rgb_to_gray;
use crate::error::{ProcessError, ProcessResult};

/// Default radius of the pass disc, in frequency bins.
pub const DEFAULT_RADIUS: f64 = 40.0;

/// Which part of the centered spectrum survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyMask {
    /// Keep frequencies inside the disc.
    LowPass,
    /// Zero frequencies inside the disc.
    HighPass,
}

impl FrequencyMask {
    fn keeps(self, inside: bool) -> bool {
        match self {
            FrequencyMask::LowPass => inside,
            FrequencyMask::HighPass => !inside,
        }
    }
}

/// Filter `image` through `mask` with a disc of `radius` bins.
///
/// Stages, in order: padded gray image, magnitude, shifted magnitude,
/// masked shifted magnitude, masked magnitude, result. Every stage is
/// rendered as `log(1 + |x|)` stretched to [0, 255]; all but the result keep
/// the padded dimensions.
///
/// # Errors
/// `InvalidParameter` if `radius` is not a positive finite number.
pub fn filter_spectrum(
    image: &PixelBuffer,
    mask: FrequencyMask,
    radius: f64,
    cancel: &CancelToken,
) -> ProcessResult<Staged> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ProcessError::InvalidParameter(format!(
            "mask radius must be a positive finite number, got {radius}"
        )));
    }

    let (width, height) = image.dimensions();
    let cols = next_power_of_two(width) as usize;
    let rows = next_power_of_two(height) as usize;
    let mut stages = Vec::with_capacity(6);

    let gray = rgb_to_gray(image, cancel)?;
    let mut padded = Plane::zeros(cols, rows);
    for (i, p) in gray.to_packed().into_iter().enumerate() {
        let (x, y) = (i % width as usize, i / width as usize);
        padded.values[y * cols + x] = red(p) as f64;
    }
    stages.push(render_log_magnitude(&padded)?);

    let mut spectrum: Vec<Complex> = padded
        .values
        .iter()
        .map(|&v| Complex::new(v, 0.0))
        .collect();
    fft_2d(&mut spectrum, cols, rows, Direction::Forward, cancel)?;

    let mut magnitude = Plane::from_fn(cols, rows, |i| spectrum[i].norm());
    let phase = Plane::from_fn(cols, rows, |i| spectrum[i].arg());
    stages.push(render_log_magnitude(&magnitude)?);

    cancel.check()?;
    shift_quadrants(&mut magnitude);
    stages.push(render_log_magnitude(&magnitude)?);

    cancel.check()?;
    apply_disc(&mut magnitude, mask, radius);
    stages.push(render_log_magnitude(&magnitude)?);

    shift_quadrants(&mut magnitude);
    stages.push(render_log_magnitude(&magnitude)?);

    let mut filtered: Vec<Complex> = magnitude
        .values
        .iter()
        .zip(&phase.values)
        .map(|(&m, &p)| Complex::from_polar(m, p))
        .collect();
    fft_2d(&mut filtered, cols, rows, Direction::Inverse, cancel)?;

    let mut cropped = Plane::zeros(width as usize, height as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            cropped.values[y * width as usize + x] = filtered[y * cols + x].re;
        }
    }
    let rendered = render_log_magnitude(&cropped)?;

    let source = image.to_packed();
    let packed: Vec<u32> = rendered
        .to_packed()
        .iter()
        .zip(&source)
        .map(|(&p, &s)| with_alpha_of(p, s))
        .collect();
    let result = PixelBuffer::from_packed(width, height, &packed)?;
    stages.push(result.clone());

    tracing::debug!(?mask, radius, cols, rows, "spectrum filtered");
    Ok(Staged { result, stages })
}

/// Swap diagonal quadrants over the even-sized part of the plane.
///
/// Moves the zero-frequency bin to the center; applying it twice restores
/// the original layout.
pub fn shift_quadrants(plane: &mut Plane) {
    let half_w = (plane.width & !1) / 2;
    let half_h = (plane.height & !1) / 2;
    let w = plane.width;

    for y in 0..half_h {
        for x in 0..half_w {
            plane.values.swap(y * w + x, (y + half_h) * w + x + half_w);
            plane.values.swap(y * w + x + half_w, (y + half_h) * w + x);
        }
    }
}

fn apply_disc(plane: &mut Plane, mask: FrequencyMask, radius: f64) {
    let cx = plane.width as f64 / 2.0;
    let cy = plane.height as f64 / 2.0;
    let r2 = radius * radius;

    for y in 0..plane.height {
        for x in 0..plane.width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let inside = dx * dx + dy * dy <= r2;
            if !mask.keeps(inside) {
                plane.values[y * plane.width + x] = 0.0;
            }
        }
    }
}
