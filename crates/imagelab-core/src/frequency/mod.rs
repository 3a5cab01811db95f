//! Frequency-domain filtering.
//!
//! Everything here works on gray images: color is dropped before the
//! forward transform and the outputs are gray renderings of real-valued
//! planes. Planes are rendered by min-max stretching to [0, 255]; a flat
//! plane (including an all-zero one) renders black.

mod fft;
mod spectrum;
mod wiener;

pub use fft::{fft, fft_2d, nearest_power_of_two, next_power_of_two, Complex, Direction};
pub use spectrum::{filter_spectrum, shift_quadrants, FrequencyMask, DEFAULT_RADIUS};
pub use wiener::wiener_filter;

use crate::buffer::{pack_rgb, PixelBuffer};
use crate::error::ProcessResult;

/// A row-major grid of real values.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
}

impl Plane {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Build a plane from a function of the flat index.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize) -> f64) -> Self {
        Self {
            width,
            height,
            values: (0..width * height).map(f).collect(),
        }
    }
}

/// Render `log(1 + |x|)` of every value, stretched to [0, 255].
pub fn render_log_magnitude(plane: &Plane) -> ProcessResult<PixelBuffer> {
    render(plane, |v| v.abs().ln_1p())
}

/// Render the values themselves, stretched to [0, 255].
pub fn render_linear(plane: &Plane) -> ProcessResult<PixelBuffer> {
    render(plane, |v| v)
}

fn render(plane: &Plane, f: impl Fn(f64) -> f64) -> ProcessResult<PixelBuffer> {
    let mapped: Vec<f64> = plane.values.iter().map(|&v| f(v)).collect();

    let (min, max) = mapped
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    let packed: Vec<u32> = mapped
        .iter()
        .map(|&v| {
            let level = if range > 0.0 && v.is_finite() {
                ((v - min) / range * 255.0).clamp(0.0, 255.0) as u32
            } else {
                0
            };
            pack_rgb(level, level, level)
        })
        .collect();

    Ok(PixelBuffer::from_packed(
        plane.width as u32,
        plane.height as u32,
        &packed,
    )?)
}
