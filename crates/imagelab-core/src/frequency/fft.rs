//! Radix-2 fast Fourier transform on power-of-two grids.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

use crate::cancel::CancelToken;
use crate::error::{ProcessError, ProcessResult};

/// A complex number in rectangular form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Build from magnitude and phase (radians).
    pub fn from_polar(magnitude: f64, phase: f64) -> Self {
        Self::new(magnitude * phase.cos(), magnitude * phase.sin())
    }

    /// `re² + im²`
    #[inline]
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Phase angle in `(-π, π]`.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Smallest power of two `>= n` (1 for 0).
pub fn next_power_of_two(n: u32) -> u32 {
    n.max(1).next_power_of_two()
}

/// Power of two closest to `n`; ties round up.
///
/// `nearest_power_of_two(48) == 64`, `nearest_power_of_two(40) == 32`.
pub fn nearest_power_of_two(n: u32) -> u32 {
    let upper = next_power_of_two(n);
    if upper == n.max(1) {
        return upper;
    }
    let lower = upper / 2;
    if n - lower < upper - n {
        lower
    } else {
        upper
    }
}

/// In-place iterative Cooley-Tukey transform. `data.len()` must be a power
/// of two. The inverse is not scaled.
pub fn fft(data: &mut [Complex], direction: Direction) {
    let n = data.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two());

    // Bit-reversal permutation
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            data.swap(i, j);
        }
    }

    let sign = match direction {
        Direction::Forward => -1.0,
        Direction::Inverse => 1.0,
    };

    let mut len = 2;
    while len <= n {
        let angle = sign * 2.0 * PI / len as f64;
        let step = Complex::from_polar(1.0, angle);
        for start in (0..n).step_by(len) {
            let mut w = Complex::new(1.0, 0.0);
            for k in 0..len / 2 {
                let a = data[start + k];
                let b = data[start + k + len / 2] * w;
                data[start + k] = a + b;
                data[start + k + len / 2] = a - b;
                w = w * step;
            }
        }
        len <<= 1;
    }
}

/// 2D transform of a row-major `width x height` grid: rows, then columns.
///
/// The inverse is scaled by `1 / (width * height)` so that a forward and an
/// inverse pass round-trip. The cancel token is polled once per row and
/// once per column.
pub fn fft_2d(
    data: &mut [Complex],
    width: usize,
    height: usize,
    direction: Direction,
    cancel: &CancelToken,
) -> ProcessResult<()> {
    if !width.is_power_of_two() || !height.is_power_of_two() {
        return Err(ProcessError::DimensionMismatch(format!(
            "FFT needs power-of-two dimensions, got {width}x{height}"
        )));
    }
    if data.len() != width * height {
        return Err(ProcessError::DimensionMismatch(format!(
            "expected {} samples, got {}",
            width * height,
            data.len()
        )));
    }

    for row in data.chunks_exact_mut(width) {
        cancel.check()?;
        fft(row, direction);
    }

    let mut column = vec![Complex::ZERO; height];
    for x in 0..width {
        cancel.check()?;
        for (y, c) in column.iter_mut().enumerate() {
            *c = data[y * width + x];
        }
        fft(&mut column, direction);
        for (y, c) in column.iter().enumerate() {
            data[y * width + x] = *c;
        }
    }

    if direction == Direction::Inverse {
        let k = 1.0 / (width * height) as f64;
        for c in data.iter_mut() {
            *c = c.scale(k);
        }
    }

    Ok(())
}
