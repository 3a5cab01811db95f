//! Spatial and point filters.
//!
//! Neighborhood filters are expressed as kernel functions over a packed
//! `0xAARRGGBB` array and run by [`spatial_filter`], which writes every
//! result into a fresh array so a pass never reads its own output.
//!
//! # Edge Handling
//!
//! Neighborhood samples that fall outside the image are skipped. They are
//! never wrapped, mirrored or padded. Kernels differ in what they do with
//! the reduced sample count:
//!
//! - min / max / median work on the in-bounds samples only
//! - average keeps the fixed `N*N` divisor, so edge pixels come out darker
//! - Laplacian and Sobel simply drop the missing taps

mod arithmetic;
mod edge;
mod neighborhood;
mod pixelate;
mod point;
mod region;

pub use arithmetic::{add_images, multiply_images};
pub use edge::{laplacian_filter, sobel_filter};
pub use neighborhood::{average_filter, max_filter, median_filter, min_filter};
pub use pixelate::pixelate;
pub use point::{gamma_transform, DEFAULT_GAMMA};
pub use region::{highlight_edges, EdgeBounds, EDGE_DIFFERENCE_THRESHOLD};

use serde::{Deserialize, Serialize};

use crate::buffer::{with_alpha_of, PixelBuffer};
use crate::cancel::CancelToken;
use crate::error::ProcessResult;

/// Side length of a square neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelSize {
    /// 3x3 neighborhood.
    #[default]
    Three,
    /// 5x5 neighborhood.
    Five,
}

impl KernelSize {
    /// Side length (3 or 5).
    pub fn side(self) -> u32 {
        match self {
            KernelSize::Three => 3,
            KernelSize::Five => 5,
        }
    }

    /// Offset from the center to the border (1 or 2).
    pub fn radius(self) -> i64 {
        (self.side() / 2) as i64
    }

    /// Number of samples in a full neighborhood (9 or 25).
    pub fn area(self) -> u32 {
        self.side() * self.side()
    }
}

/// In-bounds neighbors of `(x, y)` within `radius`, row by row.
pub(crate) fn neighbors(
    pixels: &[u32],
    width: u32,
    x: u32,
    y: u32,
    radius: i64,
) -> impl Iterator<Item = u32> + '_ {
    let w = width as i64;
    let h = if width == 0 {
        0
    } else {
        (pixels.len() / width as usize) as i64
    };
    let (cx, cy) = (x as i64, y as i64);
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius).filter_map(move |dx| {
            let nx = cx + dx;
            let ny = cy + dy;
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                None
            } else {
                Some(pixels[(ny * w + nx) as usize])
            }
        })
    })
}

/// Apply `kernel` to every pixel of `image`.
///
/// A kernel computes one packed output pixel from `(pixels, width, x, y)`
/// over the packed source array; the height is `pixels.len() / width`. The
/// kernel's alpha byte is discarded and the source pixel's alpha is
/// kept. The cancel token is polled once per scanline.
pub fn spatial_filter(
    image: &PixelBuffer,
    kernel: impl Fn(&[u32], u32, u32, u32) -> u32,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    let pixels = image.to_packed();
    let mut output = vec![0u32; pixels.len()];

    for y in 0..height {
        cancel.check()?;
        let row = y as usize * width as usize;
        for x in 0..width {
            let index = row + x as usize;
            output[index] = with_alpha_of(kernel(&pixels, width, x, y), pixels[index]);
        }
    }

    Ok(PixelBuffer::from_packed(width, height, &output)?)
}

/// Apply a per-pixel function to every pixel of `image`.
///
/// Like [`spatial_filter`] the source alpha is kept and the token is polled
/// once per scanline.
pub fn map_pixels(
    image: &PixelBuffer,
    f: impl Fn(u32) -> u32,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    let pixels = image.to_packed();
    let mut output = Vec::with_capacity(pixels.len());

    for row in pixels.chunks_exact(width as usize) {
        cancel.check()?;
        output.extend(row.iter().map(|&p| with_alpha_of(f(p), p)));
    }

    Ok(PixelBuffer::from_packed(width, height, &output)?)
}
