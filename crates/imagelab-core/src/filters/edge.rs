//! Edge filters: Laplacian sharpening mask and Sobel gradient magnitude.
//!
//! Both convolve each color channel independently with fixed 3x3 kernels.
//! Taps falling outside the image are dropped.

use super::spatial_filter;
use crate::buffer::{blue, green, pack_rgb, red, PixelBuffer};
use crate::cancel::CancelToken;
use crate::error::ProcessResult;

const LAPLACIAN: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Convolve with the 8-neighbor Laplacian, clamping each channel to [0, 255].
pub fn laplacian_filter(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    spatial_filter(image, laplacian_pixel, cancel)
}

/// Sobel gradient magnitude `sqrt(Gx² + Gy²)` per channel.
///
/// The magnitude is not clamped: values above 255 wrap when packed into
/// eight bits.
pub fn sobel_filter(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    spatial_filter(image, sobel_pixel, cancel)
}

/// Convolve the three channels around `(x, y)` with `kernel`.
fn convolve3(pixels: &[u32], width: u32, x: u32, y: u32, kernel: &[[i32; 3]; 3]) -> [i32; 3] {
    let w = width as i64;
    let h = (pixels.len() / width as usize) as i64;
    let mut acc = [0i32; 3];

    for (ky, row) in kernel.iter().enumerate() {
        for (kx, &k) in row.iter().enumerate() {
            let nx = x as i64 + kx as i64 - 1;
            let ny = y as i64 + ky as i64 - 1;
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                continue;
            }
            let p = pixels[(ny * w + nx) as usize];
            acc[0] += k * red(p) as i32;
            acc[1] += k * green(p) as i32;
            acc[2] += k * blue(p) as i32;
        }
    }
    acc
}

fn laplacian_pixel(pixels: &[u32], width: u32, x: u32, y: u32) -> u32 {
    let [r, g, b] = convolve3(pixels, width, x, y, &LAPLACIAN);
    pack_rgb(
        r.clamp(0, 255) as u32,
        g.clamp(0, 255) as u32,
        b.clamp(0, 255) as u32,
    )
}

fn sobel_pixel(pixels: &[u32], width: u32, x: u32, y: u32) -> u32 {
    let gx = convolve3(pixels, width, x, y, &SOBEL_X);
    let gy = convolve3(pixels, width, x, y, &SOBEL_Y);
    let magnitude = |c: usize| {
        let (a, b) = (gx[c] as f64, gy[c] as f64);
        (a * a + b * b).sqrt() as u32
    };
    pack_rgb(magnitude(0), magnitude(1), magnitude(2))
}
