//! Rank and mean filters over square neighborhoods.

use super::{neighbors, spatial_filter, KernelSize};
use crate::buffer::{blue, green, pack_rgb, red, PixelBuffer};
use crate::cancel::CancelToken;
use crate::error::ProcessResult;

/// Per-channel minimum over the in-bounds neighborhood.
///
/// Useful against salt noise. Edge pixels are evaluated over fewer samples.
pub fn min_filter(
    image: &PixelBuffer,
    size: KernelSize,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    spatial_filter(image, |px, w, x, y| min_pixel(px, w, x, y, size), cancel)
}

/// Per-channel maximum over the in-bounds neighborhood.
pub fn max_filter(
    image: &PixelBuffer,
    size: KernelSize,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    spatial_filter(image, |px, w, x, y| max_pixel(px, w, x, y, size), cancel)
}

/// Per-channel median of the in-bounds neighborhood.
///
/// Channels are sorted independently, so the result is not a vector median
/// and may combine channels from different source pixels.
pub fn median_filter(
    image: &PixelBuffer,
    size: KernelSize,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    spatial_filter(image, |px, w, x, y| median_pixel(px, w, x, y, size), cancel)
}

/// Per-channel neighborhood mean with a fixed `N*N` divisor.
///
/// Samples outside the image add nothing to the sum but the divisor stays
/// 9 (or 25), so border pixels are pulled toward black.
pub fn average_filter(
    image: &PixelBuffer,
    size: KernelSize,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    spatial_filter(image, |px, w, x, y| average_pixel(px, w, x, y, size), cancel)
}

fn min_pixel(pixels: &[u32], width: u32, x: u32, y: u32, size: KernelSize) -> u32 {
    let (mut r, mut g, mut b) = (255, 255, 255);
    for p in neighbors(pixels, width, x, y, size.radius()) {
        r = r.min(red(p));
        g = g.min(green(p));
        b = b.min(blue(p));
    }
    pack_rgb(r, g, b)
}

fn max_pixel(pixels: &[u32], width: u32, x: u32, y: u32, size: KernelSize) -> u32 {
    let (mut r, mut g, mut b) = (0, 0, 0);
    for p in neighbors(pixels, width, x, y, size.radius()) {
        r = r.max(red(p));
        g = g.max(green(p));
        b = b.max(blue(p));
    }
    pack_rgb(r, g, b)
}

fn median_pixel(pixels: &[u32], width: u32, x: u32, y: u32, size: KernelSize) -> u32 {
    let area = size.area() as usize;
    let mut reds = Vec::with_capacity(area);
    let mut greens = Vec::with_capacity(area);
    let mut blues = Vec::with_capacity(area);

    for p in neighbors(pixels, width, x, y, size.radius()) {
        reds.push(red(p));
        greens.push(green(p));
        blues.push(blue(p));
    }

    reds.sort_unstable();
    greens.sort_unstable();
    blues.sort_unstable();

    // Index 4 of 9 or 12 of 25 for a full neighborhood
    let mid = reds.len() / 2;
    pack_rgb(reds[mid], greens[mid], blues[mid])
}

fn average_pixel(pixels: &[u32], width: u32, x: u32, y: u32, size: KernelSize) -> u32 {
    let (mut r, mut g, mut b) = (0, 0, 0);
    for p in neighbors(pixels, width, x, y, size.radius()) {
        r += red(p);
        g += green(p);
        b += blue(p);
    }
    let divisor = size.area();
    pack_rgb(r / divisor, g / divisor, b / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;

    fn uniform(width: u32, height: u32, v: u8) -> PixelBuffer {
        PixelBuffer::filled(width, height, Pixel::rgb(v, v, v)).unwrap()
    }

    /// 3x3 image with values 10, 20, ..., 90 in row-major order (gray).
    fn ramp3() -> PixelBuffer {
        let mut pixels = Vec::new();
        for i in 1..=9u8 {
            pixels.extend_from_slice(&[i * 10, i * 10, i * 10, 255]);
        }
        PixelBuffer::new(3, 3, pixels).unwrap()
    }

    fn token() -> CancelToken {
        CancelToken::new()
    }

    #[test]
    fn test_uniform_image_unchanged_by_rank_filters() {
        let img = uniform(6, 5, 137);
        for size in [KernelSize::Three, KernelSize::Five] {
            assert_eq!(min_filter(&img, size, &token()).unwrap(), img);
            assert_eq!(max_filter(&img, size, &token()).unwrap(), img);
            assert_eq!(median_filter(&img, size, &token()).unwrap(), img);
        }
    }

    #[test]
    fn test_average_4x4_scenario() {
        let img = uniform(4, 4, 100);
        let out = average_filter(&img, KernelSize::Three, &token()).unwrap();

        assert_eq!(out.get(1, 1).unwrap(), Pixel::rgb(100, 100, 100));
        // Corner: 4 in-bounds samples, divisor still 9 -> 400 / 9 = 44
        assert_eq!(out.get(0, 0).unwrap(), Pixel::rgb(44, 44, 44));
        // Edge: 6 in-bounds samples -> 600 / 9 = 66
        assert_eq!(out.get(1, 0).unwrap(), Pixel::rgb(66, 66, 66));
    }

    #[test]
    fn test_average_5x5_interior_unchanged() {
        let img = uniform(7, 7, 50);
        let out = average_filter(&img, KernelSize::Five, &token()).unwrap();
        assert_eq!(out.get(3, 3).unwrap(), Pixel::rgb(50, 50, 50));
        // Corner: 9 of 25 samples -> 450 / 25 = 18
        assert_eq!(out.get(0, 0).unwrap(), Pixel::rgb(18, 18, 18));
    }

    #[test]
    fn test_min_max_center() {
        let img = ramp3();
        let min = min_filter(&img, KernelSize::Three, &token()).unwrap();
        let max = max_filter(&img, KernelSize::Three, &token()).unwrap();
        assert_eq!(min.get(1, 1).unwrap().r, 10);
        assert_eq!(max.get(1, 1).unwrap().r, 90);
    }

    #[test]
    fn test_min_at_corner_uses_in_bounds_samples_only() {
        let img = ramp3();
        let min = min_filter(&img, KernelSize::Three, &token()).unwrap();
        let max = max_filter(&img, KernelSize::Three, &token()).unwrap();
        // Bottom-right corner sees 50, 60, 80, 90
        assert_eq!(min.get(2, 2).unwrap().r, 50);
        assert_eq!(max.get(0, 0).unwrap().r, 50);
    }

    #[test]
    fn test_median_center_and_corner() {
        let img = ramp3();
        let med = median_filter(&img, KernelSize::Three, &token()).unwrap();
        assert_eq!(med.get(1, 1).unwrap().r, 50);
        // Top-left corner samples: 10, 20, 40, 50 -> index 2 -> 40
        assert_eq!(med.get(0, 0).unwrap().r, 40);
    }

    #[test]
    fn test_median_removes_salt_noise() {
        let mut img = uniform(5, 5, 20);
        img.set(2, 2, Pixel::rgb(255, 255, 255)).unwrap();
        let out = median_filter(&img, KernelSize::Three, &token()).unwrap();
        assert_eq!(out.get(2, 2).unwrap(), Pixel::rgb(20, 20, 20));
    }

    #[test]
    fn test_median_channels_independent() {
        // Center pixel has unique channel ordering; the result mixes channels.
        let mut pixels = Vec::new();
        for i in 0..9u8 {
            pixels.extend_from_slice(&[i, 8 - i, (i * 3) % 9, 255]);
        }
        let img = PixelBuffer::new(3, 3, pixels).unwrap();
        let out = median_filter(&img, KernelSize::Three, &token()).unwrap();
        assert_eq!(out.get(1, 1).unwrap(), Pixel::rgb(4, 4, 3));
    }

    #[test]
    fn test_filters_keep_alpha() {
        let img = PixelBuffer::filled(3, 3, Pixel::rgba(10, 20, 30, 40)).unwrap();
        let out = average_filter(&img, KernelSize::Three, &token()).unwrap();
        assert!(out.pixels().all(|p| p.a == 40));
    }
}
