//! Binarization: Otsu, global average and block-adaptive thresholding.
//!
//! All three produce pure black or pure white color channels and keep the
//! source alpha. Otsu and the block method decide on the red channel alone,
//! which for grayscale input is the gray level.

use crate::buffer::{red, with_alpha_of, PixelBuffer};
use crate::cancel::CancelToken;
use crate::color::gray_level;
use crate::error::{ProcessError, ProcessResult};
use crate::filters::map_pixels;
use crate::histogram::compute_histogram;

/// Number of blocks along each axis for [`block_threshold`].
pub const BLOCK_GRID: u32 = 5;

const WHITE: u32 = 0xFFFF_FFFF;
const BLACK: u32 = 0xFF00_0000;

#[inline]
fn binary(on: bool) -> u32 {
    if on {
        WHITE
    } else {
        BLACK
    }
}

/// Threshold that maximizes the between-class variance of the red channel.
///
/// The first level with a strictly greater variance wins; an image with a
/// single red level keeps the initial threshold of 0.
pub fn otsu_level(image: &PixelBuffer) -> u32 {
    let hist = compute_histogram(image).red;
    let total = image.pixel_count() as f64;
    let sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut sum_b = 0.0;
    let mut w_b = 0.0;
    let mut best = 0.0;
    let mut threshold = 0;

    for (t, &count) in hist.iter().enumerate() {
        w_b += count as f64;
        if w_b == 0.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f == 0.0 {
            break;
        }

        sum_b += t as f64 * count as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum - sum_b) / w_f;
        let between = w_b * w_f * (m_b - m_f) * (m_b - m_f);

        if between > best {
            best = between;
            threshold = t as u32;
        }
    }

    threshold
}

/// Binarize on the red channel against [`otsu_level`].
pub fn otsu_threshold(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    let t = otsu_level(image);
    tracing::debug!(threshold = t, "otsu threshold selected");
    map_pixels(image, |p| binary(red(p) > t), cancel)
}

/// Binarize each pixel's gray level against the mean of the red channel.
pub fn average_threshold(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    let sum: u64 = image.pixels().map(|p| p.r as u64).sum();
    let mean = (sum / image.pixel_count() as u64) as u32;
    map_pixels(image, |p| binary(gray_level(p) > mean), cancel)
}

/// Split the image into a 5x5 grid and binarize each block against its own
/// red-channel mean.
///
/// Blocks are `width / 5` by `height / 5`; pixels in the right and bottom
/// remainder strips are not covered by any block and come out black.
///
/// # Errors
/// `DimensionMismatch` when either dimension is below 5.
pub fn block_threshold(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    if width < BLOCK_GRID || height < BLOCK_GRID {
        return Err(ProcessError::DimensionMismatch(format!(
            "block threshold needs at least {BLOCK_GRID}x{BLOCK_GRID} pixels, got {width}x{height}"
        )));
    }

    let pixels = image.to_packed();
    let mut output: Vec<u32> = pixels.iter().map(|&p| with_alpha_of(BLACK, p)).collect();
    let (bw, bh) = ((width / BLOCK_GRID) as usize, (height / BLOCK_GRID) as usize);
    let w = width as usize;

    for gy in 0..BLOCK_GRID as usize {
        cancel.check()?;
        for gx in 0..BLOCK_GRID as usize {
            let rows = gy * bh..(gy + 1) * bh;
            let cols = gx * bw..(gx + 1) * bw;

            let sum: u64 = rows
                .clone()
                .flat_map(|y| cols.clone().map(move |x| y * w + x))
                .map(|i| red(pixels[i]) as u64)
                .sum();
            let mean = (sum / (bw * bh) as u64) as u32;

            for y in rows {
                for x in cols.clone() {
                    let i = y * w + x;
                    let p = pixels[i];
                    output[i] = with_alpha_of(binary(red(p) > mean), p);
                }
            }
        }
    }

    Ok(PixelBuffer::from_packed(width, height, &output)?)
}

/// True when every pixel is pure black or pure white, ignoring alpha.
pub fn is_binary(image: &PixelBuffer) -> bool {
    image
        .to_packed()
        .iter()
        .all(|&p| matches!(p & 0x00FF_FFFF, 0 | 0x00FF_FFFF))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;

    fn gray_row(values: &[u8]) -> PixelBuffer {
        let mut bytes = Vec::new();
        for &v in values {
            bytes.extend_from_slice(&[v, v, v, 255]);
        }
        PixelBuffer::new(values.len() as u32, 1, bytes).unwrap()
    }

    #[test]
    fn test_otsu_bimodal() {
        let img = gray_row(&[10, 12, 11, 10, 200, 201, 199, 200]);
        let t = otsu_level(&img);
        assert!((12..199).contains(&t), "threshold {t}");
        let out = otsu_threshold(&img, &CancelToken::new()).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), Pixel::rgb(0, 0, 0));
        assert_eq!(out.get(5, 0).unwrap(), Pixel::rgb(255, 255, 255));
    }

    #[test]
    fn test_otsu_two_levels_picks_lower() {
        // Every t in [10, 199] separates the classes equally; the first wins.
        let img = gray_row(&[10, 10, 200, 200]);
        assert_eq!(otsu_level(&img), 10);
    }

    #[test]
    fn test_otsu_uses_fractional_class_means() {
        // t = 0: 2 * 2 * (0 - 1.5)^2 = 9
        // t = 1: 3 * 1 * (1/3 - 2)^2 = 8.33
        // Truncated means would score t = 1 higher (12 vs 4).
        let img = gray_row(&[0, 0, 1, 2]);
        assert_eq!(otsu_level(&img), 0);
    }

    #[test]
    fn test_otsu_uniform_is_all_white_or_black() {
        // Single level 0 -> threshold stays 0 -> 0 > 0 is false -> black.
        let img = gray_row(&[0, 0, 0]);
        assert_eq!(otsu_level(&img), 0);
        let out = otsu_threshold(&img, &CancelToken::new()).unwrap();
        assert!(out.pixels().all(|p| p == Pixel::rgb(0, 0, 0)));

        // Single level 90 -> threshold 0 -> everything white.
        let img = gray_row(&[90, 90]);
        let out = otsu_threshold(&img, &CancelToken::new()).unwrap();
        assert!(out.pixels().all(|p| p == Pixel::rgb(255, 255, 255)));
    }

    #[test]
    fn test_average_threshold() {
        // Mean of red = (0 + 100 + 200) / 3 = 100
        let img = gray_row(&[0, 100, 200]);
        let out = average_threshold(&img, &CancelToken::new()).unwrap();
        assert_eq!(out.get(0, 0).unwrap().r, 0);
        assert_eq!(out.get(1, 0).unwrap().r, 0);
        assert_eq!(out.get(2, 0).unwrap().r, 255);
    }

    #[test]
    fn test_average_threshold_uses_gray_level() {
        // Red mean is 60, pixel gray is (60 + 255 + 255) / 3 = 190 -> white
        let img = PixelBuffer::filled(2, 1, Pixel::rgb(60, 255, 255)).unwrap();
        let out = average_threshold(&img, &CancelToken::new()).unwrap();
        assert!(out.pixels().all(|p| p.r == 255));
    }

    #[test]
    fn test_threshold_keeps_alpha() {
        let img = PixelBuffer::filled(5, 5, Pixel::rgba(100, 100, 100, 40)).unwrap();
        let out = average_threshold(&img, &CancelToken::new()).unwrap();
        assert!(out.pixels().all(|p| p.a == 40));
    }

    #[test]
    fn test_block_threshold_too_small() {
        let img = PixelBuffer::filled(4, 10, Pixel::rgb(1, 1, 1)).unwrap();
        assert!(matches!(
            block_threshold(&img, &CancelToken::new()),
            Err(ProcessError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_block_threshold_remainder_is_black() {
        // 7x7: blocks are 1x1, columns and rows 5..7 are remainder.
        let img = PixelBuffer::filled(7, 7, Pixel::rgb(250, 250, 250)).unwrap();
        let out = block_threshold(&img, &CancelToken::new()).unwrap();
        assert_eq!(out.get(6, 0).unwrap(), Pixel::rgb(0, 0, 0));
        assert_eq!(out.get(0, 6).unwrap(), Pixel::rgb(0, 0, 0));
        // A 1x1 block equals its own mean -> not greater -> black.
        assert_eq!(out.get(0, 0).unwrap(), Pixel::rgb(0, 0, 0));
    }

    #[test]
    fn test_block_threshold_local_mean() {
        // 10x10, blocks of 2x2. Top-left block has values 0, 0, 0, 100.
        let mut img = PixelBuffer::filled(10, 10, Pixel::rgb(0, 0, 0)).unwrap();
        img.set(1, 1, Pixel::rgb(100, 100, 100)).unwrap();
        let out = block_threshold(&img, &CancelToken::new()).unwrap();
        assert_eq!(out.get(1, 1).unwrap(), Pixel::rgb(255, 255, 255));
        assert_eq!(out.get(0, 0).unwrap(), Pixel::rgb(0, 0, 0));
    }

    #[test]
    fn test_block_threshold_cancelled() {
        let img = PixelBuffer::filled(10, 10, Pixel::rgb(0, 0, 0)).unwrap();
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(block_threshold(&img, &token), Err(ProcessError::Cancelled));
    }
}
