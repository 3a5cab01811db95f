//! Color-space conversions.
//!
//! HSI and HSV results are diagnostic encodings: the three integer
//! components are written into the R, G and B slots of the output pixel,
//! each masked to 8 bits. A hue of 270 therefore shows up as 14 in the red
//! channel. The images are meant to be looked at, not converted back.

use crate::buffer::{blue, green, pack_rgb, red, PixelBuffer};
use crate::cancel::CancelToken;
use crate::error::ProcessResult;
use crate::filters::map_pixels;

/// Average of the three channels, truncated.
#[inline]
pub fn gray_level(packed: u32) -> u32 {
    (red(packed) + green(packed) + blue(packed)) / 3
}

/// Replace each pixel by its channel average on all three channels.
pub fn rgb_to_gray(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    map_pixels(
        image,
        |p| {
            let v = gray_level(p);
            pack_rgb(v, v, v)
        },
        cancel,
    )
}

/// Encode each pixel as (hue degrees, saturation, intensity).
pub fn rgb_to_hsi(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    map_pixels(
        image,
        |p| {
            let (h, s, i) = hsi_components(red(p) as i32, green(p) as i32, blue(p) as i32);
            pack_rgb(h as u32, s as u32, i as u32)
        },
        cancel,
    )
}

/// Encode each pixel as (hue degrees, saturation %, value %).
pub fn rgb_to_hsv(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    map_pixels(
        image,
        |p| {
            let (h, s, v) = hsv_components(red(p) as i32, green(p) as i32, blue(p) as i32);
            pack_rgb(h as u32, s as u32, v as u32)
        },
        cancel,
    )
}

/// True when every pixel has `r == g == b`.
pub fn is_grayscale(image: &PixelBuffer) -> bool {
    image.pixels().all(|p| p.is_gray())
}

fn hsi_components(r: i32, g: i32, b: i32) -> (i32, i32, i32) {
    let sum = r + g + b;

    let numerator = 0.5 * ((r - g) + (r - b)) as f64;
    let denominator = (((r - g) * (r - g) + (r - b) * (g - b)) as f64).sqrt() + 1e-6;
    let theta = (numerator / denominator).clamp(-1.0, 1.0).acos().to_degrees();
    let hue = (if b > g { 360.0 - theta } else { theta }) as i32;

    // Integer division: 3*min/sum is either 0 or 1.
    let saturation = if sum == 0 {
        255
    } else {
        1 - 3 * r.min(g).min(b) / sum
    };

    (hue, saturation, sum / 3)
}

fn hsv_components(r: i32, g: i32, b: i32) -> (i32, i32, i32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == 0 {
        return (-1, 0, 0);
    }

    let delta = (max - min) as f64;
    let mut hue = if delta == 0.0 {
        0.0
    } else if r == max {
        (g - b) as f64 / delta
    } else if g == max {
        2.0 + (b - r) as f64 / delta
    } else {
        4.0 + (r - g) as f64 / delta
    };
    hue *= 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }

    let saturation = delta / max as f64 * 100.0;
    let value = max as f64 / 256.0 * 100.0;
    (hue as i32, saturation as i32, value as i32)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: gray conversion always yields a grayscale image.
        #[test]
        fn prop_gray_is_grayscale(
            (width, height) in (1u32..=16, 1u32..=16),
            bytes in prop::collection::vec(any::<u8>(), 16 * 16 * 4),
        ) {
            let len = (width * height * 4) as usize;
            let img = PixelBuffer::new(width, height, bytes[..len].to_vec()).unwrap();
            let gray = rgb_to_gray(&img, &CancelToken::new()).unwrap();
            prop_assert!(is_grayscale(&gray));
            prop_assert_eq!(gray.dimensions(), img.dimensions());
        }

        /// Property: gray conversion is idempotent.
        #[test]
        fn prop_gray_idempotent(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let img = PixelBuffer::filled(2, 2, crate::buffer::Pixel::rgb(r, g, b)).unwrap();
            let once = rgb_to_gray(&img, &CancelToken::new()).unwrap();
            let twice = rgb_to_gray(&once, &CancelToken::new()).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: HSV hue lies in [0, 360) for any non-black pixel.
        #[test]
        fn prop_hsv_hue_range(r in 1i32..=255, g in 0i32..=255, b in 0i32..=255) {
            let (h, s, v) = hsv_components(r, g, b);
            prop_assert!((0..360).contains(&h));
            prop_assert!((0..=100).contains(&s));
            prop_assert!((0..100).contains(&v));
        }
    }
}
