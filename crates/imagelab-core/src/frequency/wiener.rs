//! Wiener-style deconvolution with a constant noise-to-signal ratio.

use super::fft::{fft_2d, nearest_power_of_two, Complex, Direction};
use super::{render_linear, Plane};
use crate::buffer::{red, with_alpha_of, PixelBuffer};
use crate::cancel::CancelToken;
use crate::color::rgb_to_gray;
use crate::error::{ProcessError, ProcessResult};
use crate::transform::{crop, resize, FilterType};

/// Divide every frequency bin `X` by `|X|² + k` and transform back.
///
/// The image is first resampled (bilinear) to the nearest power-of-two size
/// and converted to gray. The real part of the inverse is stretched to
/// [0, 255] and cropped to `min(original, resampled)` along each axis, so a
/// downscaled image comes back at the smaller size.
///
/// # Errors
/// `InvalidParameter` unless `k` is finite and non-negative.
pub fn wiener_filter(image: &PixelBuffer, k: f64, cancel: &CancelToken) -> ProcessResult<PixelBuffer> {
    if !k.is_finite() || k < 0.0 {
        return Err(ProcessError::InvalidParameter(format!(
            "noise ratio must be a finite non-negative number, got {k}"
        )));
    }

    let (width, height) = image.dimensions();
    let cols = nearest_power_of_two(width);
    let rows = nearest_power_of_two(height);

    let resized = resize(image, cols, rows, FilterType::Bilinear)?;
    let gray = rgb_to_gray(&resized, cancel)?;

    let mut spectrum: Vec<Complex> = gray
        .to_packed()
        .into_iter()
        .map(|p| Complex::new(red(p) as f64, 0.0))
        .collect();
    fft_2d(&mut spectrum, cols as usize, rows as usize, Direction::Forward, cancel)?;

    cancel.check()?;
    for bin in spectrum.iter_mut() {
        let denominator = bin.norm_sqr() + k;
        *bin = if denominator == 0.0 {
            Complex::ZERO
        } else {
            bin.scale(1.0 / denominator)
        };
    }

    fft_2d(&mut spectrum, cols as usize, rows as usize, Direction::Inverse, cancel)?;

    let plane = Plane::from_fn(cols as usize, rows as usize, |i| spectrum[i].re);
    let rendered = render_linear(&plane)?;
    let cropped = crop(&rendered, 0, 0, width.min(cols), height.min(rows))?;

    // Carry alpha from the same coordinates of the source.
    let (out_w, out_h) = cropped.dimensions();
    let source = crop(image, 0, 0, out_w, out_h)?.to_packed();
    let packed: Vec<u32> = cropped
        .to_packed()
        .iter()
        .zip(&source)
        .map(|(&p, &s)| with_alpha_of(p, s))
        .collect();

    tracing::debug!(k, cols, rows, "wiener filter applied");
    Ok(PixelBuffer::from_packed(out_w, out_h, &packed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 13 + y * 29) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_power_of_two_size_kept() {
        let out = wiener_filter(&gradient(16, 8), 0.01, &CancelToken::new()).unwrap();
        assert_eq!(out.dimensions(), (16, 8));
        assert!(crate::color::is_grayscale(&out));
    }

    #[test]
    fn test_upscaled_image_cropped_to_original() {
        // 50 -> 64, 30 -> 32: cropped back to 50x30
        let out = wiener_filter(&gradient(50, 30), 0.5, &CancelToken::new()).unwrap();
        assert_eq!(out.dimensions(), (50, 30));
    }

    #[test]
    fn test_downscaled_image_stays_small() {
        // 40 -> 32, 20 -> 16
        let out = wiener_filter(&gradient(40, 20), 0.5, &CancelToken::new()).unwrap();
        assert_eq!(out.dimensions(), (32, 16));
    }

    #[test]
    fn test_black_image_with_zero_k() {
        // Every bin has a zero denominator -> output flat -> black
        let img = PixelBuffer::filled(8, 8, Pixel::rgb(0, 0, 0)).unwrap();
        let out = wiener_filter(&img, 0.0, &CancelToken::new()).unwrap();
        assert!(out.pixels().all(|p| p == Pixel::rgb(0, 0, 0)));
    }

    #[test]
    fn test_output_spans_full_range() {
        let out = wiener_filter(&gradient(16, 16), 1.0, &CancelToken::new()).unwrap();
        assert!(out.pixels().any(|p| p.r == 0));
        assert!(out.pixels().any(|p| p.r == 255));
    }

    #[test]
    fn test_invalid_k() {
        let img = gradient(4, 4);
        for k in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                wiener_filter(&img, k, &CancelToken::new()),
                Err(ProcessError::InvalidParameter(_))
            ));
        }
    }
}
