//! Pixel-wise arithmetic between two images of equal size.

use crate::buffer::{blue, green, pack_rgb, red, with_alpha_of, PixelBuffer};
use crate::error::{ProcessError, ProcessResult};

/// Per-channel sum, saturating at 255. Alpha comes from `a`.
pub fn add_images(a: &PixelBuffer, b: &PixelBuffer) -> ProcessResult<PixelBuffer> {
    combine(a, b, |x, y| x + y)
}

/// Per-channel product, saturating at 255. Alpha comes from `a`.
///
/// Any pair whose sum already exceeds 255 yields 255 directly, so the
/// product is only computed for dark pairs.
pub fn multiply_images(a: &PixelBuffer, b: &PixelBuffer) -> ProcessResult<PixelBuffer> {
    combine(a, b, |x, y| x * y)
}

fn combine(
    a: &PixelBuffer,
    b: &PixelBuffer,
    op: impl Fn(u32, u32) -> u32,
) -> ProcessResult<PixelBuffer> {
    if a.dimensions() != b.dimensions() {
        return Err(ProcessError::DimensionMismatch(format!(
            "cannot combine {}x{} with {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }

    let channel = |x: u32, y: u32| {
        if x + y > 255 {
            255
        } else {
            op(x, y).min(255)
        }
    };

    let pa = a.to_packed();
    let pb = b.to_packed();
    let out: Vec<u32> = pa
        .iter()
        .zip(&pb)
        .map(|(&p, &q)| {
            let rgb = pack_rgb(
                channel(red(p), red(q)),
                channel(green(p), green(q)),
                channel(blue(p), blue(q)),
            );
            with_alpha_of(rgb, p)
        })
        .collect();

    Ok(PixelBuffer::from_packed(a.width(), a.height(), &out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;

    fn filled(r: u8, g: u8, b: u8) -> PixelBuffer {
        PixelBuffer::filled(2, 2, Pixel::rgb(r, g, b)).unwrap()
    }

    #[test]
    fn test_add_saturates() {
        let out = add_images(&filled(100, 200, 0), &filled(100, 100, 7)).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), Pixel::rgb(200, 255, 7));
    }

    #[test]
    fn test_multiply_small_values() {
        let out = multiply_images(&filled(3, 0, 10), &filled(4, 9, 20)).unwrap();
        assert_eq!(out.get(1, 1).unwrap(), Pixel::rgb(12, 0, 200));
    }

    #[test]
    fn test_multiply_saturates() {
        // Sum 200 (not > 255) but product 10000 -> 255
        let out = multiply_images(&filled(100, 200, 1), &filled(100, 100, 1)).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), Pixel::rgb(255, 255, 1));
    }

    #[test]
    fn test_alpha_from_first_operand() {
        let a = PixelBuffer::filled(1, 1, Pixel::rgba(1, 1, 1, 30)).unwrap();
        let b = PixelBuffer::filled(1, 1, Pixel::rgba(1, 1, 1, 200)).unwrap();
        assert_eq!(add_images(&a, &b).unwrap().get(0, 0).unwrap().a, 30);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = PixelBuffer::filled(2, 2, Pixel::rgb(0, 0, 0)).unwrap();
        let b = PixelBuffer::filled(3, 2, Pixel::rgb(0, 0, 0)).unwrap();
        assert!(matches!(
            add_images(&a, &b),
            Err(ProcessError::DimensionMismatch(_))
        ));
    }
}
