//! Rectangular cropping in absolute pixel coordinates.
//!
//! # Coordinate System
//!
//! - `(from_x, from_y)` is the top-left corner, inclusive
//! - `(to_x, to_y)` is the bottom-right corner, exclusive
//! - Origin is the top-left pixel of the image
//!
//! Nothing is clamped: a region that does not fit is an error.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::{ProcessError, ProcessResult};

/// Copy the rectangle `[from_x, to_x) x [from_y, to_y)` out of `image`.
///
/// # Arguments
///
/// * `image` - Source image
/// * `from_x`, `from_y` - Top-left corner (inclusive)
/// * `to_x`, `to_y` - Bottom-right corner (exclusive)
///
/// # Returns
///
/// A new buffer of `(to_x - from_x) x (to_y - from_y)` pixels.
///
/// # Errors
///
/// `InvalidRegion` if the rectangle is empty, inverted or extends past the
/// image.
pub fn crop(
    image: &PixelBuffer,
    from_x: u32,
    from_y: u32,
    to_x: u32,
    to_y: u32,
) -> ProcessResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    if to_x <= from_x || to_y <= from_y || to_x > width || to_y > height {
        return Err(ProcessError::InvalidRegion(format!(
            "({from_x}, {from_y}) -> ({to_x}, {to_y}) does not fit a {width}x{height} image"
        )));
    }

    // Fast path: full crop returns a clone
    if from_x == 0 && from_y == 0 && to_x == width && to_y == height {
        return Ok(image.clone());
    }

    let out_width = to_x - from_x;
    let out_height = to_y - from_y;
    let stride = width as usize * CHANNELS;
    let src = image.as_bytes();
    let mut output = Vec::with_capacity(out_width as usize * out_height as usize * CHANNELS);

    // Copy pixel data row by row
    for y in from_y..to_y {
        let start = y as usize * stride + from_x as usize * CHANNELS;
        let end = start + out_width as usize * CHANNELS;
        output.extend_from_slice(&src[start..end]);
    }

    Ok(PixelBuffer::new(out_width, out_height, output)?)
}
