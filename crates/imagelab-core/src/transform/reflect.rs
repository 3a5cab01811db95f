//! Mirror images across a horizontal or vertical axis.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{ProcessError, ProcessResult};

/// Axis to mirror across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal axis: rows are reversed (upside down).
    X,
    /// Vertical axis: columns are reversed (left-right mirror).
    Y,
}

/// Mirror `image` across `axis`. Dimensions are unchanged.
pub fn reflect(image: &PixelBuffer, axis: Axis) -> ProcessResult<PixelBuffer> {
    let rgba = image
        .to_rgba_image()
        .ok_or_else(|| ProcessError::InvalidParameter("pixel data does not match dimensions".into()))?;

    let flipped = match axis {
        Axis::X => image::imageops::flip_vertical(&rgba),
        Axis::Y => image::imageops::flip_horizontal(&rgba),
    };

    Ok(PixelBuffer::from_rgba_image(flipped))
}
