//! Resampling to explicit dimensions with the `image` crate's filters.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{ProcessError, ProcessResult};

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - The source image to resize
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `filter` - Interpolation filter to use
///
/// # Returns
///
/// A new `PixelBuffer` with the specified dimensions.
///
/// # Errors
///
/// `InvalidParameter` if either target dimension is zero.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> ProcessResult<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(ProcessError::InvalidParameter(format!(
            "cannot resize to {width}x{height}"
        )));
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let rgba = image
        .to_rgba_image()
        .ok_or_else(|| ProcessError::InvalidParameter("pixel data does not match dimensions".into()))?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(PixelBuffer::from_rgba_image(resized))
}
