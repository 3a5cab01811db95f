//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core imagelab
//! types, handling the conversion between Rust and JavaScript data representations.

use std::fmt::Display;
use std::sync::Arc;

use imagelab_core::PixelBuffer;
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory and may be shared with the
/// session history. When you call `pixels()`, a copy is made to JavaScript
/// memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    inner: Arc<PixelBuffer>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create an image from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    ///
    /// # Errors
    /// Returns an error if the dimensions are zero or do not match the data length.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        PixelBuffer::new(width, height, pixels)
            .map(JsPixelBuffer::from_buffer)
            .map_err(to_js_error)
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.as_bytes().len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.as_bytes().to_vec()
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            inner: Arc::new(buffer),
        }
    }

    pub(crate) fn from_shared(buffer: Arc<PixelBuffer>) -> Self {
        Self { inner: buffer }
    }

    pub(crate) fn buffer(&self) -> &PixelBuffer {
        &self.inner
    }
}

/// Convert any displayable error into the string value thrown to JavaScript.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagelab_core::Pixel;

    #[test]
    fn test_js_pixel_buffer_from_buffer() {
        let img = JsPixelBuffer::from_buffer(
            PixelBuffer::filled(100, 50, Pixel::rgb(1, 2, 3)).unwrap(),
        );
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_pixel_buffer_pixels() {
        let pixels = vec![255u8, 128, 64, 255, 32, 16, 8, 0];
        let img = JsPixelBuffer::from_buffer(PixelBuffer::new(2, 1, pixels.clone()).unwrap());
        assert_eq!(img.pixels(), pixels);
        assert_eq!(img.buffer().get(1, 0).unwrap(), Pixel::rgba(32, 16, 8, 0));
    }

    #[test]
    fn test_shared_buffer_is_not_copied() {
        let shared = Arc::new(PixelBuffer::filled(2, 2, Pixel::rgb(9, 9, 9)).unwrap());
        let img = JsPixelBuffer::from_shared(Arc::clone(&shared));
        assert_eq!(Arc::strong_count(&shared), 2);
        assert_eq!(img.buffer(), &*shared);
    }
}
