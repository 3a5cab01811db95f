//! Image decoding.
//!
//! This module provides functionality for:
//! - Decoding any format enabled on the `image` crate (JPEG and PNG)
//! - Decoding on a background thread and awaiting the result later
//!
//! # Architecture
//!
//! Decoding is the only work that happens before a [`Pipeline`] has an
//! image. [`spawn_decode`] hands the bytes to a worker thread and returns a
//! [`PendingImage`]; the pipeline joins it in `load_pending` before any
//! operation can run. The WASM bindings call [`decode_image`] directly, as
//! `std::thread` is unavailable there.
//!
//! [`Pipeline`]: crate::pipeline::Pipeline

mod types;

use std::io::Cursor;
use std::thread::JoinHandle;

use image::ImageReader;

use crate::buffer::PixelBuffer;

pub use types::DecodeError;

/// Decode an encoded image from bytes, guessing the format from its header.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes
///
/// # Returns
///
/// A `PixelBuffer` with RGBA pixel data.
///
/// # Errors
///
/// - `EmptyImage` if `bytes` is empty or the image has no pixels
/// - `InvalidFormat` if the format is not recognized or not enabled
/// - `CorruptedFile` if the data is truncated or malformed
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyImage);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode()?;
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }

    tracing::debug!(width = img.width(), height = img.height(), "image decoded");
    Ok(PixelBuffer::from_dynamic(img))
}

/// A decode running on a background thread.
#[derive(Debug)]
pub struct PendingImage {
    handle: JoinHandle<Result<PixelBuffer, DecodeError>>,
}

impl PendingImage {
    /// True once the worker has produced its result.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the decode completes.
    ///
    /// # Errors
    /// The decode error, or `Worker` if the thread panicked.
    pub fn wait(self) -> Result<PixelBuffer, DecodeError> {
        self.handle.join().map_err(|_| DecodeError::Worker)?
    }
}

/// Start decoding `bytes` on a new thread.
pub fn spawn_decode(bytes: Vec<u8>) -> PendingImage {
    PendingImage {
        handle: std::thread::spawn(move || decode_image(&bytes)),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::png_bytes;
    use super::*;
    use crate::buffer::Pixel;

    #[test]
    fn test_decode_png() {
        let bytes = png_bytes(3, 2, |x, y| [x as u8 * 10, y as u8 * 20, 7, 200]);
        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get(2, 1).unwrap(), Pixel::rgba(20, 20, 7, 200));
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_image(&[]), Err(DecodeError::EmptyImage));
    }

    #[test]
    fn test_decode_unknown_format() {
        assert_eq!(
            decode_image(b"definitely not an image"),
            Err(DecodeError::InvalidFormat)
        );
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(16, 16, |_, _| [1, 2, 3, 255]);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            decode_image(truncated),
            Err(DecodeError::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_spawn_decode_round_trip() {
        let bytes = png_bytes(4, 4, |_, _| [9, 8, 7, 255]);
        let pending = spawn_decode(bytes);
        let img = pending.wait().unwrap();
        assert_eq!(img.dimensions(), (4, 4));
        assert!(img.pixels().all(|p| p == Pixel::rgb(9, 8, 7)));
    }

    #[test]
    fn test_spawn_decode_propagates_error() {
        let pending = spawn_decode(Vec::new());
        assert_eq!(pending.wait(), Err(DecodeError::EmptyImage));
    }
}
