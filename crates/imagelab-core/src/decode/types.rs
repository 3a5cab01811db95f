//! Core types for image decoding.

use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// No bytes, or an image with zero width or height.
    #[error("Image is empty")]
    EmptyImage,

    /// The background decode thread panicked.
    #[error("Decode worker terminated unexpectedly")]
    Worker,
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
            other => DecodeError::CorruptedFile(other.to_string()),
        }
    }
}
