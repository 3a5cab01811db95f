//! Error types for pixel-level operations.

use thiserror::Error;

use crate::buffer::BufferError;

/// Errors that can occur while running a single image operation.
///
/// None of these are fatal to a session: a failed operation leaves the
/// history stack exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// Pixel access failed.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// Caller-supplied geometry does not describe a region inside the image.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Requested size is incompatible with the source image.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A numeric parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation was superseded before it finished.
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type for image operations.
pub type ProcessResult<T> = Result<T, ProcessError>;
