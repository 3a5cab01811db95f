//! imagelab core - image processing pipeline
//!
//! This crate provides the pixel-level algorithms behind imagelab (spatial
//! filters, color conversions, thresholding, frequency-domain filtering and
//! geometric transforms) and the session controller that applies them with
//! an undo history.
//!
//! Hosts normally only touch [`Pipeline`], [`OperationKind`] and
//! [`decode_image`]; the algorithm modules are public for direct use.

pub mod buffer;
pub mod cancel;
pub mod color;
pub mod composite;
pub mod decode;
pub mod error;
pub mod filters;
pub mod frequency;
pub mod histogram;
pub mod pipeline;
pub mod threshold;
pub mod transform;

pub use buffer::{BufferError, Pixel, PixelBuffer, Staged};
pub use cancel::CancelToken;
pub use decode::{decode_image, spawn_decode, DecodeError, PendingImage};
pub use error::{ProcessError, ProcessResult};
pub use filters::KernelSize;
pub use histogram::{compute_histogram, Histogram};
pub use pipeline::{
    Clock, Dispatch, Job, JobResult, ManualClock, OperationKind, OperationOutput, Outcome,
    Pipeline, PipelineConfig, PipelineError, PipelineState, SystemClock, Undo,
};
