//! Cooperative cancellation.
//!
//! Long-running operations receive a [`CancelToken`] and poll it at
//! checkpoints (one scanline, one block row, one frequency pass). Cancelling
//! never interrupts a pass mid-way; the operation returns
//! [`ProcessError::Cancelled`] at the next checkpoint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ProcessError, ProcessResult};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every holder of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Checkpoint: `Err(Cancelled)` once cancellation was requested.
    #[inline]
    pub fn check(&self) -> ProcessResult<()> {
        if self.is_cancelled() {
            Err(ProcessError::Cancelled)
        } else {
            Ok(())
        }
    }
}
