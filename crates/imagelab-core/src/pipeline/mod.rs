//! Session controller: history, debounce and job lifecycle.
//!
//! A [`Pipeline`] owns the undo history of one editing session. Operations
//! go through a two-phase protocol so the expensive part can leave the
//! caller's thread:
//!
//! 1. [`Pipeline::begin`] checks state, debounce and geometry, then hands
//!    out a [`Job`] holding a snapshot of the current image.
//! 2. [`Job::run`] does the pixel work. It only touches its snapshot and
//!    its [`CancelToken`], so it can run anywhere.
//! 3. [`Pipeline::finish`] pushes the result, or discards it when the job
//!    failed, was cancelled or was superseded.
//!
//! [`Pipeline::apply_filter`] runs all three steps inline.

mod config;
mod debounce;
mod history;
mod operation;

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::buffer::{PixelBuffer, Staged};
use crate::cancel::CancelToken;
use crate::color::is_grayscale;
use crate::decode::{DecodeError, PendingImage};
use crate::error::{ProcessError, ProcessResult};

pub use config::PipelineConfig;
pub use debounce::{Clock, DebounceGate, ManualClock, SystemClock};
pub use history::HistoryStack;
pub use operation::OperationKind;

/// Errors surfaced by the session controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// No image has been loaded yet.
    #[error("no image loaded")]
    NoImage,

    /// Another operation is still running.
    #[error("an operation is already running")]
    Busy,

    /// The job was cancelled or superseded; its result was discarded.
    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Whether a job is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
}

/// A completed operation, already pushed onto history.
#[derive(Debug, Clone)]
pub struct OperationOutput {
    pub kind: OperationKind,
    pub result: Arc<PixelBuffer>,
    /// Intermediate images of multi-step operations, empty otherwise.
    pub stages: Vec<PixelBuffer>,
}

/// What [`Pipeline::begin`] decided.
#[derive(Debug)]
pub enum Dispatch {
    Ready(Job),
    /// Inside the cooldown window; nothing was scheduled.
    Debounced,
}

/// What [`Pipeline::apply_filter`] did.
#[derive(Debug, Clone)]
pub enum Outcome {
    Applied(OperationOutput),
    Debounced,
}

/// What [`Pipeline::undo`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undo {
    /// The previous image is current again.
    Restored,
    /// Only the first loaded image is left; nothing changed.
    AtFloor,
}

/// One scheduled operation against a snapshot of the current image.
#[derive(Debug)]
pub struct Job {
    id: u64,
    kind: OperationKind,
    source: Arc<PixelBuffer>,
    config: PipelineConfig,
    cancel: CancelToken,
}

impl Job {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Execute the operation. Safe to call on any thread.
    pub fn run(self) -> JobResult {
        tracing::debug!(id = self.id, op = self.kind.name(), "job started");
        let outcome = self.kind.execute(&self.source, &self.config, &self.cancel);
        JobResult {
            id: self.id,
            kind: self.kind,
            outcome,
        }
    }
}

/// Output of [`Job::run`], to be handed back to [`Pipeline::finish`].
#[derive(Debug)]
pub struct JobResult {
    pub id: u64,
    pub kind: OperationKind,
    pub outcome: ProcessResult<Staged>,
}

#[derive(Debug)]
struct ActiveJob {
    id: u64,
    cancel: CancelToken,
}

/// One editing session.
#[derive(Debug)]
pub struct Pipeline<C: Clock = SystemClock> {
    config: PipelineConfig,
    history: HistoryStack,
    gate: DebounceGate,
    clock: C,
    active: Option<ActiveJob>,
    next_id: u64,
}

impl Pipeline<SystemClock> {
    /// Create a session timed by the system clock.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::with_clock(config, SystemClock::default())
    }
}

impl<C: Clock> Pipeline<C> {
    /// Create a session timed by `clock`.
    pub fn with_clock(config: PipelineConfig, clock: C) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            history: HistoryStack::new(config.history_capacity),
            gate: DebounceGate::new(config.debounce()),
            config,
            clock,
            active: None,
            next_id: 0,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Push a freshly decoded image as the current one.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn load(&mut self, image: PixelBuffer) {
        self.cancel_active();
        if let Some(evicted) = self.history.push(Arc::new(image)) {
            tracing::debug!(
                width = evicted.width(),
                height = evicted.height(),
                "history full, dropped oldest entry"
            );
        }
        tracing::info!(history = self.history.len(), "image loaded");
    }

    /// Wait for a background decode and load its result.
    pub fn load_pending(&mut self, pending: PendingImage) -> Result<(), PipelineError> {
        let image = pending.wait()?;
        self.load(image);
        Ok(())
    }

    pub fn current_image(&self) -> Option<Arc<PixelBuffer>> {
        self.history.current().cloned()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn state(&self) -> PipelineState {
        if self.active.is_some() {
            PipelineState::Running
        } else {
            PipelineState::Idle
        }
    }

    /// Schedule `kind` against the current image.
    ///
    /// # Errors
    /// - `Busy` while another job is running
    /// - `NoImage` before the first `load`
    /// - `Process` when the parameters do not fit the current image
    #[instrument(skip(self))]
    pub fn begin(&mut self, kind: OperationKind) -> Result<Dispatch, PipelineError> {
        if self.active.is_some() {
            return Err(PipelineError::Busy);
        }
        let source = self.history.current().cloned().ok_or(PipelineError::NoImage)?;

        let now = self.clock.now();
        if !self.gate.is_open(now) {
            tracing::debug!(op = kind.name(), "operation debounced");
            return Ok(Dispatch::Debounced);
        }

        kind.validate(&source, &self.config)?;

        self.gate.record(now);
        let id = self.next_id;
        self.next_id += 1;
        let cancel = CancelToken::new();
        self.active = Some(ActiveJob {
            id,
            cancel: cancel.clone(),
        });

        Ok(Dispatch::Ready(Job {
            id,
            kind,
            source,
            config: self.config.clone(),
            cancel,
        }))
    }

    /// Accept the result of a job started by [`begin`](Self::begin).
    ///
    /// A result whose job is no longer the active one is dropped with
    /// `Cancelled`, as is a job that observed its cancel token.
    #[instrument(skip(self, result), fields(id = result.id, op = result.kind.name()))]
    pub fn finish(&mut self, result: JobResult) -> Result<OperationOutput, PipelineError> {
        match &self.active {
            Some(active) if active.id == result.id => {
                self.active = None;
            }
            _ => {
                tracing::debug!("discarding result of superseded job");
                return Err(PipelineError::Cancelled);
            }
        }

        let staged = match result.outcome {
            Ok(staged) => staged,
            Err(ProcessError::Cancelled) => {
                tracing::debug!("job cancelled");
                return Err(PipelineError::Cancelled);
            }
            Err(e) => {
                tracing::warn!(error = %e, "operation failed");
                return Err(e.into());
            }
        };

        let image = Arc::new(staged.result);
        if let Some(evicted) = self.history.push(Arc::clone(&image)) {
            tracing::debug!(
                width = evicted.width(),
                height = evicted.height(),
                "history full, dropped oldest entry"
            );
        }
        tracing::info!(
            width = image.width(),
            height = image.height(),
            stages = staged.stages.len(),
            history = self.history.len(),
            "operation applied"
        );

        Ok(OperationOutput {
            kind: result.kind,
            result: image,
            stages: staged.stages,
        })
    }

    /// Cancel the running job, if any. Returns whether one was running.
    pub fn cancel_active(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.cancel.cancel();
                tracing::debug!(id = active.id, "job cancelled");
                true
            }
            None => false,
        }
    }

    /// Run `kind` to completion on the calling thread.
    pub fn apply_filter(&mut self, kind: OperationKind) -> Result<Outcome, PipelineError> {
        match self.begin(kind)? {
            Dispatch::Debounced => Ok(Outcome::Debounced),
            Dispatch::Ready(job) => {
                let result = job.run();
                self.finish(result).map(Outcome::Applied)
            }
        }
    }

    /// Return to the previous image, cancelling any running job.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<Undo, PipelineError> {
        self.cancel_active();
        if self.history.is_empty() {
            return Err(PipelineError::NoImage);
        }
        match self.history.pop() {
            Some(_) => {
                tracing::info!(history = self.history.len(), "undo");
                Ok(Undo::Restored)
            }
            None => Ok(Undo::AtFloor),
        }
    }

    pub fn check_grayscale(&self, image: &PixelBuffer) -> bool {
        is_grayscale(image)
    }

    /// Whether the current image is grayscale. False before any load.
    pub fn is_current_grayscale(&self) -> bool {
        self.history
            .current()
            .is_some_and(|image| is_grayscale(image))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_image() -> impl Strategy<Value = PixelBuffer> {
        (1u32..8, 1u32..8).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 4) as usize)
                .prop_map(move |pixels| PixelBuffer::new(w, h, pixels).unwrap())
        })
    }

    proptest! {
        /// Property: undo after any successful operation restores the input exactly.
        #[test]
        fn prop_undo_restores_input(image in arb_image(), pick in 0usize..6) {
            let kind = [
                OperationKind::RgbToGray,
                OperationKind::ReflectX,
                OperationKind::ReflectY,
                OperationKind::Gamma,
                OperationKind::Sobel,
                OperationKind::OtsuThreshold,
            ][pick].clone();
            let config = PipelineConfig { debounce_ms: 0, ..Default::default() };
            let mut pipeline = Pipeline::with_clock(config, ManualClock::new()).unwrap();
            pipeline.load(image.clone());
            pipeline.apply_filter(kind).unwrap();
            prop_assert_eq!(pipeline.undo(), Ok(Undo::Restored));
            prop_assert_eq!(&*pipeline.current_image().unwrap(), &image);
        }
    }
}
