//! Editing session WASM bindings.
//!
//! A [`JsSession`] owns one [`Pipeline`] and the intermediate images of the
//! last multi-step operation. Operations and configuration cross the
//! boundary as plain JS objects through `serde-wasm-bindgen`.
//!
//! # Example
//!
//! ```typescript
//! import { JsSession, decode_image } from '@imagelab/wasm';
//!
//! const session = new JsSession({ history_capacity: 30 });
//! session.load(decode_image(bytes));
//!
//! if (session.apply({ type: 'median_filter', size: 'five' })) {
//!   draw(session.current());
//! }
//! session.undo();
//! ```

use std::time::Duration;

use crate::types::{to_js_error, JsPixelBuffer};
use imagelab_core::pipeline::Clock;
use imagelab_core::{OperationKind, Outcome, Pipeline, PipelineConfig, PipelineError, PixelBuffer};
use wasm_bindgen::prelude::*;

/// Wall clock backed by `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> Duration {
        Duration::from_millis(js_sys::Date::now() as u64)
    }
}

/// Session state shared by the JS wrapper and native tests.
struct Session<C: Clock> {
    pipeline: Pipeline<C>,
    last_stages: Vec<PixelBuffer>,
}

impl<C: Clock> Session<C> {
    fn new(config: PipelineConfig, clock: C) -> Result<Self, PipelineError> {
        Ok(Self {
            pipeline: Pipeline::with_clock(config, clock)?,
            last_stages: Vec::new(),
        })
    }

    fn load(&mut self, image: PixelBuffer) {
        self.last_stages.clear();
        self.pipeline.load(image);
    }

    /// Returns false when the operation was debounced.
    fn apply(&mut self, kind: OperationKind) -> Result<bool, PipelineError> {
        match self.pipeline.apply_filter(kind)? {
            Outcome::Applied(output) => {
                self.last_stages = output.stages;
                Ok(true)
            }
            Outcome::Debounced => Ok(false),
        }
    }

    fn undo(&mut self) -> Result<bool, PipelineError> {
        self.last_stages.clear();
        Ok(self.pipeline.undo()? == imagelab_core::Undo::Restored)
    }
}

/// One editing session with undo history.
#[wasm_bindgen]
pub struct JsSession {
    session: Session<JsClock>,
}

#[wasm_bindgen]
impl JsSession {
    /// Create a session. `config` may be `undefined` or a partial
    /// `PipelineConfig` object; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the object does not deserialize or fails validation.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsSession, JsValue> {
        let config: PipelineConfig = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Session::new(config, JsClock)
            .map(|session| JsSession { session })
            .map_err(to_js_error)
    }

    /// Push a decoded image as the current one.
    pub fn load(&mut self, image: &JsPixelBuffer) {
        self.session.load(image.buffer().clone());
    }

    /// Apply an operation such as `{ type: 'crop', from_x: 0, from_y: 0, to_x: 50, to_y: 50 }`.
    ///
    /// Returns `true` when applied and `false` when the request arrived
    /// inside the debounce window.
    ///
    /// # Errors
    /// Returns an error if the operation is malformed, does not fit the
    /// current image, or no image is loaded.
    pub fn apply(&mut self, op: JsValue) -> Result<bool, JsValue> {
        let kind: OperationKind = serde_wasm_bindgen::from_value(op)?;
        let name = kind.name();
        let applied = self.session.apply(kind).map_err(to_js_error)?;
        if !applied {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "imagelab: {name} ignored, previous operation was too recent"
            )));
        }
        Ok(applied)
    }

    /// Step back one image. Returns `false` when only the first image is left.
    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.session.undo().map_err(to_js_error)
    }

    /// The current image, or `undefined` before the first load.
    pub fn current(&self) -> Option<JsPixelBuffer> {
        self.session
            .pipeline
            .current_image()
            .map(JsPixelBuffer::from_shared)
    }

    pub fn is_grayscale(&self) -> bool {
        self.session.pipeline.is_current_grayscale()
    }

    #[wasm_bindgen(getter)]
    pub fn history_len(&self) -> usize {
        self.session.pipeline.history_len()
    }

    /// Intermediate images of the last applied operation, as an array of
    /// `JsPixelBuffer`. Empty after single-step operations, loads and undo.
    pub fn last_stages(&self) -> js_sys::Array {
        self.session
            .last_stages
            .iter()
            .cloned()
            .map(|stage| JsValue::from(JsPixelBuffer::from_buffer(stage)))
            .collect()
    }
}
