//! Histogram computation WASM bindings.

use crate::types::JsPixelBuffer;
use imagelab_core::histogram::{compute_histogram as compute_histogram_core, Histogram};
use wasm_bindgen::prelude::*;

/// Histogram result accessible from JavaScript.
///
/// Contains 256-bin histograms for red, green, blue, and gray channels.
#[wasm_bindgen]
pub struct JsHistogram {
    inner: Histogram,
}

#[wasm_bindgen]
impl JsHistogram {
    /// Get red channel histogram (256 bins).
    pub fn red(&self) -> Vec<u32> {
        self.inner.red.to_vec()
    }

    /// Get green channel histogram (256 bins).
    pub fn green(&self) -> Vec<u32> {
        self.inner.green.to_vec()
    }

    /// Get blue channel histogram (256 bins).
    pub fn blue(&self) -> Vec<u32> {
        self.inner.blue.to_vec()
    }

    /// Get histogram of the channel average (256 bins).
    pub fn gray(&self) -> Vec<u32> {
        self.inner.gray.to_vec()
    }
}

/// Compute the histogram of an image.
///
/// # Example (TypeScript)
/// ```typescript
/// const hist = compute_histogram(session.current());
/// const redBins = hist.red();        // Uint32Array[256]
/// hist.free();
/// ```
#[wasm_bindgen]
pub fn compute_histogram(image: &JsPixelBuffer) -> JsHistogram {
    JsHistogram {
        inner: compute_histogram_core(image.buffer()),
    }
}
