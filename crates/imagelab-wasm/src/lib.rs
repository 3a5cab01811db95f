//! imagelab WASM - WebAssembly bindings for imagelab
//!
//! This crate provides WASM bindings to expose the imagelab-core pipeline
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG, PNG)
//! - `session` - Editing session with operations and undo
//! - `histogram` - Channel histograms of an image
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsSession } from '@imagelab/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const session = new JsSession();
//! session.load(decode_image(bytes));
//! session.apply({ type: 'rgb_to_gray' });
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod histogram;
mod session;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use histogram::{compute_histogram, JsHistogram};
pub use session::{JsClock, JsSession};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
