//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@imagelab/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::{to_js_error, JsPixelBuffer};
use imagelab_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG image from bytes.
///
/// Decoding runs on the calling thread; browsers have no `std::thread`.
///
/// # Arguments
///
/// * `bytes` - The raw file bytes as a `Uint8Array`
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are empty
/// - The format is not JPEG or PNG
/// - The file is corrupted or truncated
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(to_js_error)
}
