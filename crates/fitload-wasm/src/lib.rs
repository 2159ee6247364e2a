//! fitload WASM - WebAssembly bindings for fitload
//!
//! Exposes the fitload-core upload pipeline to browser code: planning the
//! upload size, resizing, and the quality search that keeps the encoded file
//! under a byte budget.
//!
//! # Module Structure
//!
//! - `plan` - Dimension planning and output format detection
//! - `session` - Upload sessions that run the pipeline and drop stale results
//! - `encode` - Encoder backed by a JavaScript callback (e.g. a canvas)
//! - `types` - WASM-compatible wrapper types for results and config
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsUploadSession, plan_dimensions } from '@fitload/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsUploadSession({ budget: { max_bytes: 250 * 1024 } });
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = await session.prepare(bytes, file.type);
//! if (image) {
//!   console.log(`${image.width}x${image.height}, ${image.byte_count} bytes at q=${image.quality}`);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod plan;
mod session;
mod types;

// Re-export public types
pub use plan::{output_mime_type, plan_dimensions};
pub use session::JsUploadSession;
pub use types::JsEncodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
        assert!(!version().is_empty());
    }
}
