//! Browser-backed encode primitive.
//!
//! Lets the quality search drive the platform's own encoder (typically
//! `OffscreenCanvas.convertToBlob` or `HTMLCanvasElement.toBlob`) through a
//! JavaScript callback:
//!
//! ```typescript
//! async function encode(pixels: Uint8Array, width: number, height: number,
//!                       mime: string, quality: number): Promise<Uint8Array> {
//!   const canvas = new OffscreenCanvas(width, height);
//!   const ctx = canvas.getContext('2d')!;
//!   ctx.putImageData(new ImageData(new Uint8ClampedArray(pixels), width, height), 0, 0);
//!   const blob = await canvas.convertToBlob({ type: mime, quality });
//!   return new Uint8Array(await blob.arrayBuffer());
//! }
//! ```
//!
//! The callback may return the bytes directly or a Promise of them.

use fitload_core::encode::{BitmapEncoder, EncodeError, OutputFormat};
use fitload_core::render::Bitmap;
use js_sys::{Array, Function, Promise, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// [`BitmapEncoder`] that calls a JavaScript function.
///
/// The callback receives RGBA pixels, width, height, the output MIME type and
/// a quality in `[0, 1]`.
pub(crate) struct JsCallbackEncoder {
    callback: Function,
}

impl JsCallbackEncoder {
    pub(crate) fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl BitmapEncoder for JsCallbackEncoder {
    async fn encode(
        &self,
        bitmap: &Bitmap,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        let failed = |message: String| EncodeError::EncodingFailed { format, message };

        let args = Array::of5(
            &Uint8Array::from(bitmap.pixels()),
            &JsValue::from(bitmap.width()),
            &JsValue::from(bitmap.height()),
            &JsValue::from_str(format.mime_type()),
            &JsValue::from(quality),
        );
        let returned = self
            .callback
            .apply(&JsValue::NULL, &args)
            .map_err(|e| failed(describe(&e)))?;

        let resolved = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| failed(describe(&e)))?;

        let bytes = resolved
            .dyn_into::<Uint8Array>()
            .map_err(|_| failed("encoder callback did not resolve to a Uint8Array".to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// Best-effort text for a thrown JavaScript value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}
