//! Upload session bindings.
//!
//! A `JsUploadSession` belongs to one file input. Each `prepare*` call starts
//! a new invocation and supersedes the previous one, so a slow encode for an
//! old file can never overwrite the result for a newer one.
//!
//! ```typescript
//! const session = new JsUploadSession({ policy: { kind: 'aspect_fit', max_dimension: 242 } });
//!
//! input.onchange = async () => {
//!   const file = input.files[0];
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   try {
//!     const image = await session.prepare(bytes, file.type);
//!     if (image === null) return; // superseded by a newer selection
//!     const upload = new File([image.bytes], image.file_name(file.name), { type: image.mime_type });
//!     preview.src = URL.createObjectURL(upload);
//!   } catch (message) {
//!     error.textContent = message;
//!   }
//! };
//! ```

use fitload_core::{
    prepare_upload_tracked, BitmapEncoder, EncodedResult, ImageCrateEncoder, InvocationTracker,
    Ticket, UploadConfig,
};
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::encode::JsCallbackEncoder;
use crate::types::{config_from_js, JsEncodedImage};

/// Prepares uploads for one file input, discarding superseded results.
#[wasm_bindgen]
pub struct JsUploadSession {
    config: UploadConfig,
    tracker: InvocationTracker,
}

#[wasm_bindgen]
impl JsUploadSession {
    /// Create a session. `config` may be omitted or partial:
    /// `{ policy, budget: { max_bytes, start_quality, min_quality, quality_step }, filter }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsUploadSession, JsValue> {
        Ok(Self::with_config(config_from_js(config)?))
    }

    /// The effective configuration, with defaults filled in.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Resize and encode with the built-in encoder.
    ///
    /// Resolves to a `JsEncodedImage`, or `null` if a newer call superseded
    /// this one. Rejects with a user-facing message on failure.
    pub fn prepare(&self, bytes: Vec<u8>, declared_mime: Option<String>) -> Promise {
        self.spawn(bytes, declared_mime, ImageCrateEncoder)
    }

    /// Like `prepare`, but encodes through `encoder(pixels, width, height,
    /// mime, quality)`, which returns (a Promise of) a `Uint8Array`.
    pub fn prepare_with_encoder(
        &self,
        bytes: Vec<u8>,
        declared_mime: Option<String>,
        encoder: Function,
    ) -> Promise {
        self.spawn(bytes, declared_mime, JsCallbackEncoder::new(encoder))
    }

    /// Supersede any in-flight call without starting a new one, e.g. when the
    /// file input is cleared.
    pub fn cancel(&self) {
        let _ = self.tracker.begin();
    }
}

impl JsUploadSession {
    pub(crate) fn with_config(config: UploadConfig) -> Self {
        Self {
            config,
            tracker: InvocationTracker::new(),
        }
    }

    fn spawn<E>(&self, bytes: Vec<u8>, declared_mime: Option<String>, encoder: E) -> Promise
    where
        E: BitmapEncoder + 'static,
    {
        let ticket = self.tracker.begin();
        let config = self.config;

        future_to_promise(async move {
            let outcome =
                prepare_upload_tracked(&bytes, declared_mime.as_deref(), &config, &encoder, &ticket)
                    .await;
            settle(outcome, &ticket)
        })
    }
}

/// Map a tracked outcome to the Promise's resolution.
fn settle(outcome: Option<EncodedResult>, ticket: &Ticket) -> Result<JsValue, JsValue> {
    match outcome {
        Some(EncodedResult::Success(image)) => Ok(JsEncodedImage::from(image).into()),
        Some(EncodedResult::Failure(reason)) => Err(JsValue::from_str(&reason.to_string())),
        None => {
            web_sys::console::debug_1(&JsValue::from_str(&format!(
                "fitload: discarded result of superseded invocation {}",
                ticket.id()
            )));
            Ok(JsValue::NULL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitload_core::ResizePolicy;

    #[test]
    fn test_session_keeps_config() {
        let config = UploadConfig::new(ResizePolicy::aspect_fit(800), Default::default());
        let session = JsUploadSession::with_config(config);
        assert_eq!(session.config, config);
    }

    #[test]
    fn test_cancel_supersedes_in_flight_ticket() {
        let session = JsUploadSession::with_config(UploadConfig::default());
        let ticket = session.tracker.begin();
        session.cancel();
        assert!(!ticket.is_current());
    }

    /// The future behind `prepare` is the core pipeline; exercise it natively.
    #[test]
    fn test_tracked_pipeline_with_session_tracker() {
        let session = JsUploadSession::with_config(UploadConfig::default());
        let ticket = session.tracker.begin();
        let outcome = futures::executor::block_on(prepare_upload_tracked(
            b"not an image",
            None,
            &session.config,
            &ImageCrateEncoder,
            &ticket,
        ));

        let reason = outcome.unwrap().into_result().unwrap_err();
        assert_eq!(
            reason.to_string(),
            "Could not read image: Invalid or unsupported image format"
        );
    }
}
