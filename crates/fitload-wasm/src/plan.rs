//! Dimension planning and format bindings.
//!
//! Useful for sizing a preview before the encode finishes.

use fitload_core::{plan, OutputFormat, ResizePolicy, SourceFormat};
use wasm_bindgen::prelude::*;

/// Compute the upload size for a `width` x `height` source.
///
/// `policy` is `{ kind: "fixed_square", dimension }` or
/// `{ kind: "aspect_fit", max_dimension }`. Returns `{ width, height }`.
///
/// # Errors
///
/// Returns an error if the policy cannot be read or any dimension is zero.
#[wasm_bindgen]
pub fn plan_dimensions(width: u32, height: u32, policy: JsValue) -> Result<JsValue, JsValue> {
    let policy: ResizePolicy =
        serde_wasm_bindgen::from_value(policy).map_err(|e| JsValue::from_str(&e.to_string()))?;
    check_dimensions(width, height, policy).map_err(JsValue::from_str)?;

    serde_wasm_bindgen::to_value(&plan(width, height, policy))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// MIME type the upload will be encoded as.
///
/// PNG files stay PNG; everything else becomes JPEG. `declared_mime` is the
/// `File.type` reported by the browser; when empty the bytes are sniffed.
#[wasm_bindgen]
pub fn output_mime_type(bytes: &[u8], declared_mime: Option<String>) -> String {
    let source = SourceFormat::detect(bytes, declared_mime.as_deref());
    OutputFormat::for_source(source).mime_type().to_string()
}

fn check_dimensions(width: u32, height: u32, policy: ResizePolicy) -> Result<(), &'static str> {
    if width == 0 || height == 0 {
        return Err("source dimensions must be positive");
    }
    if policy.dimension() == 0 {
        return Err("resize dimension must be positive");
    }
    Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use fitload_core::TargetDimensions;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_plan_dimensions_aspect_fit() {
        let policy = serde_wasm_bindgen::to_value(&ResizePolicy::aspect_fit(242)).unwrap();
        let target = plan_dimensions(4000, 2000, policy).unwrap();
        let target: TargetDimensions = serde_wasm_bindgen::from_value(target).unwrap();
        assert_eq!(target, TargetDimensions::new(242, 121));
    }

    #[wasm_bindgen_test]
    fn test_plan_dimensions_rejects_zero() {
        let policy = serde_wasm_bindgen::to_value(&ResizePolicy::fixed_square(242)).unwrap();
        assert!(plan_dimensions(0, 10, policy).is_err());
    }

    #[wasm_bindgen_test]
    fn test_plan_dimensions_rejects_bad_policy() {
        assert!(plan_dimensions(10, 10, JsValue::from_str("square")).is_err());
    }
}
