//! WASM-compatible wrapper types.
//!
//! Converts between core fitload types and their JavaScript representations.

use fitload_core::encode::{EncodedImage, OutputFormat};
use fitload_core::UploadConfig;
use wasm_bindgen::prelude::*;

/// An encoded upload artifact, as handed back to JavaScript.
///
/// Build a `Blob` from it for preview or upload:
///
/// ```typescript
/// const blob = new Blob([image.bytes], { type: image.mime_type });
/// preview.src = URL.createObjectURL(blob);
/// ```
#[wasm_bindgen]
pub struct JsEncodedImage {
    bytes: Vec<u8>,
    quality: f32,
    format: OutputFormat,
    width: u32,
    height: u32,
    attempts: usize,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// Encoded file bytes as a `Uint8Array`.
    ///
    /// Note: This creates a copy in JavaScript memory.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    /// Quality the bytes were encoded at, in `[0, 1]`.
    ///
    /// Rounded to six decimals so a rung of 0.7 reads as `0.7` in JS.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f64 {
        (f64::from(self.quality) * 1e6).round() / 1e6
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.format.mime_type().to_string()
    }

    /// File extension matching `mime_type`, without the dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.format.extension().to_string()
    }

    /// Upload file name: `stem` with its extension replaced by `extension`.
    pub fn file_name(&self, stem: &str) -> String {
        let stem = match stem.rsplit_once('.') {
            Some((base, _)) if !base.is_empty() => base,
            _ => stem,
        };
        format!("{stem}.{}", self.format.extension())
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of encode calls the search made.
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl From<EncodedImage> for JsEncodedImage {
    fn from(image: EncodedImage) -> Self {
        Self {
            format: image.format,
            quality: image.quality,
            width: image.width,
            height: image.height,
            attempts: image.attempts,
            bytes: image.bytes,
        }
    }
}

/// Read an [`UploadConfig`] from a JS object; `undefined`/`null` give the defaults.
pub(crate) fn config_from_js(value: JsValue) -> Result<UploadConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(UploadConfig::default());
    }
    let config: UploadConfig =
        serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    if config.policy.dimension() == 0 {
        return Err(JsValue::from_str("resize dimension must be positive"));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitload_core::OutputFormat;

    #[test]
    fn test_js_encoded_image_from_core() {
        let image = EncodedImage {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
            quality: 0.7,
            format: OutputFormat::Jpeg,
            width: 242,
            height: 121,
            attempts: 3,
        };

        let js_img = JsEncodedImage::from(image);
        assert_eq!(js_img.byte_count(), 4);
        assert_eq!(js_img.bytes(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert_eq!(js_img.quality(), 0.7);
        assert_eq!(js_img.mime_type(), "image/jpeg");
        assert_eq!(js_img.extension(), "jpg");
        assert_eq!((js_img.width(), js_img.height()), (242, 121));
        assert_eq!(js_img.attempts(), 3);
    }

    #[test]
    fn test_png_mime_type() {
        let image = EncodedImage {
            bytes: vec![],
            quality: 0.9,
            format: OutputFormat::Png,
            width: 1,
            height: 1,
            attempts: 1,
        };
        let js_img = JsEncodedImage::from(image);
        assert_eq!(js_img.mime_type(), "image/png");
        assert_eq!(js_img.extension(), "png");
    }

    #[test]
    fn test_quality_is_exact_in_f64() {
        for (rung, expected) in [(0.9f32, 0.9f64), (0.7, 0.7), (0.3, 0.3), (0.2, 0.2)] {
            let image = EncodedImage {
                bytes: vec![],
                quality: rung,
                format: OutputFormat::Jpeg,
                width: 1,
                height: 1,
                attempts: 1,
            };
            assert_eq!(JsEncodedImage::from(image).quality(), expected);
        }
    }

    #[test]
    fn test_file_name_swaps_extension() {
        let image = EncodedImage {
            bytes: vec![],
            quality: 0.9,
            format: OutputFormat::Jpeg,
            width: 1,
            height: 1,
            attempts: 1,
        };
        let js_img = JsEncodedImage::from(image);
        assert_eq!(js_img.file_name("holiday.heic.png"), "holiday.heic.jpg");
        assert_eq!(js_img.file_name("avatar"), "avatar.jpg");
        assert_eq!(js_img.file_name(".profile"), ".profile.jpg");
    }
}
