//! The encode primitive and its `image`-crate implementation.
//!
//! The quality search treats encoding as a black box: bitmap, format and
//! quality in, bytes out, possibly asynchronously. [`BitmapEncoder`] is that
//! seam. [`ImageCrateEncoder`] implements it in-process; the WASM bindings
//! provide another implementation backed by the browser's canvas encoder.

use std::future::Future;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use super::OutputFormat;
use crate::render::Bitmap;

/// Errors that can occur while encoding a bitmap.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// An encoder the quality search can drive.
///
/// Calls are awaited one at a time; an implementation never sees two
/// overlapping requests from the same search.
pub trait BitmapEncoder {
    /// Encode `bitmap` as `format`. `quality` is in `[0, 1]` and is ignored by
    /// formats without a quality parameter.
    fn encode(
        &self,
        bitmap: &Bitmap,
        format: OutputFormat,
        quality: f32,
    ) -> impl Future<Output = Result<Vec<u8>, EncodeError>>;
}

/// In-process encoder built on the `image` crate.
///
/// Resolves immediately. JPEG output drops the alpha channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateEncoder;

impl ImageCrateEncoder {
    /// Synchronous form of [`BitmapEncoder::encode`].
    pub fn encode_now(
        &self,
        bitmap: &Bitmap,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        match format {
            OutputFormat::Jpeg => encode_jpeg(
                &bitmap.to_rgb(),
                bitmap.width(),
                bitmap.height(),
                jpeg_quality(quality),
            ),
            OutputFormat::Png => encode_png(bitmap.pixels(), bitmap.width(), bitmap.height()),
        }
    }
}

impl BitmapEncoder for ImageCrateEncoder {
    fn encode(
        &self,
        bitmap: &Bitmap,
        format: OutputFormat,
        quality: f32,
    ) -> impl Future<Output = Result<Vec<u8>, EncodeError>> {
        std::future::ready(self.encode_now(bitmap, format, quality))
    }
}

/// Map a `[0, 1]` quality to the JPEG encoder's 1-100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    if quality.is_nan() {
        return 1;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, clamped)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height, 3)?;

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height, 4)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn validate(pixels: &[u8], width: u32, height: u32, channels: usize) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * channels;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Any valid bitmap encodes to a JPEG with SOI/EOI markers.
        #[test]
        fn prop_valid_bitmap_produces_valid_jpeg(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 0.0f32..=1.0,
        ) {
            let bitmap = Bitmap::from_rgba(width, height, vec![128u8; (width * height * 4) as usize]).unwrap();
            let jpeg = ImageCrateEncoder.encode_now(&bitmap, OutputFormat::Jpeg, quality).unwrap();

            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            let len = jpeg.len();
            prop_assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
        }

        /// Property: The quality mapping always lands in 1..=100.
        #[test]
        fn prop_jpeg_quality_in_range(quality in proptest::num::f32::ANY) {
            let q = jpeg_quality(quality);
            prop_assert!((1..=100).contains(&q));
        }

        /// Property: Same input always produces same output.
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 0.0f32..=1.0,
        ) {
            let bitmap = Bitmap::from_rgba(width, height, vec![100u8; (width * height * 4) as usize]).unwrap();
            let a = ImageCrateEncoder.encode_now(&bitmap, OutputFormat::Jpeg, quality).unwrap();
            let b = ImageCrateEncoder.encode_now(&bitmap, OutputFormat::Jpeg, quality).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
