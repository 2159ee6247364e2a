//! Decoding of user-selected files into RGBA pixel buffers.

use std::io::Cursor;

use image::ImageReader;

use super::{DecodeError, SourceFormat, SourceImage};

/// Decode an image file from bytes.
///
/// JPEG, PNG, GIF (first frame), WebP and BMP are supported.
///
/// The container format is guessed from the byte signature. `declared_mime`
/// (typically the browser's `File.type`) only decides the [`SourceFormat`] tag
/// attached to the result; when it is absent or empty the sniffed format is used.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` for an empty slice,
/// `DecodeError::InvalidFormat` if the format is unknown or not built in, and
/// `DecodeError::CorruptedFile` if the decoder rejects the data.
pub fn decode(bytes: &[u8], declared_mime: Option<&str>) -> Result<SourceImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode().map_err(|e| match e {
        image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        e => DecodeError::CorruptedFile(e.to_string()),
    })?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    let format = SourceFormat::detect(bytes, declared_mime);
    tracing::debug!(width, height, ?format, "decoded source image");

    Ok(SourceImage::from_rgba_image(img.into_rgba8(), format))
}
