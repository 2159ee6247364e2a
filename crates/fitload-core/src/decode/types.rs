//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Empty input: no image data")]
    EmptyInput,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoder produced an image with a zero-length edge.
    #[error("Decoded image has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Format of the file the user picked, as far as the pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceFormat {
    Jpeg,
    Png,
    /// Anything else the decoder accepts (GIF, WebP, BMP).
    #[default]
    Other,
}

impl SourceFormat {
    /// Map a declared MIME type (e.g. a browser `File.type`) to a source format.
    ///
    /// Matching is case-insensitive and ignores MIME parameters.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case("image/png") {
            SourceFormat::Png
        } else if essence.eq_ignore_ascii_case("image/jpeg")
            || essence.eq_ignore_ascii_case("image/jpg")
        {
            SourceFormat::Jpeg
        } else {
            SourceFormat::Other
        }
    }

    /// Sniff the format from the leading bytes of a file.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Png) => SourceFormat::Png,
            Ok(image::ImageFormat::Jpeg) => SourceFormat::Jpeg,
            _ => SourceFormat::Other,
        }
    }

    /// Resolve the format, preferring a non-empty declared MIME type over sniffing.
    pub fn detect(bytes: &[u8], declared_mime: Option<&str>) -> Self {
        match declared_mime.map(str::trim) {
            Some(mime) if !mime.is_empty() => Self::from_mime(mime),
            _ => Self::from_bytes(bytes),
        }
    }
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// A decoded source image with RGBA pixel data.
///
/// Owned by the caller. The pipeline only reads its dimensions and pixels.
/// The buffer always holds exactly `width * height * 4` bytes.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: image::RgbaImage,
    format: SourceFormat,
}

impl SourceImage {
    /// Create a SourceImage from dimensions and RGBA pixel data.
    ///
    /// Returns `None` if `pixels` is not exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, format: SourceFormat) -> Option<Self> {
        let image = image::RgbaImage::from_raw(width, height, pixels)?;
        if image.as_raw().len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { image, format })
    }

    /// Create a SourceImage from an image::RgbaImage.
    pub fn from_rgba_image(image: image::RgbaImage, format: SourceFormat) -> Self {
        Self { image, format }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// RGBA pixel data in row-major order.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn as_rgba_image(&self) -> &image::RgbaImage {
        &self.image
    }
}
