//! Output format selection.

use serde::{Deserialize, Serialize};

use crate::decode::SourceFormat;

/// Encoding used for the upload artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// PNG sources stay PNG; everything else is re-encoded as JPEG so the
    /// quality search has a parameter to work with.
    pub fn for_source(source: SourceFormat) -> Self {
        match source {
            SourceFormat::Png => OutputFormat::Png,
            SourceFormat::Jpeg | SourceFormat::Other => OutputFormat::Jpeg,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether the encoder honours a quality parameter.
    #[inline]
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_stays_png() {
        assert_eq!(OutputFormat::for_source(SourceFormat::Png), OutputFormat::Png);
    }

    #[test]
    fn test_everything_else_becomes_jpeg() {
        assert_eq!(OutputFormat::for_source(SourceFormat::Jpeg), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::for_source(SourceFormat::Other), OutputFormat::Jpeg);
    }

    #[test]
    fn test_mime_and_extension() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn test_only_jpeg_is_lossy() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
    }
}
