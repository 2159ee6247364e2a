//! Rendering a source image into a bitmap at the planned size.
//!
//! The [`Bitmap`] is the off-screen surface handed to the encoder. Each
//! invocation renders its own and drops it when the result is produced, so
//! nothing is pooled between invocations.

use crate::decode::{FilterType, SourceImage};
use crate::plan::TargetDimensions;

/// RGBA8 pixel buffer at exactly the planned dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap an RGBA buffer. Returns `None` if the length does not match.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> TargetDimensions {
        TargetDimensions::new(self.width, self.height)
    }

    /// RGBA pixel data in row-major order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel data with the alpha channel dropped, for encoders without alpha.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

/// Resample `source` to exactly `target`.
///
/// The aspect ratio is whatever `target` says; call [`crate::plan::plan`] first.
/// A target equal to the source size copies the pixels without resampling.
pub fn render(source: &SourceImage, target: TargetDimensions, filter: FilterType) -> Bitmap {
    let (src_width, src_height) = source.dimensions();
    let (width, height) = (target.width.max(1), target.height.max(1));

    if src_width == width && src_height == height {
        return Bitmap {
            width,
            height,
            pixels: source.pixels().to_vec(),
        };
    }

    let resized = image::imageops::resize(
        source.as_rgba_image(),
        width,
        height,
        filter.to_image_filter(),
    );
    tracing::debug!(src_width, src_height, width, height, ?filter, "rendered bitmap");

    Bitmap {
        width,
        height,
        pixels: resized.into_raw(),
    }
}
