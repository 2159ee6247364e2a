//! Target dimension planning.
//!
//! Maps a source size and a [`ResizePolicy`] to the pixel size the image is
//! rendered at before encoding. Pure computation, no allocation.

use serde::{Deserialize, Serialize};

/// How the source image is fitted into the upload footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Force both edges to `dimension`, discarding the source aspect ratio.
    FixedSquare { dimension: u32 },
    /// Shrink so neither edge exceeds `max_dimension`, keeping the aspect
    /// ratio. Never upscales.
    AspectFit { max_dimension: u32 },
}

impl ResizePolicy {
    /// Edge length used by the upload form this crate grew out of.
    pub const DEFAULT_DIMENSION: u32 = 242;

    pub fn fixed_square(dimension: u32) -> Self {
        ResizePolicy::FixedSquare { dimension }
    }

    pub fn aspect_fit(max_dimension: u32) -> Self {
        ResizePolicy::AspectFit { max_dimension }
    }

    /// The configured edge length.
    pub fn dimension(&self) -> u32 {
        match *self {
            ResizePolicy::FixedSquare { dimension } => dimension,
            ResizePolicy::AspectFit { max_dimension } => max_dimension,
        }
    }
}

impl Default for ResizePolicy {
    fn default() -> Self {
        ResizePolicy::FixedSquare {
            dimension: Self::DEFAULT_DIMENSION,
        }
    }
}

/// Pixel size of the rendered bitmap. Both edges are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetDimensions {
    pub width: u32,
    pub height: u32,
}

impl TargetDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Compute the render size for a source image under `policy`.
///
/// Zero source edges or a zero policy dimension are caller bugs; they trip a
/// debug assertion and are clamped to 1 in release builds.
pub fn plan(source_width: u32, source_height: u32, policy: ResizePolicy) -> TargetDimensions {
    debug_assert!(
        source_width > 0 && source_height > 0,
        "source dimensions must be positive"
    );
    debug_assert!(policy.dimension() > 0, "policy dimension must be positive");

    let (width, height) = match policy {
        ResizePolicy::FixedSquare { dimension } => (dimension, dimension),
        ResizePolicy::AspectFit { max_dimension } => {
            calculate_fit_dimensions(source_width, source_height, max_dimension)
        }
    };

    TargetDimensions::new(width.max(1), height.max(1))
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    if width >= height {
        // Landscape or square: constrain by width
        let new_height = (f64::from(height) * f64::from(max_edge) / f64::from(width)).round();
        (max_edge, (new_height as u32).max(1))
    } else {
        // Portrait: constrain by height
        let new_width = (f64::from(width) * f64::from(max_edge) / f64::from(height)).round();
        ((new_width as u32).max(1), max_edge)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
