//! fitload core - upload preprocessing library
//!
//! Shrinks a user-selected image to a bounded pixel size and re-encodes it at
//! decreasing quality until it fits a byte budget, so the upload never needs
//! server-side processing.
//!
//! # Module Structure
//!
//! - `decode` - File decoding and source format detection
//! - `plan` - Target dimension planning (fixed square or aspect fit)
//! - `render` - Resampling into the bitmap handed to the encoder
//! - `encode` - Output format, byte budget, encoders and the quality search
//! - `session` - Tickets for discarding results of superseded invocations
//! - `pipeline` - The whole flow for one file
//!
//! # Example
//!
//! ```ignore
//! use fitload_core::{prepare_upload, ImageCrateEncoder, UploadConfig};
//!
//! let result = prepare_upload(&bytes, Some("image/png"), &UploadConfig::default(), &ImageCrateEncoder).await;
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod pipeline;
pub mod plan;
pub mod render;
pub mod session;

pub use config::UploadConfig;
pub use decode::{decode, DecodeError, FilterType, SourceFormat, SourceImage};
pub use encode::{
    search_quality, BitmapEncoder, EncodeBudget, EncodedImage, EncodedResult, FailureReason,
    ImageCrateEncoder, OutputFormat,
};
pub use pipeline::{prepare_image, prepare_upload, prepare_upload_tracked};
pub use plan::{plan, ResizePolicy, TargetDimensions};
pub use render::{render, Bitmap};
pub use session::{InvocationTracker, Ticket};
