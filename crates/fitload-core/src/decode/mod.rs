//! Image decoding for fitload.
//!
//! This module provides functionality for:
//! - Decoding user-selected files (JPEG, PNG, GIF, WebP, BMP) into RGBA pixel
//!   buffers
//! - Classifying the source format from a declared MIME type or byte signature
//!
//! # Examples
//!
//! ```ignore
//! use fitload_core::decode::decode;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let image = decode(&bytes, Some("image/png")).unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod reader;
mod types;

pub use reader::decode;
pub use types::{DecodeError, FilterType, SourceFormat, SourceImage};
