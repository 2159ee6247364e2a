//! Size-budgeted encoding for fitload.
//!
//! This module provides functionality for:
//! - Choosing the output format (PNG stays PNG, everything else becomes JPEG)
//! - Describing the byte budget and the quality ladder it implies
//! - The [`BitmapEncoder`] seam and an `image`-crate implementation
//! - The quality back-off search over that encoder
//!
//! # Examples
//!
//! ```ignore
//! use fitload_core::encode::{search_quality, EncodeBudget, ImageCrateEncoder, OutputFormat};
//!
//! let result = search_quality(&bitmap, OutputFormat::Jpeg, &EncodeBudget::default(), &ImageCrateEncoder).await;
//! match result.into_result() {
//!     Ok(image) => println!("{} bytes at quality {}", image.byte_count(), image.quality),
//!     Err(reason) => eprintln!("{reason}"),
//! }
//! ```

mod budget;
mod codec;
mod format;
mod search;

pub use budget::{BudgetError, EncodeBudget, QualityLadder};
pub use codec::{encode_jpeg, encode_png, jpeg_quality, BitmapEncoder, EncodeError, ImageCrateEncoder};
pub use format::OutputFormat;
pub use search::{search_quality, search_quality_tracked, EncodedImage, EncodedResult, FailureReason};
