//! Quality back-off search.
//!
//! Encodes the bitmap at `start_quality`, then at each lower rung of the
//! budget's ladder, and stops at the first encoding that fits. The first fit is
//! returned even if a lower quality would be smaller. Attempts are strictly
//! sequential: each encode is awaited before the next rung is tried.
//!
//! Formats without a quality parameter get a single attempt, since every rung
//! would produce the same bytes.

use std::ops::ControlFlow;

use thiserror::Error;

use super::{BitmapEncoder, EncodeBudget, EncodeError, OutputFormat};
use crate::decode::DecodeError;
use crate::render::Bitmap;
use crate::session::Ticket;

/// A successfully encoded upload artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    /// Quality the bytes were produced at.
    pub quality: f32,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    /// Number of encode calls made, including the successful one.
    pub attempts: usize,
}

impl EncodedImage {
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Why an invocation produced no image. Display text is user-facing.
#[derive(Debug, Error)]
pub enum FailureReason {
    /// Every rung of the quality ladder exceeded the byte ceiling.
    #[error("Unable to reduce file size under {} at minimum quality", format_size(.max_bytes))]
    BudgetUnattainable {
        max_bytes: usize,
        /// Quality of the last (lowest) attempt.
        last_quality: f32,
        /// Size of the last attempt.
        last_byte_count: usize,
        attempts: usize,
    },

    /// The selected file could not be decoded.
    #[error("Could not read image: {0}")]
    Decode(#[from] DecodeError),

    /// The encoder itself failed.
    #[error("Could not encode image: {0}")]
    EncoderFailed(#[from] EncodeError),
}

/// Terminal outcome of one invocation.
#[derive(Debug)]
pub enum EncodedResult {
    Success(EncodedImage),
    Failure(FailureReason),
}

impl EncodedResult {
    pub fn is_success(&self) -> bool {
        matches!(self, EncodedResult::Success(_))
    }

    pub fn success(&self) -> Option<&EncodedImage> {
        match self {
            EncodedResult::Success(image) => Some(image),
            EncodedResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            EncodedResult::Success(_) => None,
            EncodedResult::Failure(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<EncodedImage, FailureReason> {
        match self {
            EncodedResult::Success(image) => Ok(image),
            EncodedResult::Failure(reason) => Err(reason),
        }
    }
}

impl From<FailureReason> for EncodedResult {
    fn from(reason: FailureReason) -> Self {
        EncodedResult::Failure(reason)
    }
}

/// Search for the highest quality on the budget's ladder that fits.
///
/// Never panics or returns early with an error: encoder failures and an
/// exhausted ladder both resolve to [`EncodedResult::Failure`].
pub async fn search_quality<E>(
    bitmap: &Bitmap,
    format: OutputFormat,
    budget: &EncodeBudget,
    encoder: &E,
) -> EncodedResult
where
    E: BitmapEncoder + ?Sized,
{
    let mut state = SearchState::new(budget);

    for quality in rungs(format, budget) {
        if let ControlFlow::Break(result) =
            state.attempt(bitmap, format, budget, encoder, quality).await
        {
            return result;
        }
    }

    state.exhausted(budget)
}

/// Like [`search_quality`], but stops as soon as `ticket` is superseded.
///
/// The ticket is checked before each attempt and again once the encode
/// resolves, so a stale invocation issues no further encodes and its
/// in-flight result is dropped. Returns `None` when superseded.
pub async fn search_quality_tracked<E>(
    bitmap: &Bitmap,
    format: OutputFormat,
    budget: &EncodeBudget,
    encoder: &E,
    ticket: &Ticket,
) -> Option<EncodedResult>
where
    E: BitmapEncoder + ?Sized,
{
    let mut state = SearchState::new(budget);

    for quality in rungs(format, budget) {
        if !ticket.is_current() {
            tracing::debug!(invocation = ticket.id(), "search superseded before attempt");
            return None;
        }
        let step = state.attempt(bitmap, format, budget, encoder, quality).await;
        if !ticket.is_current() {
            tracing::debug!(invocation = ticket.id(), "discarding stale encode result");
            return None;
        }
        if let ControlFlow::Break(result) = step {
            return Some(result);
        }
    }

    Some(state.exhausted(budget))
}

fn rungs(format: OutputFormat, budget: &EncodeBudget) -> impl Iterator<Item = f32> {
    let limit = if format.is_lossy() { usize::MAX } else { 1 };
    budget.ladder().take(limit)
}

struct SearchState {
    attempts: usize,
    last_quality: f32,
    last_byte_count: usize,
}

impl SearchState {
    fn new(budget: &EncodeBudget) -> Self {
        Self {
            attempts: 0,
            last_quality: budget.start_quality(),
            last_byte_count: 0,
        }
    }

    async fn attempt<E>(
        &mut self,
        bitmap: &Bitmap,
        format: OutputFormat,
        budget: &EncodeBudget,
        encoder: &E,
        quality: f32,
    ) -> ControlFlow<EncodedResult>
    where
        E: BitmapEncoder + ?Sized,
    {
        self.attempts += 1;
        self.last_quality = quality;

        let bytes = match encoder.encode(bitmap, format, quality).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(attempt = self.attempts, quality, error = %err, "encoder failed");
                return ControlFlow::Break(FailureReason::EncoderFailed(err).into());
            }
        };

        let byte_count = bytes.len();
        self.last_byte_count = byte_count;
        tracing::debug!(
            attempt = self.attempts,
            quality,
            byte_count,
            max_bytes = budget.max_bytes(),
            "encode attempt"
        );

        if !budget.fits(byte_count) {
            return ControlFlow::Continue(());
        }

        tracing::info!(quality, byte_count, attempts = self.attempts, "encoded within budget");
        ControlFlow::Break(EncodedResult::Success(EncodedImage {
            bytes,
            quality,
            format,
            width: bitmap.width(),
            height: bitmap.height(),
            attempts: self.attempts,
        }))
    }

    fn exhausted(self, budget: &EncodeBudget) -> EncodedResult {
        tracing::warn!(
            attempts = self.attempts,
            last_quality = self.last_quality,
            last_byte_count = self.last_byte_count,
            max_bytes = budget.max_bytes(),
            "budget unattainable"
        );
        FailureReason::BudgetUnattainable {
            max_bytes: budget.max_bytes(),
            last_quality: self.last_quality,
            last_byte_count: self.last_byte_count,
            attempts: self.attempts,
        }
        .into()
    }
}

fn format_size(bytes: &usize) -> String {
    if *bytes >= 1024 && bytes % 1024 == 0 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
