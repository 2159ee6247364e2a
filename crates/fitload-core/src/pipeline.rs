//! End-to-end preparation of one upload.
//!
//! decode → choose output format → plan → render → quality search.
//!
//! Every path resolves to exactly one [`EncodedResult`]; decode failures are
//! reported as [`FailureReason::Decode`] rather than returned as `Err`. The
//! rendered bitmap lives only for the duration of the call.

use crate::config::UploadConfig;
use crate::decode::{decode, SourceImage};
use crate::encode::{
    search_quality, search_quality_tracked, BitmapEncoder, EncodedResult, FailureReason,
    OutputFormat,
};
use crate::plan::plan;
use crate::render::{render, Bitmap};
use crate::session::Ticket;

/// Decode `bytes` and produce an upload artifact within the configured budget.
///
/// `declared_mime` is the type reported by the file picker, if any; it
/// decides between PNG and JPEG output.
pub async fn prepare_upload<E>(
    bytes: &[u8],
    declared_mime: Option<&str>,
    config: &UploadConfig,
    encoder: &E,
) -> EncodedResult
where
    E: BitmapEncoder + ?Sized,
{
    match decode(bytes, declared_mime) {
        Ok(source) => prepare_image(&source, config, encoder).await,
        Err(err) => {
            tracing::warn!(error = %err, "could not decode selected file");
            FailureReason::Decode(err).into()
        }
    }
}

/// Resize and encode an already decoded image.
pub async fn prepare_image<E>(
    source: &SourceImage,
    config: &UploadConfig,
    encoder: &E,
) -> EncodedResult
where
    E: BitmapEncoder + ?Sized,
{
    let (format, bitmap) = rasterize(source, config);
    search_quality(&bitmap, format, &config.budget, encoder).await
}

/// [`prepare_upload`] for an invocation that may be superseded.
///
/// Returns `None` if `ticket` goes stale at any point, including after a
/// decode failure: a superseded invocation reports nothing.
pub async fn prepare_upload_tracked<E>(
    bytes: &[u8],
    declared_mime: Option<&str>,
    config: &UploadConfig,
    encoder: &E,
    ticket: &Ticket,
) -> Option<EncodedResult>
where
    E: BitmapEncoder + ?Sized,
{
    let source = match decode(bytes, declared_mime) {
        Ok(source) => source,
        Err(err) => return ticket.accept(FailureReason::Decode(err).into()),
    };
    if !ticket.is_current() {
        return None;
    }

    let (format, bitmap) = rasterize(&source, config);
    drop(source);

    search_quality_tracked(&bitmap, format, &config.budget, encoder, ticket).await
}

fn rasterize(source: &SourceImage, config: &UploadConfig) -> (OutputFormat, Bitmap) {
    let format = OutputFormat::for_source(source.format());
    let target = plan(source.width(), source.height(), config.policy);
    tracing::debug!(
        source_width = source.width(),
        source_height = source.height(),
        target_width = target.width,
        target_height = target.height,
        ?format,
        "planned upload"
    );
    (format, render(source, target, config.filter))
}
