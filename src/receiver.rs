//! Receiver-side previews, rebuilt from what arrived over the transport.

use crate::blob::{BlobStore, ObjectUrl};
use crate::domain::{PreviewKind, Received};
use crate::error::Result;
use crate::preview::{decode_text, SharedPreviews};

/// Fills the matching slot in `previews` from received content.
///
/// Media and PDFs get an object URL backed by the payload bytes; the handle is
/// returned and the caller owns its release. Text is decoded off the async
/// executor, and the slot is only set once this future completes.
///
/// A [`Received::Reference`] or an unsupported media type leaves `previews`
/// untouched and returns `Ok(None)`.
pub async fn classify_for_receiver(
    input: Received,
    previews: &SharedPreviews,
    blobs: &BlobStore,
) -> Result<Option<ObjectUrl>> {
    let payload = match input {
        Received::Payload(payload) => payload,
        Received::Reference(reference) => {
            tracing::debug!(reference = %reference, "received a reference, nothing to preview");
            return Ok(None);
        }
    };

    let Some(kind) = PreviewKind::classify(&payload.media_type) else {
        tracing::debug!(media_type = %payload.media_type, "no preview for media type");
        return Ok(None);
    };

    let size = payload.bytes.len();

    if kind.is_textual() {
        let bytes = payload.bytes;
        let text = tokio::task::spawn_blocking(move || decode_text(&bytes)).await?;
        previews.update(kind, text);
        tracing::info!(
            media_type = %payload.media_type,
            %kind,
            bytes = size,
            "receiver preview ready"
        );
        return Ok(None);
    }

    let handle = blobs.create(payload.media_type.clone(), payload.bytes);
    previews.update(kind, handle.url().to_string());
    tracing::info!(
        media_type = %payload.media_type,
        %kind,
        bytes = size,
        url = %handle,
        "receiver preview ready"
    );

    Ok(Some(handle))
}
