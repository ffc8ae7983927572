// Preview data model shared by the sending and receiving sides
use crate::domain::PreviewKind;
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Renderable previews for a transfer, one optional slot per kind.
///
/// Slots are independent: a set that sees several files can hold several
/// populated slots. Values are data URIs, object URLs, or decoded text
/// depending on which side produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilePreviewSet {
    pub image: Option<String>,
    pub video: Option<String>,
    pub audio: Option<String>,
    pub pdf: Option<String>,
    pub text: Option<String>,
}

impl FilePreviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, kind: PreviewKind) -> Option<&str> {
        match kind {
            PreviewKind::Image => self.image.as_deref(),
            PreviewKind::Video => self.video.as_deref(),
            PreviewKind::Audio => self.audio.as_deref(),
            PreviewKind::Pdf => self.pdf.as_deref(),
            PreviewKind::Text => self.text.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, kind: PreviewKind) -> &mut Option<String> {
        match kind {
            PreviewKind::Image => &mut self.image,
            PreviewKind::Video => &mut self.video,
            PreviewKind::Audio => &mut self.audio,
            PreviewKind::Pdf => &mut self.pdf,
            PreviewKind::Text => &mut self.text,
        }
    }

    /// Stores `value` in the slot for `kind`, replacing what was there.
    pub fn set(&mut self, kind: PreviewKind, value: String) {
        *self.slot_mut(kind) = Some(value);
    }

    /// Kinds whose slots hold a value, in declaration order.
    pub fn populated(&self) -> Vec<PreviewKind> {
        [
            PreviewKind::Image,
            PreviewKind::Video,
            PreviewKind::Audio,
            PreviewKind::Pdf,
            PreviewKind::Text,
        ]
        .into_iter()
        .filter(|kind| self.slot(*kind).is_some())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.populated().is_empty()
    }
}

/// Observable handle to a [`FilePreviewSet`].
///
/// Classifiers write through [`SharedPreviews::update`]; the presentation
/// layer either reads a snapshot or subscribes to be woken on each change.
#[derive(Debug, Clone)]
pub struct SharedPreviews {
    tx: Arc<watch::Sender<FilePreviewSet>>,
}

impl SharedPreviews {
    pub fn new() -> Self {
        Self::from_set(FilePreviewSet::default())
    }

    pub fn from_set(set: FilePreviewSet) -> Self {
        let (tx, _rx) = watch::channel(set);
        Self { tx: Arc::new(tx) }
    }

    /// Current contents.
    pub fn snapshot(&self) -> FilePreviewSet {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilePreviewSet> {
        self.tx.subscribe()
    }

    /// Fills one slot and notifies subscribers.
    pub fn update(&self, kind: PreviewKind, value: String) {
        self.tx.send_modify(|set| set.set(kind, value));
    }
}

impl Default for SharedPreviews {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes content as a self-contained `data:` URI.
pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    let media_type = if media_type.is_empty() {
        "application/octet-stream"
    } else {
        media_type
    };
    format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Decodes text content for the text slot.
///
/// Defaults to UTF-8, but a leading byte-order mark selects UTF-8, UTF-16LE
/// or UTF-16BE and is stripped. Malformed sequences become U+FFFD.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "replaced malformed text sequences");
    }
    text.into_owned()
}
