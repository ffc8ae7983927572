use bytes::Bytes;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The preview slot a file's content lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Image,
    Video,
    Audio,
    Pdf,
    Text,
}

impl PreviewKind {
    /// Picks a slot from a declared media type. First match wins; `None`
    /// means the type has no preview and the caller should do nothing.
    pub fn classify(media_type: &str) -> Option<Self> {
        if media_type.starts_with("image") {
            Some(PreviewKind::Image)
        } else if media_type.starts_with("video") {
            Some(PreviewKind::Video)
        } else if media_type.starts_with("audio") {
            Some(PreviewKind::Audio)
        } else if media_type == "application/pdf" {
            Some(PreviewKind::Pdf)
        } else if media_type.starts_with("text") || media_type.starts_with("application/json") {
            Some(PreviewKind::Text)
        } else {
            None
        }
    }

    /// Whether content of this kind is stored as decoded text rather than a
    /// renderable reference.
    pub fn is_textual(self) -> bool {
        matches!(self, PreviewKind::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PreviewKind::Image => "image",
            PreviewKind::Video => "video",
            PreviewKind::Audio => "audio",
            PreviewKind::Pdf => "pdf",
            PreviewKind::Text => "text",
        }
    }
}

impl std::fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guesses a media type from a file extension. Empty when unknown.
pub fn guess_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default()
}

/// A file selected on the sending side, before any of it has been read.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    /// Declared media type. Empty when it could not be determined.
    pub media_type: String,
}

impl LocalFile {
    /// Builds a handle from a path, guessing the media type from the extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Not a file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(LocalFile {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            media_type: guess_media_type(path),
        })
    }

    /// Replaces the guessed media type with an explicit one.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn preview_kind(&self) -> Option<PreviewKind> {
        PreviewKind::classify(&self.media_type)
    }
}

/// Bytes that arrived from a peer, with the media type they were declared as.
#[derive(Debug, Clone)]
pub struct Payload {
    pub media_type: String,
    pub bytes: Bytes,
}

impl Payload {
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// What the transport hands to the receiving side.
#[derive(Debug, Clone)]
pub enum Received {
    /// Decodable content.
    Payload(Payload),
    /// A reference to content held elsewhere; nothing to preview locally.
    Reference(String),
}

impl From<Payload> for Received {
    fn from(payload: Payload) -> Self {
        Received::Payload(payload)
    }
}

impl From<String> for Received {
    fn from(reference: String) -> Self {
        Received::Reference(reference)
    }
}
