//! Dropview - file previews for peer-to-peer file sharing
//!
//! This crate builds renderable previews on both sides of a transfer: the
//! sender previews a local file before it goes out, and the receiver rebuilds
//! an equivalent preview from the bytes (or reference) that arrived. It also
//! carries the decoded connection token between the QR scanner and the
//! receive flow, and formats byte counts for display.

pub mod blob;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod handoff;
pub mod preview;
pub mod receiver;
pub mod sender;
pub mod size;

// Re-export primary types for convenience
pub use blob::{Blob, BlobInfo, BlobStore, ObjectUrl};
pub use config::UserConfig;
pub use domain::{LocalFile, Payload, PreviewKind, Received};
pub use error::{PreviewError, Result};
pub use handoff::HandoffCell;
pub use preview::{decode_text, encode_data_uri, FilePreviewSet, SharedPreviews};
pub use receiver::classify_for_receiver;
pub use sender::{classify_for_sender, preview_for_sender};
pub use size::{format_file_size, parse_size};
