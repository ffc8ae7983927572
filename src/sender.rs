//! Sender-side previews, built from a local file before it is transmitted.

use crate::domain::{LocalFile, PreviewKind};
use crate::error::Result;
use crate::preview::{decode_text, encode_data_uri, SharedPreviews};
use tokio::task::JoinHandle;

/// Reads `file` and computes the value for its preview slot.
///
/// Text-like files are decoded as UTF-8 unless a byte-order mark says
/// otherwise, with invalid sequences replaced.
/// Everything else becomes a data URI, since the sender has no URL the
/// preview surface could load from. Returns `Ok(None)` without reading
/// anything when the media type has no preview.
pub async fn preview_for_sender(file: &LocalFile) -> Result<Option<(PreviewKind, String)>> {
    let Some(kind) = file.preview_kind() else {
        tracing::debug!(
            file = %file.name,
            media_type = %file.media_type,
            "no preview for media type"
        );
        return Ok(None);
    };

    let bytes = tokio::fs::read(&file.path).await?;

    let value = if kind.is_textual() {
        decode_text(&bytes)
    } else {
        encode_data_uri(&file.media_type, &bytes)
    };

    Ok(Some((kind, value)))
}

/// Starts building the preview for `file` and returns immediately.
///
/// The slot in `previews` is filled once the read finishes; subscribe to
/// `previews` to be told when. The handle can be dropped if the caller does
/// not care about failures, which are also logged. A failed read leaves the
/// set untouched.
///
/// Must be called from within a tokio runtime.
pub fn classify_for_sender(file: LocalFile, previews: &SharedPreviews) -> JoinHandle<Result<()>> {
    let previews = previews.clone();

    tokio::spawn(async move {
        match preview_for_sender(&file).await {
            Ok(Some((kind, value))) => {
                tracing::info!(
                    file = %file.name,
                    media_type = %file.media_type,
                    %kind,
                    bytes = file.size,
                    "sender preview ready"
                );
                previews.update(kind, value);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    file = %file.name,
                    path = %file.path.display(),
                    error = %e,
                    "failed to read file for preview"
                );
                Err(e)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn create_local_file(dir: &Path, name: &str, content: &[u8], media_type: &str) -> LocalFile {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        LocalFile {
            path,
            name: name.to_string(),
            size: content.len() as u64,
            media_type: media_type.to_string(),
        }
    }

    mod preview_value_tests {
        use super::*;

        #[tokio::test]
        async fn test_text_is_stored_verbatim() {
            let temp_dir = TempDir::new().unwrap();
            let file = create_local_file(temp_dir.path(), "a.txt", b"line 1\nline 2", "text/plain");

            let (kind, value) = preview_for_sender(&file).await.unwrap().unwrap();
            assert_eq!(kind, PreviewKind::Text);
            assert_eq!(value, "line 1\nline 2");
        }

        #[tokio::test]
        async fn test_json_is_stored_as_text() {
            let temp_dir = TempDir::new().unwrap();
            let file = create_local_file(
                temp_dir.path(),
                "data.json",
                br#"{"a":1}"#,
                "application/json",
            );

            let (kind, value) = preview_for_sender(&file).await.unwrap().unwrap();
            assert_eq!(kind, PreviewKind::Text);
            assert_eq!(value, r#"{"a":1}"#);
        }

        #[tokio::test]
        async fn test_invalid_utf8_is_replaced() {
            let temp_dir = TempDir::new().unwrap();
            let file = create_local_file(temp_dir.path(), "bad.txt", b"ok\xffok", "text/plain");

            let (_, value) = preview_for_sender(&file).await.unwrap().unwrap();
            assert_eq!(value, "ok\u{FFFD}ok");
        }

        #[tokio::test]
        async fn test_utf8_bom_is_stripped() {
            let temp_dir = TempDir::new().unwrap();
            let file =
                create_local_file(temp_dir.path(), "bom.txt", b"\xEF\xBB\xBFhello", "text/plain");

            let (_, value) = preview_for_sender(&file).await.unwrap().unwrap();
            assert_eq!(value, "hello");
        }

        #[tokio::test]
        async fn test_utf16le_bom_is_decoded() {
            let temp_dir = TempDir::new().unwrap();
            let file =
                create_local_file(temp_dir.path(), "wide.txt", b"\xFF\xFEh\x00i\x00", "text/plain");

            let (_, value) = preview_for_sender(&file).await.unwrap().unwrap();
            assert_eq!(value, "hi");
        }

        #[tokio::test]
        async fn test_media_becomes_data_uri() {
            let temp_dir = TempDir::new().unwrap();
            let file = create_local_file(temp_dir.path(), "p.png", b"hello", "image/png");

            let (kind, value) = preview_for_sender(&file).await.unwrap().unwrap();
            assert_eq!(kind, PreviewKind::Image);
            assert_eq!(value, "data:image/png;base64,aGVsbG8=");
        }

        #[tokio::test]
        async fn test_unmatched_type_skips_read() {
            // The path does not exist; a read would fail
            let file = LocalFile {
                path: PathBuf::from("/nonexistent/archive.bin"),
                name: "archive.bin".to_string(),
                size: 0,
                media_type: "application/octet-stream".to_string(),
            };

            assert!(preview_for_sender(&file).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_missing_file_is_io_error() {
            let file = LocalFile {
                path: PathBuf::from("/nonexistent/photo.png"),
                name: "photo.png".to_string(),
                size: 0,
                media_type: "image/png".to_string(),
            };

            let result = preview_for_sender(&file).await;
            assert!(matches!(result, Err(PreviewError::Io(_))));
        }
    }

    mod classify_tests {
        use super::*;

        #[tokio::test]
        async fn test_each_media_type_fills_expected_slot() {
            let temp_dir = TempDir::new().unwrap();
            let cases = [
                ("image/png", Some(PreviewKind::Image)),
                ("video/mp4", Some(PreviewKind::Video)),
                ("audio/mpeg", Some(PreviewKind::Audio)),
                ("application/pdf", Some(PreviewKind::Pdf)),
                ("text/plain", Some(PreviewKind::Text)),
                ("application/json", Some(PreviewKind::Text)),
                ("application/octet-stream", None),
            ];

            for (i, (media_type, expected)) in cases.into_iter().enumerate() {
                let file =
                    create_local_file(temp_dir.path(), &format!("f{}", i), b"{}", media_type);
                let previews = SharedPreviews::new();

                classify_for_sender(file, &previews).await.unwrap().unwrap();

                let populated = previews.snapshot().populated();
                match expected {
                    Some(kind) => assert_eq!(populated, vec![kind], "{}", media_type),
                    None => assert!(populated.is_empty(), "{}", media_type),
                }
            }
        }

        #[tokio::test]
        async fn test_subscriber_sees_completion() {
            let temp_dir = TempDir::new().unwrap();
            let file = create_local_file(temp_dir.path(), "clip.mp3", b"ID3", "audio/mpeg");
            let previews = SharedPreviews::new();
            let mut rx = previews.subscribe();

            // Fire and forget
            drop(classify_for_sender(file, &previews));

            rx.changed().await.unwrap();
            assert_eq!(
                rx.borrow().audio.as_deref(),
                Some("data:audio/mpeg;base64,SUQz")
            );
        }

        #[tokio::test]
        async fn test_read_failure_leaves_set_untouched() {
            let file = LocalFile {
                path: PathBuf::from("/nonexistent/movie.mp4"),
                name: "movie.mp4".to_string(),
                size: 0,
                media_type: "video/mp4".to_string(),
            };
            let previews = SharedPreviews::new();

            let result = classify_for_sender(file, &previews).await.unwrap();
            assert!(result.is_err());
            assert!(previews.snapshot().is_empty());
        }

        #[tokio::test]
        async fn test_repeated_classification_is_identical() {
            let temp_dir = TempDir::new().unwrap();
            let file = create_local_file(temp_dir.path(), "doc.pdf", b"%PDF-1.4", "application/pdf");

            let first = SharedPreviews::new();
            classify_for_sender(file.clone(), &first).await.unwrap().unwrap();
            let second = SharedPreviews::new();
            classify_for_sender(file, &second).await.unwrap().unwrap();

            assert_eq!(first.snapshot(), second.snapshot());
            assert!(first.snapshot().pdf.is_some());
        }

        #[tokio::test]
        async fn test_concurrent_classifications_share_one_set() {
            let temp_dir = TempDir::new().unwrap();
            let image = create_local_file(temp_dir.path(), "i.png", b"img", "image/png");
            let text = create_local_file(temp_dir.path(), "t.txt", b"txt", "text/plain");
            let previews = SharedPreviews::new();

            let a = classify_for_sender(image, &previews);
            let b = classify_for_sender(text, &previews);
            a.await.unwrap().unwrap();
            b.await.unwrap().unwrap();

            let set = previews.snapshot();
            assert_eq!(set.populated(), vec![PreviewKind::Image, PreviewKind::Text]);
            assert_eq!(set.text.as_deref(), Some("txt"));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
        async fn test_racing_writes_to_one_slot_keep_one_value() {
            let temp_dir = TempDir::new().unwrap();
            let first = create_local_file(temp_dir.path(), "a.png", b"first", "image/png");
            let second = create_local_file(temp_dir.path(), "b.gif", b"second", "image/gif");
            let previews = SharedPreviews::new();

            let a = classify_for_sender(first, &previews);
            let b = classify_for_sender(second, &previews);
            a.await.unwrap().unwrap();
            b.await.unwrap().unwrap();

            let set = previews.snapshot();
            assert_eq!(set.populated(), vec![PreviewKind::Image]);
            let image = set.image.unwrap();
            assert!(
                image == "data:image/png;base64,Zmlyc3Q="
                    || image == "data:image/gif;base64,c2Vjb25k",
                "unexpected image slot: {}",
                image
            );
        }
    }
}
