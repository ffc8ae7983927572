//! Object-URL registry for received content.
//!
//! Each [`ObjectUrl`] keeps its bytes alive in the [`BlobStore`] until it is
//! revoked. Nothing is released implicitly: dropping an `ObjectUrl` leaves the
//! entry in place, so callers must thread `revoke` through their own teardown.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Default origin used when minting URLs.
pub const DEFAULT_ORIGIN: &str = "dropview://local";

/// Content behind an object URL.
#[derive(Debug, Clone)]
pub struct Blob {
    pub media_type: String,
    pub bytes: Bytes,
    pub created_at: DateTime<Utc>,
}

/// Summary of a live entry, for leak diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobInfo {
    pub url: String,
    pub media_type: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct BlobTable {
    origin: String,
    entries: HashMap<String, Blob>,
}

/// Shared registry of object URLs.
#[derive(Debug, Clone)]
pub struct BlobStore {
    inner: Arc<Mutex<BlobTable>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::with_origin(DEFAULT_ORIGIN)
    }

    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BlobTable {
                origin: origin.into(),
                entries: HashMap::new(),
            })),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned table is still usable.
    fn table(&self) -> MutexGuard<'_, BlobTable> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers `bytes` and returns a handle the caller must revoke.
    pub fn create(&self, media_type: impl Into<String>, bytes: Bytes) -> ObjectUrl {
        let media_type = media_type.into();
        let size = bytes.len();

        let url = {
            let mut table = self.table();
            let url = format!("blob:{}/{}", table.origin, Uuid::new_v4());
            table.entries.insert(
                url.clone(),
                Blob {
                    media_type: media_type.clone(),
                    bytes,
                    created_at: Utc::now(),
                },
            );
            url
        };

        tracing::debug!(url = %url, media_type = %media_type, bytes = size, "object url created");

        ObjectUrl {
            url,
            store: self.clone(),
        }
    }

    /// Looks up the content behind a URL. `None` once revoked.
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        self.table().entries.get(url).cloned()
    }

    /// Releases a URL. Returns `false` if it was unknown or already revoked.
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.table().entries.remove(url).is_some();
        if removed {
            tracing::debug!(url = %url, "object url revoked");
        }
        removed
    }

    /// Entries that have not been revoked yet, oldest first.
    pub fn outstanding(&self) -> Vec<BlobInfo> {
        let mut infos: Vec<BlobInfo> = self
            .table()
            .entries
            .iter()
            .map(|(url, blob)| BlobInfo {
                url: url.clone(),
                media_type: blob.media_type.clone(),
                size: blob.bytes.len() as u64,
                created_at: blob.created_at,
            })
            .collect();
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.url.cmp(&b.url)));
        infos
    }

    pub fn len(&self) -> usize {
        self.table().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().entries.is_empty()
    }
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A minted object URL together with the means to release it.
#[derive(Debug, Clone)]
#[must_use = "object urls stay registered until revoked"]
pub struct ObjectUrl {
    url: String,
    store: BlobStore,
}

impl ObjectUrl {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn revoke(self) -> bool {
        self.store.revoke(&self.url)
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}
