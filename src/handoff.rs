//! Hand-off of the decoded connection token.
//!
//! The QR-decoding side writes the token and the receive flow reads it. Both
//! are given a clone of the same [`HandoffCell`] rather than reaching for a
//! global, so each flow can be tested with its own cell.

use std::sync::Arc;
use tokio::sync::watch;

/// Single-slot, last-write-wins holder for the connection token.
///
/// A cell that was never written reads as `None`; one written with an empty
/// string reads as `Some("")`. The two are not merged here.
#[derive(Debug, Clone)]
pub struct HandoffCell {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl HandoffCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn read(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Overwrites the token. No validation; the previous value is discarded.
    pub fn write(&self, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(len = value.len(), "handoff token written");
        self.tx.send_replace(Some(value));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    /// Waits until a token has been written and returns it.
    ///
    /// Resolves immediately if one is already present.
    pub async fn wait_for_token(&self) -> String {
        let mut rx = self.tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(token) = current {
                return token;
            }
            // The cell holds the sender, so the channel cannot close while
            // `self` is alive.
            if rx.changed().await.is_err() {
                return String::new();
            }
        }
    }
}

impl Default for HandoffCell {
    fn default() -> Self {
        Self::new()
    }
}
