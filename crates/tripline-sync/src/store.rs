//! Store seam
//!
//! The shared store is an external collaborator: a keyed tree with
//! atomic multi-path batch writes and whole-value change subscriptions.
//! Writing null (or `None`) at a path deletes that path and everything
//! beneath it — there is no separate delete operation.

use crate::path::TreePath;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// JSON-compatible value tree stored at a path
pub type Value = serde_json::Value;

/// Store-side failure (transient, retryable)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store/network failure; the mutation may be retried
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Live subscription to one path
///
/// Delivers the *whole* current value at the subscribed path on every
/// change below it, not a diff. Unsubscribes on drop — a guaranteed
/// teardown on every exit path, so no snapshot is ever delivered into
/// destroyed state.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Value>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a snapshot channel plus its teardown action
    #[must_use]
    pub fn new(
        receiver: mpsc::UnboundedReceiver<Value>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Next snapshot; `None` once the store side is gone
    pub async fn next_snapshot(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }

    /// Non-blocking poll for an already-delivered snapshot
    pub fn try_next_snapshot(&mut self) -> Option<Value> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// The hierarchical keyed store
///
/// Consistency contract: a batch is atomic within itself (no partial
/// multi-path write is ever observable), per-path snapshot delivery
/// order matches write order, and conflict resolution is last-write-wins
/// at the smallest written path. There is no cross-batch isolation.
#[async_trait]
pub trait TripStore: Send + Sync + 'static {
    /// Current value at `path`; null when nothing is stored there
    async fn read(&self, path: &TreePath) -> Result<Value, StoreError>;

    /// Apply all updates atomically; `None` (or JSON null) deletes
    async fn write_batch(
        &self,
        updates: Vec<(TreePath, Option<Value>)>,
    ) -> Result<(), StoreError>;

    /// Subscribe to whole-value snapshots of `path`
    fn subscribe(&self, path: &TreePath) -> Subscription;
}
