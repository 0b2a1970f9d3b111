//! In-process reference store
//!
//! Backs tests and single-process use. One value tree behind a RwLock;
//! batches apply under the write lock and subscribers are notified
//! before it releases, so per-path delivery order matches write order.

use crate::path::TreePath;
use crate::store::{StoreError, Subscription, TripStore, Value};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

struct Subscriber {
    path: TreePath,
    sender: mpsc::UnboundedSender<Value>,
}

/// In-memory [`TripStore`]
#[derive(Default)]
pub struct MemoryStore {
    tree: RwLock<Value>,
    subscribers: Arc<DashMap<u64, Subscriber>>,
    next_subscriber: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(Value::Null),
            subscribers: Arc::new(DashMap::new()),
            next_subscriber: AtomicU64::new(0),
        }
    }

    /// Whole current tree (test/debug aid)
    #[must_use]
    pub fn dump(&self) -> Value {
        self.tree.read().clone()
    }

    /// Number of live subscriptions (teardown checks)
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Value at `path` within `root`, if present
fn value_at<'a>(root: &'a Value, path: &TreePath) -> Option<&'a Value> {
    let mut cursor = root;
    for segment in path.segments() {
        cursor = cursor.as_object()?.get(segment)?;
    }
    Some(cursor)
}

/// Write (or delete, for `None`) at `path`; returns whether the tree
/// changed
///
/// Writes create intermediate objects as needed. Deletes never create
/// anything: an absent target is a no-op, not a chain of fresh empty
/// parents.
fn set_at(root: &mut Value, path: &TreePath, value: Option<Value>) -> bool {
    let Some((leaf, parents)) = path.segments().split_last() else {
        return match value {
            Some(v) => {
                *root = v;
                true
            }
            None => {
                let existed = !root.is_null();
                *root = Value::Null;
                existed
            }
        };
    };

    match value {
        Some(v) => {
            let mut cursor = root;
            for segment in parents {
                if !cursor.is_object() {
                    *cursor = Value::Object(serde_json::Map::new());
                }
                let Some(map) = cursor.as_object_mut() else {
                    return false;
                };
                cursor = map.entry(segment.clone()).or_insert(Value::Null);
            }
            if !cursor.is_object() {
                *cursor = Value::Object(serde_json::Map::new());
            }
            match cursor.as_object_mut() {
                Some(map) => {
                    map.insert(leaf.clone(), v);
                    true
                }
                None => false,
            }
        }
        None => {
            let mut cursor = root;
            for segment in parents {
                let Some(next) = cursor.as_object_mut().and_then(|m| m.get_mut(segment)) else {
                    return false;
                };
                cursor = next;
            }
            cursor
                .as_object_mut()
                .is_some_and(|map| map.remove(leaf).is_some())
        }
    }
}

#[async_trait]
impl TripStore for MemoryStore {
    async fn read(&self, path: &TreePath) -> Result<Value, StoreError> {
        let tree = self.tree.read();
        Ok(value_at(&tree, path).cloned().unwrap_or(Value::Null))
    }

    async fn write_batch(
        &self,
        updates: Vec<(TreePath, Option<Value>)>,
    ) -> Result<(), StoreError> {
        let mut tree = self.tree.write();
        let mut applied: Vec<&TreePath> = Vec::with_capacity(updates.len());
        for (path, value) in &updates {
            // JSON null is the same deletion sentinel as None.
            let effective = value.clone().filter(|v| !v.is_null());
            if set_at(&mut tree, path, effective) {
                applied.push(path);
            }
        }

        // Notify while still holding the write lock: per-path delivery
        // order then matches write order. Sends are non-blocking.
        // No-op updates (deleting an absent path) notify nobody.
        self.subscribers.retain(|_, subscriber| {
            let touched = applied.iter().any(|path| subscriber.path.touches(path));
            if !touched {
                return true;
            }
            let snapshot = value_at(&tree, &subscriber.path)
                .cloned()
                .unwrap_or(Value::Null);
            subscriber.sender.send(snapshot).is_ok()
        });

        Ok(())
    }

    fn subscribe(&self, path: &TreePath) -> Subscription {
        let id = self.next_subscriber.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.insert(
            id,
            Subscriber {
                path: path.clone(),
                sender,
            },
        );

        let registry = Arc::clone(&self.subscribers);
        Subscription::new(receiver, move || {
            registry.remove(&id);
        })
    }
}
