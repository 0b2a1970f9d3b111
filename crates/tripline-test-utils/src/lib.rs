//! Testing utilities for the tripline workspace
//!
//! Shared fixtures: in-memory stores, actors, trip bootstrap helpers,
//! and a fault-injecting store wrapper.

#![allow(missing_docs)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tripline_model::{
    at_time, parse_hm, ActorContext, DayKey, ItineraryItem, TripId, TripMeta, UserId,
};
use tripline_sync::{
    MemoryStore, StoreError, Subscription, SyncCoordinator, TreePath, TripStore, Value,
};

/// Install a test subscriber honoring `RUST_LOG`; safe to call from
/// every test (later calls are no-ops)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn mem_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn actor(key: &str, name: &str) -> ActorContext {
    ActorContext::new(UserId::new(key), name)
}

pub fn coordinator_for(
    store: Arc<MemoryStore>,
    trip: TripId,
    actor: ActorContext,
) -> SyncCoordinator<MemoryStore> {
    SyncCoordinator::new(store, trip, actor)
}

/// Create a trip owned by `owner` and return its coordinator
pub async fn bootstrap_trip(
    store: Arc<MemoryStore>,
    owner: ActorContext,
) -> (TripId, SyncCoordinator<MemoryStore>) {
    let trip = TripId::new();
    let coordinator = SyncCoordinator::new(store, trip, owner);
    let meta = TripMeta {
        name: Some("Norway 2025".to_string()),
        destination: Some("Lofoten".to_string()),
        ..TripMeta::default()
    };
    coordinator.create_trip(&meta).await.unwrap();
    (trip, coordinator)
}

/// An item on `day` spanning `start_hm..end_hm`, created by `creator`
pub fn item_on(day: &str, name: &str, start_hm: &str, end_hm: &str, creator: &UserId) -> ItineraryItem {
    let day: DayKey = day.parse().unwrap();
    let start = at_time(day, parse_hm(start_hm).unwrap());
    let end = at_time(day, parse_hm(end_hm).unwrap());
    ItineraryItem::new(name, start, end, creator.clone()).unwrap()
}

/// Store wrapper that fails any batch touching paths under a prefix
///
/// Everything else delegates to the wrapped in-memory store.
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    deny_prefix: TreePath,
    rejected: AtomicUsize,
}

impl FaultyStore {
    pub fn denying(inner: Arc<MemoryStore>, deny_prefix: TreePath) -> Self {
        Self {
            inner,
            deny_prefix,
            rejected: AtomicUsize::new(0),
        }
    }

    pub fn rejected_batches(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TripStore for FaultyStore {
    async fn read(&self, path: &TreePath) -> Result<Value, StoreError> {
        self.inner.read(path).await
    }

    async fn write_batch(
        &self,
        updates: Vec<(TreePath, Option<Value>)>,
    ) -> Result<(), StoreError> {
        if updates
            .iter()
            .any(|(path, _)| self.deny_prefix.is_prefix_of(path))
        {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("injected fault".to_string()));
        }
        self.inner.write_batch(updates).await
    }

    fn subscribe(&self, path: &TreePath) -> Subscription {
        self.inner.subscribe(path)
    }
}
