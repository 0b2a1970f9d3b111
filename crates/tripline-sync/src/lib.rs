//! Tripline Sync Coordinator
//!
//! Optimistic collaborative editing over a shared hierarchical keyed
//! store with push-snapshot semantics and no cross-path transactions.
//!
//! # Core Concepts
//!
//! - [`TreePath`]: hierarchical store address
//! - [`TripStore`]: the store seam — read / atomic multi-path batch
//!   write / whole-value subscription; writing null deletes a subtree
//! - [`MemoryStore`]: in-process reference store
//! - [`SyncCoordinator`]: permission-gated mutations for one actor on
//!   one trip, with a best-effort append-only activity trail
//! - [`TripSnapshot`] / [`TripView`]: wholesale-replace read model and
//!   its derived views
//!
//! # Example
//!
//! ```rust,ignore
//! use tripline_sync::{MemoryStore, SyncCoordinator};
//!
//! let store = Arc::new(MemoryStore::new());
//! let coordinator = SyncCoordinator::new(store, trip_id, actor);
//! coordinator.create_trip(meta).await?;
//! coordinator.add_item(&item).await?;
//! ```

#![warn(unreachable_pub)]

// Core modules
mod attachments;
mod coordinator;
mod memory;
mod path;
mod snapshot;
mod store;
mod tree;

// Re-exports
pub use attachments::{AttachmentStore, FileUpload, StoredAttachment, MAX_ATTACHMENT_BYTES};
pub use coordinator::{SyncCoordinator, SyncError};
pub use memory::MemoryStore;
pub use path::{PathError, TreePath};
pub use snapshot::{RsvpSummary, TripSnapshot, TripView};
pub use store::{StoreError, Subscription, TripStore, Value};
pub use tree::TripPaths;
