//! Activity trail records
//!
//! Append-only history entries. The detail payload is a tagged union
//! keyed by activity type — each variant carries only its own fields and
//! renderers match it exhaustively. Records are immutable once written
//! and displayed newest-first.

use crate::day::DayKey;
use crate::ids::{ActivityId, ItemId, TaskId, UserId};
use crate::trip::RsvpStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type-specific activity payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityDetail {
    /// An item was added to a day bucket
    ItemAdded {
        /// Day the item was filed under
        day: DayKey,
        /// New item id
        item_id: ItemId,
        /// Item name at creation
        name: String,
    },
    /// A collaborator changed their RSVP
    RsvpChanged {
        /// New status
        status: RsvpStatus,
    },
    /// A vote was toggled on an item
    VoteToggled {
        /// Day of the voted item
        day: DayKey,
        /// Voted item
        item_id: ItemId,
        /// Resulting vote state
        voted: bool,
    },
    /// A trip metadata field was edited
    TripFieldChanged {
        /// Field path segment
        field: String,
        /// New value as shown to collaborators
        value: String,
    },
    /// A task was created
    TaskCreated {
        /// New task id
        task_id: TaskId,
        /// Task title
        title: String,
    },
    /// A task's completion flag was toggled
    TaskCompleted {
        /// Toggled task
        task_id: TaskId,
        /// Resulting flag
        completed: bool,
    },
}

/// One immutable activity trail entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Fresh unique identifier (ULID; sortable tiebreaker)
    pub id: ActivityId,
    /// When the action happened
    pub at: DateTime<Utc>,
    /// Who performed it
    pub actor: UserId,
    /// What happened
    #[serde(flatten)]
    pub detail: ActivityDetail,
}

impl ActivityRecord {
    /// Record an action performed now by `actor`
    #[inline]
    #[must_use]
    pub fn now(actor: UserId, detail: ActivityDetail) -> Self {
        Self {
            id: ActivityId::new(),
            at: Utc::now(),
            actor,
            detail,
        }
    }
}
