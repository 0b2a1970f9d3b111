//! Trip tree layout
//!
//! One place that knows where every sub-tree of a trip lives:
//!
//! ```text
//! trips/{trip}
//!   meta/{field}
//!   days/{YYYY-MM-DD}/{item}
//!   tasks/{task}
//!   rsvps/{user}
//!   admins/{user}
//!   activity/{record}
//! ```

use crate::path::TreePath;
use tripline_model::{ActivityId, DayKey, ItemId, TaskId, TripField, TripId, UserId};

/// Path builder for one trip's sub-trees
#[derive(Debug, Clone)]
pub struct TripPaths {
    root: TreePath,
}

impl TripPaths {
    /// Paths for `trip`
    #[must_use]
    pub fn new(trip: TripId) -> Self {
        Self {
            root: TreePath::root().child("trips").child(trip.to_string()),
        }
    }

    /// The trip root (what read-model views subscribe to)
    #[inline]
    #[must_use]
    pub fn root(&self) -> &TreePath {
        &self.root
    }

    /// One trip metadata field
    #[must_use]
    pub fn meta_field(&self, field: TripField) -> TreePath {
        self.root.child("meta").child(field.segment())
    }

    /// One day bucket
    #[must_use]
    pub fn day(&self, day: DayKey) -> TreePath {
        self.root.child("days").child(day.to_string())
    }

    /// One item within its day bucket
    #[must_use]
    pub fn item(&self, day: DayKey, item: ItemId) -> TreePath {
        self.day(day).child(item.to_string())
    }

    /// An item's vote map
    #[must_use]
    pub fn item_votes(&self, day: DayKey, item: ItemId) -> TreePath {
        self.item(day, item).child("votes")
    }

    /// An item's attachment list
    #[must_use]
    pub fn item_attachments(&self, day: DayKey, item: ItemId) -> TreePath {
        self.item(day, item).child("attachments")
    }

    /// One task
    #[must_use]
    pub fn task(&self, task: TaskId) -> TreePath {
        self.root.child("tasks").child(task.to_string())
    }

    /// A task's completion flag
    #[must_use]
    pub fn task_completed(&self, task: TaskId) -> TreePath {
        self.task(task).child("completed")
    }

    /// One collaborator's RSVP
    #[must_use]
    pub fn rsvp(&self, user: &UserId) -> TreePath {
        self.root.child("rsvps").child(user.as_str())
    }

    /// The admin grant map
    #[must_use]
    pub fn admins(&self) -> TreePath {
        self.root.child("admins")
    }

    /// One collaborator's admin grant
    #[must_use]
    pub fn admin(&self, user: &UserId) -> TreePath {
        self.admins().child(user.as_str())
    }

    /// One activity record
    #[must_use]
    pub fn activity(&self, record: ActivityId) -> TreePath {
        self.root.child("activity").child(record.to_string())
    }
}
