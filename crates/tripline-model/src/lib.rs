//! Tripline Domain Model
//!
//! Shared types for the collaborative itinerary engine:
//!
//! - [`ItineraryItem`]: a scheduled entry in one day's bucket
//! - [`DayKey`]: validated calendar-date key for day buckets
//! - [`Task`], [`Rsvp`], [`AdminGrant`]: trip-level collaboration state
//! - [`ActivityRecord`]: append-only history entry with a tagged detail payload
//! - [`ActorContext`]: explicit authenticated-actor context
//!
//! # Example
//!
//! ```rust,ignore
//! use tripline_model::{ActorContext, ItineraryItem, UserId};
//!
//! let actor = ActorContext::new(UserId::new("+15550001111"), "Ada");
//! let item = ItineraryItem::new("Lunch", start, end, actor.user.clone())?;
//! assert_eq!(item.day().to_string(), "2025-06-01");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod activity;
mod actor;
mod day;
mod error;
mod ids;
mod item;
mod task;
mod time;
mod trip;

// Re-exports
pub use activity::{ActivityDetail, ActivityRecord};
pub use actor::ActorContext;
pub use day::DayKey;
pub use error::ValidationError;
pub use ids::{ActivityId, ItemId, TaskId, TripId, UserId};
pub use item::{Attachment, Category, ItineraryItem};
pub use task::Task;
pub use time::{at_time, parse_hm};
pub use trip::{AdminGrant, Rsvp, RsvpStatus, TripField, TripMeta};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the Tripline model
    pub use crate::{
        ActivityDetail, ActivityRecord, ActorContext, DayKey, ItemId, ItineraryItem, Rsvp,
        RsvpStatus, Task, TaskId, TripId, UserId, ValidationError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
