//! Itinerary items
//!
//! An item is a scheduled entry within exactly one day bucket. Votes are
//! kept as a map keyed by voter identity; presence of a key with `true`
//! is a vote, so two different voters never conflict when toggling
//! concurrently.

use crate::day::DayKey;
use crate::error::ValidationError;
use crate::ids::{ItemId, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// No category assigned
    #[default]
    None,
    /// Meals, restaurants, cafes
    Food,
    /// Sights, excursions, events
    Activity,
    /// Flights, trains, transfers
    Transportation,
    /// Hotels, rentals, camps
    Accommodation,
}

/// Attachment metadata on an item (ordered list, order is user-chosen)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Where the stored file lives
    pub url: String,
    /// MIME type reported at upload
    pub mime_type: String,
    /// Name shown to collaborators
    pub display_name: String,
}

/// A scheduled entry in one day's bucket
///
/// Invariants enforced at construction: the name is non-blank and
/// `start < end`. The owning day is derived from `start` and never
/// changes independently of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Identifier, unique within the day bucket
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Start instant, normalized to the trip's local calendar day
    pub start: NaiveDateTime,
    /// End instant
    pub end: NaiveDateTime,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default)]
    pub category: Category,
    /// Ordered attachments
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Creator identity
    pub creator: UserId,
    /// Voter identity -> vote presence
    #[serde(default)]
    pub votes: BTreeMap<UserId, bool>,
    /// Manual ordering key within the day
    #[serde(default)]
    pub sort_key: f64,
}

impl ItineraryItem {
    /// Create a new item, validating its invariants
    ///
    /// # Errors
    /// - [`ValidationError::MissingField`] when the name is blank
    /// - [`ValidationError::InvalidTimeRange`] unless `start < end`
    pub fn new(
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        creator: UserId,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }

        Ok(Self {
            id: ItemId::new(),
            name,
            start,
            end,
            description: String::new(),
            category: Category::None,
            attachments: Vec::new(),
            creator,
            votes: BTreeMap::new(),
            sort_key: 0.0,
        })
    }

    /// Set the category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the manual ordering key
    #[inline]
    #[must_use]
    pub fn with_sort_key(mut self, sort_key: f64) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// The day bucket this item belongs to (date of `start`)
    #[inline]
    #[must_use]
    pub fn day(&self) -> DayKey {
        DayKey::for_instant(self.start)
    }

    /// Duration in whole minutes
    #[inline]
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether `voter` currently has a vote on this item
    #[inline]
    #[must_use]
    pub fn has_vote(&self, voter: &UserId) -> bool {
        self.votes.get(voter).copied().unwrap_or(false)
    }

    /// Number of standing votes
    #[inline]
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.values().filter(|v| **v).count()
    }
}
