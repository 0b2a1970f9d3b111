//! Trip-level state: metadata, RSVPs, admin grants
//!
//! The trip aggregate owns these sub-trees by path; none of them have a
//! lifecycle independent of the trip.

use crate::ids::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Trip display metadata
///
/// Individual fields are edited independently (one field per write), so
/// everything is optional from the store's point of view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMeta {
    /// Trip name
    #[serde(default)]
    pub name: Option<String>,
    /// Destination label
    #[serde(default)]
    pub destination: Option<String>,
    /// First trip day
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last trip day
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// One editable trip metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripField {
    /// Trip name
    Name,
    /// Destination label
    Destination,
    /// First trip day
    StartDate,
    /// Last trip day
    EndDate,
}

impl TripField {
    /// Store path segment for this field
    #[inline]
    #[must_use]
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Destination => "destination",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
        }
    }
}

impl std::fmt::Display for TripField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.segment())
    }
}

/// RSVP status options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    /// Attending
    Going,
    /// Undecided
    Maybe,
    /// Not attending
    NotGoing,
}

/// A collaborator's RSVP for the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsvp {
    /// Current status
    pub status: RsvpStatus,
    /// Display name snapshot at the time of the RSVP
    pub display_name: String,
}

/// Admin membership with audit fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminGrant {
    /// Who granted the role
    pub granted_by: UserId,
    /// When it was granted
    pub granted_at: DateTime<Utc>,
}

impl AdminGrant {
    /// Record a grant made now by `granted_by`
    #[inline]
    #[must_use]
    pub fn by(granted_by: UserId) -> Self {
        Self {
            granted_by,
            granted_at: Utc::now(),
        }
    }
}
