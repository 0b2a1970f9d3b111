//! Day bucket keys
//!
//! Items are filed under the calendar date of their start instant. The
//! key is an explicit validated type rather than an ad-hoc string: the
//! ISO `YYYY-MM-DD` form is enforced once, at the parse boundary.

use crate::error::ValidationError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Calendar-date key addressing one day bucket within a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Create a key from a calendar date
    #[inline]
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key for the day containing `instant`
    ///
    /// The date component of an item's start is authoritative: items are
    /// never split across days, even when their end crosses midnight.
    #[inline]
    #[must_use]
    pub fn for_instant(instant: NaiveDateTime) -> Self {
        Self(instant.date())
    }

    /// The underlying date
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Midnight at the start of this day
    #[inline]
    #[must_use]
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.0.and_hms_opt(0, 0, 0).unwrap_or_default()
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ValidationError::MalformedDate(s.to_string()))
    }
}
