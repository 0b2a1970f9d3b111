//! Validation errors
//!
//! Boundary validation failures: malformed times and dates, missing
//! required fields, oversize uploads. Resolved locally and reported to
//! the initiating user; they never reach the store.

use chrono::NaiveDateTime;

/// Boundary validation failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Item start is not before its end
    #[error("invalid time range: start {start} is not before end {end}")]
    InvalidTimeRange {
        /// Offending start instant
        start: NaiveDateTime,
        /// Offending end instant
        end: NaiveDateTime,
    },

    /// Time-of-day string not in `HH:mm`
    #[error("malformed time of day {0:?} (expected HH:mm)")]
    MalformedTime(String),

    /// Calendar date string not in ISO `YYYY-MM-DD`
    #[error("malformed calendar date {0:?} (expected YYYY-MM-DD)")]
    MalformedDate(String),

    /// Required field absent or blank
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Identifier failed to parse
    #[error("invalid identifier {0:?}")]
    InvalidId(String),

    /// Upload exceeds the attachment size limit
    #[error("attachment too large: {size} bytes (limit {limit})")]
    AttachmentTooLarge {
        /// Size of the rejected payload
        size: usize,
        /// Configured limit
        limit: usize,
    },
}
