//! Time-of-day parse boundary
//!
//! The enrichment service hands times back as bare `HH:mm` strings.
//! They are validated here, once, before anything downstream does
//! arithmetic with them — malformed input becomes a [`ValidationError`],
//! never NaN geometry.

use crate::day::DayKey;
use crate::error::ValidationError;
use chrono::{NaiveDateTime, NaiveTime};

/// Parse a `HH:mm` time-of-day string
///
/// # Errors
/// [`ValidationError::MalformedTime`] when the string is not `HH:mm`.
pub fn parse_hm(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ValidationError::MalformedTime(s.to_string()))
}

/// Combine a day bucket with a time-of-day into a concrete instant
#[inline]
#[must_use]
pub fn at_time(day: DayKey, time: NaiveTime) -> NaiveDateTime {
    day.date().and_time(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_times() {
        assert_eq!(parse_hm("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_hm(" 23:59 ").unwrap(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["25:00", "9:3x", "noon", "09-30", ""] {
            assert!(matches!(
                parse_hm(bad),
                Err(ValidationError::MalformedTime(_))
            ));
        }
    }

    #[test]
    fn at_time_lands_on_the_bucket_day() {
        let day: DayKey = "2025-06-01".parse().unwrap();
        let t = parse_hm("10:00").unwrap();
        assert_eq!(DayKey::for_instant(at_time(day, t)), day);
    }
}
