//! Timestamp handling for API responses.
//!
//! The API provides times as ISO 8601 strings with a UTC offset, e.g.
//! `2024-05-01T08:05:00+02:00`. Boards show the wall-clock `HH:MM` in the
//! timestamp's own offset, which is the station's local time.

use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Error returned when parsing an invalid timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimestampError {
    input: String,
    reason: String,
}

/// An offset-aware point in time from the API.
///
/// # Examples
///
/// ```
/// use db_navigator::board::Timestamp;
///
/// let ts = Timestamp::parse("2024-05-01T08:05:00+02:00").unwrap();
/// assert_eq!(ts.to_string(), "08:05");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Parse an RFC 3339 timestamp. An offset (or `Z`) is required.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        DateTime::parse_from_rfc3339(s)
            .map(Self)
            .map_err(|e| TimestampError {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns the underlying datetime.
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Whole minutes elapsed since `earlier`, rounded down.
    ///
    /// Compares absolute instants, so the two timestamps may carry
    /// different offsets (e.g. a journey crossing a DST change).
    ///
    /// ```
    /// use db_navigator::board::Timestamp;
    ///
    /// let dep = Timestamp::parse("2024-05-01T08:00:00+02:00").unwrap();
    /// let arr = Timestamp::parse("2024-05-01T08:47:00+02:00").unwrap();
    /// assert_eq!(arr.minutes_since(&dep), 47);
    /// ```
    pub fn minutes_since(&self, earlier: &Timestamp) -> i64 {
        let secs = self.0.signed_duration_since(earlier.0).num_seconds();
        secs.div_euclid(60)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0.to_rfc3339())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
