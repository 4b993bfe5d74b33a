//! # Temporal Types — UTC-Only Timestamps
//!
//! [`Timestamp`] enforces UTC with `Z` suffix, truncated to seconds
//! precision. Every audit-relevant instant in the stack (deposits,
//! document registration, evaluations) is recorded through this type.
//!
//! ## Security Invariant
//!
//! Non-UTC inputs are rejected at construction. Local timezone offsets
//! would render the same instant differently across records, breaking
//! audit-trail comparability. Even `+00:00`, though semantically UTC,
//! is rejected — only the `Z` suffix is canonical.

use chrono::{DateTime, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from timestamp construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The string is not valid RFC 3339.
    #[error("invalid RFC 3339 timestamp: \"{0}\"")]
    Unparseable(String),

    /// The string uses a timezone offset other than `Z`.
    #[error("timestamp must use Z suffix (UTC only), got: \"{0}\"")]
    NonUtc(String),
}

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse from an RFC 3339 string with mandatory `Z` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::NonUtc`] for any other offset, even
    /// `+00:00`; [`TimestampError::Unparseable`] for malformed input.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::NonUtc(s.to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|_| TimestampError::Unparseable(s.to_string()))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Access the underlying `DateTime<Utc>`.
    pub fn as_utc(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Drop the sub-second component of a UTC datetime.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_utc().nanosecond(), 0);
    }

    #[test]
    fn parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-08-27T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-08-27T12:00:00Z");
    }

    #[test]
    fn parse_offset_rejected() {
        assert!(matches!(
            Timestamp::parse("2026-08-27T12:00:00+00:00"),
            Err(TimestampError::NonUtc(_))
        ));
        assert!(matches!(
            Timestamp::parse("2026-08-27T12:00:00+05:30"),
            Err(TimestampError::NonUtc(_))
        ));
    }

    #[test]
    fn parse_garbage_rejected() {
        assert!(matches!(
            Timestamp::parse("not-a-timestampZ"),
            Err(TimestampError::Unparseable(_))
        ));
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(750);
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2026-01-02T03:04:05Z");
    }

    #[test]
    fn display_matches_iso8601() {
        let ts = Timestamp::parse("2026-08-27T00:00:00Z").unwrap();
        assert_eq!(format!("{ts}"), ts.to_iso8601());
    }

    #[test]
    fn ordering_is_chronological() {
        let earlier = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        let later = Timestamp::parse("2026-01-01T00:00:01Z").unwrap();
        assert!(earlier < later);
    }
}
