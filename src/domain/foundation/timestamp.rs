//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses an RFC 3339 string (e.g. `2024-01-15T10:30:00Z`).
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// ISO calendar date, `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Human-readable date used on title pages, e.g. `15 January 2024`.
    pub fn long_date(&self) -> String {
        self.0.format("%-d %B %Y").to_string()
    }

    /// Date and minute precision time, e.g. `2024-01-15 10:30 UTC`.
    pub fn display_datetime(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M UTC").to_string()
    }

    /// PDF date string, e.g. `D:20240115103000Z`.
    pub fn pdf_date(&self) -> String {
        self.0.format("D:%Y%m%d%H%M%SZ").to_string()
    }

    /// Full RFC 3339 representation with second precision.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn fixed() -> Timestamp {
        Timestamp::parse_rfc3339("2024-01-15T10:30:00Z").unwrap()
    }

    #[test]
    fn timestamp_parses_offsets_into_utc() {
        let ts = Timestamp::parse_rfc3339("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(ts, fixed());
    }

    #[test]
    fn timestamp_formats_dates() {
        let ts = fixed();
        assert_eq!(ts.date_string(), "2024-01-15");
        assert_eq!(ts.long_date(), "15 January 2024");
        assert_eq!(ts.display_datetime(), "2024-01-15 10:30 UTC");
        assert_eq!(ts.pdf_date(), "D:20240115103000Z");
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn timestamp_round_trips_through_json() {
        let json = "\"2024-01-15T10:30:00Z\"";
        let ts: Timestamp = serde_json::from_str(json).unwrap();

        assert_eq!(ts.as_datetime().year(), 2024);
        assert!(serde_json::to_string(&ts).unwrap().contains("2024-01-15"));
    }
}
