//! ISO-8601 timestamps as the API writes them.
//!
//! The API emits both `2024-01-15T10:30:00.123Z` and `2024-01-15T10:30:00Z`.
//! The fractional form is tried first.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const FRACTIONAL_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const WHOLE_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses a UTC timestamp in either accepted form.
///
/// # Errors
///
/// Returns [`Error::DecodingFailed`] if neither form matches.
///
/// # Examples
///
/// ```
/// use pinata::dates::parse_timestamp;
///
/// let with_millis = parse_timestamp("2024-01-15T10:30:00.123Z").unwrap();
/// let whole = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
/// assert!(with_millis > whole);
/// assert!(parse_timestamp("not-a-date").is_err());
/// ```
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, FRACTIONAL_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, WHOLE_SECONDS))
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::DecodingFailed {
            message: format!("invalid timestamp: {}", e),
            raw_response: raw.to_string(),
        })
}

/// Serde adapter for timestamp fields.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_fractional_seconds() {
        let ts = parse_timestamp("2024-01-15T10:30:00.123Z").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 15));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (10, 30, 0));
        assert_eq!(ts.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn parses_whole_seconds() {
        let ts = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts.timestamp(), 1_705_314_600);
        assert_eq!(ts.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn parses_microsecond_precision() {
        let ts = parse_timestamp("2024-06-01T00:00:00.654321Z").unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 654_321);
    }

    #[test]
    fn rejects_garbage() {
        match parse_timestamp("not-a-date") {
            Err(Error::DecodingFailed { raw_response, .. }) => {
                assert_eq!(raw_response, "not-a-date")
            }
            other => panic!("Expected DecodingFailed, got {:?}", other),
        }
    }

    #[test]
    fn serde_adapter_reports_bad_timestamps() {
        #[derive(Debug, serde::Deserialize)]
        struct Stamped {
            #[serde(deserialize_with = "super::deserialize")]
            at: DateTime<Utc>,
        }

        let ok: Stamped = serde_json::from_str(r#"{"at":"2024-01-15T10:30:00Z"}"#).unwrap();
        assert_eq!(ok.at.timestamp(), 1_705_314_600);

        let err = serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }
}
