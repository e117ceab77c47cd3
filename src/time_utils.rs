// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Timestamp layout used by Garmin Connect activity summaries.
const GARMIN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a Garmin timestamp (`2024-03-02 07:15:00`, optionally with
/// fractional seconds or a `T` separator).
pub fn parse_garmin_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, GARMIN_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Parse a feed post date back into UTC. Accepts RFC3339 and the local
/// (offset-less) ISO 8601 form produced for activities without a UTC start.
pub fn parse_post_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_garmin_timestamp(raw).map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_garmin_timestamp_variants() {
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 2, 7, 15, 0)
            .unwrap()
            .naive_utc();
        assert_eq!(parse_garmin_timestamp("2024-03-02 07:15:00"), Some(expected));
        assert_eq!(
            parse_garmin_timestamp("2024-03-02 07:15:00.0"),
            Some(expected)
        );
        assert_eq!(parse_garmin_timestamp("2024-03-02T07:15:00"), Some(expected));
        assert_eq!(parse_garmin_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_post_date() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 2, 15, 15, 0).unwrap();
        assert_eq!(parse_post_date("2024-03-02T15:15:00Z"), Some(expected));
        assert_eq!(parse_post_date("2024-03-02T15:15:00"), Some(expected));
        assert_eq!(parse_post_date(""), None);
    }

    #[test]
    fn test_format_utc_rfc3339() {
        let date = Utc.with_ymd_and_hms(2024, 3, 2, 15, 15, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-03-02T15:15:00Z");
    }
}
