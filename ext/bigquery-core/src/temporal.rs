//! Wire formats for TIMESTAMP, DATETIME, DATE and TIME values.
//!
//! Rows carry timestamps as integer microseconds since the epoch, while query
//! parameters carry them as ISO-like strings with an optional `T` or space
//! separator and a `Z` or `+00:00` suffix. Outgoing values always render with
//! microsecond precision.

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::Timestamp;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{BigQueryError, Result};

fn datetime_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{1,6})?$")
            .expect("datetime pattern is valid")
    })
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid")
    })
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{6})?$").expect("time pattern is valid")
    })
}

/// Parse a row TIMESTAMP cell: integer microseconds since the epoch
pub fn timestamp_from_micros(raw: &str) -> Result<Timestamp> {
    let micros: i64 = raw.trim().parse()?;
    Ok(Timestamp::from_microsecond(micros)?)
}

/// Parse a query-parameter TIMESTAMP, e.g. `2024-01-02 03:04:05.123456+00:00`.
///
/// Only the `Z` and `+00:00` suffixes are understood; any other offset is a
/// format error.
pub fn parse_query_param_timestamp(raw: &str) -> Result<Timestamp> {
    let normalized = raw.replacen(' ', "T", 1).replace('Z', "").replace("+00:00", "");
    let civil = parse_datetime(&normalized).map_err(|_| {
        BigQueryError::format(format!("got timestamp: '{}' with unexpected format", raw))
    })?;
    Ok(civil.to_zoned(TimeZone::UTC)?.timestamp())
}

/// Parse `YYYY-MM-DDTHH:MM:SS[.ffffff]` without a zone
pub fn parse_datetime(raw: &str) -> Result<DateTime> {
    if !datetime_pattern().is_match(raw) {
        return Err(BigQueryError::format(format!(
            "got datetime: '{}' with unexpected format",
            raw
        )));
    }
    raw.parse::<DateTime>()
        .map_err(|e| BigQueryError::format(format!("got datetime: '{}': {}", raw, e)))
}

/// Parse `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Result<Date> {
    if !date_pattern().is_match(raw) {
        return Err(BigQueryError::format(format!(
            "got date: '{}' with unexpected format",
            raw
        )));
    }
    raw.parse::<Date>()
        .map_err(|e| BigQueryError::format(format!("got date: '{}': {}", raw, e)))
}

/// Parse `HH:MM:SS` (8 chars) or `HH:MM:SS.ffffff` (15 chars)
pub fn parse_time(raw: &str) -> Result<Time> {
    if raw.len() != 8 && raw.len() != 15 {
        return Err(BigQueryError::format(format!("Unknown time format: {}", raw)));
    }
    if !time_pattern().is_match(raw) {
        return Err(BigQueryError::format(format!(
            "got time: '{}' with unexpected format",
            raw
        )));
    }
    raw.parse::<Time>()
        .map_err(|e| BigQueryError::format(format!("got time: '{}': {}", raw, e)))
}

/// The UTC wall-clock reading of an instant
pub fn utc_datetime(ts: Timestamp) -> DateTime {
    ts.to_zoned(TimeZone::UTC).datetime()
}

fn micros_of(nanos: i32) -> i32 {
    nanos / 1_000
}

/// `YYYY-MM-DDTHH:MM:SS.ffffff`
pub fn format_datetime_micros(dt: DateTime) -> String {
    format!(
        "{}T{:02}:{:02}:{:02}.{:06}",
        format_date(dt.date()),
        dt.hour(),
        dt.minute(),
        dt.second(),
        micros_of(dt.subsec_nanosecond())
    )
}

/// `YYYY-MM-DDTHH:MM:SS.ffffffZ`, the row form of a TIMESTAMP
pub fn format_timestamp_row(dt_utc: DateTime) -> String {
    format!("{}Z", format_datetime_micros(dt_utc))
}

/// `YYYY-MM-DD HH:MM:SS[.ffffff]+00:00`, the query-parameter form of a TIMESTAMP
pub fn format_timestamp_param(dt_utc: DateTime) -> String {
    format!(
        "{} {}+00:00",
        format_date(dt_utc.date()),
        format_time(dt_utc.time())
    )
}

/// ISO-8601 calendar date
pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// ISO-8601 time; the fraction is only rendered when non-zero
pub fn format_time(time: Time) -> String {
    let micros = micros_of(time.subsec_nanosecond());
    if micros == 0 {
        format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
    } else {
        format!(
            "{:02}:{:02}:{:02}.{:06}",
            time.hour(),
            time.minute(),
            time.second(),
            micros
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::{date, datetime, time};

    #[test]
    fn test_timestamp_from_micros() {
        let ts = timestamp_from_micros("1700000000123456").unwrap();
        assert_eq!(ts.as_microsecond(), 1_700_000_000_123_456);
        assert!(timestamp_from_micros("1.7E9").is_err());
    }

    #[test]
    fn test_query_param_timestamp_variants() {
        let expected = datetime(2024, 1, 2, 3, 4, 5, 123_456_000)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp();
        for raw in [
            "2024-01-02 03:04:05.123456",
            "2024-01-02T03:04:05.123456Z",
            "2024-01-02 03:04:05.123456+00:00",
        ] {
            assert_eq!(parse_query_param_timestamp(raw).unwrap(), expected, "{}", raw);
        }

        let whole = parse_query_param_timestamp("2024-01-02 03:04:05").unwrap();
        assert_eq!(utc_datetime(whole), datetime(2024, 1, 2, 3, 4, 5, 0));
    }

    #[test]
    fn test_datetime_fraction_limit() {
        assert!(parse_datetime("2024-01-02T03:04:05.123456").is_ok());
        assert!(parse_datetime("2024-01-02T03:04:05.1234567").is_err());
    }

    #[test]
    fn test_strict_shapes() {
        for raw in [
            "2024-01-02T03:04:05-05:00",
            "2024-01-02",
            "2024-01-02 03:04:05",
            "2024-01-02T03:04",
        ] {
            assert!(parse_datetime(raw).is_err(), "datetime accepted {}", raw);
        }
        for raw in ["2024-01-02T03:04:05", "20240102", "2024-1-2"] {
            assert!(parse_date(raw).is_err(), "date accepted {}", raw);
        }
        assert!(parse_time("12:30:00,123456").is_err());
        assert!(parse_query_param_timestamp("2024-01-02T03:04:05-05:00").is_err());
    }

    #[test]
    fn test_time_length_dispatch() {
        assert_eq!(parse_time("12:30:00").unwrap(), time(12, 30, 0, 0));
        assert_eq!(
            parse_time("12:30:00.123456").unwrap(),
            time(12, 30, 0, 123_456_000)
        );
        let err = parse_time("12:30").unwrap_err();
        assert!(err.to_string().contains("12:30"));
        assert!(parse_time("12:30:00.123").is_err());
    }

    #[test]
    fn test_formatting() {
        let dt = datetime(2024, 3, 9, 7, 8, 9, 500_000);
        assert_eq!(format_datetime_micros(dt), "2024-03-09T07:08:09.000500");
        assert_eq!(format_timestamp_row(dt), "2024-03-09T07:08:09.000500Z");
        assert_eq!(
            format_timestamp_param(dt),
            "2024-03-09 07:08:09.000500+00:00"
        );
        assert_eq!(
            format_timestamp_param(datetime(2024, 3, 9, 7, 8, 9, 0)),
            "2024-03-09 07:08:09+00:00"
        );
        assert_eq!(format_date(date(5, 1, 1)), "0005-01-01");
        assert_eq!(format_time(time(1, 2, 3, 0)), "01:02:03");
    }
}
