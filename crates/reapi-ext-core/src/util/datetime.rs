//! Date and time helpers.
//!
//! All formatting is done in UTC so results do not depend on the host's
//! local timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::{ValueError, ValueResult};

/// Display format used by the formatting transformers.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO-8601 string with millisecond precision and a `Z` suffix,
/// e.g. `2024-01-01T00:00:00.000Z`.
pub fn to_iso_string(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert epoch milliseconds to an ISO-8601 string.
pub fn date_time_from_timestamp(millis: i64) -> ValueResult<String> {
    from_millis(millis).map(|d| to_iso_string(&d))
}

/// Format a date as `YYYY-MM-DD HH:mm:ss` in UTC.
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Format epoch milliseconds as `YYYY-MM-DD HH:mm:ss` in UTC.
pub fn format_timestamp(millis: i64) -> ValueResult<String> {
    from_millis(millis).map(|d| format_date_time(&d))
}

/// Read epoch milliseconds from a JSON number.
///
/// Fractional milliseconds are truncated.
pub fn timestamp_from_value(value: &Value) -> ValueResult<i64> {
    if let Some(ms) = value.as_i64() {
        return Ok(ms);
    }
    match value.as_f64() {
        Some(ms) if ms.is_finite() && ms.abs() < i64::MAX as f64 => Ok(ms.trunc() as i64),
        _ => Err(ValueError::InvalidInput(format!(
            "expected a timestamp in milliseconds, got {}",
            value
        ))),
    }
}

/// Interpret a JSON value as a point in time.
///
/// Numbers are epoch milliseconds. Strings may be RFC 3339
/// (`2024-01-01T12:00:00Z`, `2024-01-01T12:00:00+02:00`), a naive
/// date-time taken as UTC (`2024-01-01T12:00:00`, `2024-01-01 12:00:00`),
/// or a bare date at midnight UTC.
pub fn parse_date_input(value: &Value) -> ValueResult<DateTime<Utc>> {
    match value {
        Value::Number(_) => from_millis(timestamp_from_value(value)?),
        Value::String(s) => parse_date_str(s.trim()),
        other => Err(ValueError::InvalidInput(format!(
            "expected a date string or timestamp, got {}",
            other
        ))),
    }
}

fn parse_date_str(s: &str) -> ValueResult<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Ok(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }
    Err(ValueError::InvalidInput(format!(
        "unrecognized date: {:?}",
        s
    )))
}

fn from_millis(millis: i64) -> ValueResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        ValueError::InvalidInput(format!("timestamp {} is out of range", millis))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_iso_string_shape() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_iso_string(&date), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_date_time_from_timestamp() {
        assert_eq!(
            date_time_from_timestamp(1_704_067_200_123).unwrap(),
            "2024-01-01T00:00:00.123Z"
        );
        assert_eq!(date_time_from_timestamp(0).unwrap(), "1970-01-01T00:00:00.000Z");
        assert!(date_time_from_timestamp(i64::MAX).is_err());
    }

    #[test]
    fn test_format_is_utc() {
        assert_eq!(
            format_timestamp(1_704_067_200_000).unwrap(),
            "2024-01-01 00:00:00"
        );

        let offset = parse_date_input(&json!("2024-01-01T02:30:00+02:00")).unwrap();
        assert_eq!(format_date_time(&offset), "2024-01-01 00:30:00");
    }

    #[test]
    fn test_parse_date_input_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 6, 7, 8).unwrap();

        for input in [
            json!("2024-03-05T06:07:08Z"),
            json!("2024-03-05T06:07:08.000Z"),
            json!("2024-03-05T06:07:08"),
            json!("2024-03-05 06:07:08"),
            json!(expected.timestamp_millis()),
        ] {
            assert_eq!(parse_date_input(&input).unwrap(), expected, "input {}", input);
        }

        let midnight = parse_date_input(&json!("2024-03-05")).unwrap();
        assert_eq!(format_date_time(&midnight), "2024-03-05 00:00:00");
    }

    #[test]
    fn test_parse_date_input_rejects_garbage() {
        assert!(parse_date_input(&json!("yesterday")).is_err());
        assert!(parse_date_input(&json!(true)).is_err());
        assert!(parse_date_input(&Value::Null).is_err());
    }

    #[test]
    fn test_timestamp_from_value_truncates() {
        assert_eq!(timestamp_from_value(&json!(1500.9)).unwrap(), 1500);
        assert!(timestamp_from_value(&json!("1500")).is_err());
    }
}
