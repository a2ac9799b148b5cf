//! Built-in transformers.
//!
//! Output is always UTC; see [`crate::util::datetime`].

use serde_json::Value;

use crate::descriptor::{DescriptorMeta, ValueDescriptor, ValueFn};
use crate::error::ValueResult;
use crate::util::{self, datetime};

use super::ids;

/// Epoch milliseconds to an ISO-8601 string.
pub fn date_time_from_timestamp(input: &Value) -> ValueResult<Value> {
    let millis = datetime::timestamp_from_value(input)?;
    util::date_time_from_timestamp(millis).map(Value::String)
}

/// Date string or epoch milliseconds to `YYYY-MM-DD HH:mm:ss`.
pub fn format_date_time(input: &Value) -> ValueResult<Value> {
    let date = util::parse_date_input(input)?;
    Ok(Value::String(util::format_date_time(&date)))
}

/// Epoch milliseconds to `YYYY-MM-DD HH:mm:ss`.
pub fn format_timestamp(input: &Value) -> ValueResult<Value> {
    let millis = datetime::timestamp_from_value(input)?;
    util::format_timestamp(millis).map(Value::String)
}

/// Descriptors for the built-in transformers, in registration order.
pub fn descriptors() -> Vec<ValueDescriptor> {
    vec![
        ValueDescriptor::new(
            DescriptorMeta::new(ids::DATE_TIME_FROM_TIMESTAMP)
                .with_display_name("Date Time From Timestamp")
                .with_description("Get the date and time from a timestamp")
                .with_enabled(true)
                .with_tested(false),
            ValueFn::unary(date_time_from_timestamp),
        ),
        ValueDescriptor::new(
            DescriptorMeta::new(ids::FORMAT_DATE_TIME)
                .with_display_name("Format Date Time")
                .with_description("Format a date and time")
                .with_enabled(false)
                .with_tested(false),
            ValueFn::unary(format_date_time),
        ),
        ValueDescriptor::new(
            DescriptorMeta::new(ids::FORMAT_TIMESTAMP)
                .with_display_name("Format Timestamp")
                .with_description("Format a timestamp as YYYY-MM-DD HH:mm:ss (UTC)"),
            ValueFn::unary(format_timestamp),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use serde_json::json;

    #[test]
    fn test_date_time_from_timestamp() {
        assert_eq!(
            date_time_from_timestamp(&json!(1_704_067_200_000i64)).unwrap(),
            json!("2024-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_format_date_time_accepts_date_or_epoch() {
        assert_eq!(
            format_date_time(&json!("2024-06-30T23:59:59Z")).unwrap(),
            json!("2024-06-30 23:59:59")
        );
        assert_eq!(
            format_date_time(&json!(1_704_067_200_000i64)).unwrap(),
            json!("2024-01-01 00:00:00")
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(&json!(86_400_000)).unwrap(),
            json!("1970-01-02 00:00:00")
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            date_time_from_timestamp(&json!("soon")),
            Err(ValueError::InvalidInput(_))
        ));
        assert!(format_timestamp(&json!("2024-01-01")).is_err());
        assert!(format_date_time(&json!({})).is_err());
    }

    #[test]
    fn test_descriptor_flags() {
        let descriptors = descriptors();
        assert!(descriptors[0].meta.enabled.is_true());
        assert!(descriptors[0].meta.tested.is_false());
        assert!(descriptors[1].meta.enabled.is_false());
        assert!(descriptors[2].meta.enabled.is_unspecified());
        assert!(descriptors.iter().all(|d| d.no_of_params() == 1));
    }
}
