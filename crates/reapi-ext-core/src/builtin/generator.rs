//! Built-in value generators.

use chrono::Utc;
use serde_json::Value;

use crate::descriptor::{DescriptorMeta, ValueDescriptor, ValueFn};
use crate::error::ValueResult;
use crate::util;

use super::ids;

/// Current time as an ISO-8601 string.
pub fn now() -> ValueResult<Value> {
    Ok(Value::String(util::to_iso_string(&Utc::now())))
}

/// Current time as epoch milliseconds.
pub fn now_timestamp() -> ValueResult<Value> {
    Ok(Value::from(Utc::now().timestamp_millis()))
}

/// Descriptors for the built-in generators, in registration order.
pub fn descriptors() -> Vec<ValueDescriptor> {
    vec![
        ValueDescriptor::new(
            DescriptorMeta::new(ids::NOW)
                .with_display_name("Now")
                .with_description("Get the current date and time in ISO format")
                .with_enabled(true)
                .with_tested(true),
            ValueFn::nullary(now),
        ),
        ValueDescriptor::new(
            DescriptorMeta::new(ids::NOW_TIMESTAMP)
                .with_display_name("Now Timestamp")
                .with_description("Get the current date and time as a timestamp")
                .with_enabled(true)
                .with_tested(true),
            ValueFn::nullary(now_timestamp),
        ),
    ]
}
