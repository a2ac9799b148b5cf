//! Built-in assertions.
//!
//! Both assertions take a single value. Malformed input never fails the call;
//! it produces a result with `passed: false`.

use serde_json::Value;

use crate::assertion::AssertionResult;
use crate::descriptor::{AssertionDescriptor, AssertionFn, DescriptorMeta};
use crate::util;

use super::ids;

/// Assert that a value is an integral number.
pub fn is_int(value: &Value) -> AssertionResult {
    let (passed, message) = if util::is_int(value) {
        (true, "The value is an integer")
    } else {
        (false, "The value is not an integer")
    };
    AssertionResult::new(passed)
        .with_left_value(value.clone())
        .with_message(message)
}

/// Assert that a value is a latitude/longitude pair.
///
/// Accepts `[lat, lng]` or `{ "lat": .., "lng": .. }`.
pub fn is_geo_location(value: &Value) -> AssertionResult {
    let (passed, message) = if is_geo_location_value(value) {
        (true, "The value is a valid geo location")
    } else {
        (false, "The value is not a valid geo location")
    };
    AssertionResult::new(passed)
        .with_left_value(value.clone())
        .with_message(message)
}

/// The predicate behind [`is_geo_location`].
pub fn is_geo_location_value(value: &Value) -> bool {
    match value {
        Value::Array(pair) => match pair.as_slice() {
            [lat, lng] => is_latitude(lat) && is_longitude(lng),
            _ => false,
        },
        Value::Object(obj) => match (obj.get("lat"), obj.get("lng")) {
            (Some(lat), Some(lng)) => is_latitude(lat) && is_longitude(lng),
            _ => false,
        },
        _ => false,
    }
}

fn is_latitude(value: &Value) -> bool {
    in_range(value, 90.0)
}

fn is_longitude(value: &Value) -> bool {
    in_range(value, 180.0)
}

fn in_range(value: &Value, bound: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| !v.is_nan() && (-bound..=bound).contains(&v))
}

/// Descriptors for the built-in assertions, in registration order.
pub fn descriptors() -> Vec<AssertionDescriptor> {
    vec![
        AssertionDescriptor::new(
            DescriptorMeta::new(ids::IS_INT)
                .with_display_name("Is Integer")
                .with_description("Check that the value is an integer")
                .with_enabled(true)
                .with_tested(true),
            AssertionFn::actual(is_int),
        ),
        AssertionDescriptor::new(
            DescriptorMeta::new(ids::IS_GEO_LOCATION)
                .with_display_name("Is Geo Location")
                .with_description("Check that the value is a [lat, lng] pair or a {lat, lng} object"),
            AssertionFn::actual(is_geo_location),
        ),
    ]
}
