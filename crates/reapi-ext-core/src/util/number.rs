//! Numeric checks.

use serde_json::Value;

/// Check whether a JSON value is an integral number.
///
/// Strings, booleans and other non-numbers return `false`. Floats count when
/// they have no fractional part, so `1.0` is an integer and `1.1` is not.
pub fn is_int(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(is_integral),
        _ => false,
    }
}

fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0
}
