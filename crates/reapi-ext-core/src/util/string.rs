//! String casing.

/// Uppercase a string.
pub fn to_upper_case(s: &str) -> String {
    s.to_uppercase()
}

/// Lowercase a string.
pub fn to_lower_case(s: &str) -> String {
    s.to_lowercase()
}
