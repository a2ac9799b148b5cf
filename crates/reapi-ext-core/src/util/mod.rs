//! Pure helpers with no knowledge of the registries.
//!
//! These back the built-in functions and are re-exported for hosts that want
//! to call them directly.

pub mod datetime;
pub mod geo;
pub mod number;
pub mod string;

pub use datetime::{
    date_time_from_timestamp, format_date_time, format_timestamp, parse_date_input,
    timestamp_from_value, to_iso_string,
};
pub use geo::{Position, distance, distance_between, random_int, random_int_with};
pub use number::is_int;
pub use string::{to_lower_case, to_upper_case};
