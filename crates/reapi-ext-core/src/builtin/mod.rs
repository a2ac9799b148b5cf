//! Built-in functions shipped with the library.
//!
//! - [`assertion`]: `reapi-is-int`, `reapi-is-geo-location`
//! - [`generator`]: `reapi-now`, `reapi-now-timestamp`
//! - [`transformer`]: date conversion and formatting
//! - [`hook`]: request/response hooks that hand state through the context

pub mod assertion;
pub mod generator;
pub mod hook;
pub mod transformer;

use crate::error::RegistryResult;
use crate::library::{Library, LibraryBuilder};

/// Ids of the built-in functions.
pub mod ids {
    /// Integer assertion.
    pub const IS_INT: &str = "reapi-is-int";

    /// Geo location assertion.
    pub const IS_GEO_LOCATION: &str = "reapi-is-geo-location";

    /// Current time as ISO-8601.
    pub const NOW: &str = "reapi-now";

    /// Current time as epoch milliseconds.
    pub const NOW_TIMESTAMP: &str = "reapi-now-timestamp";

    /// Epoch milliseconds to ISO-8601.
    pub const DATE_TIME_FROM_TIMESTAMP: &str = "reapi-date-time-from-timestamp";

    /// Date or timestamp to display format.
    pub const FORMAT_DATE_TIME: &str = "reapi-format-date-time";

    /// Timestamp to display format.
    pub const FORMAT_TIMESTAMP: &str = "reapi-format-timestamp";

    /// Before-request hook stamping auth, query and timestamp.
    pub const MODIFY_REQUEST_PARAMS: &str = "reapi-modify-request-params";

    /// After-request hook copying context into the response payload.
    pub const MODIFY_RESPONSE_DATA: &str = "reapi-modify-response-data";
}

/// Add every built-in function to a builder.
pub fn register_builtins(builder: &mut LibraryBuilder) {
    for descriptor in assertion::descriptors() {
        builder.add_assertion(descriptor);
    }
    for descriptor in generator::descriptors() {
        builder.add_generator(descriptor);
    }
    for descriptor in transformer::descriptors() {
        builder.add_transformer(descriptor);
    }
    for descriptor in hook::descriptors() {
        builder.add_hook(descriptor);
    }
}

/// Build a library containing only the built-ins.
pub fn builtin_library() -> RegistryResult<Library> {
    let mut builder = LibraryBuilder::new();
    register_builtins(&mut builder);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_library_builds() {
        let library = builtin_library().unwrap();

        assert_eq!(library.assertions().len(), 2);
        assert_eq!(library.generators().len(), 2);
        assert_eq!(library.transformers().len(), 3);
        assert_eq!(library.hooks().len(), 2);
    }

    #[test]
    fn test_builtin_ids_resolve() {
        let library = builtin_library().unwrap();

        assert!(library.get_assertion_function(ids::IS_INT).is_some());
        assert!(library.get_assertion_function(ids::IS_GEO_LOCATION).is_some());
        assert!(library.get_value_function(ids::NOW).is_some());
        assert!(library.get_value_function(ids::NOW_TIMESTAMP).is_some());
        assert!(library.get_value_function(ids::DATE_TIME_FROM_TIMESTAMP).is_some());
        assert!(library.get_value_function(ids::FORMAT_DATE_TIME).is_some());
        assert!(library.get_value_function(ids::FORMAT_TIMESTAMP).is_some());
        assert!(library.get_api_hook(ids::MODIFY_REQUEST_PARAMS).is_some());
        assert!(library.get_api_hook(ids::MODIFY_RESPONSE_DATA).is_some());
    }

    #[test]
    fn test_registration_order() {
        let library = builtin_library().unwrap();
        let ids: Vec<String> = library
            .summaries()
            .into_iter()
            .map(|s| s.meta.id.to_string())
            .collect();

        assert_eq!(
            ids,
            vec![
                "reapi-is-int",
                "reapi-is-geo-location",
                "reapi-now",
                "reapi-now-timestamp",
                "reapi-date-time-from-timestamp",
                "reapi-format-date-time",
                "reapi-format-timestamp",
                "reapi-modify-request-params",
                "reapi-modify-response-data",
            ]
        );
    }
}
