//! reapi-ext Core
//!
//! This crate provides the capability registry for reapi extension
//! libraries: the descriptors a host reads to discover custom functions, the
//! registries that index them by id, and the built-in functions themselves.
//!
//! # The Registry Contract
//!
//! - Every function is addressed by a stable, globally unique [`FunctionId`]
//! - Functions live in one of four registries: assertions, value generators,
//!   transformers and hooks
//! - Registries are assembled once and never mutated afterwards
//! - Lookup by an unknown id yields `None`, never an error
//! - Duplicate ids are rejected when the [`Library`] is built
//!
//! # Built-in Functions
//!
//! - Assertions: `reapi-is-int`, `reapi-is-geo-location`
//! - Generators: `reapi-now`, `reapi-now-timestamp`
//! - Transformers: `reapi-date-time-from-timestamp`, `reapi-format-date-time`,
//!   `reapi-format-timestamp`
//! - Hooks: `reapi-modify-request-params`, `reapi-modify-response-data`
//!
//! # Usage
//!
//! ```ignore
//! use reapi_ext_core::builtin::builtin_library;
//! use serde_json::json;
//!
//! let library = builtin_library()?;
//!
//! let is_int = library.get_assertion_function("reapi-is-int").unwrap();
//! let result = is_int.call(&[json!(42)])?;
//! assert!(result.passed);
//! ```

pub mod assertion;
pub mod builtin;
pub mod descriptor;
pub mod error;
pub mod exchange;
pub mod id;
pub mod library;
pub mod registry;
pub mod util;

// Re-export main types
pub use assertion::AssertionResult;
pub use descriptor::{
    ApiHookFn, AssertionDescriptor, AssertionFn, Descriptor, DescriptorKind, DescriptorMeta,
    DescriptorSummary, Flag, HookDescriptor, HookType, SharedHook, ValueDescriptor, ValueFn,
};
pub use error::{
    ArityMismatch, GeoError, GeoResult, HookError, HookResult, RegistryError, RegistryResult,
    ValueError, ValueResult,
};
pub use exchange::{ApiRequest, ApiResponse, Context, Exchange, ExchangeId};
pub use id::FunctionId;
pub use library::{Library, LibraryBuilder, SharedLibrary};
pub use registry::{Registry, RegistryBuilder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::assertion::AssertionResult;
    pub use crate::descriptor::{
        ApiHookFn, AssertionDescriptor, AssertionFn, Descriptor, DescriptorMeta, Flag,
        HookDescriptor, HookType, ValueDescriptor, ValueFn,
    };
    pub use crate::error::{HookError, HookResult, RegistryError, ValueError, ValueResult};
    pub use crate::exchange::{ApiRequest, ApiResponse, Context, Exchange};
    pub use crate::id::FunctionId;
    pub use crate::library::{Library, LibraryBuilder};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _ = FunctionId::new("test");
        let _ = Library::builder();
        let _ = Flag::default();
    }

    #[test]
    fn test_builtin_end_to_end() {
        let library = builtin::builtin_library().unwrap();

        let is_int = library.get_assertion_function("reapi-is-int").unwrap();
        assert!(is_int.call(&[json!(42)]).unwrap().passed);
        assert!(!is_int.call(&[json!("42")]).unwrap().passed);

        let from_ts = library
            .get_value_function("reapi-date-time-from-timestamp")
            .unwrap();
        let iso = from_ts.call(&[json!(0)]).unwrap().unwrap();
        assert_eq!(iso, json!("1970-01-01T00:00:00.000Z"));
    }
}
