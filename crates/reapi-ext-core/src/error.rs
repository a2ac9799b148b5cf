//! Error types for the extension library.
//!
//! Registry construction errors are fatal and surface at load time. Value and
//! hook errors are raised while a function runs and are handed to the host
//! untouched; the library never retries or recovers.

use thiserror::Error;

use crate::id::FunctionId;

/// Errors raised while assembling registries.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An id was registered more than once.
    #[error("Duplicate function id: {0}")]
    DuplicateId(FunctionId),

    /// A descriptor failed validation.
    #[error("Invalid descriptor '{id}': {reason}")]
    InvalidDescriptor {
        /// The offending descriptor id.
        id: FunctionId,
        /// Why it was rejected.
        reason: String,
    },
}

/// A callable was invoked with the wrong number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected} argument(s), got {actual}")]
pub struct ArityMismatch {
    /// Arguments the callable takes.
    pub expected: usize,
    /// Arguments supplied.
    pub actual: usize,
}

/// Errors from the geo helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A coordinate could not be resolved to latitude/longitude.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The lower bound of a range exceeds the upper bound.
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
}

/// Errors raised by value generators and transformers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// The input could not be interpreted by the function.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A geo helper failed.
    #[error("Geo error: {0}")]
    Geo(#[from] GeoError),
}

/// Errors raised inside an API hook body.
#[derive(Debug, Error)]
pub enum HookError {
    /// An after-request hook ran without a response on the exchange.
    #[error("No response available on exchange")]
    MissingResponse,

    /// A value helper used by the hook failed.
    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    /// Geo helper failure inside a hook.
    #[error("Geo error: {0}")]
    Geo(#[from] GeoError),

    /// Generic hook failure.
    #[error("Hook failed: {0}")]
    Failed(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Result type for value functions.
pub type ValueResult<T> = std::result::Result<T, ValueError>;

/// Result type for hooks.
pub type HookResult<T> = std::result::Result<T, HookError>;

/// Result type for geo helpers.
pub type GeoResult<T> = std::result::Result<T, GeoError>;
