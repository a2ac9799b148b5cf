//! Error types for the host harness.

use std::time::Duration;

use reapi_ext_core::{ArityMismatch, FunctionId, HookError, HookType, ValueError};
use thiserror::Error;

/// Errors raised while resolving or invoking functions on behalf of a host.
#[derive(Debug, Error)]
pub enum HostError {
    /// No function of the requested kind has this id.
    #[error("Unknown {kind} function: {id}")]
    UnknownFunction {
        /// Registry that was searched.
        kind: &'static str,
        /// The requested id.
        id: String,
    },

    /// The function was called with the wrong number of arguments.
    #[error("Function '{id}' called with wrong arity: {source}")]
    Arity {
        /// Function id.
        id: FunctionId,
        /// Expected vs. supplied counts.
        source: ArityMismatch,
    },

    /// A hook was run at the wrong lifecycle stage.
    #[error("Hook '{id}' runs at {declared}, not {requested}")]
    StageMismatch {
        /// Hook id.
        id: FunctionId,
        /// Stage the hook declares.
        declared: HookType,
        /// Stage it was invoked at.
        requested: HookType,
    },

    /// The function is explicitly disabled.
    #[error("Function is disabled: {0}")]
    Disabled(FunctionId),

    /// The function is deprecated and the host refuses deprecated functions.
    #[error("Function is deprecated: {0}")]
    Deprecated(FunctionId),

    /// A value function failed.
    #[error("Value function '{id}' failed: {source}")]
    Value {
        /// Function id.
        id: FunctionId,
        /// Underlying failure.
        source: ValueError,
    },

    /// A hook body failed.
    #[error("Hook '{id}' failed: {source}")]
    Hook {
        /// Hook id.
        id: FunctionId,
        /// Underlying failure.
        source: HookError,
    },

    /// A hook did not finish in time.
    #[error("Hook '{id}' timed out after {timeout:?}")]
    Timeout {
        /// Hook id.
        id: FunctionId,
        /// The configured limit.
        timeout: Duration,
    },

    /// The host's transport failed to produce a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid host configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    /// Check if the error comes from inside a hook (failure or timeout).
    pub fn is_hook_failure(&self) -> bool {
        matches!(self, HostError::Hook { .. } | HostError::Timeout { .. })
    }
}

/// Result type for host operations.
pub type HostResult<T> = std::result::Result<T, HostError>;
