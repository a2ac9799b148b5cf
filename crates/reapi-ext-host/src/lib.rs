//! reapi-ext Host Harness
//!
//! This crate drives a function library the way a request runner would:
//!
//! - [`Harness`]: resolves functions by id, applies descriptor flags, invokes
//!   them and runs hooks around a request
//! - [`HostCallbacks`]: the channel through which results reach the host
//! - [`HostConfig`]: failure policy, hook timeout and flag handling
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use reapi_ext_core::builtin::builtin_library;
//! use reapi_ext_host::{CollectingHost, Harness, HostConfig};
//! use serde_json::json;
//!
//! let library = builtin_library()?.into_shared();
//! let host = Arc::new(CollectingHost::new());
//! let harness = Harness::new(library, HostConfig::default(), host.clone());
//!
//! harness.assert("reapi-is-int", &[json!(7)])?;
//! assert!(host.assertion_results()[0].passed);
//! ```

pub mod callbacks;
pub mod config;
pub mod error;
pub mod harness;

// Re-export main types
pub use callbacks::{CollectingHost, HostCallbacks, NullHost, SharedCallbacks, TracingHost};
pub use config::{HookFailurePolicy, HostConfig};
pub use error::{HostError, HostResult};
pub use harness::{ExchangeOutcome, Harness, HookFailure};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::callbacks::{CollectingHost, HostCallbacks, TracingHost};
    pub use crate::config::{HookFailurePolicy, HostConfig};
    pub use crate::error::{HostError, HostResult};
    pub use crate::harness::{ExchangeOutcome, Harness};
}
