//! # reapi-ext - Extension Functions for reapi
//!
//! reapi-ext is a library of custom functions a reapi host discovers by id:
//! assertions that judge a value, generators and transformers that produce
//! one, and API hooks that run around an HTTP request.
//!
//! ## Features
//!
//! - **Discovery**: Four immutable registries with typed descriptors
//! - **Built-ins**: Integer and geo-location assertions, clock generators,
//!   date transformers and a request/response hook pair
//! - **Host harness**: Invoke by id, honour descriptor flags, drive a full
//!   request lifecycle with a failure policy
//! - **Embeddable**: Add your own descriptors next to the built-ins
//!
//! ## Quick Start
//!
//! ```ignore
//! use reapi_ext::prelude::*;
//! use serde_json::json;
//!
//! let extension = ReapiExt::builder()
//!     .with_assertion(AssertionDescriptor::new(
//!         DescriptorMeta::new("my-is-positive").with_display_name("Is Positive"),
//!         AssertionFn::actual(|v| AssertionResult::new(v.as_f64().is_some_and(|n| n > 0.0))),
//!     ))
//!     .build()?;
//!
//! let harness = extension.harness();
//! assert!(harness.assert("my-is-positive", &[json!(3)])?.passed);
//! assert!(harness.assert("reapi-is-int", &[json!(3)])?.passed);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Host / reapi-ext CLI                   │
//! ├─────────────────────────────────────────────────────────┤
//! │                   reapi-ext (facade)                    │
//! │                  ┌──────────────────┐                   │
//! │                  │ ReapiExt Builder │                   │
//! │                  └────────┬─────────┘                   │
//! │                           │                             │
//! │  ┌────────────────────────┴─┬──────────────────────────┐ │
//! │  │ reapi-ext-core           │ reapi-ext-host           │ │
//! │  │ (descriptors, registries,│ (harness, callbacks,     │ │
//! │  │  built-in functions)     │  config)                 │ │
//! │  └──────────────────────────┴──────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use reapi_ext_core::builtin;
use reapi_ext_core::{
    AssertionDescriptor, AssertionFn, DescriptorSummary, HookDescriptor, LibraryBuilder,
    RegistryError, SharedHook, SharedLibrary, ValueDescriptor, ValueFn,
};
use reapi_ext_host::{
    Harness, HookFailurePolicy, HostCallbacks, HostConfig, HostError, SharedCallbacks,
    TracingHost,
};
use tracing::info;

// Re-export from sub-crates
pub use reapi_ext_core;
pub use reapi_ext_host;

static DEFAULT_LIBRARY: OnceLock<SharedLibrary> = OnceLock::new();

/// The built-in library, built on first use and shared afterwards.
pub fn default_library() -> Result<SharedLibrary, ReapiError> {
    if let Some(library) = DEFAULT_LIBRARY.get() {
        return Ok(Arc::clone(library));
    }
    let library = builtin::builtin_library()?.into_shared();
    Ok(Arc::clone(DEFAULT_LIBRARY.get_or_init(|| library)))
}

/// Main entry point for reapi-ext.
pub struct ReapiExt;

impl ReapiExt {
    /// Create a new extension builder.
    pub fn builder() -> ReapiExtBuilder {
        ReapiExtBuilder::new()
    }

    /// Create an extension with the built-ins and default configuration.
    pub fn with_defaults() -> Result<Extension, ReapiError> {
        ReapiExtBuilder::new().build()
    }
}

/// Builder for configuring an [`Extension`].
pub struct ReapiExtBuilder {
    builtins: bool,
    config: HostConfig,
    callbacks: Option<SharedCallbacks>,
    assertions: Vec<AssertionDescriptor>,
    generators: Vec<ValueDescriptor>,
    transformers: Vec<ValueDescriptor>,
    hooks: Vec<HookDescriptor>,
}

impl ReapiExtBuilder {
    /// Create a new builder with the built-ins enabled.
    pub fn new() -> Self {
        Self {
            builtins: true,
            config: HostConfig::default(),
            callbacks: None,
            assertions: Vec::new(),
            generators: Vec::new(),
            transformers: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Include or leave out the built-in functions.
    pub fn with_builtins(mut self, enabled: bool) -> Self {
        self.builtins = enabled;
        self
    }

    // Functions

    /// Add an assertion.
    pub fn with_assertion(mut self, descriptor: AssertionDescriptor) -> Self {
        self.assertions.push(descriptor);
        self
    }

    /// Add a value generator.
    pub fn with_generator(mut self, descriptor: ValueDescriptor) -> Self {
        self.generators.push(descriptor);
        self
    }

    /// Add a transformer.
    pub fn with_transformer(mut self, descriptor: ValueDescriptor) -> Self {
        self.transformers.push(descriptor);
        self
    }

    /// Add an API hook.
    pub fn with_hook(mut self, descriptor: HookDescriptor) -> Self {
        self.hooks.push(descriptor);
        self
    }

    // Host configuration

    /// Replace the host configuration.
    pub fn with_config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the hook failure policy.
    pub fn with_hook_failure_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.config.hook_failure_policy = policy;
        self
    }

    /// Set the per-hook timeout.
    pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_hook_timeout(timeout);
        self
    }

    /// Set the receiver for assertion results and generated values.
    ///
    /// Defaults to [`TracingHost`].
    pub fn with_callbacks(mut self, callbacks: Arc<dyn HostCallbacks>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    /// Build the extension.
    ///
    /// Built-ins are registered first, then the added descriptors in the
    /// order they were given. Any id appearing twice fails the build.
    pub fn build(self) -> Result<Extension, ReapiError> {
        self.config.validate()?;

        let mut library = LibraryBuilder::new();
        if self.builtins {
            builtin::register_builtins(&mut library);
        }
        for descriptor in self.assertions {
            library.add_assertion(descriptor);
        }
        for descriptor in self.generators {
            library.add_generator(descriptor);
        }
        for descriptor in self.transformers {
            library.add_transformer(descriptor);
        }
        for descriptor in self.hooks {
            library.add_hook(descriptor);
        }
        let library = library.build()?.into_shared();

        info!(
            functions = library.len(),
            builtins = self.builtins,
            "Extension ready"
        );
        Ok(Extension {
            library,
            config: self.config,
            callbacks: self.callbacks.unwrap_or_else(|| Arc::new(TracingHost)),
        })
    }
}

impl Default for ReapiExtBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured extension library.
#[derive(Clone)]
pub struct Extension {
    library: SharedLibrary,
    config: HostConfig,
    callbacks: SharedCallbacks,
}

impl Extension {
    /// Get the function library.
    pub fn library(&self) -> &SharedLibrary {
        &self.library
    }

    /// Get the host configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Create a harness using the configured callbacks.
    pub fn harness(&self) -> Harness {
        self.harness_with(Arc::clone(&self.callbacks))
    }

    /// Create a harness that reports to other callbacks.
    pub fn harness_with(&self, callbacks: SharedCallbacks) -> Harness {
        Harness::new(Arc::clone(&self.library), self.config.clone(), callbacks)
    }

    /// Resolve an assertion callable by id.
    pub fn get_assertion_function(&self, id: &str) -> Option<AssertionFn> {
        self.library.get_assertion_function(id)
    }

    /// Resolve a generator or transformer callable by id.
    pub fn get_value_function(&self, id: &str) -> Option<ValueFn> {
        self.library.get_value_function(id)
    }

    /// Resolve a hook callable by id.
    pub fn get_api_hook(&self, id: &str) -> Option<SharedHook> {
        self.library.get_api_hook(id)
    }

    /// Every listing entry, hidden ones included.
    pub fn summaries(&self) -> Vec<DescriptorSummary> {
        self.library.summaries()
    }
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("functions", &self.library.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Errors from building or driving an extension.
#[derive(Debug, thiserror::Error)]
pub enum ReapiError {
    /// Registry error.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Host error.
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Main types
    pub use crate::{Extension, ReapiError, ReapiExt, ReapiExtBuilder, default_library};

    // Core types
    pub use reapi_ext_core::{
        ApiHookFn, ApiRequest, ApiResponse, AssertionDescriptor, AssertionFn, AssertionResult,
        Context, Descriptor, DescriptorMeta, Exchange, Flag, FunctionId, HookDescriptor,
        HookError, HookResult, HookType, Library, ValueDescriptor, ValueError, ValueFn,
        ValueResult,
    };

    // Host types
    pub use reapi_ext_host::{
        CollectingHost, ExchangeOutcome, Harness, HookFailurePolicy, HostCallbacks, HostConfig,
        HostError, TracingHost,
    };

    // Common std types
    pub use std::sync::Arc;
    pub use std::time::Duration;
}
