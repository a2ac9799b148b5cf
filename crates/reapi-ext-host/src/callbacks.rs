//! Host callbacks.
//!
//! The library reports back to the host through exactly two channels:
//! assertion results and generated values. Hosts implement
//! [`HostCallbacks`] to receive them.

use std::sync::Arc;

use parking_lot::Mutex;
use reapi_ext_core::AssertionResult;
use serde_json::Value;

/// Receiver for values the library hands back to the host.
pub trait HostCallbacks: Send + Sync {
    /// Called exactly once per assertion invocation.
    fn add_assertion_result(&self, result: AssertionResult);

    /// Called at most once per value function invocation.
    fn set_generated_value(&self, value: Value);
}

/// A shared callback receiver.
pub type SharedCallbacks = Arc<dyn HostCallbacks>;

/// Callbacks that record everything they receive.
#[derive(Debug, Default)]
pub struct CollectingHost {
    assertion_results: Mutex<Vec<AssertionResult>>,
    generated_values: Mutex<Vec<Value>>,
}

impl CollectingHost {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded assertion results.
    pub fn assertion_results(&self) -> Vec<AssertionResult> {
        self.assertion_results.lock().clone()
    }

    /// Recorded generated values.
    pub fn generated_values(&self) -> Vec<Value> {
        self.generated_values.lock().clone()
    }

    /// Most recent assertion result.
    pub fn last_assertion_result(&self) -> Option<AssertionResult> {
        self.assertion_results.lock().last().cloned()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.assertion_results.lock().clear();
        self.generated_values.lock().clear();
    }
}

impl HostCallbacks for CollectingHost {
    fn add_assertion_result(&self, result: AssertionResult) {
        self.assertion_results.lock().push(result);
    }

    fn set_generated_value(&self, value: Value) {
        self.generated_values.lock().push(value);
    }
}

/// Callbacks that log what they receive.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHost;

impl HostCallbacks for TracingHost {
    fn add_assertion_result(&self, result: AssertionResult) {
        if result.passed {
            tracing::info!(
                passed = true,
                message = result.message.as_deref().unwrap_or(""),
                "Assertion result"
            );
        } else {
            tracing::warn!(
                passed = false,
                message = result.message.as_deref().unwrap_or(""),
                "Assertion result"
            );
        }
    }

    fn set_generated_value(&self, value: Value) {
        tracing::info!(value = %value, "Generated value");
    }
}

/// Callbacks that discard everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostCallbacks for NullHost {
    fn add_assertion_result(&self, _result: AssertionResult) {}

    fn set_generated_value(&self, _value: Value) {}
}
