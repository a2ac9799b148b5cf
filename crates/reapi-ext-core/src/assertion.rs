//! Assertion results reported back to the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single assertion invocation.
///
/// Exactly one result is produced per invocation. The host receives it
/// through its `add_assertion_result` callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    /// Whether the assertion passed.
    pub passed: bool,
    /// The actual value under test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_value: Option<Value>,
    /// The expected value, for two-argument assertions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_value: Option<Value>,
    /// Additional options the assertion ran with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Human-readable outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl AssertionResult {
    /// Create a passing result.
    pub fn pass() -> Self {
        Self::new(true)
    }

    /// Create a failing result.
    pub fn fail() -> Self {
        Self::new(false)
    }

    /// Create a result with the given outcome.
    pub fn new(passed: bool) -> Self {
        Self {
            passed,
            left_value: None,
            right_value: None,
            options: None,
            message: None,
            meta: None,
        }
    }

    /// Set the actual value.
    pub fn with_left_value(mut self, value: Value) -> Self {
        self.left_value = Some(value);
        self
    }

    /// Set the expected value.
    pub fn with_right_value(mut self, value: Value) -> Self {
        self.right_value = Some(value);
        self
    }

    /// Set the options.
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the metadata.
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}
