//! Configuration for the host harness.
//!
//! A [`HostConfig`] decides how strictly the harness treats descriptor flags
//! and what happens when a hook fails. It can be built in code or loaded
//! from TOML:
//!
//! ```toml
//! hook_failure_policy = "continue"
//! hook_timeout_ms = 2000
//! reject_deprecated = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};

/// What the harness does when a hook fails or times out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookFailurePolicy {
    /// Stop the exchange and return the error.
    #[default]
    Abort,
    /// Log the failure, record it, and carry on with the next hook.
    Continue,
}

/// Host harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Policy for failing hooks.
    pub hook_failure_policy: HookFailurePolicy,

    /// Per-hook timeout in milliseconds. `None` waits indefinitely.
    pub hook_timeout_ms: Option<u64>,

    /// Allow invoking functions whose `enabled` flag is explicitly false.
    pub invoke_disabled: bool,

    /// Refuse deprecated functions instead of warning.
    pub reject_deprecated: bool,

    /// Omit functions explicitly marked untested from listings.
    pub hide_untested: bool,
}

impl HostConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hook failure policy.
    pub fn with_hook_failure_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.hook_failure_policy = policy;
        self
    }

    /// Set the per-hook timeout.
    pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
        self.hook_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// Allow or refuse disabled functions.
    pub fn with_invoke_disabled(mut self, allow: bool) -> Self {
        self.invoke_disabled = allow;
        self
    }

    /// Refuse or merely warn about deprecated functions.
    pub fn with_reject_deprecated(mut self, reject: bool) -> Self {
        self.reject_deprecated = reject;
        self
    }

    /// Hide or show untested functions in listings.
    pub fn with_hide_untested(mut self, hide: bool) -> Self {
        self.hide_untested = hide;
        self
    }

    /// The per-hook timeout, if any.
    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hook_timeout_ms.map(Duration::from_millis)
    }

    /// A configuration that refuses anything questionable.
    ///
    /// Deprecated functions are rejected, untested ones hidden, and hooks
    /// are cut off after five seconds.
    pub fn strict() -> Self {
        Self {
            hook_failure_policy: HookFailurePolicy::Abort,
            hook_timeout_ms: Some(5_000),
            invoke_disabled: false,
            reject_deprecated: true,
            hide_untested: true,
        }
    }

    /// A configuration that lets everything through and tolerates failing
    /// hooks.
    pub fn permissive() -> Self {
        Self {
            hook_failure_policy: HookFailurePolicy::Continue,
            hook_timeout_ms: None,
            invoke_disabled: true,
            reject_deprecated: false,
            hide_untested: false,
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(source: &str) -> HostResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| HostError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check the configuration for values the harness cannot honour.
    pub fn validate(&self) -> HostResult<()> {
        if self.hook_timeout_ms == Some(0) {
            return Err(HostError::Config(
                "hook_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostConfig::default();
        assert_eq!(config.hook_failure_policy, HookFailurePolicy::Abort);
        assert!(config.hook_timeout().is_none());
        assert!(!config.invoke_disabled);
        assert!(!config.reject_deprecated);
        assert!(!config.hide_untested);
    }

    #[test]
    fn test_builder() {
        let config = HostConfig::new()
            .with_hook_failure_policy(HookFailurePolicy::Continue)
            .with_hook_timeout(Duration::from_millis(250))
            .with_reject_deprecated(true);

        assert_eq!(config.hook_failure_policy, HookFailurePolicy::Continue);
        assert_eq!(config.hook_timeout(), Some(Duration::from_millis(250)));
        assert!(config.reject_deprecated);
    }

    #[test]
    fn test_presets() {
        let strict = HostConfig::strict();
        assert!(strict.reject_deprecated);
        assert!(strict.hide_untested);
        assert_eq!(strict.hook_failure_policy, HookFailurePolicy::Abort);

        let permissive = HostConfig::permissive();
        assert!(permissive.invoke_disabled);
        assert_eq!(permissive.hook_failure_policy, HookFailurePolicy::Continue);
    }

    #[test]
    fn test_from_toml() {
        let config = HostConfig::from_toml_str(
            r#"
            hook_failure_policy = "continue"
            hook_timeout_ms = 2000
            hide_untested = true
            "#,
        )
        .unwrap();

        assert_eq!(config.hook_failure_policy, HookFailurePolicy::Continue);
        assert_eq!(config.hook_timeout(), Some(Duration::from_secs(2)));
        assert!(config.hide_untested);
        assert!(!config.reject_deprecated);
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(HostConfig::from_toml_str("").unwrap(), HostConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(matches!(
            HostConfig::from_toml_str("hook_failure_policy = \"retry\""),
            Err(HostError::Config(_))
        ));
        assert!(matches!(
            HostConfig::from_toml_str("unknown_key = 1"),
            Err(HostError::Config(_))
        ));
        assert!(matches!(
            HostConfig::from_toml_str("hook_timeout_ms = 0"),
            Err(HostError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = HostConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, HostError::Io(_)));
    }
}
