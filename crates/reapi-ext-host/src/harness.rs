//! Invocation harness.
//!
//! The [`Harness`] plays the part of the host: it resolves functions by id,
//! applies the descriptor flags according to its [`HostConfig`], invokes the
//! callables and routes their output to the host callbacks. For hooks it
//! drives the full request lifecycle around a transport closure supplied by
//! the caller.

use std::future::Future;

use reapi_ext_core::{
    ApiRequest, ApiResponse, AssertionResult, Descriptor, DescriptorMeta, DescriptorSummary,
    Exchange, FunctionId, HookType, Registry, SharedLibrary,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::callbacks::SharedCallbacks;
use crate::config::{HookFailurePolicy, HostConfig};
use crate::error::{HostError, HostResult};

/// A hook failure the harness tolerated under [`HookFailurePolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookFailure {
    /// Hook id.
    pub id: FunctionId,
    /// Stage it ran at.
    pub stage: HookType,
    /// Rendered error.
    pub message: String,
}

/// Result of driving one exchange through its hooks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeOutcome {
    /// The exchange after every hook has run.
    pub exchange: Exchange,
    /// Failures that did not stop the exchange.
    pub tolerated: Vec<HookFailure>,
}

impl ExchangeOutcome {
    /// Check if every hook succeeded.
    pub fn is_clean(&self) -> bool {
        self.tolerated.is_empty()
    }
}

/// Host-side driver for a function library.
#[derive(Clone)]
pub struct Harness {
    library: SharedLibrary,
    config: HostConfig,
    callbacks: SharedCallbacks,
}

impl Harness {
    /// Create a harness.
    pub fn new(library: SharedLibrary, config: HostConfig, callbacks: SharedCallbacks) -> Self {
        Self {
            library,
            config,
            callbacks,
        }
    }

    /// The library being driven.
    pub fn library(&self) -> &SharedLibrary {
        &self.library
    }

    /// The active configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Evaluate an assertion and deliver its result to the host.
    ///
    /// `args` is `[actual]` or `[actual, expected]` depending on the
    /// assertion's parameter count. The result is handed to
    /// `add_assertion_result` exactly once and also returned.
    pub fn assert(&self, id: &str, args: &[Value]) -> HostResult<AssertionResult> {
        let descriptor = self
            .library
            .get_assertion_descriptor(id)
            .ok_or_else(|| unknown("assertion", id))?;
        self.admit(&descriptor.meta)?;

        let result = descriptor
            .function
            .call(args)
            .map_err(|source| HostError::Arity {
                id: descriptor.meta.id.clone(),
                source,
            })?;

        debug!(id, passed = result.passed, "Assertion evaluated");
        self.callbacks.add_assertion_result(result.clone());
        Ok(result)
    }

    /// Run a generator or transformer and deliver its value to the host.
    ///
    /// Generators take no arguments, transformers take one. Nothing is
    /// delivered when the function fails.
    pub fn value(&self, id: &str, args: &[Value]) -> HostResult<Value> {
        let descriptor = self
            .library
            .get_value_descriptor(id)
            .ok_or_else(|| unknown("value", id))?;
        self.admit(&descriptor.meta)?;

        let value = descriptor
            .function
            .call(args)
            .map_err(|source| HostError::Arity {
                id: descriptor.meta.id.clone(),
                source,
            })?
            .map_err(|source| HostError::Value {
                id: descriptor.meta.id.clone(),
                source,
            })?;

        debug!(id, kind = %descriptor.kind(), "Value produced");
        self.callbacks.set_generated_value(value.clone());
        Ok(value)
    }

    /// Run a single hook against an exchange.
    ///
    /// The hook must be registered for `stage`. When a hook timeout is
    /// configured, the hook is abandoned once it expires; any mutations it
    /// made before that point stay on the exchange.
    pub async fn run_hook(
        &self,
        id: &str,
        stage: HookType,
        exchange: &mut Exchange,
    ) -> HostResult<()> {
        let descriptor = self
            .library
            .get_hook_descriptor(id)
            .ok_or_else(|| unknown("hook", id))?;
        self.admit(&descriptor.meta)?;

        if descriptor.hook_type != stage {
            return Err(HostError::StageMismatch {
                id: descriptor.meta.id.clone(),
                declared: descriptor.hook_type,
                requested: stage,
            });
        }

        let hook = descriptor.function.clone();
        let id = descriptor.meta.id.clone();
        debug!(id = %id, stage = %stage, exchange = %exchange.id, "Running hook");

        let result = match self.config.hook_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, hook.call(exchange))
                .await
                .map_err(|_| HostError::Timeout {
                    id: id.clone(),
                    timeout,
                })?,
            None => hook.call(exchange).await,
        };

        result.map_err(|source| HostError::Hook { id, source })
    }

    /// Drive an exchange through its full lifecycle.
    ///
    /// Before-request hooks run in order, then `send` turns the (possibly
    /// modified) request into a response, then after-request hooks run in
    /// order. The context is shared across all of them.
    ///
    /// Hook failures and timeouts follow the configured
    /// [`HookFailurePolicy`]. Unknown ids, stage mismatches, refused flags
    /// and transport errors always abort.
    pub async fn run_exchange<I, F, Fut>(
        &self,
        mut exchange: Exchange,
        before: &[I],
        send: F,
        after: &[I],
    ) -> HostResult<ExchangeOutcome>
    where
        I: AsRef<str>,
        F: FnOnce(ApiRequest) -> Fut,
        Fut: Future<Output = HostResult<ApiResponse>>,
    {
        let mut tolerated = Vec::new();

        self.run_stage(HookType::BeforeRequest, before, &mut exchange, &mut tolerated)
            .await?;

        let response = send(exchange.request.clone()).await?;
        debug!(exchange = %exchange.id, status = response.status, "Response received");
        exchange.response = Some(response);

        self.run_stage(HookType::AfterRequest, after, &mut exchange, &mut tolerated)
            .await?;

        info!(
            exchange = %exchange.id,
            tolerated = tolerated.len(),
            "Exchange complete"
        );
        Ok(ExchangeOutcome {
            exchange,
            tolerated,
        })
    }

    async fn run_stage<I: AsRef<str>>(
        &self,
        stage: HookType,
        ids: &[I],
        exchange: &mut Exchange,
        tolerated: &mut Vec<HookFailure>,
    ) -> HostResult<()> {
        for id in ids {
            let id = id.as_ref();
            match self.run_hook(id, stage, exchange).await {
                Ok(()) => {}
                Err(e)
                    if e.is_hook_failure()
                        && self.config.hook_failure_policy == HookFailurePolicy::Continue =>
                {
                    warn!(id, stage = %stage, error = %e, "Hook failed, continuing");
                    tolerated.push(HookFailure {
                        id: FunctionId::new(id.to_string()),
                        stage,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Every listing entry the host should surface, in registry order.
    pub fn visible_summaries(&self) -> Vec<DescriptorSummary> {
        let mut all = self.visible_assertions();
        all.extend(self.visible_generators());
        all.extend(self.visible_transformers());
        all.extend(self.visible_hooks());
        all
    }

    /// Assertions the host should surface.
    pub fn visible_assertions(&self) -> Vec<DescriptorSummary> {
        self.visible(self.library.assertions())
    }

    /// Generators the host should surface.
    pub fn visible_generators(&self) -> Vec<DescriptorSummary> {
        self.visible(self.library.generators())
    }

    /// Transformers the host should surface.
    pub fn visible_transformers(&self) -> Vec<DescriptorSummary> {
        self.visible(self.library.transformers())
    }

    /// Hooks the host should surface.
    pub fn visible_hooks(&self) -> Vec<DescriptorSummary> {
        self.visible(self.library.hooks())
    }

    fn visible<D: Descriptor>(&self, registry: &Registry<D>) -> Vec<DescriptorSummary> {
        registry
            .iter()
            .filter(|d| self.is_visible(d.meta()))
            .map(|d| d.summary())
            .collect()
    }

    fn is_visible(&self, meta: &DescriptorMeta) -> bool {
        !meta.enabled.is_false() && !(self.config.hide_untested && meta.tested.is_false())
    }

    // Only explicit flags count; unspecified is treated as permissive.
    fn admit(&self, meta: &DescriptorMeta) -> HostResult<()> {
        if meta.enabled.is_false() && !self.config.invoke_disabled {
            return Err(HostError::Disabled(meta.id.clone()));
        }
        if meta.deprecated.is_true() {
            if self.config.reject_deprecated {
                return Err(HostError::Deprecated(meta.id.clone()));
            }
            warn!(id = %meta.id, "Invoking deprecated function");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("functions", &self.library.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn unknown(kind: &'static str, id: &str) -> HostError {
    debug!(kind, id, "Unknown function");
    HostError::UnknownFunction {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::CollectingHost;
    use async_trait::async_trait;
    use reapi_ext_core::builtin::{self, ids};
    use reapi_ext_core::{
        ApiHookFn, AssertionDescriptor, AssertionFn, HookDescriptor, HookError, HookResult,
        Library, ValueDescriptor, ValueFn,
    };
    use serde_json::{Map, json};
    use std::sync::Arc;
    use std::time::Duration;

    struct Failing;

    #[async_trait]
    impl ApiHookFn for Failing {
        async fn call(&self, exchange: &mut Exchange) -> HookResult<()> {
            exchange.context.insert("failing", true);
            Err(HookError::Failed("boom".to_string()))
        }
    }

    struct Slow;

    #[async_trait]
    impl ApiHookFn for Slow {
        async fn call(&self, _exchange: &mut Exchange) -> HookResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    fn library() -> SharedLibrary {
        let mut builder = Library::builder();
        builtin::register_builtins(&mut builder);
        builder
            .with_assertion(AssertionDescriptor::new(
                DescriptorMeta::new("test-disabled").with_enabled(false),
                AssertionFn::actual(|_| AssertionResult::pass()),
            ))
            .with_assertion(AssertionDescriptor::new(
                DescriptorMeta::new("test-equals").with_tested(false),
                AssertionFn::actual_expected(|a, e| AssertionResult::new(a == e)),
            ))
            .with_generator(ValueDescriptor::new(
                DescriptorMeta::new("test-old").with_deprecated(true),
                ValueFn::nullary(|| Ok(json!("old"))),
            ))
            .with_hook(HookDescriptor::new(
                DescriptorMeta::new("test-failing").with_display_name("Failing"),
                HookType::BeforeRequest,
                Failing,
            ))
            .with_hook(HookDescriptor::new(
                DescriptorMeta::new("test-slow").with_display_name("Slow"),
                HookType::AfterRequest,
                Slow,
            ))
            .build()
            .unwrap()
            .into_shared()
    }

    fn setup(config: HostConfig) -> (Harness, Arc<CollectingHost>) {
        let host = Arc::new(CollectingHost::new());
        let harness = Harness::new(library(), config, host.clone());
        (harness, host)
    }

    fn payload() -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("id".to_string(), json!(1));
        data
    }

    async fn respond(_request: ApiRequest) -> HostResult<ApiResponse> {
        Ok(ApiResponse::ok().with_data(payload()))
    }

    #[test]
    fn test_assert_delivers_once() {
        let (harness, host) = setup(HostConfig::default());

        let result = harness.assert(ids::IS_INT, &[json!(3)]).unwrap();
        assert!(result.passed);
        assert_eq!(host.assertion_results(), vec![result]);

        let result = harness.assert(ids::IS_INT, &[json!(3.5)]).unwrap();
        assert!(!result.passed);
        assert_eq!(host.assertion_results().len(), 2);
    }

    #[test]
    fn test_assert_two_params() {
        let (harness, host) = setup(HostConfig::default());

        let result = harness
            .assert("test-equals", &[json!("a"), json!("a")])
            .unwrap();
        assert!(result.passed);
        assert_eq!(host.assertion_results().len(), 1);
    }

    #[test]
    fn test_assert_arity_mismatch_delivers_nothing() {
        let (harness, host) = setup(HostConfig::default());

        let err = harness.assert("test-equals", &[json!("a")]).unwrap_err();
        assert!(matches!(err, HostError::Arity { .. }));
        assert!(host.assertion_results().is_empty());
    }

    #[test]
    fn test_unknown_ids() {
        let (harness, host) = setup(HostConfig::default());

        assert!(matches!(
            harness.assert("nope", &[json!(1)]),
            Err(HostError::UnknownFunction { kind: "assertion", .. })
        ));
        assert!(matches!(
            harness.value(ids::IS_INT, &[json!(1)]),
            Err(HostError::UnknownFunction { kind: "value", .. })
        ));
        assert!(host.assertion_results().is_empty());
        assert!(host.generated_values().is_empty());
    }

    #[test]
    fn test_value_generator_and_transformer() {
        let (harness, host) = setup(HostConfig::default());

        let formatted = harness
            .value(ids::FORMAT_TIMESTAMP, &[json!(1_704_067_200_000_i64)])
            .unwrap();
        assert_eq!(formatted, json!("2024-01-01 00:00:00"));

        let now = harness.value(ids::NOW_TIMESTAMP, &[]).unwrap();
        assert!(now.as_i64().unwrap() > 1_704_067_200_000);

        assert_eq!(host.generated_values().len(), 2);
    }

    #[test]
    fn test_value_failure_delivers_nothing() {
        let (harness, host) = setup(HostConfig::default());

        let err = harness
            .value(ids::FORMAT_TIMESTAMP, &[json!("soon")])
            .unwrap_err();
        assert!(matches!(err, HostError::Value { .. }));
        assert!(host.generated_values().is_empty());
    }

    #[test]
    fn test_disabled_refused_unless_allowed() {
        let (strict, _) = setup(HostConfig::default());
        assert!(matches!(
            strict.assert("test-disabled", &[json!(1)]),
            Err(HostError::Disabled(_))
        ));

        let (permissive, _) = setup(HostConfig::permissive());
        assert!(permissive.assert("test-disabled", &[json!(1)]).unwrap().passed);
    }

    #[test]
    fn test_deprecated_warns_or_rejects() {
        let (lenient, _) = setup(HostConfig::default());
        assert_eq!(lenient.value("test-old", &[]).unwrap(), json!("old"));

        let (strict, host) = setup(HostConfig::default().with_reject_deprecated(true));
        assert!(matches!(
            strict.value("test-old", &[]),
            Err(HostError::Deprecated(_))
        ));
        assert!(host.generated_values().is_empty());
    }

    #[test]
    fn test_visible_listings() {
        let (harness, _) = setup(HostConfig::default());
        let visible: Vec<_> = harness
            .visible_assertions()
            .into_iter()
            .map(|s| s.meta.id)
            .collect();
        assert!(visible.iter().any(|id| id.as_str() == "test-equals"));
        assert!(!visible.iter().any(|id| id.as_str() == "test-disabled"));

        let (hiding, _) = setup(HostConfig::default().with_hide_untested(true));
        assert!(
            !hiding
                .visible_assertions()
                .iter()
                .any(|s| s.meta.id.as_str() == "test-equals")
        );

        // The built-in format-date-time transformer is disabled too.
        let total = harness.visible_summaries().len();
        assert_eq!(total, harness.library().len() - 2);
        assert!(
            !harness
                .visible_transformers()
                .iter()
                .any(|s| s.meta.id.as_str() == ids::FORMAT_DATE_TIME)
        );
    }

    #[tokio::test]
    async fn test_run_hook_stage_mismatch() {
        let (harness, _) = setup(HostConfig::default());
        let mut exchange = Exchange::new(ApiRequest::get("https://api.example.com"));

        let err = harness
            .run_hook(ids::MODIFY_REQUEST_PARAMS, HookType::AfterRequest, &mut exchange)
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::StageMismatch { .. }));
        assert!(exchange.request.headers.is_empty());
    }

    #[tokio::test]
    async fn test_run_exchange_builtin_hand_off() {
        let (harness, _) = setup(HostConfig::default());
        let exchange = Exchange::new(ApiRequest::get("https://api.example.com/users"));

        let outcome = harness
            .run_exchange(
                exchange,
                &[ids::MODIFY_REQUEST_PARAMS],
                |request: ApiRequest| async move {
                    assert_eq!(request.headers["Authorization"], json!("Bearer 1234567890"));
                    respond(request).await
                },
                &[ids::MODIFY_RESPONSE_DATA],
            )
            .await
            .unwrap();

        assert!(outcome.is_clean());
        let exchange = &outcome.exchange;
        let data = exchange.response.as_ref().unwrap().data.as_ref().unwrap();
        assert_eq!(data["foo"], json!("bar"));
        assert_eq!(data["id"], json!(1));
        assert_eq!(exchange.context.get("bar"), Some(&json!("foo")));
    }

    #[tokio::test]
    async fn test_run_exchange_abort_policy() {
        let (harness, _) = setup(HostConfig::default());
        let exchange = Exchange::new(ApiRequest::get("https://api.example.com"));

        let err = harness
            .run_exchange(
                exchange,
                &["test-failing", ids::MODIFY_REQUEST_PARAMS],
                respond,
                &[ids::MODIFY_RESPONSE_DATA],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Hook { .. }));
    }

    #[tokio::test]
    async fn test_run_exchange_continue_policy() {
        let config = HostConfig::default().with_hook_failure_policy(HookFailurePolicy::Continue);
        let (harness, _) = setup(config);
        let exchange = Exchange::new(ApiRequest::get("https://api.example.com"));

        let outcome = harness
            .run_exchange(
                exchange,
                &["test-failing", ids::MODIFY_REQUEST_PARAMS],
                respond,
                &[ids::MODIFY_RESPONSE_DATA],
            )
            .await
            .unwrap();

        assert_eq!(outcome.tolerated.len(), 1);
        assert_eq!(outcome.tolerated[0].id.as_str(), "test-failing");
        assert_eq!(outcome.tolerated[0].stage, HookType::BeforeRequest);

        // Partial mutations from the failed hook are kept.
        assert_eq!(outcome.exchange.context.get("failing"), Some(&json!(true)));
        let data = outcome.exchange.response.as_ref().unwrap().data.as_ref().unwrap();
        assert_eq!(data["foo"], json!("bar"));
    }

    #[tokio::test]
    async fn test_run_exchange_unknown_hook_always_aborts() {
        let (harness, _) = setup(HostConfig::permissive());
        let exchange = Exchange::new(ApiRequest::get("https://api.example.com"));

        let err = harness
            .run_exchange(exchange, &["missing"], respond, &[] as &[&str])
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::UnknownFunction { kind: "hook", .. }));
    }

    #[tokio::test]
    async fn test_hook_timeout() {
        let config = HostConfig::default().with_hook_timeout(Duration::from_millis(20));
        let (harness, _) = setup(config);
        let mut exchange = Exchange::new(ApiRequest::get("https://api.example.com"))
            .with_response(ApiResponse::ok());

        let err = harness
            .run_hook("test-slow", HookType::AfterRequest, &mut exchange)
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Timeout { .. }));
        assert!(err.is_hook_failure());
    }

    #[tokio::test]
    async fn test_transport_error_aborts() {
        let (harness, _) = setup(HostConfig::permissive());
        let exchange = Exchange::new(ApiRequest::get("https://api.example.com"));

        let err = harness
            .run_exchange(
                exchange,
                &[ids::MODIFY_REQUEST_PARAMS],
                |_request: ApiRequest| async {
                    Err::<ApiResponse, _>(HostError::Transport("connection refused".to_string()))
                },
                &[ids::MODIFY_RESPONSE_DATA],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Transport(_)));
    }
}
