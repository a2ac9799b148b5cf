//! Function descriptors.
//!
//! A descriptor is the record the host reads to discover a capability: its
//! id, presentation metadata, status flags and the callable itself. There is
//! one descriptor type per registry:
//!
//! - [`AssertionDescriptor`]: predicates reporting an [`AssertionResult`]
//! - [`ValueDescriptor`]: value generators and transformers
//! - [`HookDescriptor`]: async hooks run around an HTTP exchange
//!
//! Descriptors are immutable once registered.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assertion::AssertionResult;
use crate::error::{ArityMismatch, HookResult, RegistryError, RegistryResult, ValueResult};
use crate::exchange::Exchange;
use crate::id::FunctionId;

/// Tri-state status flag.
///
/// `Unspecified` means the author said nothing; it is not a synonym for
/// `False`. Serialized as `true`, `false` or `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Flag {
    /// Explicitly set.
    True,
    /// Explicitly cleared.
    False,
    /// Not stated.
    #[default]
    Unspecified,
}

impl Flag {
    /// Check if explicitly set.
    pub fn is_true(self) -> bool {
        matches!(self, Flag::True)
    }

    /// Check if explicitly cleared.
    pub fn is_false(self) -> bool {
        matches!(self, Flag::False)
    }

    /// Check if not stated.
    pub fn is_unspecified(self) -> bool {
        matches!(self, Flag::Unspecified)
    }

    /// Convert to an optional boolean.
    pub fn as_option(self) -> Option<bool> {
        match self {
            Flag::True => Some(true),
            Flag::False => Some(false),
            Flag::Unspecified => None,
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Flag::True } else { Flag::False }
    }
}

impl From<Option<bool>> for Flag {
    fn from(value: Option<bool>) -> Self {
        value.map(Flag::from).unwrap_or(Flag::Unspecified)
    }
}

impl From<Flag> for Option<bool> {
    fn from(flag: Flag) -> Self {
        flag.as_option()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::True => write!(f, "yes"),
            Flag::False => write!(f, "no"),
            Flag::Unspecified => write!(f, "-"),
        }
    }
}

/// Metadata shared by every descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorMeta {
    /// Stable id.
    pub id: FunctionId,
    /// Name shown in the host UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Still resolvable, but flagged to callers.
    #[serde(default)]
    pub deprecated: Flag,
    /// Whether the host should surface the function.
    #[serde(default)]
    pub enabled: Flag,
    /// Whether the function is covered by tests.
    #[serde(default)]
    pub tested: Flag,
}

impl DescriptorMeta {
    /// Create metadata with every optional field unset.
    pub fn new(id: impl Into<FunctionId>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            description: None,
            deprecated: Flag::Unspecified,
            enabled: Flag::Unspecified,
            tested: Flag::Unspecified,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the deprecated flag.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated.into();
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled.into();
        self
    }

    /// Set the tested flag.
    pub fn with_tested(mut self, tested: bool) -> Self {
        self.tested = tested.into();
        self
    }

    fn validate(&self) -> RegistryResult<()> {
        if !self.id.is_valid() {
            return Err(RegistryError::InvalidDescriptor {
                id: self.id.clone(),
                reason: "id must be non-empty and contain no whitespace".to_string(),
            });
        }
        Ok(())
    }
}

/// Which registry a descriptor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DescriptorKind {
    /// Assertion functions.
    Assertion,
    /// Zero-argument value generators.
    Generator,
    /// Single-argument transformers.
    Transformer,
    /// API hooks.
    Hook,
}

impl DescriptorKind {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            DescriptorKind::Assertion => "assertion",
            DescriptorKind::Generator => "generator",
            DescriptorKind::Transformer => "transformer",
            DescriptorKind::Hook => "hook",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behavior of registry entries.
pub trait Descriptor: Send + Sync + fmt::Debug {
    /// Shared metadata.
    fn meta(&self) -> &DescriptorMeta;

    /// Registry this descriptor belongs to.
    fn kind(&self) -> DescriptorKind;

    /// The descriptor id.
    fn id(&self) -> &FunctionId {
        &self.meta().id
    }

    /// Check the descriptor before it is registered.
    fn validate(&self) -> RegistryResult<()> {
        self.meta().validate()
    }

    /// Serializable listing entry.
    fn summary(&self) -> DescriptorSummary {
        DescriptorSummary::from_meta(self.kind(), self.meta())
    }
}

/// Flattened, serializable view of a descriptor for discovery listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSummary {
    /// Registry the entry belongs to.
    pub kind: DescriptorKind,
    /// Shared metadata.
    #[serde(flatten)]
    pub meta: DescriptorMeta,
    /// Number of parameters the callable takes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_of_params: Option<usize>,
    /// Lifecycle stage, for hooks.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub hook_type: Option<HookType>,
}

impl DescriptorSummary {
    fn from_meta(kind: DescriptorKind, meta: &DescriptorMeta) -> Self {
        Self {
            kind,
            meta: meta.clone(),
            no_of_params: None,
            hook_type: None,
        }
    }
}

type ActualFn = dyn Fn(&Value) -> AssertionResult + Send + Sync;
type ActualExpectedFn = dyn Fn(&Value, &Value) -> AssertionResult + Send + Sync;

/// Callable behind an assertion descriptor.
///
/// The variant encodes the parameter count: `Actual` takes the value under
/// test, `ActualExpected` also takes the expected value.
#[derive(Clone)]
pub enum AssertionFn {
    /// One parameter.
    Actual(Arc<ActualFn>),
    /// Two parameters.
    ActualExpected(Arc<ActualExpectedFn>),
}

impl AssertionFn {
    /// Wrap a one-parameter predicate.
    pub fn actual<F>(f: F) -> Self
    where
        F: Fn(&Value) -> AssertionResult + Send + Sync + 'static,
    {
        AssertionFn::Actual(Arc::new(f))
    }

    /// Wrap a two-parameter predicate.
    pub fn actual_expected<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> AssertionResult + Send + Sync + 'static,
    {
        AssertionFn::ActualExpected(Arc::new(f))
    }

    /// Number of parameters (1 or 2).
    pub fn no_of_params(&self) -> usize {
        match self {
            AssertionFn::Actual(_) => 1,
            AssertionFn::ActualExpected(_) => 2,
        }
    }

    /// Evaluate against positional arguments.
    pub fn call(&self, args: &[Value]) -> Result<AssertionResult, ArityMismatch> {
        match (self, args) {
            (AssertionFn::Actual(f), [actual]) => Ok(f(actual)),
            (AssertionFn::ActualExpected(f), [actual, expected]) => Ok(f(actual, expected)),
            _ => Err(ArityMismatch {
                expected: self.no_of_params(),
                actual: args.len(),
            }),
        }
    }

    /// Check whether two handles point at the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AssertionFn::Actual(a), AssertionFn::Actual(b)) => Arc::ptr_eq(a, b),
            (AssertionFn::ActualExpected(a), AssertionFn::ActualExpected(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for AssertionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionFn")
            .field("no_of_params", &self.no_of_params())
            .finish()
    }
}

type NullaryFn = dyn Fn() -> ValueResult<Value> + Send + Sync;
type UnaryFn = dyn Fn(&Value) -> ValueResult<Value> + Send + Sync;

/// Callable behind a value descriptor.
#[derive(Clone)]
pub enum ValueFn {
    /// Generator: takes nothing.
    Nullary(Arc<NullaryFn>),
    /// Transformer: takes one input.
    Unary(Arc<UnaryFn>),
}

impl ValueFn {
    /// Wrap a generator.
    pub fn nullary<F>(f: F) -> Self
    where
        F: Fn() -> ValueResult<Value> + Send + Sync + 'static,
    {
        ValueFn::Nullary(Arc::new(f))
    }

    /// Wrap a transformer.
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&Value) -> ValueResult<Value> + Send + Sync + 'static,
    {
        ValueFn::Unary(Arc::new(f))
    }

    /// Number of parameters (0 or 1).
    pub fn no_of_params(&self) -> usize {
        match self {
            ValueFn::Nullary(_) => 0,
            ValueFn::Unary(_) => 1,
        }
    }

    /// Evaluate against positional arguments.
    ///
    /// The outer error is an arity mismatch; the inner result is the
    /// function's own outcome.
    pub fn call(&self, args: &[Value]) -> Result<ValueResult<Value>, ArityMismatch> {
        match (self, args) {
            (ValueFn::Nullary(f), []) => Ok(f()),
            (ValueFn::Unary(f), [input]) => Ok(f(input)),
            _ => Err(ArityMismatch {
                expected: self.no_of_params(),
                actual: args.len(),
            }),
        }
    }

    /// Check whether two handles point at the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueFn::Nullary(a), ValueFn::Nullary(b)) => Arc::ptr_eq(a, b),
            (ValueFn::Unary(a), ValueFn::Unary(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ValueFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueFn")
            .field("no_of_params", &self.no_of_params())
            .finish()
    }
}

/// Lifecycle stage a hook runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookType {
    /// Before the request is sent; may mutate the request and context.
    BeforeRequest,
    /// After the response arrives; may read the response and mutate context.
    AfterRequest,
}

impl HookType {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            HookType::BeforeRequest => "beforeRequest",
            HookType::AfterRequest => "afterRequest",
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an API hook.
///
/// Hooks run to completion before the host advances the exchange. An error
/// aborts the current stage; what happens next is the host's decision.
#[async_trait]
pub trait ApiHookFn: Send + Sync {
    /// Run the hook against one exchange.
    async fn call(&self, exchange: &mut Exchange) -> HookResult<()>;
}

/// Shared hook handle.
pub type SharedHook = Arc<dyn ApiHookFn>;

/// Registry entry for an assertion function.
#[derive(Debug, Clone)]
pub struct AssertionDescriptor {
    /// Shared metadata.
    pub meta: DescriptorMeta,
    /// The predicate.
    pub function: AssertionFn,
}

impl AssertionDescriptor {
    /// Create a descriptor.
    pub fn new(meta: DescriptorMeta, function: AssertionFn) -> Self {
        Self { meta, function }
    }

    /// Number of parameters (1 or 2).
    pub fn no_of_params(&self) -> usize {
        self.function.no_of_params()
    }
}

impl Descriptor for AssertionDescriptor {
    fn meta(&self) -> &DescriptorMeta {
        &self.meta
    }

    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Assertion
    }

    fn summary(&self) -> DescriptorSummary {
        DescriptorSummary {
            no_of_params: Some(self.no_of_params()),
            ..DescriptorSummary::from_meta(self.kind(), &self.meta)
        }
    }
}

/// Registry entry for a value generator or transformer.
#[derive(Debug, Clone)]
pub struct ValueDescriptor {
    /// Shared metadata.
    pub meta: DescriptorMeta,
    /// The callable.
    pub function: ValueFn,
}

impl ValueDescriptor {
    /// Create a descriptor.
    pub fn new(meta: DescriptorMeta, function: ValueFn) -> Self {
        Self { meta, function }
    }

    /// Number of parameters (0 or 1).
    pub fn no_of_params(&self) -> usize {
        self.function.no_of_params()
    }
}

impl Descriptor for ValueDescriptor {
    fn meta(&self) -> &DescriptorMeta {
        &self.meta
    }

    fn kind(&self) -> DescriptorKind {
        match self.function {
            ValueFn::Nullary(_) => DescriptorKind::Generator,
            ValueFn::Unary(_) => DescriptorKind::Transformer,
        }
    }

    fn summary(&self) -> DescriptorSummary {
        DescriptorSummary {
            no_of_params: Some(self.no_of_params()),
            ..DescriptorSummary::from_meta(self.kind(), &self.meta)
        }
    }
}

/// Registry entry for an API hook.
#[derive(Clone)]
pub struct HookDescriptor {
    /// Shared metadata.
    pub meta: DescriptorMeta,
    /// Stage the hook runs at.
    pub hook_type: HookType,
    /// The hook body.
    pub function: SharedHook,
}

impl HookDescriptor {
    /// Create a descriptor.
    pub fn new<H: ApiHookFn + 'static>(meta: DescriptorMeta, hook_type: HookType, hook: H) -> Self {
        Self {
            meta,
            hook_type,
            function: Arc::new(hook),
        }
    }
}

impl Descriptor for HookDescriptor {
    fn meta(&self) -> &DescriptorMeta {
        &self.meta
    }

    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Hook
    }

    // Hooks are always listed by name in the host UI.
    fn validate(&self) -> RegistryResult<()> {
        self.meta.validate()?;
        if self.meta.display_name.as_deref().is_none_or(str::is_empty) {
            return Err(RegistryError::InvalidDescriptor {
                id: self.meta.id.clone(),
                reason: "hooks require a display name".to_string(),
            });
        }
        Ok(())
    }

    fn summary(&self) -> DescriptorSummary {
        DescriptorSummary {
            hook_type: Some(self.hook_type),
            ..DescriptorSummary::from_meta(self.kind(), &self.meta)
        }
    }
}

impl fmt::Debug for HookDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDescriptor")
            .field("meta", &self.meta)
            .field("hook_type", &self.hook_type)
            .finish()
    }
}
