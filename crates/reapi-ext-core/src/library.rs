//! The composition root: four registries and id lookup.
//!
//! A [`Library`] is assembled once by [`LibraryBuilder`] and then only read.
//! Ids are unique across the whole library, not just within one registry,
//! because the host addresses every capability by id alone.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::descriptor::{
    AssertionDescriptor, AssertionFn, Descriptor, DescriptorSummary, HookDescriptor, HookType,
    SharedHook, ValueDescriptor, ValueFn,
};
use crate::error::{RegistryError, RegistryResult};
use crate::registry::{Registry, RegistryBuilder};

/// The full set of capabilities an extension exposes to the host.
#[derive(Debug, Clone, Default)]
pub struct Library {
    assertions: Registry<AssertionDescriptor>,
    generators: Registry<ValueDescriptor>,
    transformers: Registry<ValueDescriptor>,
    hooks: Registry<HookDescriptor>,
}

impl Library {
    /// Create a library builder.
    pub fn builder() -> LibraryBuilder {
        LibraryBuilder::new()
    }

    /// Assertion registry.
    pub fn assertions(&self) -> &Registry<AssertionDescriptor> {
        &self.assertions
    }

    /// Value generator registry.
    pub fn generators(&self) -> &Registry<ValueDescriptor> {
        &self.generators
    }

    /// Transformer registry.
    pub fn transformers(&self) -> &Registry<ValueDescriptor> {
        &self.transformers
    }

    /// Hook registry.
    pub fn hooks(&self) -> &Registry<HookDescriptor> {
        &self.hooks
    }

    /// Resolve an assertion callable by id.
    pub fn get_assertion_function(&self, id: &str) -> Option<AssertionFn> {
        let found = self.assertions.get(id).map(|d| d.function.clone());
        debug!(id, found = found.is_some(), "Assertion lookup");
        found
    }

    /// Resolve a generator or transformer callable by id.
    ///
    /// Generators are searched before transformers; ids are unique across
    /// both, so the order only matters for cost.
    pub fn get_value_function(&self, id: &str) -> Option<ValueFn> {
        let found = self.get_value_descriptor(id).map(|d| d.function.clone());
        debug!(id, found = found.is_some(), "Value function lookup");
        found
    }

    /// Resolve a hook callable by id.
    pub fn get_api_hook(&self, id: &str) -> Option<SharedHook> {
        let found = self.hooks.get(id).map(|d| Arc::clone(&d.function));
        debug!(id, found = found.is_some(), "Hook lookup");
        found
    }

    /// Full assertion descriptor.
    pub fn get_assertion_descriptor(&self, id: &str) -> Option<&Arc<AssertionDescriptor>> {
        self.assertions.get(id)
    }

    /// Full value descriptor, from either value registry.
    pub fn get_value_descriptor(&self, id: &str) -> Option<&Arc<ValueDescriptor>> {
        self.generators
            .get(id)
            .or_else(|| self.transformers.get(id))
    }

    /// Full hook descriptor.
    pub fn get_hook_descriptor(&self, id: &str) -> Option<&Arc<HookDescriptor>> {
        self.hooks.get(id)
    }

    /// Listing entry for any id.
    pub fn describe(&self, id: &str) -> Option<DescriptorSummary> {
        self.assertions
            .get(id)
            .map(|d| d.summary())
            .or_else(|| self.get_value_descriptor(id).map(|d| d.summary()))
            .or_else(|| self.hooks.get(id).map(|d| d.summary()))
    }

    /// Check if any registry holds the id.
    pub fn contains(&self, id: &str) -> bool {
        self.assertions.contains(id)
            || self.generators.contains(id)
            || self.transformers.contains(id)
            || self.hooks.contains(id)
    }

    /// Hooks registered for one stage, in registration order.
    pub fn hooks_of_type(&self, hook_type: HookType) -> impl Iterator<Item = &Arc<HookDescriptor>> {
        self.hooks.iter().filter(move |d| d.hook_type == hook_type)
    }

    /// Every listing entry: assertions, generators, transformers, hooks.
    pub fn summaries(&self) -> Vec<DescriptorSummary> {
        let mut all = self.assertions.summaries();
        all.extend(self.generators.summaries());
        all.extend(self.transformers.summaries());
        all.extend(self.hooks.summaries());
        all
    }

    /// Total number of registered functions.
    pub fn len(&self) -> usize {
        self.assertions.len() + self.generators.len() + self.transformers.len() + self.hooks.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wrap in an `Arc` for sharing between exchanges.
    pub fn into_shared(self) -> SharedLibrary {
        Arc::new(self)
    }
}

/// A library shared between threads.
pub type SharedLibrary = Arc<Library>;

/// Builder for a [`Library`].
#[derive(Default)]
pub struct LibraryBuilder {
    assertions: RegistryBuilder<AssertionDescriptor>,
    generators: RegistryBuilder<ValueDescriptor>,
    transformers: RegistryBuilder<ValueDescriptor>,
    hooks: RegistryBuilder<HookDescriptor>,
    misplaced: Vec<RegistryError>,
}

impl LibraryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an assertion.
    pub fn with_assertion(mut self, descriptor: AssertionDescriptor) -> Self {
        self.add_assertion(descriptor);
        self
    }

    /// Register a zero-argument value generator.
    pub fn with_generator(mut self, descriptor: ValueDescriptor) -> Self {
        self.add_generator(descriptor);
        self
    }

    /// Register a single-argument transformer.
    pub fn with_transformer(mut self, descriptor: ValueDescriptor) -> Self {
        self.add_transformer(descriptor);
        self
    }

    /// Register a hook.
    pub fn with_hook(mut self, descriptor: HookDescriptor) -> Self {
        self.add_hook(descriptor);
        self
    }

    /// Register an assertion in place.
    pub fn add_assertion(&mut self, descriptor: AssertionDescriptor) -> &mut Self {
        self.assertions.push(descriptor);
        self
    }

    /// Register a generator in place.
    pub fn add_generator(&mut self, descriptor: ValueDescriptor) -> &mut Self {
        if matches!(descriptor.function, ValueFn::Nullary(_)) {
            self.generators.push(descriptor);
        } else {
            self.misplaced.push(RegistryError::InvalidDescriptor {
                id: descriptor.meta.id,
                reason: "generators take no parameters".to_string(),
            });
        }
        self
    }

    /// Register a transformer in place.
    pub fn add_transformer(&mut self, descriptor: ValueDescriptor) -> &mut Self {
        if matches!(descriptor.function, ValueFn::Unary(_)) {
            self.transformers.push(descriptor);
        } else {
            self.misplaced.push(RegistryError::InvalidDescriptor {
                id: descriptor.meta.id,
                reason: "transformers take exactly one parameter".to_string(),
            });
        }
        self
    }

    /// Register a hook in place.
    pub fn add_hook(&mut self, descriptor: HookDescriptor) -> &mut Self {
        self.hooks.push(descriptor);
        self
    }

    /// Build the library.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid descriptor, on a value function registered
    /// with the wrong arity for its registry, or on an id used twice anywhere
    /// in the library.
    pub fn build(self) -> RegistryResult<Library> {
        if let Some(err) = self.misplaced.into_iter().next() {
            return Err(err);
        }

        let library = Library {
            assertions: self.assertions.build()?,
            generators: self.generators.build()?,
            transformers: self.transformers.build()?,
            hooks: self.hooks.build()?,
        };

        let mut seen = HashSet::new();
        let all_ids = library
            .assertions
            .ids()
            .into_iter()
            .chain(library.generators.ids())
            .chain(library.transformers.ids())
            .chain(library.hooks.ids());
        for id in all_ids {
            if !seen.insert(id.clone()) {
                return Err(RegistryError::DuplicateId(id));
            }
        }

        info!(
            assertions = library.assertions.len(),
            generators = library.generators.len(),
            transformers = library.transformers.len(),
            hooks = library.hooks.len(),
            "Built library"
        );
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::AssertionResult;
    use crate::descriptor::{ApiHookFn, DescriptorKind, DescriptorMeta};
    use crate::error::HookResult;
    use crate::exchange::Exchange;
    use async_trait::async_trait;
    use serde_json::json;

    struct Noop;

    #[async_trait]
    impl ApiHookFn for Noop {
        async fn call(&self, _exchange: &mut Exchange) -> HookResult<()> {
            Ok(())
        }
    }

    fn assertion(id: &'static str) -> AssertionDescriptor {
        AssertionDescriptor::new(
            DescriptorMeta::new(id),
            AssertionFn::actual(|_| AssertionResult::pass()),
        )
    }

    fn generator(id: &'static str) -> ValueDescriptor {
        ValueDescriptor::new(DescriptorMeta::new(id), ValueFn::nullary(|| Ok(json!(1))))
    }

    fn transformer(id: &'static str) -> ValueDescriptor {
        ValueDescriptor::new(DescriptorMeta::new(id), ValueFn::unary(|v| Ok(v.clone())))
    }

    fn hook(id: &'static str, hook_type: HookType) -> HookDescriptor {
        HookDescriptor::new(DescriptorMeta::new(id).with_display_name(id), hook_type, Noop)
    }

    fn sample() -> Library {
        Library::builder()
            .with_assertion(assertion("a1"))
            .with_generator(generator("g1"))
            .with_transformer(transformer("t1"))
            .with_hook(hook("h-before", HookType::BeforeRequest))
            .with_hook(hook("h-after", HookType::AfterRequest))
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookups() {
        let library = sample();

        assert!(library.get_assertion_function("a1").is_some());
        assert!(library.get_value_function("g1").is_some());
        assert!(library.get_value_function("t1").is_some());
        assert!(library.get_api_hook("h-before").is_some());
        assert_eq!(library.len(), 5);
    }

    #[test]
    fn test_lookup_not_found_is_none() {
        let library = sample();

        assert!(library.get_assertion_function("missing").is_none());
        assert!(library.get_value_function("a1").is_none());
        assert!(library.get_api_hook("g1").is_none());
    }

    #[test]
    fn test_lookup_idempotent() {
        let library = sample();

        let first = library.get_assertion_function("a1").unwrap();
        let second = library.get_assertion_function("a1").unwrap();
        assert!(first.ptr_eq(&second));

        let h1 = library.get_api_hook("h-after").unwrap();
        let h2 = library.get_api_hook("h-after").unwrap();
        assert!(Arc::ptr_eq(&h1, &h2));
    }

    #[test]
    fn test_duplicate_across_registries_rejected() {
        let result = Library::builder()
            .with_assertion(assertion("shared"))
            .with_hook(hook("shared", HookType::BeforeRequest))
            .build();

        assert!(matches!(result, Err(RegistryError::DuplicateId(id)) if id.as_str() == "shared"));
    }

    #[test]
    fn test_generator_with_parameter_rejected() {
        let result = Library::builder().with_generator(transformer("oops")).build();
        assert!(matches!(
            result,
            Err(RegistryError::InvalidDescriptor { .. })
        ));

        let result = Library::builder().with_transformer(generator("oops")).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_describe_and_summaries_order() {
        let library = sample();

        let summary = library.describe("t1").unwrap();
        assert_eq!(summary.kind, DescriptorKind::Transformer);
        assert_eq!(summary.no_of_params, Some(1));

        let kinds: Vec<DescriptorKind> = library.summaries().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DescriptorKind::Assertion,
                DescriptorKind::Generator,
                DescriptorKind::Transformer,
                DescriptorKind::Hook,
                DescriptorKind::Hook,
            ]
        );
        assert!(library.describe("missing").is_none());
    }

    #[test]
    fn test_hooks_of_type() {
        let library = sample();
        let before: Vec<_> = library
            .hooks_of_type(HookType::BeforeRequest)
            .map(|d| d.meta.id.to_string())
            .collect();
        assert_eq!(before, vec!["h-before"]);
    }

    #[test]
    fn test_library_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Library>();
    }
}
