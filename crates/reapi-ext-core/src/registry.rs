//! Ordered, id-indexed descriptor registries.
//!
//! A [`Registry`] keeps descriptors in insertion order for listing and an id
//! index for O(1) lookup. Registries are assembled once through
//! [`RegistryBuilder`] and never mutated afterwards, so they can be read
//! from any number of threads without locking.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::descriptor::{Descriptor, DescriptorSummary};
use crate::error::{RegistryError, RegistryResult};
use crate::id::FunctionId;

/// An immutable registry of one descriptor type.
pub struct Registry<D> {
    /// Descriptors in registration order.
    entries: Vec<Arc<D>>,
    /// Map of id to position in `entries`.
    index: HashMap<FunctionId, usize>,
}

impl<D: Descriptor> Registry<D> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a registry from descriptors.
    ///
    /// # Errors
    ///
    /// Returns an error if a descriptor is invalid or an id repeats.
    pub fn with_descriptors(descriptors: Vec<D>) -> RegistryResult<Self> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.insert(descriptor)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, descriptor: D) -> RegistryResult<()> {
        descriptor.validate()?;

        let id = descriptor.id().clone();
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }

        debug!(id = %id, kind = %descriptor.kind(), "Descriptor registered");
        self.index.insert(id, self.entries.len());
        self.entries.push(Arc::new(descriptor));
        Ok(())
    }

    /// Look up a descriptor by id.
    pub fn get(&self, id: &str) -> Option<&Arc<D>> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Check if an id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in registration order.
    pub fn ids(&self) -> Vec<FunctionId> {
        self.entries.iter().map(|d| d.id().clone()).collect()
    }

    /// Iterate descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<D>> + '_ {
        self.entries.iter()
    }

    /// Listing entries in registration order.
    pub fn summaries(&self) -> Vec<DescriptorSummary> {
        self.entries.iter().map(|d| d.summary()).collect()
    }
}

impl<D: Descriptor> Default for Registry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Registry<D> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.iter().map(Arc::clone).collect(),
            index: self.index.clone(),
        }
    }
}

impl<D: Descriptor> std::fmt::Debug for Registry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Builder for constructing registries.
pub struct RegistryBuilder<D> {
    descriptors: Vec<D>,
}

impl<D: Descriptor> RegistryBuilder<D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Add a descriptor.
    pub fn with(mut self, descriptor: D) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add a descriptor in place.
    pub fn push(&mut self, descriptor: D) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add several descriptors.
    pub fn extend(mut self, descriptors: impl IntoIterator<Item = D>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Number of pending descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Build the registry.
    pub fn build(self) -> RegistryResult<Registry<D>> {
        let registry = Registry::with_descriptors(self.descriptors)?;
        info!(descriptors = registry.len(), "Built registry");
        Ok(registry)
    }
}

impl<D: Descriptor> Default for RegistryBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
