//! Binding registry
//!
//! Mutable multi-map from requested service identity to the bindings
//! registered for it. Every mutation clears the binding cache in full as
//! soon as the registry's write lock is released, so lookups never serve a
//! stale candidate list computed before the mutation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axon_domain::ports::RegistrySnapshot;
use axon_domain::{Binding, Error, Result, ServiceId};
use tracing::{debug, warn};

use crate::cache::BindingCache;
use crate::settings::KernelSettings;
use crate::sync;

/// The kernel's binding multi-map
pub struct BindingRegistry {
    entries: RwLock<HashMap<ServiceId, Vec<Arc<Binding>>>>,
    cache: Arc<BindingCache>,
    settings: Arc<KernelSettings>,
}

impl BindingRegistry {
    /// Create an empty registry wired to the cache it must invalidate
    pub fn new(cache: Arc<BindingCache>, settings: Arc<KernelSettings>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            cache,
            settings,
        }
    }

    /// Register a binding.
    ///
    /// Rejects bindings with an empty name. Returns the shared handle under
    /// which the binding is stored.
    pub fn add(&self, binding: Binding) -> Result<Arc<Binding>> {
        if binding.metadata().name() == Some("") {
            return Err(Error::invalid_argument(format!(
                "binding for {} has an empty name",
                binding.service()
            )));
        }
        let service = binding.service();
        let binding = Arc::new(binding);
        {
            let mut entries = sync::write(&self.entries);
            if self.settings.warn_on_implicit_override
                && !binding.is_implicit()
                && entries
                    .get(&service)
                    .is_some_and(|existing| existing.iter().any(|b| b.is_implicit()))
            {
                warn!(service = %service, "explicit binding shadows an implicit one");
            }
            entries.entry(service).or_default().push(binding.clone());
        }
        // The entries guard is released before taking the cache lock; the
        // cache-miss path acquires these locks in the opposite order.
        self.cache.clear();
        debug!(service = %service, implicit = binding.is_implicit(), "binding added");
        Ok(binding)
    }

    /// Remove a previously registered binding, matched by identity
    pub fn remove(&self, binding: &Binding) -> Result<()> {
        let service = binding.service();
        {
            let mut entries = sync::write(&self.entries);
            let Some(registered) = entries.get_mut(&service) else {
                return Err(Error::invalid_argument(format!(
                    "no binding is registered for {service}"
                )));
            };
            let before = registered.len();
            registered.retain(|candidate| candidate.id() != binding.id());
            if registered.len() == before {
                return Err(Error::invalid_argument(format!(
                    "the binding is not registered for {service}"
                )));
            }
            if registered.is_empty() {
                entries.remove(&service);
            }
        }
        self.cache.clear();
        debug!(service = %service, "binding removed");
        Ok(())
    }

    /// Remove every binding registered for the service
    pub fn unbind_all(&self, service: ServiceId) {
        let removed = {
            let mut entries = sync::write(&self.entries);
            entries.remove(&service).map_or(0, |list| list.len())
        };
        self.cache.clear();
        debug!(service = %service, removed, "service unbound");
    }

    /// The candidate cache this registry invalidates
    pub(crate) fn cache(&self) -> &BindingCache {
        &self.cache
    }
}

impl RegistrySnapshot for BindingRegistry {
    fn bindings_for(&self, service: ServiceId) -> Vec<Arc<Binding>> {
        sync::read(&self.entries)
            .get(&service)
            .cloned()
            .unwrap_or_default()
    }

    fn services(&self) -> Vec<ServiceId> {
        sync::read(&self.entries).keys().copied().collect()
    }

    fn contains(&self, service: ServiceId) -> bool {
        sync::read(&self.entries).contains_key(&service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BindingRegistry {
        BindingRegistry::new(
            Arc::new(BindingCache::new()),
            Arc::new(KernelSettings::default()),
        )
    }

    fn sample_binding() -> Binding {
        Binding::builder(ServiceId::of::<String>())
            .to_factory(String::new)
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_and_lookup() {
        let registry = registry();
        let handle = registry.add(sample_binding()).unwrap();
        let found = registry.bindings_for(ServiceId::of::<String>());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), handle.id());
        assert!(registry.contains(ServiceId::of::<String>()));
    }

    #[test]
    fn test_remove_drops_only_the_given_binding() {
        let registry = registry();
        let first = registry.add(sample_binding()).unwrap();
        let second = registry.add(sample_binding()).unwrap();
        registry.remove(&first).unwrap();
        let remaining = registry.bindings_for(ServiceId::of::<String>());
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), second.id());
    }

    #[test]
    fn test_remove_unknown_binding_fails() {
        let registry = registry();
        let never_added = sample_binding();
        assert!(matches!(
            registry.remove(&never_added),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_unbind_all_clears_the_service() {
        let registry = registry();
        registry.add(sample_binding()).unwrap();
        registry.add(sample_binding()).unwrap();
        registry.unbind_all(ServiceId::of::<String>());
        assert!(!registry.contains(ServiceId::of::<String>()));
        assert!(registry.bindings_for(ServiceId::of::<String>()).is_empty());
    }

    #[test]
    fn test_empty_binding_name_is_rejected() {
        let registry = registry();
        let binding = Binding::builder(ServiceId::of::<String>())
            .to_factory(String::new)
            .named("valid")
            .build()
            .unwrap();
        assert!(registry.add(binding).is_ok());
        // An empty name cannot be built at all; the builder is the boundary.
        let err = Binding::builder(ServiceId::of::<String>())
            .to_factory(String::new)
            .named("")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }
}
