//! Binding candidate cache
//!
//! Memoizes, per requested service identity, the precedence-ordered candidate
//! list. The entire miss-and-populate sequence runs under one mutex keyed
//! globally rather than per identity: concurrent lookups for different
//! services may serialize, trading lookup concurrency for correctness
//! simplicity. Any registry mutation clears the cache wholesale.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axon_domain::{Binding, ServiceId};
use tracing::debug;

use crate::sync;

/// Globally locked memo of candidate lists
pub struct BindingCache {
    entries: Mutex<HashMap<ServiceId, Vec<Arc<Binding>>>>,
}

impl BindingCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached candidate list for the service, computing and
    /// storing it on a miss.
    ///
    /// `compute` runs while the global cache lock is held.
    pub fn lookup<F>(&self, service: ServiceId, compute: F) -> Vec<Arc<Binding>>
    where
        F: FnOnce() -> Vec<Arc<Binding>>,
    {
        let mut entries = sync::lock(&self.entries);
        entries.entry(service).or_insert_with(compute).clone()
    }

    /// Drop every entry.
    ///
    /// Called on any registry mutation; per-key invalidation is deliberately
    /// not offered.
    pub fn clear(&self) {
        let mut entries = sync::lock(&self.entries);
        if !entries.is_empty() {
            debug!(entries = entries.len(), "binding cache invalidated");
        }
        entries.clear();
    }
}

impl Default for BindingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_lookup_memoizes() {
        let cache = BindingCache::new();
        let computations = AtomicUsize::new(0);
        let service = ServiceId::of::<u32>();

        for _ in 0..3 {
            let result = cache.lookup(service, || {
                computations.fetch_add(1, Ordering::SeqCst);
                Vec::new()
            });
            assert!(result.is_empty());
        }
        assert_eq!(computations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_forces_recompute_for_all_keys() {
        let cache = BindingCache::new();
        let computations = AtomicUsize::new(0);
        let a = ServiceId::of::<u32>();
        let b = ServiceId::of::<u64>();

        let mut probe = |service| {
            cache.lookup(service, || {
                computations.fetch_add(1, Ordering::SeqCst);
                Vec::new()
            });
        };
        probe(a);
        probe(b);
        assert_eq!(computations.load(Ordering::SeqCst), 2);

        cache.clear();
        probe(a);
        probe(b);
        assert_eq!(computations.load(Ordering::SeqCst), 4);
    }
}
