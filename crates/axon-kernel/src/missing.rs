//! Missing-binding protocol
//!
//! Invoked only when a request has zero satisfying candidates. Each
//! registered fallback resolver is asked in registration order and the first
//! non-empty output wins; outputs are never merged across resolvers. The
//! check-then-register sequence runs under a dedicated mutex, distinct from
//! the binding-cache lock, so two concurrent resolutions for the same
//! previously unbound service register exactly one set of implicit bindings.

use std::sync::{Arc, Mutex};

use axon_domain::ports::MissingBindingResolver;
use axon_domain::{Request, Result};
use tracing::debug;

use crate::registry::BindingRegistry;
use crate::sync;

/// Fallback synthesis coordinator
pub struct MissingBindingHandler {
    resolvers: Vec<Arc<dyn MissingBindingResolver>>,
    guard: Mutex<()>,
}

impl MissingBindingHandler {
    /// Create a handler over the ordered fallback resolvers
    pub fn new(resolvers: Vec<Arc<dyn MissingBindingResolver>>) -> Self {
        Self {
            resolvers,
            guard: Mutex::new(()),
        }
    }

    /// Attempt fallback synthesis for the request.
    ///
    /// Returns `true` when satisfying bindings are now available, either
    /// because this call registered them or because a concurrent resolution
    /// won the race; the caller retries resolution exactly once either way.
    /// `can_resolve` is re-evaluated under the protocol lock before
    /// registering anything.
    pub fn handle<F>(
        &self,
        registry: &BindingRegistry,
        request: &Request,
        can_resolve: F,
    ) -> Result<bool>
    where
        F: Fn() -> bool,
    {
        let candidates = self
            .resolvers
            .iter()
            .map(|resolver| resolver.resolve(registry, request))
            .find(|bindings| !bindings.is_empty());
        let Some(candidates) = candidates else {
            return Ok(false);
        };

        let _guard = sync::lock(&self.guard);
        if can_resolve() {
            // Another resolution registered the bindings while we were
            // synthesizing; nothing to add, but the retry will succeed.
            debug!(service = %request.service(), "missing-binding race lost, reusing registration");
            return Ok(true);
        }
        let count = candidates.len();
        for mut binding in candidates {
            binding.mark_implicit();
            registry.add(binding)?;
        }
        debug!(service = %request.service(), count, "implicit bindings registered");
        Ok(true)
    }
}
