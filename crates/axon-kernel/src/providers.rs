//! Concrete activation providers
//!
//! Building blocks for resolver strategies and direct registrations. Binding
//! builders offer closure shortcuts for the common cases; these types exist
//! for strategy authors who work with the provider port directly.

use std::sync::Arc;

use axon_domain::ports::Provider;
use axon_domain::{ResolutionContext, Result, ServiceInstance};

/// Provider returning the same shared value on every activation
pub struct ConstantProvider {
    value: ServiceInstance,
}

impl ConstantProvider {
    /// Wrap an owned value
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// Wrap an already type-erased instance
    pub fn from_instance(value: ServiceInstance) -> Self {
        Self { value }
    }
}

impl Provider for ConstantProvider {
    fn create(&self, _context: &ResolutionContext) -> Result<ServiceInstance> {
        Ok(self.value.clone())
    }
}

/// Provider invoking a fallible factory with access to the resolution
/// context (and through it, call-time parameters)
pub struct FactoryProvider {
    factory: Box<dyn Fn(&ResolutionContext) -> Result<ServiceInstance> + Send + Sync>,
}

impl FactoryProvider {
    /// Build from an infallible value factory
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(move |_| Ok(Arc::new(factory()) as ServiceInstance)),
        }
    }

    /// Build from a fallible, context-aware factory
    pub fn from_context_fn<F>(factory: F) -> Self
    where
        F: Fn(&ResolutionContext) -> Result<ServiceInstance> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }
}

impl Provider for FactoryProvider {
    fn create(&self, context: &ResolutionContext) -> Result<ServiceInstance> {
        (self.factory)(context)
    }
}
