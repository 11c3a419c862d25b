//! Binding resolver strategy ports

use std::sync::Arc;

use crate::binding::Binding;
use crate::request::Request;
use crate::service::ServiceId;

/// Read-only view of the binding registry handed to resolver strategies
pub trait RegistrySnapshot {
    /// Bindings literally registered for the service, in registration order
    fn bindings_for(&self, service: ServiceId) -> Vec<Arc<Binding>>;

    /// Every service identity with at least one registered binding
    fn services(&self) -> Vec<ServiceId>;

    /// Whether any binding is registered for the service
    fn contains(&self, service: ServiceId) -> bool;
}

/// Pluggable candidate-synthesis strategy consulted on every cache miss.
///
/// Implementations are pure functions of the registry state; they synthesize
/// bindings that are not literally registered (collection wrappers, service
/// families, lazy adapters).
pub trait BindingResolver: Send + Sync {
    /// Synthesize candidate bindings for the service
    fn resolve(&self, registry: &dyn RegistrySnapshot, service: ServiceId) -> Vec<Binding>;
}

/// Fallback strategy consulted only when a request has no satisfying
/// candidate. The first resolver returning a non-empty set wins.
pub trait MissingBindingResolver: Send + Sync {
    /// Synthesize fallback bindings for the request
    fn resolve(&self, registry: &dyn RegistrySnapshot, request: &Request) -> Vec<Binding>;
}
