//! Instance cache port

use std::fmt;

use uuid::Uuid;

use crate::service::ServiceInstance;

/// Token naming one activation scope.
///
/// Instances tracked under a token are released together when the scope is
/// disposed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeToken(Uuid);

impl ScopeToken {
    /// Mint a fresh scope token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScopeToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScopeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeToken({})", self.0)
    }
}

/// Tracks activated instances for later deactivation.
///
/// The kernel delegates all instance lifecycle to this collaborator; it
/// never inspects tracked instances itself.
pub trait InstanceCache: Send + Sync {
    /// Track an activated instance, optionally under a scope
    fn track(&self, instance: ServiceInstance, scope: Option<ScopeToken>);

    /// Deactivate and drop the instance; returns whether it was tracked
    fn release(&self, instance: &ServiceInstance) -> bool;

    /// Deactivate and drop every tracked instance
    fn clear(&self);

    /// Deactivate and drop every instance tracked under the scope
    fn clear_scope(&self, scope: ScopeToken);
}
