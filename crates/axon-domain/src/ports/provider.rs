//! Activation provider port

use crate::context::ResolutionContext;
use crate::error::Result;
use crate::service::ServiceInstance;

/// Activation strategy carried by a binding.
///
/// Opaque to the resolution kernel: only the pipeline invokes it, outside the
/// kernel's locks.
pub trait Provider: Send + Sync {
    /// Produce an instance for the context's request/binding pair
    fn create(&self, context: &ResolutionContext) -> Result<ServiceInstance>;
}
