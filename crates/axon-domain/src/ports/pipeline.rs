//! Activation pipeline port

use crate::context::{InstanceRef, ResolutionContext};
use crate::error::Result;
use crate::service::ServiceInstance;

/// Activation pipeline interface.
///
/// `resolve` runs the full chain (planning, construction, activation, scope
/// management); `activate` runs only the injection/post-activation phase
/// against an already-existing instance and may replace it.
pub trait Pipeline: Send + Sync {
    /// Plan, construct, and activate an instance for the context
    fn resolve(&self, context: &ResolutionContext) -> Result<ServiceInstance>;

    /// Run the injection phase against an existing instance
    fn activate(&self, context: &ResolutionContext, instance: &mut InstanceRef) -> Result<()>;
}
