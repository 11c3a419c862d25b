//! Module lifecycle port

use std::sync::Arc;

use crate::binding::Binding;
use crate::error::Result;
use crate::service::ServiceId;

/// The narrow kernel surface visible to modules and resolver plumbing.
///
/// Lets lifecycle hooks register and remove bindings without depending on
/// the kernel type itself.
pub trait BindingHost: Send + Sync {
    /// Register a binding; returns the shared handle for later removal
    fn add_binding(&self, binding: Binding) -> Result<Arc<Binding>>;

    /// Remove a previously registered binding
    fn remove_binding(&self, binding: &Binding) -> Result<()>;

    /// Remove every binding registered for the service
    fn unbind(&self, service: ServiceId);

    /// Whether a module is loaded under the name
    fn has_module(&self, name: &str) -> bool;
}

/// A named, loadable group of bindings with a two-phase load lifecycle.
///
/// `on_load` registers the module's bindings. After every module in a load
/// batch has completed `on_load`, `on_verify_required_modules` runs on each
/// in the same order, so sibling modules can rely on each other's bindings.
pub trait Module: Send + Sync {
    /// Unique name among currently loaded modules; must be non-empty
    fn name(&self) -> &str;

    /// First lifecycle phase: register this module's bindings on the host
    fn on_load(&mut self, host: &dyn BindingHost) -> Result<()>;

    /// Second lifecycle phase: check cross-module requirements
    fn on_verify_required_modules(&self, _host: &dyn BindingHost) -> Result<()> {
        Ok(())
    }

    /// Teardown when the module is unloaded
    fn on_unload(&mut self, _host: &dyn BindingHost) -> Result<()> {
        Ok(())
    }
}
