//! Kernel configuration

use serde::{Deserialize, Serialize};

/// Plain-data settings carried by the kernel.
///
/// Settings are fixed at build time; they travel as data so hosts can load
/// them from whatever configuration source they use.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelSettings {
    /// Whether the missing-binding protocol may synthesize and register
    /// implicit bindings when a request has no satisfying candidate
    pub allow_missing_binding_synthesis: bool,

    /// Emit a warning when an explicit registration shadows an implicit
    /// binding already present for the same service
    pub warn_on_implicit_override: bool,
}

impl Default for KernelSettings {
    fn default() -> Self {
        Self {
            allow_missing_binding_synthesis: true,
            warn_on_implicit_override: true,
        }
    }
}
