//! Module registry
//!
//! Tracks loaded named module groups and runs their two-phase load
//! lifecycle: every module in a batch completes `on_load` (registering its
//! bindings) before any module's `on_verify_required_modules` runs, so
//! sibling modules in one batch may depend on each other's bindings.
//!
//! Lifecycle hooks run without the registry lock held, so hooks may call
//! back into the host (including `has_module`) freely.

use std::sync::{Arc, Mutex, RwLock};

use axon_domain::ports::{BindingHost, Module};
use axon_domain::{Error, Result};
use tracing::info;

use crate::sync;

type LoadedModule = Arc<Mutex<Box<dyn Module>>>;

/// Registry of currently loaded modules, in load order
pub struct ModuleRegistry {
    loaded: RwLock<Vec<(String, LoadedModule)>>,
}

impl ModuleRegistry {
    /// Create an empty module registry
    pub fn new() -> Self {
        Self {
            loaded: RwLock::new(Vec::new()),
        }
    }

    /// Load a batch of modules.
    ///
    /// Phase one runs `on_load` on each module in input order, recording it
    /// as loaded; an empty or already-taken name fails with a configuration
    /// error naming the module. Phase two runs
    /// `on_verify_required_modules` on each module of the batch, in the
    /// same order, only after every `on_load` has completed.
    pub fn load(&self, modules: Vec<Box<dyn Module>>, host: &dyn BindingHost) -> Result<()> {
        let mut batch: Vec<LoadedModule> = Vec::new();

        for mut module in modules {
            let name = module.name().to_owned();
            if name.is_empty() {
                return Err(Error::configuration(
                    "a module with an empty name cannot be loaded",
                ));
            }
            if self.has(&name) {
                return Err(Error::configuration(format!(
                    "a module with the name \"{name}\" has already been loaded"
                )));
            }
            module.on_load(host)?;
            let loaded = Arc::new(Mutex::new(module));
            sync::write(&self.loaded).push((name.clone(), loaded.clone()));
            batch.push(loaded);
            info!(module = %name, "module loaded");
        }

        for module in &batch {
            sync::lock(module).on_verify_required_modules(host)?;
        }
        Ok(())
    }

    /// Unload the module registered under the name.
    ///
    /// Fails with a configuration error when no module is loaded under the
    /// name; otherwise runs `on_unload` and then drops the module. The module
    /// stays in the loaded set while its hook runs, so the hook still
    /// observes itself through `has_module`.
    pub fn unload(&self, name: &str, host: &dyn BindingHost) -> Result<()> {
        let module = {
            let loaded = sync::read(&self.loaded);
            let found = loaded.iter().find(|(loaded_name, _)| loaded_name == name);
            let Some((_, module)) = found else {
                return Err(Error::configuration(format!(
                    "no module with the name \"{name}\" has been loaded"
                )));
            };
            module.clone()
        };
        sync::lock(&module).on_unload(host)?;
        sync::write(&self.loaded).retain(|(loaded_name, _)| loaded_name != name);
        info!(module = %name, "module unloaded");
        Ok(())
    }

    /// Whether a module is loaded under the name
    pub fn has(&self, name: &str) -> bool {
        sync::read(&self.loaded)
            .iter()
            .any(|(loaded_name, _)| loaded_name == name)
    }

    /// Names of the loaded modules, in load order
    pub fn names(&self) -> Vec<String> {
        sync::read(&self.loaded)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
