//! Default collaborator components
//!
//! Null/in-memory implementations of the planner, pipeline, and instance
//! cache ports. The kernel builder wires these by default; hosts override
//! them with real collaborators where needed.

use std::sync::{Arc, Mutex};

use axon_domain::ports::{InstanceCache, Pipeline, Plan, Planner, ScopeToken};
use axon_domain::{
    Error, InstanceRef, ResolutionContext, Result, ScopePolicy, ServiceId, ServiceInstance,
};
use tracing::trace;

use crate::sync;

/// Planner producing an empty plan for every service
pub struct NullPlanner;

impl Planner for NullPlanner {
    fn plan(&self, service: ServiceId) -> Result<Plan> {
        Ok(Plan::empty(service))
    }
}

/// Pipeline that activates by invoking the binding's provider.
///
/// Construction runs the provider, the activation phase walks the plan's
/// steps, and non-transient instances are handed to the instance cache for
/// tracking. Provider invocation happens outside the kernel's locks.
pub struct ProviderPipeline {
    planner: Arc<dyn Planner>,
    instance_cache: Arc<dyn InstanceCache>,
}

impl ProviderPipeline {
    /// Create a pipeline over the planner and instance cache
    pub fn new(planner: Arc<dyn Planner>, instance_cache: Arc<dyn InstanceCache>) -> Self {
        Self {
            planner,
            instance_cache,
        }
    }
}

impl Pipeline for ProviderPipeline {
    fn resolve(&self, context: &ResolutionContext) -> Result<ServiceInstance> {
        let binding = context.binding();
        let instance = binding.provider().create(context).map_err(|source| match source {
            error @ (Error::NotResolved { .. } | Error::Ambiguous { .. }) => error,
            other => Error::activation_with_source(
                format!("provider for {} failed", binding.service()),
                other,
            ),
        })?;

        let mut instance = InstanceRef::new(instance);
        self.activate(context, &mut instance)?;
        let instance = instance.into_inner();

        if *binding.scope() != ScopePolicy::Transient {
            self.instance_cache.track(instance.clone(), context.scope());
        }
        Ok(instance)
    }

    fn activate(&self, context: &ResolutionContext, _instance: &mut InstanceRef) -> Result<()> {
        let plan = context.plan(self.planner.as_ref())?;
        for step in plan.steps() {
            trace!(service = %plan.service(), step = step.name(), "activation step");
        }
        Ok(())
    }
}

struct TrackedInstance {
    instance: ServiceInstance,
    scope: Option<ScopeToken>,
}

/// Instance cache tracking activated instances by pointer identity
pub struct InMemoryInstanceCache {
    entries: Mutex<Vec<TrackedInstance>>,
}

impl InMemoryInstanceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Number of currently tracked instances
    pub fn tracked_count(&self) -> usize {
        sync::lock(&self.entries).len()
    }
}

impl Default for InMemoryInstanceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceCache for InMemoryInstanceCache {
    fn track(&self, instance: ServiceInstance, scope: Option<ScopeToken>) {
        let mut entries = sync::lock(&self.entries);
        if entries
            .iter()
            .any(|tracked| Arc::ptr_eq(&tracked.instance, &instance))
        {
            return;
        }
        entries.push(TrackedInstance { instance, scope });
    }

    fn release(&self, instance: &ServiceInstance) -> bool {
        let mut entries = sync::lock(&self.entries);
        let before = entries.len();
        entries.retain(|tracked| !Arc::ptr_eq(&tracked.instance, instance));
        entries.len() != before
    }

    fn clear(&self) {
        sync::lock(&self.entries).clear();
    }

    fn clear_scope(&self, scope: ScopeToken) {
        sync::lock(&self.entries).retain(|tracked| tracked.scope != Some(scope));
    }
}
