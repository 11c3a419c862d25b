//! Component container
//!
//! The kernel's internal service locator: holds the collaborator components
//! (planner, pipeline, instance cache, resolver strategy lists) behind their
//! port traits. Built once by the kernel builder with overridable defaults
//! and disposed with the kernel.

use std::sync::Arc;

use axon_domain::ports::{
    BindingResolver, InstanceCache, MissingBindingResolver, Pipeline, Planner,
};
use tracing::debug;

use crate::standard::{InMemoryInstanceCache, NullPlanner, ProviderPipeline};

/// Collaborators the kernel resolves through, behind port traits
pub struct ComponentContainer {
    planner: Arc<dyn Planner>,
    pipeline: Arc<dyn Pipeline>,
    instance_cache: Arc<dyn InstanceCache>,
    binding_resolvers: Vec<Arc<dyn BindingResolver>>,
    missing_resolvers: Vec<Arc<dyn MissingBindingResolver>>,
}

impl ComponentContainer {
    /// Start building a container with default components
    pub fn builder() -> ComponentContainerBuilder {
        ComponentContainerBuilder {
            planner: None,
            pipeline: None,
            instance_cache: None,
            binding_resolvers: Vec::new(),
            missing_resolvers: Vec::new(),
        }
    }

    /// The activation planner
    pub fn planner(&self) -> &Arc<dyn Planner> {
        &self.planner
    }

    /// The activation pipeline
    pub fn pipeline(&self) -> &Arc<dyn Pipeline> {
        &self.pipeline
    }

    /// The instance cache
    pub fn instance_cache(&self) -> &Arc<dyn InstanceCache> {
        &self.instance_cache
    }

    /// Candidate-synthesis strategies, in registration order
    pub fn binding_resolvers(&self) -> &[Arc<dyn BindingResolver>] {
        &self.binding_resolvers
    }

    /// Fallback strategies, in registration order
    pub fn missing_resolvers(&self) -> &[Arc<dyn MissingBindingResolver>] {
        &self.missing_resolvers
    }

    /// Release every tracked instance; called when the kernel is dropped
    pub fn dispose(&self) {
        self.instance_cache.clear();
        debug!("component container disposed");
    }
}

/// Builder assembling a [`ComponentContainer`] with overridable defaults
pub struct ComponentContainerBuilder {
    planner: Option<Arc<dyn Planner>>,
    pipeline: Option<Arc<dyn Pipeline>>,
    instance_cache: Option<Arc<dyn InstanceCache>>,
    binding_resolvers: Vec<Arc<dyn BindingResolver>>,
    missing_resolvers: Vec<Arc<dyn MissingBindingResolver>>,
}

impl ComponentContainerBuilder {
    /// Override the planner
    pub fn planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = Some(planner);
        self
    }

    /// Override the pipeline
    pub fn pipeline(mut self, pipeline: Arc<dyn Pipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Override the instance cache
    pub fn instance_cache(mut self, cache: Arc<dyn InstanceCache>) -> Self {
        self.instance_cache = Some(cache);
        self
    }

    /// Append a candidate-synthesis strategy
    pub fn binding_resolver(mut self, resolver: Arc<dyn BindingResolver>) -> Self {
        self.binding_resolvers.push(resolver);
        self
    }

    /// Append a fallback strategy
    pub fn missing_resolver(mut self, resolver: Arc<dyn MissingBindingResolver>) -> Self {
        self.missing_resolvers.push(resolver);
        self
    }

    /// Finish the container, filling unset components with defaults
    pub fn build(self) -> ComponentContainer {
        let planner: Arc<dyn Planner> = self.planner.unwrap_or_else(|| Arc::new(NullPlanner));
        let instance_cache: Arc<dyn InstanceCache> = self
            .instance_cache
            .unwrap_or_else(|| Arc::new(InMemoryInstanceCache::new()));
        let pipeline: Arc<dyn Pipeline> = self.pipeline.unwrap_or_else(|| {
            Arc::new(ProviderPipeline::new(
                planner.clone(),
                instance_cache.clone(),
            ))
        });
        ComponentContainer {
            planner,
            pipeline,
            instance_cache,
            binding_resolvers: self.binding_resolvers,
            missing_resolvers: self.missing_resolvers,
        }
    }
}
