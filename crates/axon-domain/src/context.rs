//! Resolution context
//!
//! The context assembles a request with the binding chosen for it and travels
//! through the activation pipeline. The activation plan is fetched from the
//! planner at most once per context.

use std::sync::{Arc, OnceLock};

use crate::binding::Binding;
use crate::error::Result;
use crate::ports::cache::ScopeToken;
use crate::ports::planner::{Plan, Planner};
use crate::request::Request;
use crate::service::ServiceInstance;

/// Pairing of a request with the binding selected to satisfy it
#[derive(Debug)]
pub struct ResolutionContext {
    request: Arc<Request>,
    binding: Arc<Binding>,
    scope: Option<ScopeToken>,
    plan: OnceLock<Plan>,
}

impl ResolutionContext {
    /// Build a context for the request/binding pair.
    ///
    /// `scope` is the innermost activation scope active at selection time,
    /// if any.
    pub fn new(request: Arc<Request>, binding: Arc<Binding>, scope: Option<ScopeToken>) -> Self {
        Self {
            request,
            binding,
            scope,
            plan: OnceLock::new(),
        }
    }

    /// The request being satisfied
    pub fn request(&self) -> &Arc<Request> {
        &self.request
    }

    /// The binding selected for the request
    pub fn binding(&self) -> &Arc<Binding> {
        &self.binding
    }

    /// The activation scope this resolution runs under, if any
    pub fn scope(&self) -> Option<ScopeToken> {
        self.scope
    }

    /// The activation plan for the bound service, obtained from the planner
    /// on first access and memoized for the life of the context.
    pub fn plan(&self, planner: &dyn Planner) -> Result<Plan> {
        if let Some(plan) = self.plan.get() {
            return Ok(plan.clone());
        }
        let plan = planner.plan(self.binding.service())?;
        Ok(self.plan.get_or_init(|| plan).clone())
    }
}

/// Mutable reference cell for an instance moving through the pipeline's
/// activation phase; activation steps may replace the instance.
pub struct InstanceRef {
    instance: ServiceInstance,
}

impl InstanceRef {
    /// Wrap an existing instance
    pub fn new(instance: ServiceInstance) -> Self {
        Self { instance }
    }

    /// The current instance
    pub fn get(&self) -> &ServiceInstance {
        &self.instance
    }

    /// Replace the instance
    pub fn replace(&mut self, instance: ServiceInstance) {
        self.instance = instance;
    }

    /// Unwrap into the final instance
    pub fn into_inner(self) -> ServiceInstance {
        self.instance
    }
}
