//! Activation planner port

use crate::error::Result;
use crate::service::ServiceId;

/// One named step of an activation plan
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanStep {
    name: String,
}

impl PlanStep {
    /// Create a named step
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    /// Step name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Describes how a service type is constructed and injected.
///
/// The plan's contents are interpreted by the pipeline; the kernel only
/// carries it through the resolution context.
#[derive(Clone, Debug)]
pub struct Plan {
    service: ServiceId,
    steps: Vec<PlanStep>,
}

impl Plan {
    /// A plan with no activation steps
    pub fn empty(service: ServiceId) -> Self {
        Self {
            service,
            steps: Vec::new(),
        }
    }

    /// A plan with the given ordered steps
    pub fn with_steps(service: ServiceId, steps: Vec<PlanStep>) -> Self {
        Self { service, steps }
    }

    /// The planned service
    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// Ordered activation steps
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }
}

/// Planner interface.
///
/// Pure given a fixed registry of type metadata: planning the same service
/// twice yields equivalent plans.
pub trait Planner: Send + Sync {
    /// Obtain the activation plan for a service
    fn plan(&self, service: ServiceId) -> Result<Plan>;
}
