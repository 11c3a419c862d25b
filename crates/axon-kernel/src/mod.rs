//! Resolution kernel of the axon dependency-injection container.
//!
//! The kernel maintains the registry of service bindings, resolves requests
//! into instances under a deterministic precedence rule, memoizes candidate
//! lookups, synthesizes bindings on demand when none exist, and manages named
//! module groups with a two-phase load lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! caller ── Request ──▶ Kernel (resolution engine)
//!                         │  candidates
//!                         ▼
//!                  BindingCache ◀── BindingRegistry + BindingResolver strategies
//!                         │  ranked by precedence
//!                         ▼
//!                  ResolvedServices (lazy) ──▶ Pipeline ──▶ instances
//! ```
//!
//! Candidate selection runs eagerly when [`Kernel::resolve`] is called;
//! activation is lazy, one instance per iterator step.

pub mod cache;
pub mod components;
pub mod kernel;
pub mod missing;
pub mod modules;
pub mod precedence;
pub mod providers;
pub mod registry;
pub mod settings;
pub mod standard;

pub(crate) mod sync;

pub use components::{ComponentContainer, ComponentContainerBuilder};
pub use kernel::{ActivationScope, Kernel, KernelBuilder, ResolvedServices};
pub use providers::{ConstantProvider, FactoryProvider};
pub use settings::KernelSettings;
pub use standard::{InMemoryInstanceCache, NullPlanner, ProviderPipeline};

// Re-export the domain surface so kernel users need a single crate import.
pub use axon_domain::{
    downcast_instance, Binding, BindingBuilder, BindingId, BindingMetadata, Error, InstanceRef,
    Parameter, Request, RequestBuilder, ResolutionContext, Result, ScopePolicy, ServiceId,
    ServiceInstance,
};
pub use axon_domain::ports::{
    BindingHost, BindingResolver, InstanceCache, MissingBindingResolver, Module, Pipeline, Plan,
    PlanStep, Planner, Provider, RegistrySnapshot, ScopeToken,
};
