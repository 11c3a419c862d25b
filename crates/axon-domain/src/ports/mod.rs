//! Port contracts for the kernel's collaborators
//!
//! Each port is a `Send + Sync` trait object contract. The kernel obtains
//! its collaborators through its component container and never depends on
//! concrete implementations. All contracts are synchronous: every operation
//! runs to completion on the calling thread.

pub mod cache;
pub mod module;
pub mod pipeline;
pub mod planner;
pub mod provider;
pub mod resolvers;

pub use cache::{InstanceCache, ScopeToken};
pub use module::{BindingHost, Module};
pub use pipeline::Pipeline;
pub use planner::{Plan, PlanStep, Planner};
pub use provider::Provider;
pub use resolvers::{BindingResolver, MissingBindingResolver, RegistrySnapshot};
