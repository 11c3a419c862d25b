//! Domain layer for the axon dependency-injection kernel.
//!
//! Holds the core data model (service identities, bindings, requests,
//! resolution contexts), the error model, and the port traits implemented by
//! the kernel's external collaborators (planner, pipeline, instance cache,
//! resolver strategies, modules).
//!
//! This crate contains no resolution logic: it is the contract surface the
//! kernel crate builds on.

pub mod binding;
pub mod context;
pub mod error;
pub mod ports;
pub mod request;
pub mod service;

pub use binding::{Binding, BindingBuilder, BindingId, BindingMetadata, ScopePolicy};
pub use context::{InstanceRef, ResolutionContext};
pub use error::{Error, Result};
pub use request::{Parameter, Request, RequestBuilder};
pub use service::{downcast_instance, ServiceId, ServiceInstance};
