//! Resolution request data model
//!
//! A request describes a single resolution ask: the service identity, an
//! optional constraint over binding metadata, call-time parameters, the
//! optional/unique flags, and the parent request when the ask is part of a
//! recursive dependency chain. Requests are immutable once built and are not
//! retained beyond the resolution they describe.

use std::fmt;
use std::sync::Arc;

use crate::binding::BindingMetadata;
use crate::service::ServiceId;

/// Constraint predicate over binding metadata
pub type ConstraintFn = dyn Fn(&BindingMetadata) -> bool + Send + Sync;

/// A named call-time parameter carried by a request
#[derive(Clone, Debug)]
pub struct Parameter {
    name: String,
    value: serde_json::Value,
    inherited: bool,
}

impl Parameter {
    /// Create a parameter that applies only to the request it is attached to
    pub fn new<S: Into<String>>(name: S, value: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            value,
            inherited: false,
        }
    }

    /// Create a parameter that is also passed down to child requests
    pub fn inherited<S: Into<String>>(name: S, value: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            value,
            inherited: true,
        }
    }

    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter payload
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    /// Whether child requests inherit this parameter
    pub fn should_inherit(&self) -> bool {
        self.inherited
    }
}

/// A single resolution ask
pub struct Request {
    service: ServiceId,
    constraint: Option<Arc<ConstraintFn>>,
    parameters: Vec<Parameter>,
    optional: bool,
    unique: bool,
    parent: Option<Arc<Request>>,
    depth: usize,
}

impl Request {
    /// Start building a request for the given service identity
    pub fn builder(service: ServiceId) -> RequestBuilder {
        RequestBuilder {
            service,
            constraint: None,
            parameters: Vec::new(),
            optional: false,
            unique: false,
        }
    }

    /// The requested service identity
    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// Call-time parameters, in attachment order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Look up a call-time parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    /// Whether an unresolved or ambiguous outcome yields empty instead of
    /// an error
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether exactly one top-precedence result is expected
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Parent request when this ask is part of a dependency chain
    pub fn parent(&self) -> Option<&Arc<Request>> {
        self.parent.as_ref()
    }

    /// Distance from the root request of the chain
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the binding's metadata satisfies this request's constraint.
    ///
    /// A request without a constraint accepts every binding.
    pub fn matches(&self, metadata: &BindingMetadata) -> bool {
        match &self.constraint {
            Some(constraint) => constraint(metadata),
            None => true,
        }
    }

    /// Derive a child request for a dependency of this request.
    ///
    /// The child inherits the inheritable parameters and points back at this
    /// request as its parent.
    pub fn child(self: &Arc<Self>, service: ServiceId) -> Request {
        Request {
            service,
            constraint: None,
            parameters: self
                .parameters
                .iter()
                .filter(|p| p.should_inherit())
                .cloned()
                .collect(),
            optional: false,
            unique: true,
            parent: Some(self.clone()),
            depth: self.depth + 1,
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("service", &self.service)
            .field("constrained", &self.constraint.is_some())
            .field("parameters", &self.parameters.len())
            .field("optional", &self.optional)
            .field("unique", &self.unique)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Fluent builder for [`Request`]
pub struct RequestBuilder {
    service: ServiceId,
    constraint: Option<Arc<ConstraintFn>>,
    parameters: Vec<Parameter>,
    optional: bool,
    unique: bool,
}

impl RequestBuilder {
    /// Restrict candidate bindings by a metadata predicate
    pub fn constraint<F>(mut self, constraint: F) -> Self
    where
        F: Fn(&BindingMetadata) -> bool + Send + Sync + 'static,
    {
        self.constraint = Some(Arc::new(constraint));
        self
    }

    /// Restrict candidate bindings to one with the given name
    pub fn named<S: Into<String>>(self, name: S) -> Self {
        let name = name.into();
        self.constraint(move |metadata| metadata.name() == Some(name.as_str()))
    }

    /// Attach a call-time parameter
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Convert failure outcomes into empty results
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Expect exactly one unambiguous result
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Finish the request
    pub fn build(self) -> Request {
        Request {
            service: self.service,
            constraint: self.constraint,
            parameters: self.parameters,
            optional: self.optional,
            unique: self.unique,
            parent: None,
            depth: 0,
        }
    }
}
