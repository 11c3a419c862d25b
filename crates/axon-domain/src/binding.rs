//! Binding data model
//!
//! A binding is a registered rule mapping a requested service identity to an
//! activation provider, together with the attributes the precedence
//! comparator and the request constraint system operate on. Bindings are
//! immutable once built, except for the implicit flag the kernel sets on
//! fallback-synthesized bindings before registering them.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::context::ResolutionContext;
use crate::error::{Error, Result};
use crate::ports::provider::Provider;
use crate::request::Request;
use crate::service::{ServiceId, ServiceInstance};

/// Condition predicate deciding whether a binding applies to a request
pub type ConditionFn = dyn Fn(&Request) -> bool + Send + Sync;

/// Stable identity of a registered binding, used for removal
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BindingId(Uuid);

impl BindingId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Lifetime policy tag carried by a binding.
///
/// The tag is opaque to the resolution kernel; it is honored by the external
/// instance cache collaborator.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum ScopePolicy {
    /// A fresh instance per resolution, never tracked
    #[default]
    Transient,
    /// One tracked instance reused for the binding's lifetime
    Singleton,
    /// A custom scope interpreted by the instance cache
    Named(String),
}

/// Descriptive attributes of a binding, visible to request constraints
#[derive(Clone, Debug, Default)]
pub struct BindingMetadata {
    name: Option<String>,
    attributes: serde_json::Map<String, serde_json::Value>,
}

impl BindingMetadata {
    /// Optional binding name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Look up a metadata attribute by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Whether an attribute is present under the key
    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }
}

/// A registered service binding.
///
/// Identity is the requested service type it answers for; the activation
/// provider is opaque to the kernel and only invoked by the pipeline.
pub struct Binding {
    id: BindingId,
    service: ServiceId,
    provider: Arc<dyn Provider>,
    scope: ScopePolicy,
    condition: Option<Arc<ConditionFn>>,
    open_target: bool,
    implicit: bool,
    metadata: BindingMetadata,
}

impl Binding {
    /// Start building a binding for the given service identity
    pub fn builder(service: ServiceId) -> BindingBuilder {
        BindingBuilder {
            service,
            provider: None,
            scope: ScopePolicy::default(),
            condition: None,
            open_target: false,
            implicit: false,
            metadata: BindingMetadata::default(),
        }
    }

    /// Stable identity of this registration
    pub fn id(&self) -> BindingId {
        self.id
    }

    /// The service identity this binding answers for
    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// The activation provider
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// The scope tag honored by the instance cache
    pub fn scope(&self) -> &ScopePolicy {
        &self.scope
    }

    /// Whether this binding's applicability depends on contextual metadata
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Whether this binding answers for a family of services rather than one
    /// fully closed target
    pub fn is_open_target(&self) -> bool {
        self.open_target
    }

    /// Whether this binding was synthesized by fallback machinery
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Descriptive attributes, matched by request constraints
    pub fn metadata(&self) -> &BindingMetadata {
        &self.metadata
    }

    /// Whether this binding applies to the request.
    ///
    /// An unconditional binding applies to every request for its service.
    pub fn matches(&self, request: &Request) -> bool {
        match &self.condition {
            Some(condition) => condition(request),
            None => true,
        }
    }

    /// Flag this binding as fallback-synthesized.
    ///
    /// Called by the kernel on bindings produced by missing-binding resolvers
    /// before they are registered.
    pub fn mark_implicit(&mut self) {
        self.implicit = true;
    }

    /// Short human-readable description used in ambiguity diagnostics
    pub fn describe(&self) -> String {
        match self.metadata.name() {
            Some(name) => format!("{} (named \"{name}\")", self.service),
            None => self.service.to_string(),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("scope", &self.scope)
            .field("conditional", &self.is_conditional())
            .field("open_target", &self.open_target)
            .field("implicit", &self.implicit)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Closure adapter so builders can accept plain factory functions
struct ClosureProvider<F>(F);

impl<F> Provider for ClosureProvider<F>
where
    F: Fn(&ResolutionContext) -> Result<ServiceInstance> + Send + Sync,
{
    fn create(&self, context: &ResolutionContext) -> Result<ServiceInstance> {
        (self.0)(context)
    }
}

/// Fluent builder for [`Binding`]
pub struct BindingBuilder {
    service: ServiceId,
    provider: Option<Arc<dyn Provider>>,
    scope: ScopePolicy,
    condition: Option<Arc<ConditionFn>>,
    open_target: bool,
    implicit: bool,
    metadata: BindingMetadata,
}

impl BindingBuilder {
    /// Use the given activation provider
    pub fn to_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Activate by calling a factory function per resolution
    pub fn to_factory<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.to_provider(Arc::new(ClosureProvider(move |_: &ResolutionContext| {
            Ok(Arc::new(factory()) as ServiceInstance)
        })))
    }

    /// Activate to a pre-built shared value
    pub fn to_constant<T: Send + Sync + 'static>(self, value: T) -> Self {
        let value: ServiceInstance = Arc::new(value);
        self.to_provider(Arc::new(ClosureProvider(move |_: &ResolutionContext| {
            Ok(value.clone())
        })))
    }

    /// Give the binding a name, matchable by request constraints
    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.metadata.name = Some(name.into());
        self
    }

    /// Attach a metadata attribute
    pub fn with_attribute<S: Into<String>>(mut self, key: S, value: serde_json::Value) -> Self {
        self.metadata.attributes.insert(key.into(), value);
        self
    }

    /// Restrict the binding to requests satisfying the condition
    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Set the scope tag
    pub fn in_scope(mut self, scope: ScopePolicy) -> Self {
        self.scope = scope;
        self
    }

    /// Mark the binding as answering for a still-open family of services
    pub fn open_target(mut self, open: bool) -> Self {
        self.open_target = open;
        self
    }

    /// Mark the binding as fallback-synthesized
    pub fn implicit(mut self, implicit: bool) -> Self {
        self.implicit = implicit;
        self
    }

    /// Finish the binding.
    ///
    /// Fails fast when no provider was set or the binding name is empty.
    pub fn build(self) -> Result<Binding> {
        if let Some(name) = &self.metadata.name {
            if name.is_empty() {
                return Err(Error::invalid_argument(format!(
                    "binding for {} has an empty name",
                    self.service
                )));
            }
        }
        let provider = self.provider.ok_or_else(|| {
            Error::invalid_argument(format!("binding for {} has no provider", self.service))
        })?;
        Ok(Binding {
            id: BindingId::new(),
            service: self.service,
            provider,
            scope: self.scope,
            condition: self.condition,
            open_target: self.open_target,
            implicit: self.implicit,
            metadata: self.metadata,
        })
    }
}
