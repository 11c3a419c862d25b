//! The resolution kernel
//!
//! `Kernel` ties the binding registry, candidate cache, precedence rule,
//! missing-binding protocol, module registry, and activation bridge together
//! behind the container's public surface.
//!
//! Candidate selection (lookup, satisfies filtering, uniqueness and
//! ambiguity rules) runs eagerly inside [`Kernel::resolve`]; activation is
//! lazy. The returned [`ResolvedServices`] iterator produces one instance per
//! step by handing a resolution context to the pipeline, so callers that
//! only probe existence or consume part of the results never pay for the
//! rest.

use std::any::Any;
use std::sync::{Arc, Mutex};

use axon_domain::ports::{
    BindingHost, InstanceCache, Module, RegistrySnapshot, ScopeToken,
};
use axon_domain::{
    downcast_instance, Binding, Error, Parameter, Request, ResolutionContext, Result, ServiceId,
    ServiceInstance,
};
use tracing::debug;

use crate::cache::BindingCache;
use crate::components::{ComponentContainer, ComponentContainerBuilder};
use crate::missing::MissingBindingHandler;
use crate::modules::ModuleRegistry;
use crate::precedence;
use crate::providers::ConstantProvider;
use crate::registry::BindingRegistry;
use crate::settings::KernelSettings;
use crate::sync;

/// The resolution kernel of the container
pub struct Kernel {
    settings: Arc<KernelSettings>,
    components: Arc<ComponentContainer>,
    registry: Arc<BindingRegistry>,
    missing: MissingBindingHandler,
    modules: ModuleRegistry,
    scopes: Arc<Mutex<Vec<ScopeToken>>>,
}

impl Kernel {
    /// Start building a kernel
    pub fn builder() -> KernelBuilder {
        KernelBuilder {
            settings: KernelSettings::default(),
            components: ComponentContainer::builder(),
            modules: Vec::new(),
        }
    }

    /// The kernel's settings
    pub fn settings(&self) -> &KernelSettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Binding registry surface
    // ------------------------------------------------------------------

    /// Register a binding; returns the shared handle for later removal
    pub fn add_binding(&self, binding: Binding) -> Result<Arc<Binding>> {
        self.registry.add(binding)
    }

    /// Remove a previously registered binding
    pub fn remove_binding(&self, binding: &Binding) -> Result<()> {
        self.registry.remove(binding)
    }

    /// Remove every binding registered for the service
    pub fn unbind(&self, service: ServiceId) {
        self.registry.unbind_all(service);
    }

    /// The precedence-ordered candidate bindings for the service.
    ///
    /// Served from the candidate cache; on a miss, literal registry entries
    /// are merged with the output of every binding-resolver strategy, sorted
    /// by precedence descending, and memoized. The whole miss path runs
    /// under the cache's single global lock.
    pub fn get_bindings(&self, service: ServiceId) -> Vec<Arc<Binding>> {
        let cache = self.cache();
        cache.lookup(service, || {
            let mut candidates = self.registry.bindings_for(service);
            for resolver in self.components.binding_resolvers() {
                for synthesized in resolver.resolve(self.registry.as_ref(), service) {
                    candidates.push(Arc::new(synthesized));
                }
            }
            precedence::sort_descending(&mut candidates);
            candidates
        })
    }

    // ------------------------------------------------------------------
    // Module registry surface
    // ------------------------------------------------------------------

    /// Load a batch of modules through the two-phase lifecycle
    pub fn load(&self, modules: Vec<Box<dyn Module>>) -> Result<()> {
        self.modules.load(modules, self)
    }

    /// Unload the module registered under the name
    pub fn unload(&self, name: &str) -> Result<()> {
        self.modules.unload(name, self)
    }

    /// Whether a module is loaded under the name
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.has(name)
    }

    /// Names of the loaded modules, in load order
    pub fn get_modules(&self) -> Vec<String> {
        self.modules.names()
    }

    // ------------------------------------------------------------------
    // Resolution engine
    // ------------------------------------------------------------------

    /// Resolve a request into a lazy sequence of instances.
    ///
    /// Candidate selection and the unresolved/ambiguity failure shapes are
    /// eager; activation happens per iterator step. Optional requests
    /// convert both failure shapes into an empty sequence.
    pub fn resolve(&self, request: Request) -> Result<ResolvedServices> {
        let request = Arc::new(request);
        self.resolve_request(request, self.settings.allow_missing_binding_synthesis)
    }

    fn resolve_request(
        &self,
        request: Arc<Request>,
        handle_missing: bool,
    ) -> Result<ResolvedServices> {
        let candidates: Vec<Arc<Binding>> = self
            .get_bindings(request.service())
            .into_iter()
            .filter(|binding| self.satisfies(&request, binding))
            .collect();

        if candidates.is_empty() {
            if handle_missing && self.handle_missing_binding(&request)? {
                // A fallback resolver registered implicit bindings (or a
                // concurrent resolution did); retry exactly once.
                return self.resolve_request(request, false);
            }
            if request.is_optional() {
                return Ok(self.selected(request, Vec::new()));
            }
            return Err(Error::not_resolved(request.service().name()));
        }

        if request.is_unique() {
            let chosen = candidates[0].clone();
            if let Some(runner_up) = candidates.get(1) {
                if precedence::tied(&chosen, runner_up) {
                    if request.is_optional() {
                        return Ok(self.selected(request, Vec::new()));
                    }
                    let descriptions = candidates
                        .iter()
                        .take_while(|candidate| precedence::tied(chosen.as_ref(), candidate.as_ref()))
                        .map(|b| b.describe())
                        .collect();
                    return Err(Error::ambiguous(request.service().name(), descriptions));
                }
            }
            return Ok(self.selected(request, vec![chosen]));
        }

        // Multi-result request: explicit candidates suppress implicit ones.
        let selected = if candidates.iter().any(|binding| !binding.is_implicit()) {
            candidates
                .into_iter()
                .filter(|binding| !binding.is_implicit())
                .collect()
        } else {
            candidates
        };
        Ok(self.selected(request, selected))
    }

    fn selected(&self, request: Arc<Request>, bindings: Vec<Arc<Binding>>) -> ResolvedServices {
        debug!(
            service = %request.service(),
            candidates = bindings.len(),
            "request resolved to candidate set"
        );
        ResolvedServices {
            request,
            components: self.components.clone(),
            scope: self.current_scope(),
            bindings: bindings.into_iter(),
        }
    }

    /// Whether at least one candidate satisfies the request.
    ///
    /// Never triggers activation.
    pub fn can_resolve(&self, request: &Request) -> bool {
        self.can_resolve_filtered(request, false)
    }

    /// Like [`Kernel::can_resolve`], optionally ignoring implicit candidates
    pub fn can_resolve_filtered(&self, request: &Request, ignore_implicit: bool) -> bool {
        self.get_bindings(request.service())
            .iter()
            .any(|binding| {
                (!ignore_implicit || !binding.is_implicit()) && self.satisfies_ref(request, binding)
            })
    }

    fn satisfies(&self, request: &Arc<Request>, binding: &Arc<Binding>) -> bool {
        self.satisfies_ref(request, binding)
    }

    // Binding and request must agree in both directions.
    fn satisfies_ref(&self, request: &Request, binding: &Binding) -> bool {
        binding.matches(request) && request.matches(binding.metadata())
    }

    fn handle_missing_binding(&self, request: &Arc<Request>) -> Result<bool> {
        let handler = &self.missing;
        handler.handle(self.registry.as_ref(), request, || self.can_resolve(request))
    }

    // ------------------------------------------------------------------
    // Typed convenience surface
    // ------------------------------------------------------------------

    /// Resolve exactly one `T`
    pub fn get<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        let request = Request::builder(ServiceId::of::<T>()).unique(true).build();
        let mut results = self.resolve(request)?;
        let instance = results
            .next()
            .ok_or_else(|| Error::not_resolved(std::any::type_name::<T>()))??;
        Self::downcast::<T>(&instance)
    }

    /// Resolve one `T` if a single unambiguous candidate exists
    pub fn try_get<T: Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
        let request = Request::builder(ServiceId::of::<T>())
            .unique(true)
            .optional(true)
            .build();
        let mut results = self.resolve(request)?;
        match results.next() {
            Some(instance) => Ok(Some(Self::downcast::<T>(&instance?)?)),
            None => Ok(None),
        }
    }

    /// Resolve every `T`, in precedence order
    pub fn get_all<T: Any + Send + Sync>(&self) -> Result<Vec<Arc<T>>> {
        let request = Request::builder(ServiceId::of::<T>())
            .optional(true)
            .build();
        self.resolve(request)?
            .map(|instance| Self::downcast::<T>(&instance?))
            .collect()
    }

    fn downcast<T: Any + Send + Sync>(instance: &ServiceInstance) -> Result<Arc<T>> {
        downcast_instance::<T>(instance).ok_or_else(|| {
            Error::activation(format!(
                "resolved instance is not of the requested type {}",
                std::any::type_name::<T>()
            ))
        })
    }

    // ------------------------------------------------------------------
    // Activation bridge
    // ------------------------------------------------------------------

    /// Run the pipeline's injection phase against an existing instance.
    ///
    /// Builds an ad-hoc binding and request for the instance's type and
    /// routes them through the pipeline's activation phase only; no
    /// construction occurs and the instance is never handed to the instance
    /// cache for automated release.
    pub fn inject<T: Any + Send + Sync>(
        &self,
        instance: &Arc<T>,
        parameters: Vec<Parameter>,
    ) -> Result<()> {
        let service = ServiceId::of::<T>();
        let erased: ServiceInstance = instance.clone();
        let binding = Binding::builder(service)
            .to_provider(Arc::new(ConstantProvider::from_instance(erased.clone())))
            .build()?;

        let mut request = Request::builder(service).unique(true);
        for parameter in parameters {
            request = request.parameter(parameter);
        }
        let context =
            ResolutionContext::new(Arc::new(request.build()), Arc::new(binding), None);
        // The plan comes from the external planner even though only the
        // injection phase runs.
        context.plan(self.components.planner().as_ref())?;

        let mut instance_ref = axon_domain::InstanceRef::new(erased);
        self.components.pipeline().activate(&context, &mut instance_ref)
    }

    /// Deactivate and drop a tracked instance; returns whether it was found
    pub fn release(&self, instance: &ServiceInstance) -> bool {
        self.components.instance_cache().release(instance)
    }

    /// Open an activation scope.
    ///
    /// Instances activated while the scope is the innermost one are tracked
    /// under its token; dropping the returned guard releases them all
    /// through the instance cache.
    pub fn begin_scope(&self) -> ActivationScope {
        let token = ScopeToken::new();
        sync::lock(&self.scopes).push(token);
        debug!(scope = ?token, "activation scope opened");
        ActivationScope {
            token,
            instance_cache: self.components.instance_cache().clone(),
            scopes: self.scopes.clone(),
        }
    }

    fn current_scope(&self) -> Option<ScopeToken> {
        sync::lock(&self.scopes).last().copied()
    }

    fn cache(&self) -> &BindingCache {
        self.registry.cache()
    }
}

impl BindingHost for Kernel {
    fn add_binding(&self, binding: Binding) -> Result<Arc<Binding>> {
        Kernel::add_binding(self, binding)
    }

    fn remove_binding(&self, binding: &Binding) -> Result<()> {
        Kernel::remove_binding(self, binding)
    }

    fn unbind(&self, service: ServiceId) {
        Kernel::unbind(self, service);
    }

    fn has_module(&self, name: &str) -> bool {
        Kernel::has_module(self, name)
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        self.components.dispose();
    }
}

/// Lazy sequence of resolved instances.
///
/// Each `next` call builds a resolution context for the next selected
/// binding and hands it to the pipeline; nothing is activated for elements
/// the caller never reaches.
pub struct ResolvedServices {
    request: Arc<Request>,
    components: Arc<ComponentContainer>,
    scope: Option<ScopeToken>,
    bindings: std::vec::IntoIter<Arc<Binding>>,
}

impl std::fmt::Debug for ResolvedServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedServices")
            .field("request", &self.request)
            .field("scope", &self.scope)
            .field("remaining", &self.bindings.len())
            .finish_non_exhaustive()
    }
}

impl ResolvedServices {
    /// Number of selected candidates not yet activated
    pub fn remaining(&self) -> usize {
        self.bindings.len()
    }
}

impl Iterator for ResolvedServices {
    type Item = Result<ServiceInstance>;

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.bindings.next()?;
        let context = ResolutionContext::new(self.request.clone(), binding, self.scope);
        Some(self.components.pipeline().resolve(&context))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bindings.size_hint()
    }
}

/// RAII guard for an activation scope
pub struct ActivationScope {
    token: ScopeToken,
    instance_cache: Arc<dyn InstanceCache>,
    scopes: Arc<Mutex<Vec<ScopeToken>>>,
}

impl ActivationScope {
    /// This scope's token
    pub fn token(&self) -> ScopeToken {
        self.token
    }
}

impl Drop for ActivationScope {
    fn drop(&mut self) {
        sync::lock(&self.scopes).retain(|token| *token != self.token);
        self.instance_cache.clear_scope(self.token);
        debug!(scope = ?self.token, "activation scope disposed");
    }
}

/// Builder assembling a [`Kernel`]
pub struct KernelBuilder {
    settings: KernelSettings,
    components: ComponentContainerBuilder,
    modules: Vec<Box<dyn Module>>,
}

impl KernelBuilder {
    /// Use the given settings
    pub fn settings(mut self, settings: KernelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Override the planner component
    pub fn planner(mut self, planner: Arc<dyn axon_domain::ports::Planner>) -> Self {
        self.components = self.components.planner(planner);
        self
    }

    /// Override the pipeline component
    pub fn pipeline(mut self, pipeline: Arc<dyn axon_domain::ports::Pipeline>) -> Self {
        self.components = self.components.pipeline(pipeline);
        self
    }

    /// Override the instance cache component
    pub fn instance_cache(mut self, cache: Arc<dyn InstanceCache>) -> Self {
        self.components = self.components.instance_cache(cache);
        self
    }

    /// Append a candidate-synthesis strategy
    pub fn binding_resolver(
        mut self,
        resolver: Arc<dyn axon_domain::ports::BindingResolver>,
    ) -> Self {
        self.components = self.components.binding_resolver(resolver);
        self
    }

    /// Append a missing-binding fallback strategy
    pub fn missing_resolver(
        mut self,
        resolver: Arc<dyn axon_domain::ports::MissingBindingResolver>,
    ) -> Self {
        self.components = self.components.missing_resolver(resolver);
        self
    }

    /// Queue a module to load once the kernel is built
    pub fn module(mut self, module: Box<dyn Module>) -> Self {
        self.modules.push(module);
        self
    }

    /// Build the kernel and load any queued modules
    pub fn build(self) -> Result<Kernel> {
        let settings = Arc::new(self.settings);
        let cache = Arc::new(BindingCache::new());
        let registry = Arc::new(BindingRegistry::new(cache, settings.clone()));
        let components = Arc::new(self.components.build());
        let missing = MissingBindingHandler::new(components.missing_resolvers().to_vec());

        let kernel = Kernel {
            settings,
            components,
            registry,
            missing,
            modules: ModuleRegistry::new(),
            scopes: Arc::new(Mutex::new(Vec::new())),
        };
        if !self.modules.is_empty() {
            kernel.load(self.modules)?;
        }
        Ok(kernel)
    }
}
