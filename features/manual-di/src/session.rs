use std::{any::type_name, sync::Arc};

use crate::{
    binder::{self, InjectionTarget},
    cache::InstanceCache,
    container::DiContainer,
    dependency_graph::DependencyGraph,
    errors::{InjectError, RequireError},
    initiator::Initiator,
    registry::{InjectorModule, ProviderRegistry},
    types::{Injectable, Instance, TypeInfo},
};

/// One resolution pass over a module
///
/// Owns the module instance, its provider registry, the dependency graph and the instance cache.
/// Values constructed by one session are never visible to another session;
/// reusing a session shares its cache between calls.
pub struct Session<M: InjectorModule> {
    module: M,
    registry: ProviderRegistry<M>,
    graph: DependencyGraph,
    cache: InstanceCache,
}

impl<M: InjectorModule + Default> Session<M> {
    /// Starts a session on a default constructed module
    pub fn new() -> Result<Self, InjectError> {
        Self::with_module(M::default())
    }
}

impl<M: InjectorModule> Session<M> {
    /// Starts a session on the given module instance
    ///
    /// Fails if providers are registered twice or depend on each other in a cycle
    pub fn with_module(module: M) -> Result<Self, InjectError> {
        let registry = ProviderRegistry::register(&module)?;
        let graph = DependencyGraph::new(&registry)?;

        tracing::debug!(
            "Started session for {} with {} providers",
            type_name::<M>(),
            registry.len()
        );

        Ok(Session {
            module,
            registry,
            graph,
            cache: InstanceCache::new(),
        })
    }

    /// Resolves a single type, constructing only what it depends on
    pub fn resolve<T: Injectable>(&mut self) -> Result<Arc<T>, InjectError> {
        let info = TypeInfo::of::<T>();
        if let Some(instance) = self.cache.get::<T>()? {
            return Ok(instance);
        }

        let Some(provider) = self.registry.provider_for(info.type_id) else {
            tracing::error!("No provider in {} supplies {}", type_name::<M>(), info);
            return Err(InjectError::MissingEntryPoint(info));
        };

        Initiator::new(&self.registry, &self.graph, &self.module).resolve(provider, &mut self.cache)?;

        self.cache
            .get::<T>()?
            .ok_or_else(|| RequireError::TypeMissing(info.type_name).into())
    }

    /// Constructs every provider of the module
    pub fn build_all(&mut self) -> Result<(), InjectError> {
        Initiator::new(&self.registry, &self.graph, &self.module).resolve_all(&mut self.cache)
    }

    /// Constructs the provider tagged as entry point, and everything it depends on
    pub fn build_entry_point(&mut self) -> Result<Instance, InjectError> {
        let Some(entry_point) = self.registry.entry_point_id() else {
            tracing::error!("{} does not declare an entry point", type_name::<M>());
            return Err(InjectError::NoEntryPoint(type_name::<M>()));
        };

        Initiator::new(&self.registry, &self.graph, &self.module).resolve(entry_point, &mut self.cache)
    }

    /// Injects every injectable field of the target, constructing missing values on demand
    pub fn inject<T: InjectionTarget>(&mut self, target: &mut T) -> Result<(), InjectError> {
        binder::bind(target, &self.module, &self.registry, &self.graph, &mut self.cache)
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn registry(&self) -> &ProviderRegistry<M> {
        &self.registry
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Ends the session, keeping everything constructed so far
    pub fn into_container(self) -> DiContainer {
        DiContainer::new(self.cache, self.graph)
    }
}
