use crate::{
    cache::InstanceCache,
    dependency_graph::{DependencyGraph, DependencyGraphError, DependencyGraphErrors},
    errors::InjectError,
    registry::{InjectorModule, ProviderId, ProviderRegistry},
    types::Instance,
};

/// Constructs provider values depth first, dependencies before dependents
///
/// Every produced value is memoized in the [InstanceCache],
/// so each provider runs at most once per cache.
pub(crate) struct Initiator<'a, M> {
    registry: &'a ProviderRegistry<M>,
    graph: &'a DependencyGraph,
    module: &'a M,
    /// Providers on the current DFS path
    in_progress: Vec<ProviderId>,
}

impl<'a, M: InjectorModule> Initiator<'a, M> {
    pub(crate) fn new(registry: &'a ProviderRegistry<M>, graph: &'a DependencyGraph, module: &'a M) -> Self {
        Initiator {
            registry,
            graph,
            module,
            in_progress: Vec::new(),
        }
    }

    /// Resolves the value of a provider, constructing all of its dependencies first
    pub(crate) fn resolve(&mut self, id: ProviderId, cache: &mut InstanceCache) -> Result<Instance, InjectError> {
        // Copy the references out, so recursing does not borrow self
        let (registry, graph) = (self.registry, self.graph);
        let provider = &registry[id];
        let info = provider.supplies();

        // Check if we already have a result
        if let Some(instance) = cache.get_instance(&info.type_id) {
            tracing::trace!("Reusing instance of {}", info);
            return Ok(instance.clone());
        }

        if self.in_progress.contains(&id) {
            return Err(self.circular_dependency(id).into());
        }

        self.in_progress.push(id);
        for dependency in graph.dependencies(id) {
            self.resolve(*dependency, cache)?;
        }
        self.in_progress.pop();

        // Arguments follow the declared parameter order, not the graph order
        let slots: Vec<Option<Instance>> = provider
            .dependencies()
            .iter()
            .map(|dependency| cache.get_instance(&dependency.type_info.type_id).cloned())
            .collect();

        let instance = provider.invoke(self.module, &slots)?;
        tracing::debug!("Constructed instance of {} using '{}'", info, provider.name());

        cache.insert(instance.clone());
        Ok(instance)
    }

    /// Constructs every provider of the registry
    pub(crate) fn resolve_all(&mut self, cache: &mut InstanceCache) -> Result<(), InjectError> {
        let graph = self.graph;
        let order = graph.construction_order();
        tracing::debug!("Constructing {} providers", order.len());

        for id in order {
            self.resolve(*id, cache)?;
        }
        Ok(())
    }

    fn circular_dependency(&self, id: ProviderId) -> DependencyGraphErrors {
        let start = self
            .in_progress
            .iter()
            .position(|visited| *visited == id)
            .unwrap_or_default();
        let mut chain: Vec<_> = self.in_progress[start..]
            .iter()
            .map(|visited| self.registry[*visited].supplies())
            .collect();
        let from = self.registry[id].supplies();
        let to = chain.last().copied().unwrap_or(from);
        chain.push(from);

        tracing::error!("Circular dependency while resolving {}", from);
        DependencyGraphErrors {
            errors: vec![DependencyGraphError::CircularDependency { from, to, chain }],
        }
    }
}
