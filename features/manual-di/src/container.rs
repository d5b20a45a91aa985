use std::{any::type_name, fmt::Debug, sync::Arc};

use crate::{
    binder::{self, InjectionPoints, InjectionTarget},
    cache::InstanceCache,
    dependency_graph::DependencyGraph,
    errors::{InjectError, RequireError},
    types::Injectable,
};

/// Container holding all instances built by a finished session
///
/// Cloning is cheap, clones share the same instances.
#[derive(Clone)]
pub struct DiContainer(pub Arc<DiContainerInner>);
pub struct DiContainerInner {
    instances: InstanceCache,
    graph: DependencyGraph,
}
impl Debug for DiContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for instance in self.0.instances.iter() {
            list.entry(&instance.info.type_name);
        }
        list.finish()
    }
}

impl DiContainer {
    pub(crate) fn new(instances: InstanceCache, graph: DependencyGraph) -> Self {
        Self(Arc::new(DiContainerInner { instances, graph }))
    }

    /// Attempts to get the requested type
    pub fn require<T: Injectable>(&self) -> Result<Arc<T>, RequireError> {
        self.0
            .instances
            .get::<T>()?
            .ok_or(RequireError::TypeMissing(type_name::<T>()))
    }

    /// Injects already built instances into the target, nothing new is constructed
    pub fn inject<T: InjectionTarget>(&self, target: &mut T) -> Result<(), InjectError> {
        let points = InjectionPoints::<T>::of();

        let mut resolved = Vec::with_capacity(points.len());
        for point in points.iter() {
            let Some(instance) = self.0.instances.get_instance(&point.dependency.type_id) else {
                tracing::error!(
                    "Field '{}' of {} requires {} which was never built",
                    point.name,
                    type_name::<T>(),
                    point.dependency
                );
                return Err(InjectError::MissingProvider {
                    field: point.name,
                    dependency: point.dependency,
                });
            };
            binder::check_type(point, instance)?;
            resolved.push(instance.clone());
        }

        binder::assign(target, &points, &resolved)
    }

    pub fn instances(&self) -> &InstanceCache {
        &self.0.instances
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.0.graph
    }
}
