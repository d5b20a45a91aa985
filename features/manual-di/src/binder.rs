use std::{any::type_name, sync::Arc};

use crate::{
    cache::InstanceCache,
    dependency_graph::DependencyGraph,
    errors::{InjectError, RequireError},
    initiator::Initiator,
    registry::{InjectorModule, ProviderRegistry},
    types::{Injectable, Instance, TypeInfo},
};

/// An object with fields which get their values injected in place
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use manual_di::{InjectionPoints, InjectionTarget};
///
/// struct Presenter;
///
/// #[derive(Default)]
/// struct MainScreen {
///     presenter: Option<Arc<Presenter>>,
/// }
/// impl InjectionTarget for MainScreen {
///     fn injection_points(points: &mut InjectionPoints<Self>) {
///         points.field("presenter", |screen: &mut Self, presenter: Arc<Presenter>| {
///             screen.presenter = Some(presenter)
///         });
///     }
/// }
/// ```
pub trait InjectionTarget: Sized + 'static {
    /// Lists every injectable field
    fn injection_points(points: &mut InjectionPoints<Self>);
}

type AssignFn<T> = Box<dyn Fn(&mut T, &Instance) -> Result<(), RequireError>>;

/// A single injectable field
pub struct InjectionPoint<T> {
    /// Field name used in diagnostics
    pub name: &'static str,
    /// Declared type of the field
    pub dependency: TypeInfo,
    assign: AssignFn<T>,
}

/// The injectable fields of a target
pub struct InjectionPoints<T> {
    points: Vec<InjectionPoint<T>>,
}
impl<T: InjectionTarget> Default for InjectionPoints<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T: InjectionTarget> InjectionPoints<T> {
    /// Collects the injection points of `T`
    pub fn of() -> Self {
        let mut points = Self::default();
        T::injection_points(&mut points);
        points
    }

    /// Adds a field of declared type `V`, assigned through `setter`
    pub fn field<V, Setter>(&mut self, name: &'static str, setter: Setter) -> &mut Self
    where
        V: Injectable,
        Setter: Fn(&mut T, Arc<V>) + 'static,
    {
        self.points.push(InjectionPoint {
            name,
            dependency: TypeInfo::of::<V>(),
            assign: Box::new(move |target: &mut T, instance: &Instance| {
                let value = instance
                    .downcast::<V>()
                    .map_err(|actual_type| RequireError::DowncastFailed {
                        required_type: type_name::<V>(),
                        actual_type,
                    })?;
                setter(target, value);
                Ok(())
            }),
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &InjectionPoint<T>> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Resolves every injection point of the target and assigns it in place
///
/// Values missing from the cache are constructed on demand.
/// Nothing is assigned unless every field could be resolved.
pub(crate) fn bind<T: InjectionTarget, M: InjectorModule>(
    target: &mut T,
    module: &M,
    registry: &ProviderRegistry<M>,
    graph: &DependencyGraph,
    cache: &mut InstanceCache,
) -> Result<(), InjectError> {
    let points = InjectionPoints::<T>::of();
    let mut initiator = Initiator::new(registry, graph, module);

    let mut resolved = Vec::with_capacity(points.len());
    for point in points.iter() {
        let instance = match cache.get_instance(&point.dependency.type_id) {
            Some(instance) => instance.clone(),
            None => {
                let Some(provider) = registry.provider_for(point.dependency.type_id) else {
                    tracing::error!(
                        "Field '{}' of {} requires unregistered type {}",
                        point.name,
                        type_name::<T>(),
                        point.dependency
                    );
                    return Err(InjectError::MissingProvider {
                        field: point.name,
                        dependency: point.dependency,
                    });
                };
                initiator.resolve(provider, cache)?
            }
        };
        check_type(point, &instance)?;
        resolved.push(instance);
    }

    assign(target, &points, &resolved)
}

/// Assigns already resolved values, one per injection point
pub(crate) fn assign<T: InjectionTarget>(
    target: &mut T,
    points: &InjectionPoints<T>,
    resolved: &[Instance],
) -> Result<(), InjectError> {
    for (point, instance) in points.iter().zip(resolved) {
        (point.assign)(target, instance)?;
        tracing::debug!("Injected {} into '{}' of {}", point.dependency, point.name, type_name::<T>());
    }
    Ok(())
}

/// Fails before any field is assigned if a value does not fit its field
pub(crate) fn check_type<T>(point: &InjectionPoint<T>, instance: &Instance) -> Result<(), RequireError> {
    if instance.concrete_type_id() != point.dependency.type_id {
        return Err(RequireError::DowncastFailed {
            required_type: point.dependency.type_name,
            actual_type: instance.concrete_type_name(),
        });
    }
    Ok(())
}
