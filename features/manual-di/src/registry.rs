use std::{any::TypeId, collections::HashMap, ops::Index, sync::Arc};

use crate::{
    errors::RegistryError,
    provider::{Provider, ProviderFn},
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// A collection of providers, instantiated once per resolution pass
///
/// Modules list their providers explicitly:
/// ```rust
/// use std::sync::Arc;
/// use manual_di::{InjectorModule, ProviderRegistry, RegistryError};
///
/// #[derive(Default)]
/// struct AppModule;
/// impl AppModule {
///     fn provide_name(&self) -> String {
///         "manual-di".to_string()
///     }
///     fn provide_length(&self, name: Arc<String>) -> usize {
///         name.len()
///     }
/// }
/// impl InjectorModule for AppModule {
///     fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
///         registry
///             .provide("provide_name", Self::provide_name)?
///             .provide("provide_length", Self::provide_length)?;
///         Ok(())
///     }
/// }
/// ```
pub trait InjectorModule: Sized + 'static {
    /// Registers every provider of the module
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError>;
}

/// Identity of a registered provider, its registration index
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProviderId(usize);
impl ProviderId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Maps produced types to providers and providers to the types they require
pub struct ProviderRegistry<M> {
    providers: Vec<Provider<M>>,
    by_product: HashMap<TypeId, ProviderId>,
    entry_point: Option<ProviderId>,
}
impl<M> std::fmt::Debug for ProviderRegistry<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.providers).finish()
    }
}
impl<M: InjectorModule> Default for ProviderRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: InjectorModule> ProviderRegistry<M> {
    pub fn new() -> Self {
        ProviderRegistry {
            providers: Vec::new(),
            by_product: HashMap::new(),
            entry_point: None,
        }
    }

    /// Collects all providers of the given module
    pub fn register(module: &M) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        module.providers(&mut registry)?;

        tracing::debug!(
            "Registered {} providers of {}",
            registry.len(),
            std::any::type_name::<M>()
        );
        Ok(registry)
    }

    /// Registers an infallible provider
    ///
    /// The product is the provider's return type as written, so a provider returning `Arc<Foo>`
    /// supplies `Arc<Foo>` and not `Foo`. Use [ProviderRegistry::provide_shared] for those.
    pub fn provide<F, Args>(&mut self, name: &'static str, provider: F) -> Result<&mut Self, RegistryError>
    where
        F: ProviderFn<M, Args>,
        F::Output: Injectable,
    {
        self.insert(Self::erase(name, provider))?;
        Ok(self)
    }

    /// Registers an infallible provider which hands out an already shared value
    ///
    /// The product is `T`, so `Arc<T>` parameters and fields resolve to the returned `Arc`.
    pub fn provide_shared<F, Args, T>(&mut self, name: &'static str, provider: F) -> Result<&mut Self, RegistryError>
    where
        F: ProviderFn<M, Args, Output = Arc<T>>,
        T: Injectable,
    {
        let provider = Provider::new(
            name,
            TypeInfo::of::<T>(),
            F::dependencies(),
            move |module, slots| Ok(Ok(Instance::from_arc(provider.call(module, slots)?))),
        );
        self.insert(provider)?;
        Ok(self)
    }

    /// Registers a provider which can fail - failing aborts the resolution pass
    pub fn try_provide<F, Args, T, E>(
        &mut self,
        name: &'static str,
        provider: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: ProviderFn<M, Args, Output = Result<T, E>>,
        T: Injectable,
        E: Into<DynError>,
    {
        let provider = Provider::new(
            name,
            TypeInfo::of::<T>(),
            F::dependencies(),
            move |module, slots| {
                Ok(provider
                    .call(module, slots)?
                    .map(Instance::new)
                    .map_err(Into::into))
            },
        );
        self.insert(provider)?;
        Ok(self)
    }

    /// Registers an infallible provider and tags it as the module's entry point
    pub fn entry_point<F, Args>(&mut self, name: &'static str, provider: F) -> Result<&mut Self, RegistryError>
    where
        F: ProviderFn<M, Args>,
        F::Output: Injectable,
    {
        if let Some(existing) = self.entry_point {
            return Err(RegistryError::DuplicateEntryPoint {
                existing: self.providers[existing.0].name(),
                duplicate: name,
            });
        }

        let id = self.insert(Self::erase(name, provider))?;
        self.entry_point = Some(id);
        Ok(self)
    }

    /// Registers an already created value as a provider without dependencies
    pub fn add_instance<T: Injectable>(&mut self, name: &'static str, value: T) -> Result<&mut Self, RegistryError> {
        self.add_erased_instance(name, Instance::from_arc(Arc::new(value)))
    }

    /// Registers an already created, type erased value as a provider without dependencies
    pub fn add_erased_instance(&mut self, name: &'static str, instance: Instance) -> Result<&mut Self, RegistryError> {
        let info = instance.info;
        self.insert(Provider::new(name, info, Vec::new(), move |_, _| {
            Ok(Ok(instance.clone()))
        }))?;
        Ok(self)
    }

    fn erase<F, Args>(name: &'static str, provider: F) -> Provider<M>
    where
        F: ProviderFn<M, Args>,
        F::Output: Injectable,
    {
        Provider::new(
            name,
            TypeInfo::of::<F::Output>(),
            F::dependencies(),
            move |module, slots| Ok(Ok(Instance::new(provider.call(module, slots)?))),
        )
    }

    fn insert(&mut self, provider: Provider<M>) -> Result<ProviderId, RegistryError> {
        let product = provider.supplies();
        if let Some(existing) = self.by_product.get(&product.type_id) {
            tracing::error!(
                "'{}' is provided twice, by '{}' and '{}'",
                product,
                self.providers[existing.0].name(),
                provider.name()
            );
            return Err(RegistryError::DuplicateProvider {
                product,
                existing: self.providers[existing.0].name(),
                duplicate: provider.name(),
            });
        }

        let id = ProviderId(self.providers.len());
        tracing::debug!(
            "Provider '{}' supplies {} from {} dependencies",
            provider.name(),
            product,
            provider.dependencies().len()
        );
        self.by_product.insert(product.type_id, id);
        self.providers.push(provider);
        Ok(id)
    }
}

impl<M> ProviderRegistry<M> {
    /// Returns the provider producing the given type
    pub fn provider_for(&self, type_id: TypeId) -> Option<ProviderId> {
        self.by_product.get(&type_id).copied()
    }

    pub fn get(&self, id: ProviderId) -> Option<&Provider<M>> {
        self.providers.get(id.0)
    }

    /// All providers in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, &Provider<M>)> {
        self.providers
            .iter()
            .enumerate()
            .map(|(index, provider)| (ProviderId(index), provider))
    }

    pub fn entry_point_id(&self) -> Option<ProviderId> {
        self.entry_point
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Ids are only handed out by the registry they index
impl<M> Index<ProviderId> for ProviderRegistry<M> {
    type Output = Provider<M>;

    fn index(&self, id: ProviderId) -> &Self::Output {
        &self.providers[id.0]
    }
}
