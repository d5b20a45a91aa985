use std::{any::TypeId, collections::HashMap};

use manual_di::{
    registry::{InjectorModule, ProviderRegistry},
    types::{Instance, TypeInfo},
    RegistryError,
};

use crate::{config::Config, errors::ConfigError};

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type.
#[derive(Default, Clone)]
pub struct ConfigProvider {
    /// Every entry holds a `Config<T>` keyed by the `TypeId` of `T`
    configs: HashMap<TypeId, Instance>,
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a config with specified type.
    ///
    /// Returns `Ok(None)` if the config type is not registered
    pub fn get_config<T: Send + Sync + 'static>(&self) -> Result<Option<Config<T>>, ConfigError> {
        self.configs
            .get(&TypeId::of::<T>())
            .map(|entry| {
                entry
                    .downcast::<Config<T>>()
                    .map(|config| (*config).clone())
                    .map_err(|_| ConfigError::ConfigMismatch(TypeInfo::of::<T>()))
            })
            .transpose()
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a
    /// [`ConfigError`] runtime error
    pub fn add_config<T: Send + Sync + 'static>(&mut self, config: T) -> Result<&mut Self, ConfigError> {
        let type_id = TypeId::of::<T>();

        if self.configs.contains_key(&type_id) {
            return Err(ConfigError::ConfigAlreadyRegistered(TypeInfo::of::<T>()));
        }

        tracing::debug!("Registered config {}", std::any::type_name::<T>());
        self.configs.insert(type_id, Instance::new(Config::new(config)));
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Send + Sync + 'static>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    /// Registers every config as a provider of `Config<T>` without dependencies
    pub fn register_into<M: InjectorModule>(
        &self,
        registry: &mut ProviderRegistry<M>,
    ) -> Result<(), RegistryError> {
        for instance in self.configs.values() {
            registry.add_erased_instance(instance.info.type_name, instance.clone())?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
