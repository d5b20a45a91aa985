use std::{ops::Deref, sync::Arc};

use manual_di::{
    errors::RequireError,
    resolver::Resolver,
    types::{DependencyInfo, Instance, TypeInfo},
};

/// A wrapper type to allow for config injections
///
/// Configs registered on a [crate::provider::ConfigProvider] become providers of `Config<T>`,
/// which can be required by any provider parameter or injectable field.
///
/// # Example
/// ```rust
/// use manual_di::{InjectorModule, ProviderRegistry, RegistryError};
/// use manual_di_config::{config::Config, provider::ConfigProvider};
///
/// pub struct ServerConfig {
///     port: u16,
/// }
///
/// pub struct ServerModule {
///     configs: ConfigProvider,
/// }
/// impl ServerModule {
///     fn provide_address(&self, config: Config<ServerConfig>) -> String {
///         format!("127.0.0.1:{}", config.port)
///     }
/// }
/// impl InjectorModule for ServerModule {
///     fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
///         self.configs.register_into(registry)?;
///         registry.provide("provide_address", Self::provide_address)?;
///         Ok(())
///     }
/// }
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            inner: self.inner.clone(),
        }
    }
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Config").field(&self.inner).finish()
    }
}
impl<T> Config<T> {
    pub(crate) fn new(config: T) -> Self {
        Config {
            inner: Arc::new(config),
        }
    }

    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T: Send + Sync + 'static> Resolver for Config<T> {
    fn resolve(slot: Option<&Instance>) -> Result<Self, RequireError> {
        Arc::<Config<T>>::resolve(slot).map(|config| (*config).clone())
    }

    fn dependency_info() -> DependencyInfo {
        DependencyInfo {
            type_info: TypeInfo::of::<Config<T>>(),
            optional: false,
        }
    }
}
